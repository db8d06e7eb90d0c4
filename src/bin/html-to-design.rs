//! html-to-design command line
//!
//! `extract` loads a page in Chrome and writes its layer sequence as JSON.
//! `render` replays a layer file onto an in-memory canvas and prints the
//! resulting scene.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use html_to_design::layer::validate_sequence;
use html_to_design::{
    BrowserSession, Canvas, ExtractOptions, FontCatalog, ImportPlugin, LaunchOptions, LayerBundle, PluginMessage,
    PluginState, RenderOptions,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "html-to-design", version, about = "Turn rendered HTML into design layers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture a page and write its layers as JSON
    Extract {
        /// Page to load
        #[arg(long)]
        url: String,

        /// CSS selector of the capture root
        #[arg(long, default_value = "body")]
        selector: String,

        /// Output file (stdout when omitted)
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Browser window width
        #[arg(long, default_value_t = 1440)]
        width: u32,

        /// Browser window height
        #[arg(long, default_value_t = 900)]
        height: u32,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Path to a Chrome/Chromium executable
        #[arg(long)]
        chrome: Option<PathBuf>,
    },

    /// Rebuild a layer file on an in-memory canvas and print the scene
    Render {
        /// Layer file (bare array or bundle object)
        file: PathBuf,

        /// Font families available to text layers, in addition to the default
        #[arg(long = "font")]
        fonts: Vec<String>,

        /// Fallback font family
        #[arg(long, default_value = "Inter")]
        default_font: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Extract {
            url,
            selector,
            out,
            width,
            height,
            headed,
            chrome,
        } => extract(&url, &selector, out, width, height, headed, chrome).await,
        Command::Render {
            file,
            fonts,
            default_font,
        } => render(file, fonts, default_font).await,
    }
}

async fn extract(
    url: &str,
    selector: &str,
    out: Option<PathBuf>,
    width: u32,
    height: u32,
    headed: bool,
    chrome: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut launch = LaunchOptions::new().headless(!headed).window_size(width, height);
    if let Some(path) = chrome {
        launch = launch.chrome_path(path);
    }

    let session = BrowserSession::launch(launch).context("Failed to launch browser")?;
    session.navigate(url)?;

    let options = ExtractOptions::new().default_size(width as f64, height as f64);
    let layers = session.extract_layers(selector, &options)?;
    if let Err(e) = session.close() {
        log::debug!("{}", e);
    }
    validate_sequence(&layers)?;
    log::info!("Captured {} layers from {}", layers.len(), url);

    let json = LayerBundle::new(layers).to_json()?;
    match out {
        Some(path) => tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

async fn render(file: PathBuf, fonts: Vec<String>, default_font: String) -> anyhow::Result<()> {
    let json = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let layers: serde_json::Value = serde_json::from_str(&json)?;

    let catalog = fonts
        .into_iter()
        .fold(FontCatalog::new().with_family(default_font.clone()), |catalog, family| {
            catalog.with_family(family)
        });
    let options = RenderOptions::new().default_font(default_font);

    let mut plugin = ImportPlugin::new(Canvas::new(), catalog, options);
    let state = plugin.handle(PluginMessage::ImportDesign { layers }).await?;
    let PluginState::Imported(summary) = state else {
        bail!("import did not complete");
    };

    println!("{}", plugin.surface().to_json()?);
    eprintln!("{}", summary.message());
    Ok(())
}
