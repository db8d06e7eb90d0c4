//! # html-to-design
//!
//! Capture a rendered HTML page as a flat list of design layers and rebuild
//! those layers as native shapes in a design tool.
//!
//! ## Pipeline
//!
//! - **Extraction**: walk a live DOM (through Chrome DevTools), read computed
//!   styles and rects, and flatten every visible element into typed
//!   [`LayerRecord`]s (frame, rectangle, text, image) in paint order.
//! - **Transport**: the record list is plain JSON ([`LayerBundle`]); moving it
//!   between the two phases is up to the host.
//! - **Reconstruction**: replay the records onto a [`SceneSurface`], one root
//!   frame plus one child per record, resolving fonts through a fallback
//!   chain and skipping anything that cannot be built.
//!
//! ## Capturing a page
//!
//! ```rust,no_run
//! use html_to_design::{BrowserSession, ExtractOptions, LaunchOptions};
//!
//! # fn main() -> html_to_design::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com")?;
//!
//! let layers = session.extract_layers("body", &ExtractOptions::default())?;
//! println!("Captured {} layers", layers.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Rebuilding layers
//!
//! ```rust,no_run
//! use html_to_design::{Canvas, FontCatalog, LayerBundle, RenderOptions, Renderer};
//!
//! # async fn run(json: &str) -> html_to_design::Result<()> {
//! let bundle = LayerBundle::parse(json)?;
//! let mut canvas = Canvas::new();
//! let mut renderer = Renderer::new(FontCatalog::new().with_family("Inter"), RenderOptions::default());
//!
//! let summary = renderer.render(&mut canvas, &bundle.layers).await?;
//! println!("{}", summary.message());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`color`]: color string parsing shared by both phases
//! - [`layer`]: the layer record wire format
//! - [`dom`]: captured element snapshots and the extractor
//! - [`browser`]: browser session used to capture live pages
//! - [`font`]: font fallback chain
//! - [`scene`]: target shape primitives and the host surface trait
//! - [`render`]: the reconstructor
//! - [`plugin`]: host message handling (`import-design`, `cancel`)
//! - [`config`]: extraction and render options
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod color;
pub mod config;
pub mod dom;
pub mod error;
pub mod font;
pub mod layer;
pub mod plugin;
pub mod render;
pub mod scene;

pub use browser::{BrowserSession, LaunchOptions};
pub use color::{Rgb, parse_color};
pub use config::{ExtractOptions, RenderOptions};
pub use dom::{BoundingBox, ComputedStyle, DomTree, ElementNode, Extractor};
pub use error::{ImportError, Result};
pub use font::{FontCatalog, FontLoader, FontName, FontResolver, FontStyle};
pub use layer::{LayerBundle, LayerKind, LayerRecord};
pub use plugin::{ImportPlugin, PluginMessage, PluginState};
pub use render::{RenderSummary, Renderer};
pub use scene::{Canvas, NodeId, Notice, SceneNode, SceneSurface};
