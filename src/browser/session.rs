use crate::{browser::config::LaunchOptions,
            config::ExtractOptions,
            dom::DomTree,
            error::{ImportError, Result},
            layer::LayerRecord};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that renders pages for capture
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// Tab that pages are loaded into
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));

        // Captures of long pages can take a while; keep the browser alive
        launch_opts.idle_browser_timeout = Duration::from_secs(10 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.sandbox = options.sandbox;

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        let browser = Browser::new(launch_opts).map_err(|e| ImportError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| ImportError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser, tab })
    }

    /// Launch a browser with default options
    pub fn new() -> Result<Self> {
        Self::launch(LaunchOptions::default())
    }

    /// Get the capture tab
    pub fn tab(&self) -> Arc<Tab> {
        self.tab.clone()
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate to a URL and wait for the page to load
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| ImportError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| ImportError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Capture the element tree under `selector`
    pub fn capture(&self, selector: &str) -> Result<DomTree> {
        let tree = DomTree::from_tab(&self.tab, selector)?;
        log::debug!(
            "Captured {} elements under '{}' ({} unreadable)",
            tree.count_elements(),
            selector,
            tree.count_unreadable()
        );
        Ok(tree)
    }

    /// Capture the element tree under `selector` and flatten it into layers
    pub fn extract_layers(&self, selector: &str, options: &ExtractOptions) -> Result<Vec<LayerRecord>> {
        self.capture(selector)?.extract_layers(options)
    }

    /// Close the capture tab; the browser process exits when the session drops
    pub fn close(&self) -> Result<()> {
        self.tab
            .close(false)
            .map_err(|e| ImportError::CaptureFailed(format!("Failed to close capture tab: {}", e)))?;
        Ok(())
    }
}
