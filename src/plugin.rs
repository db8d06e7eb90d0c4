//! Host message protocol of the import side
//!
//! The design tool talks to the importer with small JSON messages:
//! - `{"type": "import-design", "layers": [...]}` rebuilds a captured page
//! - `{"type": "cancel"}` closes the importer without doing any work

use crate::config::RenderOptions;
use crate::error::{ImportError, Result};
use crate::font::FontLoader;
use crate::layer::LayerBundle;
use crate::render::{RenderSummary, Renderer};
use crate::scene::{Notice, SceneSurface};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages the host sends to the importer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PluginMessage {
    /// Rebuild the given layers; either a bare array or a bundle object
    ImportDesign {
        #[serde(default)]
        layers: Value,
    },
    /// Close without importing
    Cancel,
}

/// Lifecycle of an [`ImportPlugin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// Waiting for a message
    Idle,
    /// Last import finished
    Imported(RenderSummary),
    /// Closed by `cancel`; further messages are rejected
    Closed,
}

/// Dispatches host messages to the renderer
pub struct ImportPlugin<S, L> {
    surface: S,
    renderer: Renderer<L>,
    state: PluginState,
}

impl<S: SceneSurface, L: FontLoader> ImportPlugin<S, L> {
    /// Create a plugin bound to a surface and font loader
    pub fn new(surface: S, loader: L, options: RenderOptions) -> Self {
        Self {
            surface,
            renderer: Renderer::new(loader, options),
            state: PluginState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> PluginState {
        self.state
    }

    /// Get the surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consume the plugin and return its surface
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Handle a raw JSON message
    pub async fn handle_json(&mut self, json: &str) -> Result<PluginState> {
        let message: PluginMessage = serde_json::from_str(json)?;
        self.handle(message).await
    }

    /// Handle one host message
    pub async fn handle(&mut self, message: PluginMessage) -> Result<PluginState> {
        if self.state == PluginState::Closed {
            return Err(ImportError::InvalidInput("importer is closed".to_string()));
        }

        match message {
            PluginMessage::Cancel => {
                log::info!("Import cancelled");
                self.surface.close();
                self.state = PluginState::Closed;
            }
            PluginMessage::ImportDesign { layers } => {
                let bundle = match LayerBundle::from_value(layers) {
                    Ok(bundle) => bundle,
                    Err(e) => {
                        self.surface.notify(Notice::error(format!("Import failed: {}", e)));
                        return Err(e);
                    }
                };
                if let Some(id) = &bundle.transfer_id {
                    log::info!("Importing transfer {} ({} layers)", id, bundle.layers.len());
                }

                let summary = self.renderer.render(&mut self.surface, &bundle.layers).await?;
                self.state = PluginState::Imported(summary);
            }
        }

        Ok(self.state)
    }
}
