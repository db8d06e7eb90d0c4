use thiserror::Error;

/// Errors that can occur while capturing a page or rebuilding its layers
#[derive(Debug, Error)]
pub enum ImportError {
    /// The layer sequence handed to the renderer was missing or empty
    #[error("Nothing to import: the layer list is empty")]
    EmptyInput,

    /// Extraction input or a layer payload was unusable as a whole
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single element could not be measured or styled
    #[error("Failed to read element: {0}")]
    ElementReadFailure(String),

    /// A single font could not be loaded
    #[error("Font not available: {0}")]
    FontUnavailable(String),

    /// Every font in the fallback chain failed to load
    #[error("No font could be loaded for '{family}' at weight {weight}")]
    FontResolutionFailure { family: String, weight: u16 },

    /// Building or configuring one scene node failed
    #[error("Failed to create node: {0}")]
    NodeCreationFailure(String),

    /// Layer JSON could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Browser could not be launched
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Page navigation failed
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// The capture script failed or returned something unreadable
    #[error("DOM capture failed: {0}")]
    CaptureFailed(String),
}

impl ImportError {
    /// Whether this condition aborts a whole extraction or import run.
    ///
    /// Per-element and per-record failures are absorbed by the pipeline and
    /// only shrink the output.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ImportError::ElementReadFailure(_)
                | ImportError::FontUnavailable(_)
                | ImportError::FontResolutionFailure { .. }
                | ImportError::NodeCreationFailure(_)
        )
    }
}

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, ImportError>;
