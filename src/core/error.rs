//! Error types for vizkit-plugins.

use thiserror::Error;

/// Result type alias for plugin framework operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plugin framework operations.
#[derive(Error, Debug)]
pub enum Error {
    // Lookup errors
    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    #[error("No factory registered for plugin class {0}")]
    FactoryMissing(String),

    #[error("No plugin available for type {0}")]
    NoPluginForType(String),

    // Dispatch errors
    #[error("Plugin {plugin} does not support update method {method}")]
    UnsupportedUpdate { plugin: String, method: String },

    #[error("Invalid value for update method {0}")]
    InvalidUpdateValue(String),

    // Manifest and configuration errors
    #[error("Manifest parse error in {source_name}: {message}")]
    ManifestParse { source_name: String, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

impl Error {
    /// Build a manifest parse error for the given source.
    pub fn manifest(source_name: &str, err: impl std::fmt::Display) -> Self {
        Error::ManifestParse {
            source_name: source_name.to_string(),
            message: err.to_string(),
        }
    }
}
