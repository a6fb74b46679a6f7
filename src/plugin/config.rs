//! Plugin loader configuration.

use crate::core::{Error, Result};
use crate::plugin::interface::{DEFAULT_UPDATE_METHOD, VIZ_PLUGIN_BASE_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding extra manifest directories, `:` separated.
pub const PLUGIN_PATH_ENV: &str = "VIZKIT_PLUGIN_PATH";

/// Plugin loader configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directories scanned for manifests
    pub search_paths: Vec<PathBuf>,
    /// File extension of manifest files
    pub manifest_extension: String,
    /// Base class name that marks visualization plugins
    pub base_class_name: String,
    /// Update method used when a binding names none
    pub default_method_name: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            manifest_extension: "xml".to_string(),
            base_class_name: VIZ_PLUGIN_BASE_NAME.to_string(),
            default_method_name: DEFAULT_UPDATE_METHOD.to_string(),
        }
    }
}

impl LoaderConfig {
    /// Default config with search paths taken from `VIZKIT_PLUGIN_PATH`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(paths) = std::env::var_os(PLUGIN_PATH_ENV) {
            config
                .search_paths
                .extend(std::env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
        }
        config
    }

    /// Parse a JSON config.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Add a manifest directory.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Set the manifest file extension.
    pub fn with_manifest_extension(mut self, extension: &str) -> Self {
        self.manifest_extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Check that required names are not empty.
    pub fn validate(&self) -> Result<()> {
        if self.base_class_name.trim().is_empty() {
            return Err(Error::InvalidConfig("base_class_name is empty".to_string()));
        }
        if self.default_method_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "default_method_name is empty".to_string(),
            ));
        }
        if self.manifest_extension.trim().is_empty() {
            return Err(Error::InvalidConfig("manifest_extension is empty".to_string()));
        }
        Ok(())
    }
}
