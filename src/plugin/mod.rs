//! Plugin Module
//!
//! Provides the visualization plugin framework:
//! - Plugin interface and factories
//! - Plugin instances with the shared pose/update lifecycle
//! - Manifest parsing and class loading
//! - Type-based plugin lookup

pub mod class_loader;
pub mod config;
pub mod instance;
pub mod interface;
pub mod loader;
pub mod manifest;
pub mod meta_info;

pub use class_loader::{ClassInfo, ClassLoader, MetaParser, ScanStats};
pub use config::LoaderConfig;
pub use instance::{PluginEvent, VizPluginInstance};
pub use interface::{
    PluginConstructor, PluginFactory, VizPlugin, DEFAULT_UPDATE_METHOD, VIZ_PLUGIN_BASE_NAME,
};
pub use loader::{ReloadSummary, VizPluginLoader};
pub use meta_info::{PluginMetaInfo, PluginMetaInfoStore, VisualizedType};
