//! Visualization plugin loader.
//!
//! Wraps the generic [`ClassLoader`] and keeps, for every class deriving from
//! the visualization plugin base, the types it can display and the update
//! method bound to each type.
//!
//! The loader is an ordinary value. Lookups take `&self`; `reload`, `clear`
//! and registration take `&mut self`, so sharing it between threads goes
//! through an `RwLock` owned by the caller.

use crate::core::{Error, Result};
use crate::plugin::class_loader::{ClassInfo, ClassLoader, MetaParser};
use crate::plugin::config::LoaderConfig;
use crate::plugin::instance::VizPluginInstance;
use crate::plugin::interface::PluginFactory;
use crate::plugin::manifest::non_empty_attribute;
use crate::plugin::meta_info::{PluginMetaInfoStore, VisualizedType};
use roxmltree::Node;

/// Outcome of a [`VizPluginLoader::reload`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Manifests parsed
    pub manifests: usize,
    /// Classes declared, of any base
    pub classes: usize,
    /// Visualization plugins registered
    pub plugins: usize,
    /// Bindings registered over all plugins
    pub bindings: usize,
    /// Manifests, declarations and bindings skipped as malformed
    pub skipped: usize,
}

/// Meta hook reading `<viz_type>` elements of visualization plugin classes.
struct VizMetaParser<'a> {
    store: &'a mut PluginMetaInfoStore,
    base_class_name: &'a str,
    default_method_name: &'a str,
    skipped: usize,
}

impl MetaParser for VizMetaParser<'_> {
    fn parse_meta(&mut self, info: &ClassInfo, meta: Node<'_, '_>) {
        if info.base_class_name != self.base_class_name {
            return;
        }
        self.store.ensure_class(&info.class_name);

        let viz_types = meta
            .children()
            .filter(|n| n.is_element() && n.has_tag_name("viz_type"));

        for viz_type in viz_types {
            let Some(type_name) = non_empty_attribute(viz_type, "data_type") else {
                tracing::warn!(
                    class = %info.class_name,
                    source = %info.source,
                    "viz_type has no data_type, skipping"
                );
                self.skipped += 1;
                continue;
            };
            let method_name =
                non_empty_attribute(viz_type, "method_name").unwrap_or(self.default_method_name);

            tracing::debug!(
                class = %info.class_name,
                type_name,
                method_name,
                "registering visualized type"
            );
            self.store
                .insert(&info.class_name, VisualizedType::new(type_name, method_name));
        }
    }
}

/// Loader for visualization plugins.
pub struct VizPluginLoader {
    config: LoaderConfig,
    class_loader: ClassLoader,
    meta_info: PluginMetaInfoStore,
}

impl VizPluginLoader {
    /// Create a loader with the default configuration and scan it once.
    ///
    /// The default configuration has no search paths, so only in-memory
    /// manifests are scanned. Use [`LoaderConfig::from_env`] with
    /// [`from_config`](Self::from_config) to honour `VIZKIT_PLUGIN_PATH`.
    pub fn new() -> Self {
        Self::from_config(LoaderConfig::default())
    }

    /// Create a loader from `config` and scan it once.
    pub fn from_config(config: LoaderConfig) -> Self {
        let class_loader =
            ClassLoader::new(config.search_paths.clone(), &config.manifest_extension);
        let mut loader = Self {
            config,
            class_loader,
            meta_info: PluginMetaInfoStore::new(),
        };
        loader.reload();
        loader
    }

    /// Active configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Register a plugin class constructor.
    ///
    /// The class still has to be declared in a manifest to be found.
    pub fn register_factory(&mut self, factory: PluginFactory) -> Option<PluginFactory> {
        self.class_loader.register_factory(factory)
    }

    /// Add an in-memory manifest. Takes effect on the next [`reload`](Self::reload).
    pub fn add_manifest_str(&mut self, source_name: &str, xml: &str) {
        self.class_loader.add_manifest_str(source_name, xml);
    }

    /// Scan all manifests again and rebuild the metadata.
    pub fn reload(&mut self) -> ReloadSummary {
        self.meta_info.clear();

        let mut parser = VizMetaParser {
            store: &mut self.meta_info,
            base_class_name: &self.config.base_class_name,
            default_method_name: &self.config.default_method_name,
            skipped: 0,
        };
        let stats = self.class_loader.reload(&mut parser);
        let skipped_bindings = parser.skipped;

        // Plugins declared without a <meta> block still get an (empty) entry
        for class_name in self.class_loader.classes_of_type(&self.config.base_class_name) {
            self.meta_info.ensure_class(&class_name);
        }

        let summary = ReloadSummary {
            manifests: stats.manifests,
            classes: stats.classes,
            plugins: self.meta_info.class_count(),
            bindings: self.meta_info.binding_count(),
            skipped: stats.skipped + skipped_bindings,
        };
        tracing::info!(
            manifests = summary.manifests,
            plugins = summary.plugins,
            bindings = summary.bindings,
            skipped = summary.skipped,
            "visualization plugins reloaded"
        );
        summary
    }

    /// True if `plugin_name` is declared and derives from the plugin base.
    pub fn has_viz_plugin(&self, plugin_name: &str) -> bool {
        self.class_loader
            .has_class_of_type(plugin_name, &self.config.base_class_name)
    }

    /// Create an instance of the named plugin.
    pub fn create_viz_plugin(&self, plugin_name: &str) -> Result<VizPluginInstance> {
        self.class_loader
            .create_instance(plugin_name, &self.config.base_class_name)
    }

    /// Create an instance of some plugin able to display `visualized_type`.
    ///
    /// Which plugin is chosen when several qualify is unspecified.
    pub fn create_viz_plugin_for(&self, visualized_type: &str) -> Result<VizPluginInstance> {
        let plugin_name = self
            .meta_info
            .classes_for(visualized_type)
            .and_then(|classes| classes.first())
            .ok_or_else(|| Error::NoPluginForType(visualized_type.to_string()))?;
        self.create_viz_plugin(plugin_name)
    }

    /// Update method bound to `visualized_type` by the named plugin.
    pub fn update_method_name(&self, plugin_name: &str, visualized_type: &str) -> Option<&str> {
        let full_name = self
            .class_loader
            .full_class_name(plugin_name, &self.config.base_class_name)?;
        self.meta_info.get(full_name)?.method_for(visualized_type)
    }

    /// Types the named plugin can display.
    pub fn visualized_types(&self, plugin_name: &str) -> Option<Vec<String>> {
        let full_name = self
            .class_loader
            .full_class_name(plugin_name, &self.config.base_class_name)?;
        self.meta_info.get(full_name).map(|meta| meta.type_names())
    }

    /// Plugins able to display `visualized_type`; `None` if there are none.
    pub fn viz_plugins_for(&self, visualized_type: &str) -> Option<Vec<String>> {
        self.meta_info
            .classes_for(visualized_type)
            .map(<[String]>::to_vec)
    }

    /// All declared visualization plugins, sorted.
    pub fn available_viz_plugins(&self) -> Vec<String> {
        self.class_loader
            .classes_of_type(&self.config.base_class_name)
    }

    /// Description text from the manifest.
    pub fn description(&self, plugin_name: &str) -> Option<&str> {
        self.class_loader
            .class_info(plugin_name, &self.config.base_class_name)
            .and_then(|info| info.description.as_deref())
    }

    /// Forget all plugin declarations and metadata.
    pub fn clear(&mut self) {
        self.meta_info.clear();
        self.class_loader.clear();
    }
}

impl Default for VizPluginLoader {
    fn default() -> Self {
        Self::new()
    }
}
