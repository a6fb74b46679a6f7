//! Generic class loader.
//!
//! Knows every class declared in the manifests it scans and every factory
//! registered in code, and creates instances of declared classes by name.

use crate::core::{now, Error, Result, Timestamp};
use crate::plugin::instance::VizPluginInstance;
use crate::plugin::interface::PluginFactory;
use crate::plugin::manifest::Manifest;
use roxmltree::Node;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Declaration of a class found in a manifest.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassInfo {
    /// Fully qualified class name
    pub class_name: String,
    /// Declared base class
    pub base_class_name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Manifest the class was declared in
    pub source: String,
    /// When the declaration was read
    pub discovered_at: Timestamp,
}

impl ClassInfo {
    /// Class name without namespace qualifiers.
    pub fn short_name(&self) -> &str {
        short_name(&self.class_name)
    }
}

/// Hook called for every declared class that carries a `<meta>` block.
pub trait MetaParser {
    /// Interpret the `<meta>` element of `info`.
    fn parse_meta(&mut self, info: &ClassInfo, meta: Node<'_, '_>);
}

/// Counters from one manifest scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Manifests parsed successfully
    pub manifests: usize,
    /// Class declarations accepted
    pub classes: usize,
    /// Manifests or declarations rejected
    pub skipped: usize,
}

/// Class loader over manifests and registered factories.
pub struct ClassLoader {
    search_paths: Vec<PathBuf>,
    manifest_extension: String,
    /// In-memory manifests: (source name, xml)
    embedded: Vec<(String, String)>,
    factories: HashMap<String, PluginFactory>,
    classes: BTreeMap<String, ClassInfo>,
}

impl ClassLoader {
    /// Create a loader scanning `search_paths` for `*.{manifest_extension}`.
    pub fn new(search_paths: Vec<PathBuf>, manifest_extension: &str) -> Self {
        Self {
            search_paths,
            manifest_extension: manifest_extension.to_string(),
            embedded: Vec::new(),
            factories: HashMap::new(),
            classes: BTreeMap::new(),
        }
    }

    /// Register a factory. Returns the factory it replaced, if any.
    pub fn register_factory(&mut self, factory: PluginFactory) -> Option<PluginFactory> {
        tracing::debug!(class = factory.class_name(), "registering plugin factory");
        self.factories
            .insert(factory.class_name().to_string(), factory)
    }

    /// Add an in-memory manifest that every reload scans after the search paths.
    pub fn add_manifest_str(&mut self, source_name: &str, xml: &str) {
        self.embedded.push((source_name.to_string(), xml.to_string()));
    }

    /// Drop all declarations and scan the manifests again.
    ///
    /// Unreadable or malformed manifests and declarations are logged and
    /// skipped. A class declared twice keeps its first declaration.
    pub fn reload(&mut self, parser: &mut dyn MetaParser) -> ScanStats {
        self.classes.clear();
        let mut stats = ScanStats::default();

        let mut sources = Vec::new();
        for path in self.manifest_files() {
            match std::fs::read_to_string(&path) {
                Ok(text) => sources.push((path.display().to_string(), text)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot read manifest");
                    stats.skipped += 1;
                }
            }
        }
        sources.extend(self.embedded.iter().cloned());

        for (source_name, text) in &sources {
            self.scan_manifest(source_name, text, parser, &mut stats);
        }
        stats
    }

    fn scan_manifest(
        &mut self,
        source_name: &str,
        text: &str,
        parser: &mut dyn MetaParser,
        stats: &mut ScanStats,
    ) {
        let manifest = match Manifest::parse(source_name, text) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!(error = %e, "skipping manifest");
                stats.skipped += 1;
                return;
            }
        };
        stats.manifests += 1;

        for entry in manifest.classes() {
            if let Some(existing) = self.classes.get(entry.class_name) {
                tracing::warn!(
                    class = entry.class_name,
                    source = source_name,
                    first = %existing.source,
                    "class declared twice, keeping first declaration"
                );
                stats.skipped += 1;
                continue;
            }

            let info = ClassInfo {
                class_name: entry.class_name.to_string(),
                base_class_name: entry.base_class_name.to_string(),
                description: entry.description.map(str::to_string),
                source: source_name.to_string(),
                discovered_at: now(),
            };
            if let Some(meta) = entry.meta {
                parser.parse_meta(&info, meta);
            }
            self.classes.insert(info.class_name.clone(), info);
            stats.classes += 1;
        }
    }

    /// Manifest files in the search paths, sorted per directory.
    fn manifest_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for dir in &self.search_paths {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::debug!(dir = %dir.display(), error = %e, "skipping search path");
                    continue;
                }
            };
            let mut found: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && self.is_manifest(path))
                .collect();
            found.sort();
            files.extend(found);
        }
        files
    }

    fn is_manifest(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.manifest_extension))
    }

    /// Resolve a full or unambiguous short class name among the classes of
    /// base `base_class_name`.
    ///
    /// Classes of other bases never shadow or collide with a match.
    pub fn full_class_name(&self, name: &str, base_class_name: &str) -> Option<&str> {
        self.class_info(name, base_class_name)
            .map(|info| info.class_name.as_str())
    }

    /// Declaration of a class of base `base_class_name`.
    pub fn class_info(&self, name: &str, base_class_name: &str) -> Option<&ClassInfo> {
        if let Some(info) = self.classes.get(name) {
            return (info.base_class_name == base_class_name).then_some(info);
        }

        let mut matches = self.classes.values().filter(|info| {
            info.base_class_name == base_class_name && info.short_name() == name
        });
        match (matches.next(), matches.next()) {
            (Some(info), None) => Some(info),
            (Some(_), Some(_)) => {
                tracing::debug!(name, base = base_class_name, "short class name is ambiguous");
                None
            }
            _ => None,
        }
    }

    /// True if `name` is declared with base class `base_class_name`.
    pub fn has_class_of_type(&self, name: &str, base_class_name: &str) -> bool {
        self.class_info(name, base_class_name).is_some()
    }

    /// All declared classes with the given base, sorted.
    pub fn classes_of_type(&self, base_class_name: &str) -> Vec<String> {
        self.classes
            .values()
            .filter(|info| info.base_class_name == base_class_name)
            .map(|info| info.class_name.clone())
            .collect()
    }

    /// Number of declared classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Create an instance of a declared class of the given base.
    pub fn create_instance(&self, name: &str, base_class_name: &str) -> Result<VizPluginInstance> {
        let info = self
            .class_info(name, base_class_name)
            .ok_or_else(|| Error::PluginNotFound(name.to_string()))?;

        let factory = self
            .factories
            .get(&info.class_name)
            .ok_or_else(|| Error::FactoryMissing(info.class_name.clone()))?;

        Ok(VizPluginInstance::from_factory(factory))
    }

    /// Forget all declarations. Factories and in-memory manifests stay.
    pub fn clear(&mut self) {
        self.classes.clear();
    }
}

/// Class name without namespace qualifiers.
pub fn short_name(class_name: &str) -> &str {
    class_name
        .rsplit_once("::")
        .map_or(class_name, |(_, short)| short)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::interface::VizPlugin;
    use crate::scene::SceneNode;
    use std::fs;

    const BASE: &str = "vizkit3d::VizkitPluginBase";

    struct NullPlugin;

    impl VizPlugin for NullPlugin {
        fn update_main_node(&mut self, _node: &SceneNode) {}
    }

    fn create_null() -> Box<dyn VizPlugin> {
        Box::new(NullPlugin)
    }

    #[derive(Default)]
    struct RecordingParser {
        seen: Vec<String>,
    }

    impl MetaParser for RecordingParser {
        fn parse_meta(&mut self, info: &ClassInfo, meta: Node<'_, '_>) {
            let count = meta.children().filter(|n| n.is_element()).count();
            self.seen.push(format!("{}:{}", info.class_name, count));
        }
    }

    fn manifest(classes: &[(&str, &str)]) -> String {
        let body: String = classes
            .iter()
            .map(|(name, base)| {
                format!(r#"<class name="{name}" base_class_name="{base}"><meta><viz_type data_type="T"/></meta></class>"#)
            })
            .collect();
        format!("<library>{body}</library>")
    }

    #[test]
    fn test_reload_embedded() {
        let mut loader = ClassLoader::new(Vec::new(), "xml");
        loader.add_manifest_str(
            "embedded",
            &manifest(&[("vizkit3d::GridVisualization", BASE), ("other::Thing", "other::Base")]),
        );

        let mut parser = RecordingParser::default();
        let stats = loader.reload(&mut parser);

        assert_eq!(stats, ScanStats { manifests: 1, classes: 2, skipped: 0 });
        assert_eq!(parser.seen, vec!["vizkit3d::GridVisualization:1", "other::Thing:1"]);
        assert_eq!(loader.class_info("GridVisualization", BASE).unwrap().source, "embedded");
    }

    #[test]
    fn test_reload_scans_search_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), manifest(&[("B", BASE)])).unwrap();
        fs::write(dir.path().join("a.XML"), manifest(&[("A", BASE)])).unwrap();
        fs::write(dir.path().join("broken.xml"), "<library>").unwrap();
        fs::write(dir.path().join("notes.txt"), manifest(&[("C", BASE)])).unwrap();

        let mut loader = ClassLoader::new(vec![dir.path().to_path_buf(), dir.path().join("missing")], "xml");
        let mut parser = RecordingParser::default();
        let stats = loader.reload(&mut parser);

        assert_eq!(stats, ScanStats { manifests: 2, classes: 2, skipped: 1 });
        assert_eq!(parser.seen, vec!["A:1", "B:1"]);
        assert_eq!(loader.classes_of_type(BASE), vec!["A", "B"]);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut loader = ClassLoader::new(Vec::new(), "xml");
        loader.add_manifest_str("first", &manifest(&[("Grid", BASE)]));
        loader.add_manifest_str("second", &manifest(&[("Grid", "other::Base")]));

        let mut parser = RecordingParser::default();
        let stats = loader.reload(&mut parser);

        assert_eq!(stats.skipped, 1);
        assert_eq!(parser.seen.len(), 1);
        assert!(loader.has_class_of_type("Grid", BASE));
    }

    #[test]
    fn test_short_name_resolution() {
        let mut loader = ClassLoader::new(Vec::new(), "xml");
        loader.add_manifest_str(
            "m",
            &manifest(&[("a::Grid", BASE), ("b::Grid", BASE), ("a::Model", BASE)]),
        );
        loader.reload(&mut RecordingParser::default());

        assert_eq!(loader.full_class_name("a::Grid", BASE), Some("a::Grid"));
        assert_eq!(loader.full_class_name("Model", BASE), Some("a::Model"));
        assert_eq!(loader.full_class_name("Grid", BASE), None);
        assert_eq!(loader.full_class_name("Texture", BASE), None);
        assert_eq!(loader.full_class_name("a::Model", "other::Base"), None);
        assert_eq!(short_name("vizkit3d::GridVisualization"), "GridVisualization");
        assert_eq!(short_name("Plain"), "Plain");
    }

    #[test]
    fn test_create_instance() {
        let mut loader = ClassLoader::new(Vec::new(), "xml");
        loader.add_manifest_str(
            "m",
            &manifest(&[("vizkit3d::Null", BASE), ("vizkit3d::NoFactory", BASE), ("other::Thing", "x")]),
        );
        loader.register_factory(PluginFactory::new("vizkit3d::Null", "Null", create_null));
        loader.register_factory(PluginFactory::new("other::Thing", "Other", create_null));
        loader.reload(&mut RecordingParser::default());

        let instance = loader.create_instance("Null", BASE).unwrap();
        assert_eq!(instance.class_name(), "vizkit3d::Null");
        assert_eq!(instance.display_name(), "Null");

        assert!(matches!(
            loader.create_instance("NoFactory", BASE),
            Err(Error::FactoryMissing(_))
        ));
        assert!(matches!(
            loader.create_instance("other::Thing", BASE),
            Err(Error::PluginNotFound(_))
        ));
        assert!(matches!(
            loader.create_instance("Missing", BASE),
            Err(Error::PluginNotFound(_))
        ));
    }

    #[test]
    fn test_clear_keeps_factories_and_embedded() {
        let mut loader = ClassLoader::new(Vec::new(), "xml");
        loader.add_manifest_str("m", &manifest(&[("Null", BASE)]));
        loader.register_factory(PluginFactory::new("Null", "Null", create_null));
        loader.reload(&mut RecordingParser::default());

        loader.clear();
        assert_eq!(loader.class_count(), 0);
        assert!(!loader.has_class_of_type("Null", BASE));

        loader.reload(&mut RecordingParser::default());
        assert!(loader.has_class_of_type("Null", BASE));
        assert!(loader.create_instance("Null", BASE).is_ok());
    }

    #[test]
    fn test_short_name_ignores_other_bases() {
        let mut loader = ClassLoader::new(Vec::new(), "xml");
        loader.add_manifest_str(
            "m",
            &manifest(&[
                ("vizkit3d::GridVisualization", BASE),
                ("other::GridVisualization", "other::Base"),
            ]),
        );
        loader.register_factory(PluginFactory::new(
            "vizkit3d::GridVisualization",
            "Grid",
            create_null,
        ));
        loader.reload(&mut RecordingParser::default());

        assert_eq!(
            loader.full_class_name("GridVisualization", BASE),
            Some("vizkit3d::GridVisualization")
        );
        assert_eq!(
            loader.full_class_name("GridVisualization", "other::Base"),
            Some("other::GridVisualization")
        );
        assert!(loader.has_class_of_type("GridVisualization", BASE));
        assert_eq!(
            loader.create_instance("GridVisualization", BASE).unwrap().class_name(),
            "vizkit3d::GridVisualization"
        );
    }
}
