//! Visualization metadata per plugin class.
//!
//! Keeps the bindings each class declares and the reverse index from
//! visualized type to the classes that can display it. Both are only ever
//! changed together.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A type a plugin can visualize and the method that takes its values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizedType {
    /// Name of the visualized domain type
    pub type_name: String,
    /// Update method that receives values of the type
    pub method_name: String,
}

impl VisualizedType {
    /// Create a new binding.
    pub fn new(type_name: &str, method_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            method_name: method_name.to_string(),
        }
    }
}

/// Metadata declared by one plugin class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetaInfo {
    /// Declared bindings in manifest order
    pub visualized_types: Vec<VisualizedType>,
}

impl PluginMetaInfo {
    /// Method bound to `type_name`, if declared.
    pub fn method_for(&self, type_name: &str) -> Option<&str> {
        self.visualized_types
            .iter()
            .find(|t| t.type_name == type_name)
            .map(|t| t.method_name.as_str())
    }

    /// Declared type names in manifest order.
    pub fn type_names(&self) -> Vec<String> {
        self.visualized_types
            .iter()
            .map(|t| t.type_name.clone())
            .collect()
    }
}

/// Metadata store plus type index.
#[derive(Clone, Debug, Default)]
pub struct PluginMetaInfoStore {
    /// Class name -> declared metadata
    meta_info: BTreeMap<String, PluginMetaInfo>,
    /// Visualized type -> classes able to display it
    type_index: HashMap<String, Vec<String>>,
}

impl PluginMetaInfoStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `class_name` has an entry, even without bindings.
    pub fn ensure_class(&mut self, class_name: &str) -> &mut PluginMetaInfo {
        self.meta_info.entry(class_name.to_string()).or_default()
    }

    /// Record a binding for `class_name` and index it by type.
    ///
    /// A class is indexed at most once per type, however often it binds it.
    pub fn insert(&mut self, class_name: &str, binding: VisualizedType) {
        let classes = self
            .type_index
            .entry(binding.type_name.clone())
            .or_default();
        if !classes.iter().any(|c| c == class_name) {
            classes.push(class_name.to_string());
        }
        self.ensure_class(class_name).visualized_types.push(binding);
    }

    /// Metadata of a class.
    pub fn get(&self, class_name: &str) -> Option<&PluginMetaInfo> {
        self.meta_info.get(class_name)
    }

    /// Classes indexed under `type_name`. `None` if the type is unknown.
    pub fn classes_for(&self, type_name: &str) -> Option<&[String]> {
        self.type_index
            .get(type_name)
            .filter(|classes| !classes.is_empty())
            .map(Vec::as_slice)
    }

    /// Number of classes with metadata.
    pub fn class_count(&self) -> usize {
        self.meta_info.len()
    }

    /// Total number of bindings over all classes.
    pub fn binding_count(&self) -> usize {
        self.meta_info
            .values()
            .map(|m| m.visualized_types.len())
            .sum()
    }

    /// Drop all metadata and index entries.
    pub fn clear(&mut self) {
        self.meta_info.clear();
        self.type_index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_store_and_index_in_step() {
        let mut store = PluginMetaInfoStore::new();
        store.insert("GridVisualization", VisualizedType::new("GridData", "updateData"));
        store.insert("GridVisualization", VisualizedType::new("Pose", "updatePose"));
        store.insert("PoseVisualization", VisualizedType::new("Pose", "updateData"));

        assert_eq!(store.class_count(), 2);
        assert_eq!(store.binding_count(), 3);

        let mut pose_classes = store.classes_for("Pose").unwrap().to_vec();
        pose_classes.sort();
        assert_eq!(pose_classes, vec!["GridVisualization", "PoseVisualization"]);
        assert_eq!(store.classes_for("GridData").unwrap(), ["GridVisualization"]);
    }

    #[test]
    fn test_repeated_binding_indexed_once() {
        let mut store = PluginMetaInfoStore::new();
        store.insert("GridVisualization", VisualizedType::new("GridData", "updateGrid"));
        store.insert("GridVisualization", VisualizedType::new("GridData", "updateData"));

        assert_eq!(store.classes_for("GridData").unwrap(), ["GridVisualization"]);
        assert_eq!(store.binding_count(), 2);
        assert_eq!(
            store.get("GridVisualization").unwrap().method_for("GridData"),
            Some("updateGrid")
        );
    }

    #[test]
    fn test_method_lookup() {
        let mut store = PluginMetaInfoStore::new();
        store.insert("GridVisualization", VisualizedType::new("Pose", "updatePose"));

        let meta = store.get("GridVisualization").unwrap();
        assert_eq!(meta.method_for("Pose"), Some("updatePose"));
        assert_eq!(meta.method_for("GridData"), None);
        assert_eq!(meta.type_names(), vec!["Pose"]);
    }

    #[test]
    fn test_class_without_bindings() {
        let mut store = PluginMetaInfoStore::new();
        store.ensure_class("EmptyVisualization");

        assert!(store.get("EmptyVisualization").unwrap().visualized_types.is_empty());
        assert_eq!(store.class_count(), 1);
        assert_eq!(store.binding_count(), 0);
    }

    #[test]
    fn test_unknown_type() {
        let store = PluginMetaInfoStore::new();
        assert!(store.classes_for("GridData").is_none());
    }

    #[test]
    fn test_clear() {
        let mut store = PluginMetaInfoStore::new();
        store.insert("GridVisualization", VisualizedType::new("GridData", "updateData"));
        store.clear();

        assert_eq!(store.class_count(), 0);
        assert!(store.get("GridVisualization").is_none());
        assert!(store.classes_for("GridData").is_none());
    }
}
