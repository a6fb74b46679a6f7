//! Host scene root.
//!
//! Owns the root node, keeps the attached plugin instances and runs one
//! update traversal per rendered frame.

use crate::plugin::VizPluginInstance;
use crate::scene::node::SceneNode;
use std::sync::Arc;
use uuid::Uuid;

/// Root of a host scene with attached plugins.
pub struct SceneRoot {
    root: SceneNode,
    plugins: Vec<Arc<VizPluginInstance>>,
    frame_count: u64,
}

impl SceneRoot {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            root: SceneNode::group("root"),
            plugins: Vec::new(),
            frame_count: 0,
        }
    }

    /// Root node of the scene.
    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// Attach a plugin. Returns false if it is already attached.
    pub fn add_plugin(&mut self, plugin: Arc<VizPluginInstance>) -> bool {
        if self.plugins.iter().any(|p| p.id() == plugin.id()) {
            return false;
        }
        self.root.add_child(plugin.viz_node());
        tracing::debug!(plugin = plugin.display_name(), id = %plugin.id(), "plugin attached");
        self.plugins.push(plugin);
        true
    }

    /// Detach a plugin and release its node from the scene.
    pub fn remove_plugin(&mut self, id: Uuid) -> Option<Arc<VizPluginInstance>> {
        let index = self.plugins.iter().position(|p| p.id() == id)?;
        let plugin = self.plugins.remove(index);
        self.root.remove_child(&plugin.viz_node());
        tracing::debug!(plugin = plugin.display_name(), %id, "plugin detached");
        Some(plugin)
    }

    /// Attached plugins in attachment order.
    pub fn plugins(&self) -> &[Arc<VizPluginInstance>] {
        &self.plugins
    }

    /// Number of attached plugins.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Frames traversed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Run one update traversal over every attached plugin.
    pub fn traverse(&mut self) -> u64 {
        for plugin in &self.plugins {
            plugin.on_frame_update();
        }
        self.frame_count += 1;
        self.frame_count
    }
}

impl Default for SceneRoot {
    fn default() -> Self {
        Self::new()
    }
}
