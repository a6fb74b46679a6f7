//! # vizkit-plugins - Visualization plugin framework
//!
//! Lets independently written 3D visualization plugins be discovered at
//! runtime, matched against the data types they can display and hosted in a
//! shared scene with a uniform pose/update lifecycle:
//! - **Loader**: manifest scanning, type-to-plugin lookup, instantiation
//! - **Instances**: pose, dirty/enabled flags and the per-frame update
//! - **Scene**: the host-side node graph plugins attach to
//!
//! ## Quick Start
//!
//! ```rust
//! use vizkit_plugins::plugin::{PluginFactory, VizPlugin, VizPluginLoader};
//! use vizkit_plugins::scene::{SceneNode, SceneRoot};
//! use std::sync::Arc;
//!
//! struct GridVisualization;
//!
//! impl VizPlugin for GridVisualization {
//!     fn update_main_node(&mut self, node: &SceneNode) {
//!         node.clear_children();
//!         node.add_child(SceneNode::group("grid"));
//!     }
//! }
//!
//! fn create_grid() -> Box<dyn VizPlugin> {
//!     Box::new(GridVisualization)
//! }
//!
//! let mut loader = VizPluginLoader::new();
//! loader.register_factory(PluginFactory::new("GridVisualization", "Grid", create_grid));
//! loader.add_manifest_str(
//!     "grid.xml",
//!     r#"<class name="GridVisualization" base_class_name="vizkit3d::VizkitPluginBase">
//!          <meta><viz_type data_type="GridData"/></meta>
//!        </class>"#,
//! );
//! loader.reload();
//!
//! assert_eq!(loader.update_method_name("GridVisualization", "GridData"), Some("updateData"));
//!
//! let plugin = Arc::new(loader.create_viz_plugin_for("GridData").unwrap());
//! let mut scene = SceneRoot::new();
//! scene.add_plugin(Arc::clone(&plugin));
//!
//! plugin.mark_dirty();
//! scene.traverse();
//! assert!(!plugin.is_dirty());
//! ```

pub mod core;
pub mod monitoring;
pub mod plugin;
pub mod scene;

pub use crate::core::error::{Error, Result};
pub use plugin::{VizPlugin, VizPluginInstance, VizPluginLoader};
