//! Plugin interface definition.
//!
//! Defines the interface visualization plugins must implement and the
//! factory through which a plugin class registers itself.

use crate::core::Result;
use crate::scene::SceneNode;
use std::any::Any;
use std::fmt;

/// Base class name a declared class must carry to count as a visualization plugin.
pub const VIZ_PLUGIN_BASE_NAME: &str = "vizkit3d::VizkitPluginBase";

/// Update method bound to a visualized type when the manifest names none.
pub const DEFAULT_UPDATE_METHOD: &str = "updateData";

/// Access to a plugin as [`Any`] for typed downcasts.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Borrow as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Trait every visualization plugin implements.
///
/// The pose, dirty and enabled bookkeeping is shared by all plugins and lives in
/// [`VizPluginInstance`](crate::plugin::VizPluginInstance); a plugin only
/// supplies its content.
pub trait VizPlugin: AsAny + Send {
    /// Build the root content node. Called once, on the first frame update.
    fn create_main_node(&mut self) -> SceneNode {
        SceneNode::group("main")
    }

    /// Rebuild the content below `node` from the current data.
    ///
    /// Called from the frame update whenever the instance is dirty.
    fn update_main_node(&mut self, node: &SceneNode);

    /// Feed a domain value to the update method named `method`.
    ///
    /// Returns `Ok(false)` if this plugin has no such method.
    fn invoke_update(&mut self, method: &str, value: &dyn Any) -> Result<bool> {
        let _ = (method, value);
        Ok(false)
    }
}

/// Constructor registered for a plugin class.
pub type PluginConstructor = fn() -> Box<dyn VizPlugin>;

/// Self-registration record of a plugin class.
#[derive(Clone)]
pub struct PluginFactory {
    class_name: String,
    display_name: String,
    constructor: PluginConstructor,
}

impl PluginFactory {
    /// Create a new factory.
    pub fn new(class_name: &str, display_name: &str, constructor: PluginConstructor) -> Self {
        Self {
            class_name: class_name.to_string(),
            display_name: display_name.to_string(),
            constructor,
        }
    }

    /// Fully qualified class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Human readable name used for labels and diagnostics.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Construct a fresh plugin.
    pub fn create(&self) -> Box<dyn VizPlugin> {
        (self.constructor)()
    }
}

impl fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginFactory")
            .field("class_name", &self.class_name)
            .field("display_name", &self.display_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GridPlugin {
        spacing: f64,
    }

    impl VizPlugin for GridPlugin {
        fn update_main_node(&mut self, node: &SceneNode) {
            node.clear_children();
            node.add_child(SceneNode::group(&format!("grid {}", self.spacing)));
        }

        fn invoke_update(&mut self, method: &str, value: &dyn Any) -> Result<bool> {
            match (method, value.downcast_ref::<f64>()) {
                ("updateData", Some(spacing)) => {
                    self.spacing = *spacing;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    fn create_grid() -> Box<dyn VizPlugin> {
        Box::new(GridPlugin { spacing: 1.0 })
    }

    #[test]
    fn test_factory_metadata() {
        let factory = PluginFactory::new("vizkit3d::GridVisualization", "Grid", create_grid);
        assert_eq!(factory.class_name(), "vizkit3d::GridVisualization");
        assert_eq!(factory.display_name(), "Grid");
        assert!(format!("{:?}", factory).contains("GridVisualization"));
    }

    #[test]
    fn test_factory_creates_fresh_plugins() {
        let factory = PluginFactory::new("GridVisualization", "Grid", create_grid);
        let mut first = factory.create();
        let second = factory.create();

        assert!(first.invoke_update("updateData", &2.5f64).unwrap());
        assert_eq!((*first).as_any().downcast_ref::<GridPlugin>().unwrap().spacing, 2.5);
        assert_eq!((*second).as_any().downcast_ref::<GridPlugin>().unwrap().spacing, 1.0);
    }

    #[test]
    fn test_default_main_node_and_unknown_method() {
        let mut plugin = create_grid();
        let node = plugin.create_main_node();
        assert!(!node.is_transform());

        assert!(!plugin.invoke_update("updatePose", &1.0f64).unwrap());
        assert!(!plugin.invoke_update("updateData", &"wrong type").unwrap());

        plugin.update_main_node(&node);
        assert_eq!(node.num_children(), 1);
    }
}
