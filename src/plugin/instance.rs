//! Runtime plugin instances.
//!
//! A [`VizPluginInstance`] wraps a concrete [`VizPlugin`] with the behaviour
//! every visualization plugin shares: a pose, a dirty flag, an enabled flag, an
//! attachment node for the host scene graph and the per-frame update.

use crate::core::{Error, Pose, Result};
use crate::plugin::interface::{PluginFactory, VizPlugin};
use crate::scene::SceneNode;
use glam::{DQuat, DVec3};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Capacity of the per-instance event channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Notifications published by a plugin instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PluginEvent {
    /// The plugin was enabled or disabled
    ActivityChanged(bool),
    /// A named property changed
    PropertyChanged(String),
}

/// State guarded by the instance lock.
struct FrameState {
    pose: Pose,
    main_node: Option<SceneNode>,
    plugin: Box<dyn VizPlugin>,
}

/// A live visualization plugin.
pub struct VizPluginInstance {
    id: Uuid,
    class_name: String,
    display_name: String,
    viz_node: SceneNode,
    state: Mutex<FrameState>,
    dirty: AtomicBool,
    enabled: AtomicBool,
    events: broadcast::Sender<PluginEvent>,
}

impl VizPluginInstance {
    /// Wrap a plugin. The attachment node is created here; content is built lazily.
    pub fn new(class_name: &str, display_name: &str, plugin: Box<dyn VizPlugin>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            id: Uuid::new_v4(),
            class_name: class_name.to_string(),
            display_name: display_name.to_string(),
            viz_node: SceneNode::transform(display_name),
            state: Mutex::new(FrameState {
                pose: Pose::identity(),
                main_node: None,
                plugin,
            }),
            dirty: AtomicBool::new(false),
            enabled: AtomicBool::new(true),
            events,
        }
    }

    /// Construct a fresh plugin from its factory.
    pub fn from_factory(factory: &PluginFactory) -> Self {
        Self::new(factory.class_name(), factory.display_name(), factory.create())
    }

    fn lock_state(&self) -> MutexGuard<'_, FrameState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Unique id of this instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Class name the instance was created from.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Human readable plugin name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Node the host inserts into its scene graph.
    pub fn viz_node(&self) -> SceneNode {
        self.viz_node.clone()
    }

    /// Content node, once the first frame update has built it.
    pub fn main_node(&self) -> Option<SceneNode> {
        self.lock_state().main_node.clone()
    }

    /// Set position and orientation together.
    pub fn set_pose(&self, position: DVec3, orientation: DQuat) {
        let mut state = self.lock_state();
        state.pose = Pose::new(position, orientation);
    }

    /// Snapshot of the current pose.
    pub fn pose(&self) -> Pose {
        self.lock_state().pose
    }

    /// Request a content refresh on the next frame update.
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Whether a content refresh is pending. Not synchronized with the frame update.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Per-frame hook called by the host traversal.
    ///
    /// Pushes the pose into the attachment node, builds the content node on the
    /// first call and refreshes content when dirty.
    pub fn on_frame_update(&self) {
        let mut state = self.lock_state();
        self.viz_node.set_pose(state.pose);

        let FrameState {
            main_node, plugin, ..
        } = &mut *state;

        let viz_node = &self.viz_node;
        let node = main_node.get_or_insert_with(|| {
            let node = plugin.create_main_node();
            viz_node.add_child(node.clone());
            node
        });

        if self.dirty.swap(false, Ordering::AcqRel) {
            plugin.update_main_node(node);
        }
    }

    /// Whether the plugin is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Enable or disable the plugin and notify subscribers.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        tracing::debug!(plugin = %self.display_name, enabled, "plugin activity changed");

        // No subscribers is fine
        let _ = self.events.send(PluginEvent::ActivityChanged(enabled));
        let _ = self
            .events
            .send(PluginEvent::PropertyChanged("enabled".to_string()));
    }

    /// Subscribe to activity and property notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<PluginEvent> {
        self.events.subscribe()
    }

    /// Forward a domain value to the plugin's update method and mark dirty.
    pub fn invoke_update(&self, method: &str, value: &dyn Any) -> Result<()> {
        let handled = self.lock_state().plugin.invoke_update(method, value)?;
        if !handled {
            return Err(Error::UnsupportedUpdate {
                plugin: self.class_name.clone(),
                method: method.to_string(),
            });
        }
        self.mark_dirty();
        Ok(())
    }

    /// Run `f` on the plugin under the instance lock.
    pub fn with_plugin<R>(&self, f: impl FnOnce(&mut dyn VizPlugin) -> R) -> R {
        let mut state = self.lock_state();
        f(state.plugin.as_mut())
    }

    /// Run `f` on the plugin if it is of type `T`.
    pub fn with_plugin_as<T: VizPlugin, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut state = self.lock_state();
        let plugin: &mut dyn VizPlugin = state.plugin.as_mut();
        plugin.as_any_mut().downcast_mut::<T>().map(f)
    }
}

impl std::fmt::Debug for VizPluginInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VizPluginInstance")
            .field("id", &self.id)
            .field("class_name", &self.class_name)
            .field("display_name", &self.display_name)
            .field("dirty", &self.is_dirty())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
