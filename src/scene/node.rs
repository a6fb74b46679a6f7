//! Shared scene-graph nodes.
//!
//! A minimal stand-in for the host scene graph: nodes are reference counted
//! handles that can be shared between the host and the plugins that fill them.

use crate::core::Pose;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct NodeData {
    label: String,
    transform: Option<Pose>,
    children: Vec<SceneNode>,
}

/// Handle to a node in the scene graph.
///
/// Cloning the handle shares the node; use [`SceneNode::ptr_eq`] to compare identity.
#[derive(Clone, Debug)]
pub struct SceneNode {
    inner: Arc<RwLock<NodeData>>,
}

impl SceneNode {
    fn with_transform(label: &str, transform: Option<Pose>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(NodeData {
                label: label.to_string(),
                transform,
                children: Vec::new(),
            })),
        }
    }

    /// Create a plain grouping node.
    pub fn group(label: &str) -> Self {
        Self::with_transform(label, None)
    }

    /// Create a position/attitude transform node at the identity pose.
    pub fn transform(label: &str) -> Self {
        Self::with_transform(label, Some(Pose::identity()))
    }

    fn read(&self) -> RwLockReadGuard<'_, NodeData> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, NodeData> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Node label.
    pub fn label(&self) -> String {
        self.read().label.clone()
    }

    /// Whether this node carries a transform.
    pub fn is_transform(&self) -> bool {
        self.read().transform.is_some()
    }

    /// Current transform, `None` for plain groups.
    pub fn pose(&self) -> Option<Pose> {
        self.read().transform
    }

    /// Set the transform. Turns a plain group into a transform node.
    pub fn set_pose(&self, pose: Pose) {
        self.write().transform = Some(pose);
    }

    /// Attach a child. Returns false if it is already a direct child.
    pub fn add_child(&self, child: SceneNode) -> bool {
        let mut data = self.write();
        if data.children.iter().any(|c| c.ptr_eq(&child)) {
            return false;
        }
        data.children.push(child);
        true
    }

    /// Detach a direct child. Returns false if it was not attached.
    pub fn remove_child(&self, child: &SceneNode) -> bool {
        let mut data = self.write();
        let before = data.children.len();
        data.children.retain(|c| !c.ptr_eq(child));
        data.children.len() != before
    }

    /// Detach every child.
    pub fn clear_children(&self) {
        self.write().children.clear();
    }

    /// Snapshot of the direct children.
    pub fn children(&self) -> Vec<SceneNode> {
        self.read().children.clone()
    }

    /// Number of direct children.
    pub fn num_children(&self) -> usize {
        self.read().children.len()
    }

    /// True if both handles point at the same node.
    pub fn ptr_eq(&self, other: &SceneNode) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_group_has_no_transform() {
        let node = SceneNode::group("content");
        assert!(!node.is_transform());
        assert!(node.pose().is_none());
        assert_eq!(node.label(), "content");
    }

    #[test]
    fn test_transform_node_pose() {
        let node = SceneNode::transform("viz");
        assert_eq!(node.pose(), Some(Pose::identity()));

        let mut pose = Pose::identity();
        pose.position = DVec3::new(1.0, 0.0, -2.0);
        node.set_pose(pose);
        assert_eq!(node.pose().unwrap().position, DVec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_children() {
        let parent = SceneNode::group("parent");
        let child = SceneNode::group("child");

        assert!(parent.add_child(child.clone()));
        assert!(!parent.add_child(child.clone()));
        assert_eq!(parent.num_children(), 1);
        assert!(parent.children()[0].ptr_eq(&child));

        assert!(parent.remove_child(&child));
        assert!(!parent.remove_child(&child));
        assert_eq!(parent.num_children(), 0);
    }

    #[test]
    fn test_shared_handles() {
        let node = SceneNode::group("shared");
        let other = node.clone();
        other.add_child(SceneNode::group("child"));

        assert!(node.ptr_eq(&other));
        assert_eq!(node.num_children(), 1);
        assert!(!node.ptr_eq(&SceneNode::group("shared")));
    }
}
