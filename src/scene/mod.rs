//! Scene Module
//!
//! Minimal host-side scene graph that visualization plugins attach to.

pub mod node;
pub mod root;

pub use node::SceneNode;
pub use root::SceneRoot;
