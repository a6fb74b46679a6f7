//! Common types used across vizkit-plugins modules.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of a plugin in the scene.
///
/// The orientation is expected to be normalized by whoever produces it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in scene coordinates
    pub position: DVec3,
    /// Orientation as a unit quaternion
    pub orientation: DQuat,
}

impl Pose {
    /// Create a new pose.
    pub fn new(position: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// The identity pose: origin, no rotation.
    pub fn identity() -> Self {
        Self::new(DVec3::ZERO, DQuat::IDENTITY)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}
