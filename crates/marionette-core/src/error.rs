//! Error types for the animation core.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::easing::EasingFn;

/// Errors reported by loading, validation and lookup operations.
///
/// All of these describe malformed authored data or bad references; playback
/// itself never fails (degenerate tracks and arithmetic edge cases resolve
/// via the clamping rules in sampling).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RigError {
    /// Animation lookup by unknown name.
    #[error("animation not found: {name}")]
    AnimationNotFound { name: String },

    /// Animation lookup by a dense id not present in the set.
    #[error("unknown animation id: {id}")]
    UnknownAnimationId { id: u32 },

    /// A track or child list names a bone outside the skeleton arena.
    #[error("bone index {index} out of range in '{context}'")]
    BoneOutOfRange { context: String, index: u32 },

    /// A template reference (bone, master, category or resource) does not
    /// resolve within the same snapshot.
    #[error("unresolved reference {id} in template '{context}'")]
    UnresolvedReference { context: String, id: Uuid },

    /// A template declares the same stable id twice.
    #[error("duplicate id {id} in template '{context}'")]
    DuplicateId { context: String, id: Uuid },

    /// The child graph contains a cycle.
    #[error("cyclic child links at bone '{name}'")]
    CyclicHierarchy { name: String },

    /// A non-master bone is not reachable from any master.
    #[error("bone '{name}' is not reachable from any master")]
    UnreachableBone { name: String },

    /// A bone is reachable from more than one master (or is a master that is
    /// also somebody's child).
    #[error("bone '{name}' is reachable from more than one master")]
    MultiplyReachableBone { name: String },

    /// An animation carries two keyframe lists for the same bone.
    #[error("duplicate track for bone {bone} in animation '{animation}'")]
    DuplicateTrack { animation: String, bone: u32 },

    /// Bad easing coefficient (non-positive or non-finite for Power/Root).
    #[error("invalid coefficient {coeff} for easing {function:?}")]
    InvalidCoefficient { function: EasingFn, coeff: f32 },

    /// Animation duration must be finite and > 0.
    #[error("invalid duration {duration} for animation '{name}'")]
    InvalidDuration { name: String, duration: f32 },

    /// Keyframe time positions must be finite and non-negative.
    #[error("invalid key time {time} in animation '{name}'")]
    InvalidKeyTime { name: String, time: f32 },

    /// Trigger time positions must be finite and non-negative.
    #[error("invalid trigger time {time} in animation '{name}'")]
    InvalidTriggerTime { name: String, time: f32 },

    /// Template (de)serialization failure.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<serde_json::Error> for RigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
