//! Attached-surface boundary contract.
//!
//! The core never touches pixels: a bone holds an opaque paintable rectangle
//! plus an image-resource handle, and forwards its computed transform and
//! paint tuple to the renderer. Time-varying resources (frame strips) are
//! driven through [`ResourceUpdater`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::math::{Rect, Vec2};

/// Stable handle of an image resource managed outside the core.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub Uuid);

/// A paintable rectangle attached to a bone.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpriteAttachment {
    /// Image resource to sample from, if any.
    #[serde(default)]
    pub resource: Option<ResourceId>,
    /// Size of the rectangle in local bone space.
    pub size: Vec2,
    /// Sub-rectangle of the texture to display.
    #[serde(default)]
    pub texture_rect: Rect,
}

impl SpriteAttachment {
    pub fn new(size: Vec2) -> Self {
        Self {
            resource: None,
            size,
            texture_rect: Rect::default(),
        }
    }

    pub fn with_resource(mut self, resource: ResourceId) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Local-space bounds of the rectangle.
    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.x, self.size.y)
    }
}

/// Hook through which the external resource manager advances time-varying
/// resources. Called once per tick per attached bone with that bone's
/// sub-clock, which runs independently of the animation timeline.
pub trait ResourceUpdater {
    fn update_for_time(&mut self, resource: ResourceId, time: f32);
}
