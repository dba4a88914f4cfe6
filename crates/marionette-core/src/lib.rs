//! Renderer-agnostic 2D skeletal sprite animation.
//!
//! A [`Skeleton`] is a flat arena of bones whose order doubles as draw
//! order; composition starts at designated master bones. Animations are
//! per-bone keyframe tracks storing transform deltas over the bind pose plus
//! absolute paint values, with independent easing per channel. A [`Puppet`]
//! binds a skeleton to a shared [`AnimationSet`] and advances everything
//! through [`Puppet::tick`]: looping, queued hand-offs, crossfade blending
//! and timeline trigger dispatch.
//!
//! Rendering is delegated entirely to the host through [`Puppet::draw_list`]
//! and the [`ResourceUpdater`] hook; rigs travel as JSON via
//! [`PuppetTemplate`].

pub mod animation;
pub mod bone;
pub mod category;
pub mod draw;
pub mod easing;
pub mod error;
pub mod ids;
pub mod math;
pub mod paint;
pub mod playback;
pub mod puppet;
pub mod sampling;
pub mod surface;
pub mod template;
pub mod trigger;

pub use animation::{Animation, AnimationSet, BoneTrack, ChannelEases, Key};
pub use bone::{Bone, Skeleton};
pub use category::Category;
pub use draw::{DrawItem, DrawPhase};
pub use easing::{Ease, EasingFn};
pub use error::RigError;
pub use ids::{AnimId, BoneId, CategoryId};
pub use math::{Rect, Transform2, TransformSpec, Vec2};
pub use paint::{BlendMode, Color, Paint};
pub use playback::Playback;
pub use puppet::{Puppet, TickOutputs};
pub use sampling::{sample_keys, KeySample};
pub use surface::{ResourceId, ResourceUpdater, SpriteAttachment};
pub use template::{AnimationData, BoneData, PuppetTemplate, TrackData};
pub use trigger::{EventTrigger, TriggerEvent};

/// Convenience alias used throughout the crate's fallible APIs.
pub type Result<T> = std::result::Result<T, RigError>;
