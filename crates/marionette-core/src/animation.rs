//! Animation definitions: keyframes, per-bone tracks and the validated
//! animation store.
//!
//! Definitions are immutable once stored. All structural checking (track
//! bone indices, easing coefficients, key ordering) happens when an
//! animation is inserted into an [`AnimationSet`], so playback can sample
//! without revalidating.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bone::Skeleton;
use crate::easing::Ease;
use crate::error::RigError;
use crate::ids::{AnimId, BoneId, IdAllocator};
use crate::math::TransformSpec;
use crate::paint::Color;
use crate::trigger::EventTrigger;

/// Independent easing per animated channel. Each channel of a key eases
/// toward that key with its own curve.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ChannelEases {
    #[serde(default)]
    pub position: Ease,
    #[serde(default)]
    pub origin: Ease,
    #[serde(default)]
    pub scale: Ease,
    #[serde(default)]
    pub rotation: Ease,
    #[serde(default)]
    pub opacity: Ease,
    #[serde(default)]
    pub tint: Ease,
    #[serde(default)]
    pub outline_color: Ease,
    #[serde(default)]
    pub outline_thickness: Ease,
}

impl ChannelEases {
    /// Same curve on every channel.
    pub fn uniform(ease: Ease) -> Self {
        Self {
            position: ease,
            origin: ease,
            scale: ease,
            rotation: ease,
            opacity: ease,
            tint: ease,
            outline_color: ease,
            outline_thickness: ease,
        }
    }

    pub(crate) fn validate(&self, animation: &str) -> Result<(), RigError> {
        for ease in [
            &self.position,
            &self.origin,
            &self.scale,
            &self.rotation,
            &self.opacity,
            &self.tint,
            &self.outline_color,
            &self.outline_thickness,
        ] {
            ease.validate().map_err(|err| {
                log::warn!("rejected easing curve in animation {animation:?}: {err}");
                err
            })?;
        }
        Ok(())
    }
}

/// A single keyframe: a transform delta plus absolute paint values, with the
/// easing curves used when interpolating *toward* this key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Key {
    /// Time position on the timeline, seconds.
    pub time: f32,
    /// Delta applied on top of the bone's bind pose.
    #[serde(default)]
    pub delta: TransformSpec,
    /// Absolute paint values, not deltas.
    #[serde(default = "opacity_opaque")]
    pub opacity: u8,
    #[serde(default = "color_white")]
    pub tint: Color,
    #[serde(default = "color_white")]
    pub outline_color: Color,
    #[serde(default)]
    pub outline_thickness: f32,
    #[serde(default)]
    pub ease: ChannelEases,
}

fn opacity_opaque() -> u8 {
    255
}

fn color_white() -> Color {
    Color::WHITE
}

impl Key {
    pub fn new(time: f32) -> Self {
        Self {
            time,
            delta: TransformSpec::IDENTITY,
            opacity: 255,
            tint: Color::WHITE,
            outline_color: Color::WHITE,
            outline_thickness: 0.0,
            ease: ChannelEases::default(),
        }
    }

    pub fn with_delta(mut self, delta: TransformSpec) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_ease(mut self, ease: ChannelEases) -> Self {
        self.ease = ease;
        self
    }
}

/// The keyframes of one bone within an animation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoneTrack {
    pub bone: BoneId,
    pub keys: Vec<Key>,
}

impl BoneTrack {
    pub fn new(bone: BoneId) -> Self {
        Self {
            bone,
            keys: Vec::new(),
        }
    }

    pub fn with_keys(bone: BoneId, keys: Vec<Key>) -> Self {
        Self { bone, keys }
    }
}

/// A named, fixed-duration animation: one track per animated bone plus
/// timeline triggers. Bones without a track stay in bind pose.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Animation {
    pub id: Uuid,
    pub name: String,
    /// Seconds. Must be finite and positive.
    pub duration: f32,
    pub tracks: Vec<BoneTrack>,
    #[serde(default)]
    pub triggers: Vec<EventTrigger>,
}

impl Animation {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            duration,
            tracks: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Append a track. At most one track per bone.
    pub fn push_track(&mut self, track: BoneTrack) -> Result<(), RigError> {
        if self.tracks.iter().any(|t| t.bone == track.bone) {
            return Err(RigError::DuplicateTrack {
                animation: self.name.clone(),
                bone: track.bone.0,
            });
        }
        self.tracks.push(track);
        Ok(())
    }

    pub fn track_for(&self, bone: BoneId) -> Option<&BoneTrack> {
        self.tracks.iter().find(|t| t.bone == bone)
    }
}

/// Validated, shared store of animation definitions.
///
/// Insertion checks every structural rule and sorts keys by time; once an
/// animation is in the set its id stays valid for the lifetime of the set.
/// Sets are typically wrapped in an `Arc` and shared between puppets.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnimationSet {
    items: Vec<(AnimId, Animation)>,
    ids: IdAllocator,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `animation` against `skeleton`, sort its keys, and store it.
    ///
    /// Rejects non-positive or non-finite durations, out-of-range or
    /// duplicated track bones, non-finite or negative key times, and easing
    /// coefficients that are not finite and positive.
    pub fn insert(
        &mut self,
        mut animation: Animation,
        skeleton: &Skeleton,
    ) -> Result<AnimId, RigError> {
        if !animation.duration.is_finite() || animation.duration <= 0.0 {
            return Err(RigError::InvalidDuration {
                name: animation.name.clone(),
                duration: animation.duration,
            });
        }
        let mut seen = vec![false; skeleton.len()];
        for track in &mut animation.tracks {
            let index = track.bone.index();
            if index >= skeleton.len() {
                return Err(RigError::BoneOutOfRange {
                    context: format!("animation {:?} track", animation.name),
                    index: track.bone.0,
                });
            }
            if seen[index] {
                return Err(RigError::DuplicateTrack {
                    animation: animation.name.clone(),
                    bone: track.bone.0,
                });
            }
            seen[index] = true;
            for key in &track.keys {
                if !key.time.is_finite() || key.time < 0.0 {
                    return Err(RigError::InvalidKeyTime {
                        name: animation.name.clone(),
                        time: key.time,
                    });
                }
                key.ease.validate(&animation.name)?;
            }
            // Stable sort keeps authored order among equal times, so the
            // later-authored key wins a bracket tie.
            track.keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
        for trigger in &animation.triggers {
            if !trigger.time.is_finite() || trigger.time < 0.0 {
                return Err(RigError::InvalidTriggerTime {
                    name: animation.name.clone(),
                    time: trigger.time,
                });
            }
        }
        let id = self.ids.alloc_anim();
        log::debug!(
            "stored animation {:?} ({} tracks, {} triggers, {:.3}s) as {:?}",
            animation.name,
            animation.tracks.len(),
            animation.triggers.len(),
            animation.duration,
            id
        );
        self.items.push((id, animation));
        Ok(id)
    }

    pub fn get(&self, id: AnimId) -> Option<&Animation> {
        self.items
            .iter()
            .find(|(stored, _)| *stored == id)
            .map(|(_, anim)| anim)
    }

    pub fn find_by_name(&self, name: &str) -> Option<AnimId> {
        self.items
            .iter()
            .find(|(_, anim)| anim.name == name)
            .map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnimId, &Animation)> {
        self.items.iter().map(|(id, anim)| (*id, anim))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
