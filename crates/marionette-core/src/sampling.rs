//! Keyframe bracketing and per-channel interpolation.
//!
//! Given a sorted key list and a clock value, evaluation finds the
//! surrounding pair of keys, computes normalized progress, remaps it through
//! the target key's easing curve per channel, and interpolates.

use crate::animation::Key;
use crate::math::{lerp_f32, lerp_vec2, TransformSpec};
use crate::paint::{lerp_u8, Color, Paint};

/// The evaluated state of one bone track at a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeySample {
    /// Transform delta to apply on top of the bind pose.
    pub delta: TransformSpec,
    /// Absolute paint values.
    pub paint: Paint,
}

impl KeySample {
    pub(crate) fn rest(paint: Paint) -> Self {
        Self {
            delta: TransformSpec::IDENTITY,
            paint,
        }
    }

    fn pinned(key: &Key) -> Self {
        Self {
            delta: TransformSpec::IDENTITY,
            paint: paint_of(key),
        }
    }
}

fn paint_of(key: &Key) -> Paint {
    Paint {
        opacity: key.opacity,
        tint: key.tint,
        outline_color: key.outline_color,
        outline_thickness: key.outline_thickness,
    }
}

/// Evaluate a sorted key list at time `t` on a timeline of `duration`
/// seconds. Returns `None` for an empty list.
///
/// With a single key, or once `t` reaches the end of the timeline, the
/// result pins to that key's paint with an identity transform delta.
/// Otherwise the bracketing pair is the latest key at or before `t` and the
/// earliest key at or after `t`; progress between them is remapped through
/// the later key's per-channel easing. Two keys at the same time resolve to
/// progress 1 (the later key wins).
pub fn sample_keys(keys: &[Key], t: f32, duration: f32) -> Option<KeySample> {
    let last = keys.last()?;
    if keys.len() == 1 || t >= duration {
        return Some(KeySample::pinned(last));
    }

    // Latest key at or before t; keys are sorted, so scan from the back.
    let first = keys
        .iter()
        .rev()
        .find(|k| k.time <= t)
        .unwrap_or(&keys[0]);
    // Earliest key at or after t.
    let mut second = keys.iter().find(|k| k.time >= t).unwrap_or(last);

    let span = second.time - first.time;
    let progress = if span <= 0.0 {
        // Coincident bracket; the later entry in the sorted list wins.
        second = first;
        1.0
    } else {
        ((t - first.time) / span).clamp(0.0, 1.0)
    };

    let e = &second.ease;
    let delta = TransformSpec {
        position: lerp_vec2(
            first.delta.position,
            second.delta.position,
            e.position.remap(progress),
        ),
        origin: lerp_vec2(
            first.delta.origin,
            second.delta.origin,
            e.origin.remap(progress),
        ),
        scale: lerp_vec2(
            first.delta.scale,
            second.delta.scale,
            e.scale.remap(progress),
        ),
        rotation: lerp_f32(
            first.delta.rotation,
            second.delta.rotation,
            e.rotation.remap(progress),
        ),
    };
    let paint = Paint {
        opacity: lerp_u8(first.opacity, second.opacity, e.opacity.remap(progress)),
        tint: Color::lerp(first.tint, second.tint, e.tint.remap(progress)),
        outline_color: Color::lerp(
            first.outline_color,
            second.outline_color,
            e.outline_color.remap(progress),
        ),
        outline_thickness: lerp_f32(
            first.outline_thickness,
            second.outline_thickness,
            e.outline_thickness.remap(progress),
        ),
    };
    Some(KeySample { delta, paint })
}
