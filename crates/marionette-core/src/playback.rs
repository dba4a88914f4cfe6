//! Per-puppet playback state: the current animation, the pending queue and
//! the clocks.
//!
//! This is deliberately dumb data; all sequencing decisions (looping,
//! dequeueing, crossfade blending, trigger dispatch) live in the puppet's
//! tick so they can see the skeleton and the animation set.

use std::collections::VecDeque;

use crate::ids::AnimId;
use crate::math::TransformSpec;

#[derive(Clone, Debug, Default)]
pub struct Playback {
    /// Animation being played, if any.
    pub current: Option<AnimId>,
    /// Animations to play after the current one completes, in order.
    pub queue: VecDeque<AnimId>,
    /// Seconds into the current animation.
    pub clock: f32,
    /// Seconds since the last animation switch; drives crossfading.
    pub fade_clock: f32,
    /// Crossfade length in seconds; zero disables blending.
    pub crossfade: f32,
    /// Per-bone deltas captured at the moment of the last switch.
    pub snapshot: Option<Vec<TransformSpec>>,
    /// One flag per trigger of the current animation; reset on load and on
    /// loop wrap.
    pub fired: Vec<bool>,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a switch is still blending from the snapshot.
    pub fn fading(&self) -> bool {
        self.snapshot.is_some() && self.crossfade > 0.0 && self.fade_clock < self.crossfade
    }

    /// Normalized fade progress in [0,1]; 1 when no fade is active.
    pub fn fade_progress(&self) -> f32 {
        if self.crossfade <= 0.0 {
            return 1.0;
        }
        (self.fade_clock / self.crossfade).clamp(0.0, 1.0)
    }

    pub(crate) fn reset_fired(&mut self, trigger_count: usize) {
        self.fired.clear();
        self.fired.resize(trigger_count, false);
    }
}
