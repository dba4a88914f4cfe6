//! Authored event triggers and the events emitted when playback crosses
//! their time marks.
//!
//! Triggers are one-shot per loop iteration: the "already fired" flags live
//! in per-puppet playback state (not on the shared animation definition) and
//! reset whenever the animation (re)loads or completes a loop. Firing is
//! driven purely by the primary clock of the current animation; crossfading
//! never affects it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::AnimId;
use crate::math::Rect;

/// An authored time mark inside an animation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventTrigger {
    pub id: Uuid,
    pub name: String,
    /// Time position on the owning animation's timeline, in seconds.
    pub time: f32,
    /// Screen-space area associated with the event (hitboxes, spawn zones).
    #[serde(default)]
    pub area: Rect,
}

impl EventTrigger {
    pub fn new(name: impl Into<String>, time: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            time,
            area: Rect::default(),
        }
    }

    pub fn with_area(mut self, area: Rect) -> Self {
        self.area = area;
        self
    }
}

/// A trigger firing observed during a tick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TriggerEvent {
    pub animation: AnimId,
    pub trigger: Uuid,
    pub name: String,
    /// The trigger's authored time position.
    pub time: f32,
    pub area: Rect,
    /// Primary-clock value at the moment of firing.
    pub at: f32,
}

/// Collect the indices of triggers due at `elapsed` that have not fired this
/// loop. Firing requires the clock to have advanced strictly past the mark.
pub(crate) fn due_triggers(triggers: &[EventTrigger], fired: &[bool], elapsed: f32) -> Vec<usize> {
    triggers
        .iter()
        .enumerate()
        .filter(|(i, t)| !fired.get(*i).copied().unwrap_or(true) && elapsed > t.time)
        .map(|(i, _)| i)
        .collect()
}
