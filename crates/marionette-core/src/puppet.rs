//! The runtime instance: a skeleton bound to a shared animation set, with
//! playback state, evaluated pose buffers and trigger callbacks.
//!
//! `tick` is the single entry point per frame. Its order is fixed: advance
//! sprite sub-clocks, advance the playback clocks (handling loop wraps and
//! queue hand-offs), collect due triggers, sample every bone, blend any
//! active crossfade, compose absolute transforms, then invoke callbacks.
//! Callbacks run last so they may freely reload or re-queue animations for
//! the next tick.

use std::collections::HashMap;
use std::sync::Arc;

use crate::animation::AnimationSet;
use crate::bone::Skeleton;
use crate::error::RigError;
use crate::ids::{AnimId, BoneId};
use crate::math::{Rect, Transform2, TransformSpec};
use crate::paint::Paint;
use crate::playback::Playback;
use crate::sampling::{sample_keys, KeySample};
use crate::surface::{ResourceId, ResourceUpdater};
use crate::trigger::{due_triggers, TriggerEvent};

type TriggerCallback = Box<dyn FnMut(&mut Puppet, &TriggerEvent)>;

/// Everything a tick produced besides the pose itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickOutputs {
    /// Triggers fired this tick, in timeline order.
    pub events: Vec<TriggerEvent>,
}

/// An animated instance of a skeleton.
///
/// Several puppets can share one [`AnimationSet`] through the `Arc`; each
/// keeps its own clocks, fired flags and evaluated pose.
pub struct Puppet {
    skeleton: Skeleton,
    animations: Arc<AnimationSet>,
    playback: Playback,
    /// Per-bone sampled deltas (identity when unanimated).
    pub(crate) deltas: Vec<TransformSpec>,
    /// Per-bone sampled paint (the bone's authored paint when unanimated).
    pub(crate) paints: Vec<Paint>,
    /// Per-bone absolute transforms, parent-composed.
    pub(crate) absolutes: Vec<Transform2>,
    /// Per-bone clocks for attached surface resources; never reset by
    /// animation switches.
    sprite_clocks: Vec<f32>,
    callbacks: HashMap<String, TriggerCallback>,
}

impl Puppet {
    /// Validate the skeleton and build an instance resting in bind pose.
    pub fn new(skeleton: Skeleton, animations: Arc<AnimationSet>) -> Result<Self, RigError> {
        skeleton.validate()?;
        let n = skeleton.len();
        let paints = skeleton.iter().map(|(_, b)| b.paint).collect();
        let mut puppet = Self {
            skeleton,
            animations,
            playback: Playback::new(),
            deltas: vec![TransformSpec::IDENTITY; n],
            paints,
            absolutes: vec![Transform2::IDENTITY; n],
            sprite_clocks: vec![0.0; n],
            callbacks: HashMap::new(),
        };
        puppet.compose();
        Ok(puppet)
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    pub fn animations(&self) -> &Arc<AnimationSet> {
        &self.animations
    }

    /// Crossfade length applied to subsequent switches, in seconds.
    pub fn set_crossfade(&mut self, seconds: f32) {
        self.playback.crossfade = seconds.max(0.0);
    }

    pub fn crossfade(&self) -> f32 {
        self.playback.crossfade
    }

    pub fn current_animation(&self) -> Option<AnimId> {
        self.playback.current
    }

    /// Seconds into the current animation.
    pub fn elapsed(&self) -> f32 {
        self.playback.clock
    }

    pub fn queued(&self) -> impl Iterator<Item = AnimId> + '_ {
        self.playback.queue.iter().copied()
    }

    /// Register a callback for triggers with the given name. Replaces any
    /// earlier callback under the same name.
    pub fn on_trigger(
        &mut self,
        name: impl Into<String>,
        callback: impl FnMut(&mut Puppet, &TriggerEvent) + 'static,
    ) {
        self.callbacks.insert(name.into(), Box::new(callback));
    }

    /// Switch to `name` and replace the queue, resolving names in this
    /// puppet's animation set.
    pub fn load_animation(
        &mut self,
        name: &str,
        reset_clock: bool,
        queue: &[&str],
    ) -> Result<(), RigError> {
        let current = self.resolve(name)?;
        let queue = queue
            .iter()
            .map(|n| self.resolve(n))
            .collect::<Result<Vec<_>, _>>()?;
        self.load_animation_by_id(Some(current), reset_clock, queue)
    }

    /// Switch to `current` (or to rest pose for `None`) and replace the
    /// queue. When this replaces a playing animation with another, the
    /// present deltas are captured as a crossfade snapshot and the fade
    /// clock restarts; loads from idle (and switches to idle) snap. The
    /// primary clock only resets when asked.
    pub fn load_animation_by_id(
        &mut self,
        current: Option<AnimId>,
        reset_clock: bool,
        queue: Vec<AnimId>,
    ) -> Result<(), RigError> {
        if let Some(id) = current {
            self.check_known(id)?;
        }
        for &id in &queue {
            self.check_known(id)?;
        }
        if self.playback.current.is_some() && current.is_some() {
            self.playback.snapshot = Some(self.deltas.clone());
            self.playback.fade_clock = 0.0;
        } else {
            self.playback.snapshot = None;
        }
        self.playback.current = current;
        self.playback.queue = queue.into();
        let triggers = current
            .and_then(|id| self.animations.get(id))
            .map(|anim| anim.triggers.len())
            .unwrap_or(0);
        self.playback.reset_fired(triggers);
        if reset_clock {
            self.playback.clock = 0.0;
        }
        log::debug!(
            "switched to {:?} (reset_clock={reset_clock}, {} queued)",
            current,
            self.playback.queue.len()
        );
        Ok(())
    }

    /// Stop playing; the next tick snaps straight back to the bind pose.
    pub fn stop(&mut self) {
        self.playback.snapshot = None;
        self.playback.current = None;
        self.playback.queue.clear();
        self.playback.reset_fired(0);
        self.playback.clock = 0.0;
    }

    /// Advance the instance by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickOutputs {
        self.tick_inner(dt, None)
    }

    /// Like [`tick`](Self::tick), additionally pushing each attached surface
    /// resource its per-bone sub-clock so animated surfaces can pick frames.
    pub fn tick_with_resources(
        &mut self,
        dt: f32,
        updater: &mut dyn ResourceUpdater,
    ) -> TickOutputs {
        self.tick_inner(dt, Some(updater))
    }

    fn tick_inner(&mut self, dt: f32, mut updater: Option<&mut dyn ResourceUpdater>) -> TickOutputs {
        for i in 0..self.sprite_clocks.len() {
            self.sprite_clocks[i] += dt;
            if let Some(updater) = updater.as_deref_mut() {
                if let Some(resource) = self.resource_of(i) {
                    updater.update_for_time(resource, self.sprite_clocks[i]);
                }
            }
        }

        let animations = Arc::clone(&self.animations);
        let mut events = Vec::new();

        if let Some(mut id) = self.playback.current {
            self.playback.clock += dt;
            self.playback.fade_clock += dt;

            let mut duration = match animations.get(id) {
                Some(anim) => anim.duration,
                None => {
                    self.stop();
                    return TickOutputs { events };
                }
            };

            // Loop wraps and queue hand-offs. A very large dt can cross
            // several whole iterations; triggers inside the skipped
            // iterations are not replayed.
            while self.playback.clock > duration {
                if let Some(next) = self.playback.queue.pop_front() {
                    // Hand-off: fresh timeline, but the fade clock keeps
                    // running so an in-flight crossfade finishes smoothly.
                    id = next;
                    self.playback.current = Some(next);
                    self.playback.clock = 0.0;
                    duration = match animations.get(next) {
                        Some(anim) => anim.duration,
                        None => {
                            self.stop();
                            return TickOutputs { events };
                        }
                    };
                    let triggers = animations
                        .get(next)
                        .map(|a| a.triggers.len())
                        .unwrap_or(0);
                    self.playback.reset_fired(triggers);
                    log::debug!("dequeued {:?}", next);
                    break;
                }
                self.playback.clock -= duration;
                let count = self.playback.fired.len();
                self.playback.reset_fired(count);
            }

            if let Some(anim) = animations.get(id) {
                for index in due_triggers(&anim.triggers, &self.playback.fired, self.playback.clock)
                {
                    self.playback.fired[index] = true;
                    let t = &anim.triggers[index];
                    events.push(TriggerEvent {
                        animation: id,
                        trigger: t.id,
                        name: t.name.clone(),
                        time: t.time,
                        area: t.area,
                        at: self.playback.clock,
                    });
                }
            }
        }

        self.sample_pose(&animations);
        self.blend_crossfade();
        self.compose();
        self.dispatch(&events);
        TickOutputs { events }
    }

    fn sample_pose(&mut self, animations: &AnimationSet) {
        let current = self.playback.current.and_then(|id| animations.get(id));
        for i in 0..self.skeleton.len() {
            let sample = current.and_then(|anim| {
                let track = anim.track_for(BoneId(i as u32))?;
                sample_keys(&track.keys, self.playback.clock, anim.duration)
            });
            let rest_paint = self
                .skeleton
                .bone(BoneId(i as u32))
                .map(|b| b.paint)
                .unwrap_or_default();
            let KeySample { delta, paint } = sample.unwrap_or_else(|| KeySample::rest(rest_paint));
            self.deltas[i] = delta;
            self.paints[i] = paint;
        }
    }

    /// Blend the sampled deltas against the switch snapshot. Paint never
    /// blends; it snaps to the target animation immediately.
    fn blend_crossfade(&mut self) {
        if self.playback.fading() {
            let p = self.playback.fade_progress();
            if let Some(snapshot) = &self.playback.snapshot {
                for (i, old) in snapshot.iter().enumerate() {
                    self.deltas[i] = TransformSpec::lerp(old, &self.deltas[i], p);
                }
            }
        } else {
            self.playback.snapshot = None;
        }
    }

    /// Walk the hierarchy from the masters, composing bind+delta locals into
    /// absolute transforms.
    fn compose(&mut self) {
        let mut stack: Vec<(usize, Transform2)> = self
            .skeleton
            .masters()
            .iter()
            .map(|m| (m.index(), Transform2::IDENTITY))
            .collect();
        while let Some((i, parent)) = stack.pop() {
            let Some(bone) = self.skeleton.bone(BoneId(i as u32)) else {
                continue;
            };
            let local = bone.bind.combined_with(&self.deltas[i]).matrix();
            let abs = parent.compose(&local);
            self.absolutes[i] = abs;
            for &child in &bone.children {
                stack.push((child.index(), abs));
            }
        }
    }

    fn dispatch(&mut self, events: &[TriggerEvent]) {
        for event in events {
            if let Some(mut callback) = self.callbacks.remove(&event.name) {
                callback(self, event);
                // Keep the callback unless the handler installed a new one.
                self.callbacks.entry(event.name.clone()).or_insert(callback);
            }
        }
    }

    /// Absolute transform of a bone as of the last tick.
    pub fn absolute_transform(&self, bone: BoneId) -> Option<Transform2> {
        self.absolutes.get(bone.index()).copied()
    }

    /// Evaluated paint of a bone as of the last tick.
    pub fn paint(&self, bone: BoneId) -> Option<Paint> {
        self.paints.get(bone.index()).copied()
    }

    /// Axis-aligned bounds of all attached surfaces in the puppet's own
    /// frame, as of the last tick. `None` when nothing is attached.
    pub fn local_bounds(&self) -> Option<Rect> {
        let mut bounds: Option<Rect> = None;
        for (id, bone) in self.skeleton.iter() {
            let Some(sprite) = &bone.sprite else { continue };
            let rect = self.absolutes[id.index()].transform_rect(sprite.local_rect());
            bounds = Some(match bounds {
                Some(b) => b.union(&rect),
                None => rect,
            });
        }
        bounds
    }

    /// Distinct surface resources referenced by the skeleton.
    pub fn used_resources(&self) -> Vec<ResourceId> {
        let mut out: Vec<ResourceId> = Vec::new();
        for (_, bone) in self.skeleton.iter() {
            if let Some(resource) = bone.sprite.as_ref().and_then(|s| s.resource) {
                if !out.contains(&resource) {
                    out.push(resource);
                }
            }
        }
        out
    }

    fn resource_of(&self, index: usize) -> Option<ResourceId> {
        self.skeleton
            .bone(BoneId(index as u32))
            .and_then(|b| b.sprite.as_ref())
            .and_then(|s| s.resource)
    }

    fn resolve(&self, name: &str) -> Result<AnimId, RigError> {
        self.animations
            .find_by_name(name)
            .ok_or_else(|| RigError::AnimationNotFound {
                name: name.to_string(),
            })
    }

    fn check_known(&self, id: AnimId) -> Result<(), RigError> {
        if self.animations.get(id).is_none() {
            return Err(RigError::UnknownAnimationId { id: id.0 });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animation, BoneTrack, Key};
    use crate::bone::Bone;
    use crate::math::Vec2;
    use approx::assert_abs_diff_eq;

    fn rig() -> (Skeleton, AnimationSet, AnimId) {
        let mut skeleton = Skeleton::new();
        let root = skeleton.add_bone(Bone::new("root"));
        skeleton.set_master(root).unwrap();
        let mut set = AnimationSet::new();
        let mut anim = Animation::new("slide", 2.0);
        anim.push_track(BoneTrack::with_keys(
            root,
            vec![
                Key::new(0.0),
                Key::new(2.0).with_delta(TransformSpec {
                    position: Vec2::new(100.0, 0.0),
                    ..TransformSpec::IDENTITY
                }),
            ],
        ))
        .unwrap();
        let id = set.insert(anim, &skeleton).unwrap();
        (skeleton, set, id)
    }

    #[test]
    fn idle_puppet_stays_in_bind_pose() {
        let (skeleton, set, _) = rig();
        let mut puppet = Puppet::new(skeleton, Arc::new(set)).unwrap();
        puppet.tick(0.5);
        assert_eq!(
            puppet.absolute_transform(BoneId(0)),
            Some(Transform2::IDENTITY)
        );
    }

    #[test]
    fn loading_unknown_animation_fails() {
        let (skeleton, set, _) = rig();
        let mut puppet = Puppet::new(skeleton, Arc::new(set)).unwrap();
        assert!(matches!(
            puppet.load_animation("missing", true, &[]),
            Err(RigError::AnimationNotFound { .. })
        ));
        assert!(matches!(
            puppet.load_animation_by_id(Some(AnimId(99)), true, Vec::new()),
            Err(RigError::UnknownAnimationId { .. })
        ));
    }

    #[test]
    fn tick_advances_and_samples() {
        let (skeleton, set, _) = rig();
        let mut puppet = Puppet::new(skeleton, Arc::new(set)).unwrap();
        puppet.load_animation("slide", true, &[]).unwrap();
        puppet.tick(1.0);
        let abs = puppet.absolute_transform(BoneId(0)).unwrap();
        assert_abs_diff_eq!(abs.m[2], 50.0, epsilon = 1e-4);
        assert_abs_diff_eq!(puppet.elapsed(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn looping_wraps_the_clock() {
        let (skeleton, set, _) = rig();
        let mut puppet = Puppet::new(skeleton, Arc::new(set)).unwrap();
        puppet.load_animation("slide", true, &[]).unwrap();
        puppet.tick(2.5);
        assert_abs_diff_eq!(puppet.elapsed(), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn stop_returns_to_bind_pose() {
        let (skeleton, set, _) = rig();
        let mut puppet = Puppet::new(skeleton, Arc::new(set)).unwrap();
        puppet.load_animation("slide", true, &[]).unwrap();
        puppet.tick(1.0);
        puppet.stop();
        puppet.tick(0.0);
        assert_eq!(
            puppet.absolute_transform(BoneId(0)),
            Some(Transform2::IDENTITY)
        );
        assert_eq!(puppet.current_animation(), None);
    }
}
