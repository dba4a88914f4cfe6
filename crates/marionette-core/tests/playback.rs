//! Sequencing behavior: looping, queued hand-offs and crossfade blending.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use marionette_core::{
    Animation, AnimationSet, Bone, BoneId, BoneTrack, ChannelEases, Ease, EasingFn, Key, Puppet,
    Skeleton, TransformSpec, Vec2,
};

fn slide_keys(to_x: f32, duration: f32) -> Vec<Key> {
    vec![
        Key::new(0.0),
        Key::new(duration).with_delta(TransformSpec {
            position: Vec2::new(to_x, 0.0),
            ..TransformSpec::IDENTITY
        }),
    ]
}

fn rig() -> Puppet {
    let mut skeleton = Skeleton::new();
    let root = skeleton.add_bone(Bone::new("root"));
    skeleton.set_master(root).unwrap();

    let mut set = AnimationSet::new();
    let mut slide = Animation::new("slide", 2.0);
    slide
        .push_track(BoneTrack::with_keys(root, slide_keys(100.0, 2.0)))
        .unwrap();
    set.insert(slide, &skeleton).unwrap();

    let mut hold = Animation::new("hold", 1.0);
    hold.push_track(BoneTrack::with_keys(root, vec![Key::new(0.0), Key::new(1.0)]))
        .unwrap();
    set.insert(hold, &skeleton).unwrap();

    Puppet::new(skeleton, Arc::new(set)).unwrap()
}

fn root_x(puppet: &Puppet) -> f32 {
    puppet.absolute_transform(BoneId(0)).unwrap().m[2]
}

#[test]
fn looping_is_seamless_across_many_ticks() {
    let mut puppet = rig();
    puppet.load_animation("slide", true, &[]).unwrap();
    for _ in 0..7 {
        puppet.tick(0.5);
    }
    // 3.5s into a 2s loop = 1.5s into the second iteration.
    assert_abs_diff_eq!(puppet.elapsed(), 1.5, epsilon = 1e-4);
    assert_abs_diff_eq!(root_x(&puppet), 75.0, epsilon = 1e-3);
}

#[test]
fn queue_hand_off_restarts_the_timeline() {
    let mut puppet = rig();
    puppet.load_animation("hold", true, &["slide"]).unwrap();
    assert_eq!(puppet.queued().count(), 1);

    puppet.tick(1.25);
    // "hold" (1s) completed, "slide" took over with a fresh clock.
    let slide = puppet.animations().find_by_name("slide").unwrap();
    assert_eq!(puppet.current_animation(), Some(slide));
    assert_abs_diff_eq!(puppet.elapsed(), 0.0, epsilon = 1e-6);
    assert_eq!(puppet.queued().count(), 0);

    puppet.tick(1.0);
    assert_abs_diff_eq!(root_x(&puppet), 50.0, epsilon = 1e-3);
}

#[test]
fn exhausted_queue_falls_back_to_looping() {
    let mut puppet = rig();
    puppet.load_animation("hold", true, &[]).unwrap();
    puppet.tick(2.3);
    let hold = puppet.animations().find_by_name("hold").unwrap();
    assert_eq!(puppet.current_animation(), Some(hold));
    assert_abs_diff_eq!(puppet.elapsed(), 0.3, epsilon = 1e-4);
}

#[test]
fn identical_tick_sequences_produce_identical_poses() {
    let mut a = rig();
    let mut b = rig();
    for p in [&mut a, &mut b] {
        p.load_animation("slide", true, &["hold"]).unwrap();
        p.tick(0.7);
        p.tick(0.7);
        p.tick(0.9);
    }
    assert_eq!(
        a.absolute_transform(BoneId(0)),
        b.absolute_transform(BoneId(0))
    );
    assert_eq!(a.elapsed(), b.elapsed());
}

#[test]
fn crossfade_starts_at_the_outgoing_pose() {
    let mut puppet = rig();
    puppet.set_crossfade(1.0);
    puppet.load_animation("slide", true, &[]).unwrap();
    puppet.tick(1.0);
    assert_abs_diff_eq!(root_x(&puppet), 50.0, epsilon = 1e-3);

    // Switch to "hold" (which keeps the bone at rest). With zero fade
    // elapsed the pose must still be the outgoing one.
    puppet.load_animation("hold", true, &[]).unwrap();
    puppet.tick(0.0);
    assert_abs_diff_eq!(root_x(&puppet), 50.0, epsilon = 1e-3);

    // Halfway through the fade the deltas are halfway blended.
    puppet.tick(0.5);
    assert_abs_diff_eq!(root_x(&puppet), 25.0, epsilon = 1e-3);

    // Past the fade window the target animation owns the pose.
    puppet.tick(0.6);
    assert_abs_diff_eq!(root_x(&puppet), 0.0, epsilon = 1e-3);
}

#[test]
fn loading_from_idle_does_not_blend_from_bind_pose() {
    let mut puppet = rig();
    puppet.set_crossfade(1.0);
    puppet.load_animation("slide", true, &[]).unwrap();
    puppet.tick(0.5);
    // No outgoing animation, so the target pose applies unblended.
    assert_abs_diff_eq!(root_x(&puppet), 25.0, epsilon = 1e-3);
}

#[test]
fn stopping_snaps_to_bind_pose_despite_crossfade() {
    let mut puppet = rig();
    puppet.set_crossfade(1.0);
    puppet.load_animation("slide", true, &[]).unwrap();
    puppet.tick(1.0);
    puppet.stop();
    puppet.tick(0.0);
    assert_abs_diff_eq!(root_x(&puppet), 0.0, epsilon = 1e-6);

    // An explicit switch to "no animation" behaves like stop.
    puppet.load_animation("slide", true, &[]).unwrap();
    puppet.tick(1.0);
    puppet.load_animation_by_id(None, true, Vec::new()).unwrap();
    puppet.tick(0.0);
    assert_abs_diff_eq!(root_x(&puppet), 0.0, epsilon = 1e-6);
}

#[test]
fn zero_crossfade_snaps_immediately() {
    let mut puppet = rig();
    puppet.load_animation("slide", true, &[]).unwrap();
    puppet.tick(1.0);
    puppet.load_animation("hold", true, &[]).unwrap();
    puppet.tick(0.0);
    assert_abs_diff_eq!(root_x(&puppet), 0.0, epsilon = 1e-3);
}

#[test]
fn quadratic_ease_in_at_the_midpoint() {
    let mut skeleton = Skeleton::new();
    let root = skeleton.add_bone(Bone::new("root"));
    skeleton.set_master(root).unwrap();

    let mut set = AnimationSet::new();
    let mut anim = Animation::new("accelerate", 2.0);
    anim.push_track(BoneTrack::with_keys(
        root,
        vec![
            Key::new(0.0),
            Key::new(2.0)
                .with_delta(TransformSpec {
                    position: Vec2::new(100.0, 0.0),
                    ..TransformSpec::IDENTITY
                })
                .with_ease(ChannelEases::uniform(Ease::new(EasingFn::Power, 2.0))),
        ],
    ))
    .unwrap();
    set.insert(anim, &skeleton).unwrap();

    let mut puppet = Puppet::new(skeleton, Arc::new(set)).unwrap();
    puppet.load_animation("accelerate", true, &[]).unwrap();
    puppet.tick(1.0);
    // Halfway in time, a quarter of the way in space.
    assert_abs_diff_eq!(root_x(&puppet), 25.0, epsilon = 1e-3);
}

#[test]
fn load_without_clock_reset_keeps_the_timeline_position() {
    let mut puppet = rig();
    puppet.load_animation("slide", true, &[]).unwrap();
    puppet.tick(1.0);
    puppet.load_animation("slide", false, &[]).unwrap();
    assert_abs_diff_eq!(puppet.elapsed(), 1.0, epsilon = 1e-6);
    puppet.load_animation("slide", true, &[]).unwrap();
    assert_abs_diff_eq!(puppet.elapsed(), 0.0, epsilon = 1e-6);
}
