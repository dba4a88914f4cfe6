//! Template interchange: export, JSON round-trip, re-validation on import.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use marionette_core::{
    Animation, AnimationSet, Bone, BoneId, BoneTrack, Category, EventTrigger, Key, Puppet,
    PuppetTemplate, RigError, Skeleton, SpriteAttachment, TransformSpec, Vec2,
};
use uuid::Uuid;

fn sample_puppet() -> Puppet {
    let mut skeleton = Skeleton::new();
    let torso = skeleton.add_bone(
        Bone::new("torso").with_sprite(SpriteAttachment::new(Vec2::new(4.0, 6.0))),
    );
    let arm = skeleton.add_bone(Bone::new("arm").with_bind(TransformSpec {
        position: Vec2::new(2.0, 1.0),
        ..TransformSpec::IDENTITY
    }));
    skeleton.attach_child(torso, arm).unwrap();
    skeleton.set_master(torso).unwrap();
    let props = skeleton.add_category(Category::new("props"));
    skeleton.bone_mut(arm).unwrap().category = props;

    let mut set = AnimationSet::new();
    let mut wave = Animation::new("wave", 1.5);
    wave.push_track(BoneTrack::with_keys(
        arm,
        vec![
            Key::new(0.0),
            Key::new(1.5).with_delta(TransformSpec {
                rotation: 45.0,
                ..TransformSpec::IDENTITY
            }),
        ],
    ))
    .unwrap();
    wave.triggers.push(EventTrigger::new("apex", 0.75));
    set.insert(wave, &skeleton).unwrap();

    Puppet::new(skeleton, Arc::new(set)).unwrap()
}

#[test]
fn export_import_preserves_structure() {
    let original = sample_puppet();
    let json = original.to_template().to_json().unwrap();
    let rebuilt = PuppetTemplate::from_json(&json).unwrap().instantiate().unwrap();

    assert_eq!(rebuilt.skeleton().len(), 2);
    assert_eq!(rebuilt.skeleton().find_bone("arm"), Some(BoneId(1)));
    assert!(rebuilt.skeleton().find_category("props").is_some());
    assert!(rebuilt.animations().find_by_name("wave").is_some());
}

#[test]
fn rebuilt_puppets_evaluate_identically() {
    let mut original = sample_puppet();
    let template = original.to_template();
    let mut rebuilt = template.instantiate().unwrap();

    for p in [&mut original, &mut rebuilt] {
        p.load_animation("wave", true, &[]).unwrap();
        p.tick(0.6);
    }
    let a = original.absolute_transform(BoneId(1)).unwrap();
    let b = rebuilt.absolute_transform(BoneId(1)).unwrap();
    for i in 0..6 {
        assert_abs_diff_eq!(a.m[i], b.m[i], epsilon = 1e-6);
    }
}

#[test]
fn version_is_stamped_on_export() {
    let template = sample_puppet().to_template();
    assert!(!template.version.is_empty());
}

#[test]
fn unresolved_child_reference_is_rejected() {
    let mut template = sample_puppet().to_template();
    template.hierarchy[0].children.push(Uuid::new_v4());
    assert!(matches!(
        template.instantiate(),
        Err(RigError::UnresolvedReference { .. })
    ));
}

#[test]
fn unresolved_track_bone_is_rejected() {
    let mut template = sample_puppet().to_template();
    template.animations[0].tracks[0].bone = Uuid::new_v4();
    assert!(matches!(
        template.instantiate(),
        Err(RigError::UnresolvedReference { .. })
    ));
}

#[test]
fn duplicate_bone_id_is_rejected() {
    let mut template = sample_puppet().to_template();
    template.hierarchy[1].id = template.hierarchy[0].id;
    assert!(matches!(
        template.instantiate(),
        Err(RigError::DuplicateId { .. })
    ));
}

#[test]
fn duplicate_category_id_is_rejected() {
    let mut template = sample_puppet().to_template();
    let dup = template.categories.last().unwrap().clone();
    template.categories.push(dup);
    assert!(matches!(
        template.instantiate(),
        Err(RigError::DuplicateId { .. })
    ));
}

#[test]
fn cyclic_hierarchy_is_rejected_on_instantiation() {
    let mut template = sample_puppet().to_template();
    let torso = template.hierarchy[0].id;
    template.hierarchy[1].children.push(torso);
    assert!(matches!(
        template.instantiate(),
        Err(RigError::CyclicHierarchy { .. })
    ));
}

#[test]
fn invalid_duration_is_rejected_on_instantiation() {
    let mut template = sample_puppet().to_template();
    template.animations[0].duration = -1.0;
    assert!(matches!(
        template.instantiate(),
        Err(RigError::InvalidDuration { .. })
    ));
}

#[test]
fn missing_optional_fields_take_defaults() {
    let json = r#"{
        "hierarchy": [
            { "id": "00000000-0000-0000-0000-000000000001", "name": "solo" }
        ],
        "masters": ["00000000-0000-0000-0000-000000000001"]
    }"#;
    let puppet = PuppetTemplate::from_json(json).unwrap().instantiate().unwrap();
    assert_eq!(puppet.skeleton().len(), 1);
    assert_eq!(puppet.animations().len(), 0);
    let bone = puppet.skeleton().bone(BoneId(0)).unwrap();
    assert_eq!(bone.bind, TransformSpec::IDENTITY);
    assert_eq!(bone.paint.opacity, 255);
}

#[test]
fn malformed_json_reports_serialization_error() {
    assert!(matches!(
        PuppetTemplate::from_json("{ not json"),
        Err(RigError::Serialization { .. })
    ));
}
