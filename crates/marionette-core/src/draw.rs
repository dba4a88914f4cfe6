//! Renderer-facing output: an ordered list of draw items built from the last
//! evaluated pose.
//!
//! The arena order of the skeleton *is* the draw order. Each bone yields a
//! surface item when it carries a sprite and its category is enabled, plus a
//! temporary slot (before or after per the bone's flag) that host renderers
//! can fill with ad-hoc content such as held props.

use crate::ids::BoneId;
use crate::math::Transform2;
use crate::paint::{BlendMode, Paint};
use crate::puppet::Puppet;
use crate::surface::SpriteAttachment;

/// Which slot of a bone a draw item belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DrawPhase {
    /// Temporary slot drawn before the bone's surface.
    PreTemp,
    /// The bone's attached surface.
    Surface,
    /// Temporary slot drawn after the bone's surface.
    PostTemp,
}

/// One entry of the render list.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem<'a> {
    pub bone: BoneId,
    pub phase: DrawPhase,
    pub transform: Transform2,
    pub paint: Paint,
    pub blend_mode: BlendMode,
    /// Present only for [`DrawPhase::Surface`] items.
    pub sprite: Option<&'a SpriteAttachment>,
}

impl Puppet {
    /// Build the render list for the pose evaluated by the last tick.
    ///
    /// Bones whose category is disabled contribute no surface item but keep
    /// their temporary slot, so host overlays stay addressable.
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        let mut items = Vec::with_capacity(self.skeleton().len() * 2);
        for (id, bone) in self.skeleton().iter() {
            let transform = self.absolutes[id.index()];
            let paint = self.paints[id.index()];
            let temp = DrawItem {
                bone: id,
                phase: if bone.draw_temp_first {
                    DrawPhase::PreTemp
                } else {
                    DrawPhase::PostTemp
                },
                transform,
                paint,
                blend_mode: bone.blend_mode,
                sprite: None,
            };
            let surface = bone
                .sprite
                .as_ref()
                .filter(|_| self.skeleton().category_enabled(bone.category))
                .map(|sprite| DrawItem {
                    bone: id,
                    phase: DrawPhase::Surface,
                    transform,
                    paint,
                    blend_mode: bone.blend_mode,
                    sprite: Some(sprite),
                });
            if bone.draw_temp_first {
                items.push(temp);
                items.extend(surface);
            } else {
                items.extend(surface);
                items.push(temp);
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationSet;
    use crate::bone::{Bone, Skeleton};
    use crate::math::Vec2;
    use crate::surface::SpriteAttachment;
    use std::sync::Arc;

    fn puppet_with_sprites() -> Puppet {
        let mut skeleton = Skeleton::new();
        let a = skeleton.add_bone(
            Bone::new("back").with_sprite(SpriteAttachment::new(Vec2::new(4.0, 4.0))),
        );
        let b = skeleton.add_bone(
            Bone::new("front").with_sprite(SpriteAttachment::new(Vec2::new(2.0, 2.0))),
        );
        skeleton.attach_child(a, b).unwrap();
        skeleton.set_master(a).unwrap();
        Puppet::new(skeleton, Arc::new(AnimationSet::new())).unwrap()
    }

    #[test]
    fn arena_order_is_draw_order() {
        let puppet = puppet_with_sprites();
        let surfaces: Vec<BoneId> = puppet
            .draw_list()
            .into_iter()
            .filter(|i| i.phase == DrawPhase::Surface)
            .map(|i| i.bone)
            .collect();
        assert_eq!(surfaces, vec![BoneId(0), BoneId(1)]);
    }

    #[test]
    fn every_bone_gets_exactly_one_temp_slot() {
        let puppet = puppet_with_sprites();
        let temps = puppet
            .draw_list()
            .into_iter()
            .filter(|i| i.phase != DrawPhase::Surface)
            .count();
        assert_eq!(temps, 2);
    }

    #[test]
    fn temp_first_flag_orders_the_pair() {
        let mut skeleton = Skeleton::new();
        let mut bone =
            Bone::new("only").with_sprite(SpriteAttachment::new(Vec2::new(1.0, 1.0)));
        bone.draw_temp_first = true;
        let id = skeleton.add_bone(bone);
        skeleton.set_master(id).unwrap();
        let puppet = Puppet::new(skeleton, Arc::new(AnimationSet::new())).unwrap();
        let phases: Vec<DrawPhase> = puppet.draw_list().iter().map(|i| i.phase).collect();
        assert_eq!(phases, vec![DrawPhase::PreTemp, DrawPhase::Surface]);
    }

    #[test]
    fn disabled_category_suppresses_the_surface() {
        let mut puppet = puppet_with_sprites();
        let default = crate::ids::CategoryId::DEFAULT;
        puppet.skeleton_mut().set_category_enabled(default, false);
        let surfaces = puppet
            .draw_list()
            .into_iter()
            .filter(|i| i.phase == DrawPhase::Surface)
            .count();
        assert_eq!(surfaces, 0);
    }
}
