//! JSON template interchange: a serializable description of a whole rig
//! (hierarchy, categories, animations) that can be stored, shipped and
//! instantiated into live puppets.
//!
//! Templates reference bones and categories by UUID so they survive
//! re-serialization; arena indices are assigned at instantiation. Every
//! structural rule is re-checked on instantiation, so a template from an
//! untrusted file either produces a valid puppet or a precise error.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::animation::{Animation, AnimationSet, BoneTrack, Key};
use crate::bone::{Bone, Skeleton};
use crate::category::Category;
use crate::error::RigError;
use crate::ids::{BoneId, CategoryId};
use crate::math::TransformSpec;
use crate::paint::{BlendMode, Paint};
use crate::puppet::Puppet;
use crate::surface::SpriteAttachment;
use crate::trigger::EventTrigger;

/// One bone as stored in a template. Children and category are referenced
/// by UUID.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoneData {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub bind: TransformSpec,
    #[serde(default)]
    pub paint: Paint,
    #[serde(default)]
    pub sprite: Option<SpriteAttachment>,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub children: Vec<Uuid>,
    /// `None` means the default category.
    #[serde(default)]
    pub category: Option<Uuid>,
    #[serde(default)]
    pub draw_temp_first: bool,
}

/// One animation track as stored in a template.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrackData {
    pub bone: Uuid,
    pub keys: Vec<Key>,
}

/// One animation as stored in a template.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnimationData {
    pub id: Uuid,
    pub name: String,
    pub duration: f32,
    #[serde(default)]
    pub tracks: Vec<TrackData>,
    #[serde(default)]
    pub triggers: Vec<EventTrigger>,
}

/// A complete rig description.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PuppetTemplate {
    /// Version of the library that wrote the template.
    #[serde(default)]
    pub version: String,
    pub hierarchy: Vec<BoneData>,
    #[serde(default)]
    pub masters: Vec<Uuid>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub animations: Vec<AnimationData>,
}

impl PuppetTemplate {
    pub fn from_json(json: &str) -> Result<Self, RigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, RigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a live puppet. Re-validates everything: unresolved UUIDs,
    /// hierarchy shape and animation contents all surface as errors here.
    pub fn instantiate(&self) -> Result<Puppet, RigError> {
        let mut skeleton = Skeleton::new();

        let mut category_ids: HashMap<Uuid, CategoryId> = HashMap::new();
        for category in &self.categories {
            let id = if category.id.is_nil() {
                skeleton.set_category_enabled(CategoryId::DEFAULT, category.enabled);
                CategoryId::DEFAULT
            } else {
                skeleton.add_category(category.clone())
            };
            if category_ids.insert(category.id, id).is_some() {
                return Err(RigError::DuplicateId {
                    context: format!("category {:?}", category.name),
                    id: category.id,
                });
            }
        }
        category_ids.entry(Uuid::nil()).or_insert(CategoryId::DEFAULT);

        let mut bone_ids: HashMap<Uuid, BoneId> = HashMap::new();
        for data in &self.hierarchy {
            let category = match data.category {
                Some(uuid) => {
                    *category_ids
                        .get(&uuid)
                        .ok_or_else(|| RigError::UnresolvedReference {
                            context: format!("category of bone {:?}", data.name),
                            id: uuid,
                        })?
                }
                None => CategoryId::DEFAULT,
            };
            let bone = Bone {
                id: data.id,
                name: data.name.clone(),
                bind: data.bind,
                paint: data.paint,
                children: Vec::new(),
                sprite: data.sprite.clone(),
                blend_mode: data.blend_mode,
                category,
                draw_temp_first: data.draw_temp_first,
            };
            let id = skeleton.add_bone(bone);
            if bone_ids.insert(data.id, id).is_some() {
                return Err(RigError::DuplicateId {
                    context: format!("bone {:?}", data.name),
                    id: data.id,
                });
            }
        }

        for data in &self.hierarchy {
            let parent = bone_ids[&data.id];
            for child in &data.children {
                let child = *bone_ids
                    .get(child)
                    .ok_or_else(|| RigError::UnresolvedReference {
                        context: format!("child of bone {:?}", data.name),
                        id: *child,
                    })?;
                skeleton.attach_child(parent, child)?;
            }
        }
        for master in &self.masters {
            let id = *bone_ids
                .get(master)
                .ok_or_else(|| RigError::UnresolvedReference {
                    context: "master bone".to_string(),
                    id: *master,
                })?;
            skeleton.set_master(id)?;
        }

        let mut set = AnimationSet::new();
        for data in &self.animations {
            let mut animation = Animation::new(data.name.clone(), data.duration);
            animation.id = data.id;
            animation.triggers = data.triggers.clone();
            for track in &data.tracks {
                let bone = *bone_ids
                    .get(&track.bone)
                    .ok_or_else(|| RigError::UnresolvedReference {
                        context: format!("track of animation {:?}", data.name),
                        id: track.bone,
                    })?;
                animation.push_track(BoneTrack::with_keys(bone, track.keys.clone()))?;
            }
            set.insert(animation, &skeleton)?;
        }

        Puppet::new(skeleton, Arc::new(set))
    }
}

impl Puppet {
    /// Export this puppet's rig as a template. Evaluated state (clocks,
    /// pose, queue) is not part of the format.
    pub fn to_template(&self) -> PuppetTemplate {
        let skeleton = self.skeleton();
        let hierarchy = skeleton
            .iter()
            .map(|(_, bone)| BoneData {
                id: bone.id,
                name: bone.name.clone(),
                bind: bone.bind,
                paint: bone.paint,
                sprite: bone.sprite.clone(),
                blend_mode: bone.blend_mode,
                children: bone
                    .children
                    .iter()
                    .filter_map(|c| skeleton.bone(*c))
                    .map(|c| c.id)
                    .collect(),
                category: if bone.category == CategoryId::DEFAULT {
                    None
                } else {
                    skeleton
                        .categories()
                        .get(bone.category.index())
                        .map(|c| c.id)
                },
                draw_temp_first: bone.draw_temp_first,
            })
            .collect();
        let masters = skeleton
            .masters()
            .iter()
            .filter_map(|m| skeleton.bone(*m))
            .map(|b| b.id)
            .collect();
        let animations = self
            .animations()
            .iter()
            .map(|(_, anim)| AnimationData {
                id: anim.id,
                name: anim.name.clone(),
                duration: anim.duration,
                tracks: anim
                    .tracks
                    .iter()
                    .map(|track| TrackData {
                        bone: skeleton
                            .bone(track.bone)
                            .map(|b| b.id)
                            .unwrap_or_else(Uuid::nil),
                        keys: track.keys.clone(),
                    })
                    .collect(),
                triggers: anim.triggers.clone(),
            })
            .collect();
        PuppetTemplate {
            version: env!("CARGO_PKG_VERSION").to_string(),
            hierarchy,
            masters,
            categories: skeleton.categories().to_vec(),
            animations,
        }
    }
}
