//! The skeleton's static bind data: a flat arena of bones with non-owning
//! child links, a master (root) set and a category table.
//!
//! Arena order is the authored draw order. Children are stored as dense
//! [`BoneId`] indices, so the tree is acyclic by construction *check* rather
//! than by the type system; [`Skeleton::validate`] enforces resolvable links,
//! acyclicity and single-master reachability at build time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;
use crate::error::RigError;
use crate::ids::{BoneId, CategoryId};
use crate::math::TransformSpec;
use crate::paint::{BlendMode, Paint};
use crate::surface::SpriteAttachment;

/// A named transform node, optionally painting an attached surface.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bone {
    /// Stable identity, used by the template interchange format.
    pub id: Uuid,
    pub name: String,
    /// Authored, non-animated local transform.
    pub bind: TransformSpec,
    /// Default paint state, restored every frame the bone has no track.
    pub paint: Paint,
    /// Ordered child references into the owning skeleton's arena.
    pub children: Vec<BoneId>,
    /// Optional paintable surface.
    pub sprite: Option<SpriteAttachment>,
    pub blend_mode: BlendMode,
    pub category: CategoryId,
    /// Draw this bone's temporary surfaces before the attached one.
    pub draw_temp_first: bool,
}

impl Bone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bind: TransformSpec::IDENTITY,
            paint: Paint::default(),
            children: Vec::new(),
            sprite: None,
            blend_mode: BlendMode::Alpha,
            category: CategoryId::DEFAULT,
            draw_temp_first: false,
        }
    }

    pub fn with_bind(mut self, bind: TransformSpec) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteAttachment) -> Self {
        self.sprite = Some(sprite);
        self
    }
}

/// Flat bone hierarchy plus the master set from which composition starts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Skeleton {
    bones: Vec<Bone>,
    masters: Vec<BoneId>,
    categories: Vec<Category>,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}

impl Skeleton {
    pub fn new() -> Self {
        Self {
            bones: Vec::new(),
            masters: Vec::new(),
            categories: vec![Category::default_category()],
        }
    }

    /// Append a bone to the arena; its position is the draw order.
    pub fn add_bone(&mut self, bone: Bone) -> BoneId {
        let id = BoneId(self.bones.len() as u32);
        self.bones.push(bone);
        id
    }

    /// Link `child` under `parent`. Cycles are caught by [`validate`], not
    /// here; out-of-range ids are rejected immediately.
    pub fn attach_child(&mut self, parent: BoneId, child: BoneId) -> Result<(), RigError> {
        let len = self.bones.len() as u32;
        for id in [parent, child] {
            if id.0 >= len {
                return Err(RigError::BoneOutOfRange {
                    context: "attach_child".into(),
                    index: id.0,
                });
            }
        }
        self.bones[parent.index()].children.push(child);
        Ok(())
    }

    /// Mark a bone as a master (composition root).
    pub fn set_master(&mut self, bone: BoneId) -> Result<(), RigError> {
        if bone.0 >= self.bones.len() as u32 {
            return Err(RigError::BoneOutOfRange {
                context: "set_master".into(),
                index: bone.0,
            });
        }
        if !self.masters.contains(&bone) {
            self.masters.push(bone);
        }
        Ok(())
    }

    pub fn add_category(&mut self, category: Category) -> CategoryId {
        let id = CategoryId(self.categories.len() as u32);
        self.categories.push(category);
        id
    }

    pub fn set_category_enabled(&mut self, id: CategoryId, enabled: bool) {
        if let Some(c) = self.categories.get_mut(id.index()) {
            c.enabled = enabled;
        }
    }

    pub fn category_enabled(&self, id: CategoryId) -> bool {
        self.categories
            .get(id.index())
            .map(|c| c.enabled)
            .unwrap_or(true)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn find_category(&self, name: &str) -> Option<CategoryId> {
        self.categories
            .iter()
            .position(|c| c.name == name)
            .map(|i| CategoryId(i as u32))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[inline]
    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.index())
    }

    #[inline]
    pub fn bone_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.bones.get_mut(id.index())
    }

    /// Bones in arena (draw) order.
    pub fn iter(&self) -> impl Iterator<Item = (BoneId, &Bone)> {
        self.bones
            .iter()
            .enumerate()
            .map(|(i, b)| (BoneId(i as u32), b))
    }

    pub fn masters(&self) -> &[BoneId] {
        &self.masters
    }

    pub fn find_bone(&self, name: &str) -> Option<BoneId> {
        self.bones
            .iter()
            .position(|b| b.name == name)
            .map(|i| BoneId(i as u32))
    }

    /// Check the structural invariants of the hierarchy:
    /// child references resolve, the child graph is acyclic, and every
    /// non-master bone is reachable from exactly one master.
    pub fn validate(&self) -> Result<(), RigError> {
        let n = self.bones.len();

        for bone in &self.bones {
            for child in &bone.children {
                if child.index() >= n {
                    return Err(RigError::BoneOutOfRange {
                        context: format!("children of '{}'", bone.name),
                        index: child.0,
                    });
                }
            }
        }

        self.check_acyclic()?;

        // Ownership pass: walk down from each master, recording the claiming
        // master per bone. A second claim means multiple reachability.
        let mut owner: Vec<Option<BoneId>> = vec![None; n];
        for &master in &self.masters {
            let mut stack = vec![master];
            while let Some(id) = stack.pop() {
                if owner[id.index()].is_some() {
                    return Err(RigError::MultiplyReachableBone {
                        name: self.bones[id.index()].name.clone(),
                    });
                }
                owner[id.index()] = Some(master);
                stack.extend(self.bones[id.index()].children.iter().copied());
            }
        }

        if let Some(i) = owner.iter().position(|o| o.is_none()) {
            return Err(RigError::UnreachableBone {
                name: self.bones[i].name.clone(),
            });
        }
        Ok(())
    }

    /// Depth-first cycle check over child links (white/gray/black coloring).
    fn check_acyclic(&self) -> Result<(), RigError> {
        const WHITE: u8 = 0;
        const GRAY: u8 = 1;
        const BLACK: u8 = 2;
        let n = self.bones.len();
        let mut color = vec![WHITE; n];

        for start in 0..n {
            if color[start] != WHITE {
                continue;
            }
            // Iterative DFS with an explicit (node, next-child) stack.
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            color[start] = GRAY;
            while let Some(top) = stack.last_mut() {
                let (node, next) = *top;
                if next < self.bones[node].children.len() {
                    top.1 += 1;
                    let child = self.bones[node].children[next].index();
                    match color[child] {
                        WHITE => {
                            color[child] = GRAY;
                            stack.push((child, 0));
                        }
                        GRAY => {
                            return Err(RigError::CyclicHierarchy {
                                name: self.bones[child].name.clone(),
                            });
                        }
                        _ => {}
                    }
                } else {
                    color[node] = BLACK;
                    stack.pop();
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(names: &[&str]) -> (Skeleton, Vec<BoneId>) {
        let mut sk = Skeleton::new();
        let ids: Vec<BoneId> = names.iter().map(|n| sk.add_bone(Bone::new(*n))).collect();
        for w in ids.windows(2) {
            sk.attach_child(w[0], w[1]).unwrap();
        }
        sk.set_master(ids[0]).unwrap();
        (sk, ids)
    }

    #[test]
    fn valid_chain_passes() {
        let (sk, _) = chain(&["root", "mid", "leaf"]);
        assert!(sk.validate().is_ok());
    }

    #[test]
    fn cycle_is_rejected() {
        let (mut sk, ids) = chain(&["root", "mid", "leaf"]);
        sk.attach_child(ids[2], ids[1]).unwrap();
        assert!(matches!(
            sk.validate(),
            Err(RigError::CyclicHierarchy { .. })
        ));
    }

    #[test]
    fn orphan_is_rejected() {
        let (mut sk, _) = chain(&["root", "mid", "leaf"]);
        sk.add_bone(Bone::new("floating"));
        assert!(matches!(
            sk.validate(),
            Err(RigError::UnreachableBone { name }) if name == "floating"
        ));
    }

    #[test]
    fn shared_child_is_rejected() {
        let mut sk = Skeleton::new();
        let a = sk.add_bone(Bone::new("a"));
        let b = sk.add_bone(Bone::new("b"));
        let shared = sk.add_bone(Bone::new("shared"));
        sk.attach_child(a, shared).unwrap();
        sk.attach_child(b, shared).unwrap();
        sk.set_master(a).unwrap();
        sk.set_master(b).unwrap();
        assert!(matches!(
            sk.validate(),
            Err(RigError::MultiplyReachableBone { name }) if name == "shared"
        ));
    }

    #[test]
    fn out_of_range_child_is_rejected_eagerly() {
        let mut sk = Skeleton::new();
        let a = sk.add_bone(Bone::new("a"));
        assert!(sk.attach_child(a, BoneId(7)).is_err());
    }
}
