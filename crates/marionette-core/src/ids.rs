//! Dense runtime identifiers.
//!
//! Stable identity for interchange lives on the elements themselves as
//! `Uuid`s; these newtypes are arena positions, dense for cache-friendly
//! per-tick indexing.

use serde::{Deserialize, Serialize};

/// Position of a bone in the skeleton arena (also its authored draw order).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BoneId(pub u32);

/// Dense id of an animation inside an [`AnimationSet`](crate::AnimationSet).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AnimId(pub u32);

/// Index of a category in the skeleton's category table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub u32);

impl BoneId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl CategoryId {
    /// Every skeleton owns a default category at slot 0.
    pub const DEFAULT: CategoryId = CategoryId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Monotonic allocator for animation ids.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct IdAllocator {
    next_anim: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_anim(&mut self) -> AnimId {
        let id = AnimId(self.next_anim);
        self.next_anim = self.next_anim.wrapping_add(1);
        id
    }
}
