//! Draw categories: named tags that gate surface drawing per bone group.
//!
//! Disabling a category suppresses drawing of its bones' attached surfaces;
//! transform computation is unaffected and descendants still compose.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bone category. Every skeleton starts with an enabled default category.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub enabled: bool,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            enabled: true,
        }
    }

    pub(crate) fn default_category() -> Self {
        Self {
            id: Uuid::nil(),
            name: "Default".to_string(),
            enabled: true,
        }
    }
}
