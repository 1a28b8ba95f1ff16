//! Dog record.

use crate::model::owner::OwnerId;
use serde::{Deserialize, Serialize};

pub type DogId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    pub id: DogId,
    pub name: String,
    pub breed: String,
    /// Free text; `NULL` in storage maps to `None`.
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub owner_id: OwnerId,
}

impl Dog {
    /// Creates a dog that has not been inserted yet (`id == 0`).
    pub fn new(name: impl Into<String>, breed: impl Into<String>, owner_id: OwnerId) -> Self {
        Self {
            id: 0,
            name: name.into(),
            breed: breed.into(),
            notes: None,
            image_url: None,
            owner_id,
        }
    }
}
