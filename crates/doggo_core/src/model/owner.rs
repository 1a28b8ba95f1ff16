//! Owner record.

use crate::model::dog::Dog;
use crate::model::neighborhood::NeighborhoodId;
use serde::{Deserialize, Serialize};

pub type OwnerId = i64;

/// Pet owner.
///
/// `dogs` is filled only by `OwnerRepository::get_owner_by_id`; every other
/// query returns an empty collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    /// Unique per owner; compared with the column's collation.
    pub email: String,
    pub name: String,
    pub address: String,
    pub neighborhood_id: NeighborhoodId,
    pub phone: String,
    #[serde(default)]
    pub dogs: Vec<Dog>,
}

impl Owner {
    /// Creates an owner that has not been inserted yet (`id == 0`).
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        neighborhood_id: NeighborhoodId,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            email: email.into(),
            name: name.into(),
            address: address.into(),
            neighborhood_id,
            phone: phone.into(),
            dogs: Vec::new(),
        }
    }
}
