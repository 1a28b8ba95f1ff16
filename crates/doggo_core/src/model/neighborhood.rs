use serde::{Deserialize, Serialize};

pub type NeighborhoodId = i64;

/// Grouping entity referenced by `Owner.NeighborhoodId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub id: NeighborhoodId,
    pub name: String,
}

impl Neighborhood {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}
