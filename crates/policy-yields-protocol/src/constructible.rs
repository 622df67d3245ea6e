use serde::{Deserialize, Serialize};

use crate::DataId;

/// Constructible type definition (building, improvement, wonder, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConstructibleDef {
    pub constructible_type: DataId,
    /// `None` for types that do not belong to a single age.
    #[serde(default)]
    pub age: Option<DataId>,
    /// Adjacency yield change ids this type may receive.
    #[serde(default)]
    pub adjacencies: Vec<DataId>,
}

impl ConstructibleDef {
    pub fn new(constructible_type: impl Into<DataId>) -> Self {
        Self {
            constructible_type: constructible_type.into(),
            ..Default::default()
        }
    }

    pub fn in_age(mut self, age: impl Into<DataId>) -> Self {
        self.age = Some(age.into());
        self
    }

    pub fn with_adjacency(mut self, adjacency: impl Into<DataId>) -> Self {
        self.adjacencies.push(adjacency.into());
        self
    }

    pub fn has_adjacency(&self, adjacency: &str) -> bool {
        self.adjacencies.iter().any(|id| id == adjacency)
    }
}
