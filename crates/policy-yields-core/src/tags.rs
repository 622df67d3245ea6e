use std::collections::{BTreeMap, BTreeSet};

use policy_yields_protocol::DataId;
use serde::{Deserialize, Serialize};

use crate::TypeTags;

/// Tags per type id, built once from the game's type-tag table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagCache {
    tags: BTreeMap<DataId, BTreeSet<String>>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(type, tag)` rows.
    pub fn from_rows<I, T, G>(rows: I) -> Self
    where
        I: IntoIterator<Item = (T, G)>,
        T: Into<DataId>,
        G: Into<String>,
    {
        let mut cache = Self::new();
        for (type_id, tag) in rows {
            cache.insert(type_id, tag);
        }
        cache
    }

    pub fn insert(&mut self, type_id: impl Into<DataId>, tag: impl Into<String>) {
        self.tags
            .entry(type_id.into())
            .or_default()
            .insert(tag.into());
    }

    pub fn tags_for(&self, type_id: &str) -> Option<&BTreeSet<String>> {
        self.tags.get(type_id)
    }
}

impl TypeTags for TagCache {
    fn has_tag(&self, type_id: &str, tag: &str) -> bool {
        self.tags_for(type_id).is_some_and(|tags| tags.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_queries() {
        let cache = TagCache::from_rows([
            ("BUILDING_LIBRARY", "SCIENCE"),
            ("BUILDING_LIBRARY", "AGELESS"),
            ("TERRAIN_HILL", "ROUGH"),
        ]);

        assert!(cache.has_tag("BUILDING_LIBRARY", "AGELESS"));
        assert!(!cache.has_tag("BUILDING_LIBRARY", "ROUGH"));
        assert!(!cache.has_tag("BUILDING_UNKNOWN", "AGELESS"));
        assert_eq!(cache.tags_for("TERRAIN_HILL").map(BTreeSet::len), Some(1));
    }

    #[test]
    fn deserializes_as_type_to_tag_list() {
        let cache: TagCache = serde_yaml::from_str("BUILDING_WALLS: [IGNORE_DISTRICT_PLACEMENT_CAP]").unwrap();
        assert!(cache.has_tag("BUILDING_WALLS", "IGNORE_DISTRICT_PLACEMENT_CAP"));
    }
}
