//! Warehouse yield change rules.

use serde::{Deserialize, Serialize};

use crate::DataId;

/// A warehouse yield change as stored in the database: at most one condition
/// column is populated, plus the per-match `YieldChange`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct YieldChangeRule {
    #[serde(rename = "ID")]
    pub id: DataId,
    pub yield_type: Option<DataId>,
    pub yield_change: f64,
    pub age: Option<DataId>,

    pub lake_in_city: bool,
    pub minor_river_in_city: bool,
    pub navigable_river_in_city: bool,
    pub biome_in_city: Option<DataId>,
    pub constructible_in_city: Option<DataId>,
    pub feature_in_city: Option<DataId>,
    pub feature_class_in_city: Option<DataId>,
    pub natural_wonder_in_city: bool,
    pub resource_in_city: bool,
    pub route_in_city: bool,
    pub terrain_in_city: Option<DataId>,
    pub terrain_tag_in_city: Option<String>,
    pub overbuilt: bool,
    pub district_in_city: Option<DataId>,
}

/// The populated condition of a [`YieldChangeRule`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WarehouseCondition<'a> {
    Lake,
    MinorRiver,
    NavigableRiver,
    Biome(&'a str),
    ConstructibleCount(&'a str),
    Feature(&'a str),
    FeatureClass(&'a str),
    NaturalWonder,
    Resource,
    Route,
    Terrain(&'a str),
    TerrainTag(&'a str),
    Overbuilt,
    District(&'a str),
}

impl YieldChangeRule {
    /// The first populated condition, in fixed precedence order.
    pub fn condition(&self) -> Option<WarehouseCondition<'_>> {
        fn set(field: &Option<String>) -> Option<&str> {
            field.as_deref().filter(|value| !value.is_empty())
        }

        if self.lake_in_city {
            return Some(WarehouseCondition::Lake);
        }
        if self.minor_river_in_city {
            return Some(WarehouseCondition::MinorRiver);
        }
        if self.navigable_river_in_city {
            return Some(WarehouseCondition::NavigableRiver);
        }
        if let Some(biome) = set(&self.biome_in_city) {
            return Some(WarehouseCondition::Biome(biome));
        }
        if let Some(constructible) = set(&self.constructible_in_city) {
            return Some(WarehouseCondition::ConstructibleCount(constructible));
        }
        if let Some(feature) = set(&self.feature_in_city) {
            return Some(WarehouseCondition::Feature(feature));
        }
        if let Some(class) = set(&self.feature_class_in_city) {
            return Some(WarehouseCondition::FeatureClass(class));
        }
        if self.natural_wonder_in_city {
            return Some(WarehouseCondition::NaturalWonder);
        }
        if self.resource_in_city {
            return Some(WarehouseCondition::Resource);
        }
        if self.route_in_city {
            return Some(WarehouseCondition::Route);
        }
        if let Some(terrain) = set(&self.terrain_in_city) {
            return Some(WarehouseCondition::Terrain(terrain));
        }
        if let Some(tag) = set(&self.terrain_tag_in_city) {
            return Some(WarehouseCondition::TerrainTag(tag));
        }
        if self.overbuilt {
            return Some(WarehouseCondition::Overbuilt);
        }
        if let Some(district) = set(&self.district_in_city) {
            return Some(WarehouseCondition::District(district));
        }
        None
    }
}
