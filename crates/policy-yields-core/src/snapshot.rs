//! A self-contained world: resolved game records plus map and city state,
//! loaded from YAML. Backs the preview binary and the tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use policy_yields_protocol::{
    CityId, ConstructibleDef, ConstructibleId, DataId, Location, Maintenance, Modifier, PlayerId,
    PlotFeature, PlotIndex, Requirement, RequirementKind, RequirementSet, Subject, UnitId,
    YieldChangeRule,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    ConstructibleRegistry, EvalContext, RequirementRegistry, TagCache, WorldDataProvider,
};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing referenced id: {0}")]
    MissingId(String),
    #[error("out of map bounds: {0}")]
    OutOfBounds(String),
}

/// Index handed out for locations that are not on the map.
pub const OFF_MAP: PlotIndex = PlotIndex(u32::MAX);
const OFF_MAP_LOCATION: Location = Location::new(-1, -1);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiverKind {
    #[default]
    None,
    Minor,
    Navigable,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSnapshot {
    pub location: Location,
    pub terrain: Option<DataId>,
    pub biome: Option<DataId>,
    pub feature: Option<PlotFeature>,
    pub resource: Option<DataId>,
    pub route: Option<DataId>,
    pub lake: bool,
    pub river: RiverKind,
    pub natural_wonder: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSnapshot {
    pub width: u32,
    pub height: u32,
    /// Only plots with content need to be listed.
    pub plots: Vec<PlotSnapshot>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitySnapshot {
    pub owner: PlayerId,
    pub name: String,
    pub location: Location,
    pub capital: bool,
    pub purchased_plots: Vec<Location>,
    /// Per constructible type.
    pub maintenance: BTreeMap<DataId, Maintenance>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitSnapshot {
    pub owner: PlayerId,
    pub unit_type: DataId,
    pub location: Location,
    pub combat: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructibleSnapshot {
    pub constructible_type: DataId,
    pub location: Location,
    pub city: Option<CityId>,
    pub hidden: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSnapshot {
    pub local_player: PlayerId,
    pub current_age: Option<DataId>,
    pub map: MapSnapshot,
    pub cities: BTreeMap<CityId, CitySnapshot>,
    pub units: BTreeMap<UnitId, UnitSnapshot>,
    pub constructibles: BTreeMap<ConstructibleId, ConstructibleSnapshot>,

    // Game records
    pub constructible_types: Vec<ConstructibleDef>,
    /// Warehouse yield change id -> constructible types it applies to.
    pub warehouse_links: BTreeMap<DataId, BTreeSet<DataId>>,
    pub tags: TagCache,
    pub requirement_sets: BTreeMap<DataId, RequirementSet>,
    pub modifiers: Vec<Modifier>,
    pub warehouse_yield_changes: Vec<YieldChangeRule>,
}

impl WorldSnapshot {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_yaml::from_str(text)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        let MapSnapshot { width, height, .. } = self.map;
        let fits = width > 0
            && height > 0
            && i32::try_from(width).is_ok()
            && i32::try_from(height).is_ok()
            && width.checked_mul(height).is_some();
        if !fits {
            return Err(SnapshotError::OutOfBounds(format!(
                "map size {width}x{height}"
            )));
        }

        let on_map = |what: String, location: Location| {
            if self.in_bounds(location) {
                Ok(())
            } else {
                Err(SnapshotError::OutOfBounds(format!(
                    "{what} at ({}, {}) on a {width}x{height} map",
                    location.x, location.y
                )))
            }
        };
        for plot in &self.map.plots {
            on_map("plot".to_string(), plot.location)?;
        }
        for (id, city) in &self.cities {
            on_map(format!("city {}", id.raw), city.location)?;
            for plot in &city.purchased_plots {
                on_map(format!("purchased plot of city {}", id.raw), *plot)?;
            }
        }
        for (id, unit) in &self.units {
            on_map(format!("unit {}", id.raw), unit.location)?;
        }
        for (id, constructible) in &self.constructibles {
            on_map(format!("constructible {}", id.raw), constructible.location)?;
        }

        for (id, constructible) in &self.constructibles {
            if let Some(city) = constructible.city {
                if !self.cities.contains_key(&city) {
                    return Err(SnapshotError::MissingId(format!(
                        "city {} of constructible {}",
                        city.raw, id.raw
                    )));
                }
            }
        }
        for (id, set) in &self.requirement_sets {
            if set.requirement_set_id.as_deref().is_some_and(|inner| inner != id) {
                return Err(SnapshotError::MissingId(format!(
                    "requirement set {id} declares a different id"
                )));
            }
        }
        Ok(())
    }

    /// Evaluation context with the snapshot serving every collaborator.
    pub fn context(&self) -> EvalContext<'_> {
        EvalContext::new(self, self, &self.tags, self)
    }

    /// Unsigned grid coordinates of an on-map location.
    fn grid(&self, location: Location) -> Option<(u32, u32)> {
        let x = u32::try_from(location.x).ok()?;
        let y = u32::try_from(location.y).ok()?;
        (x < self.map.width && y < self.map.height).then_some((x, y))
    }

    fn in_bounds(&self, location: Location) -> bool {
        self.grid(location).is_some()
    }

    fn plot(&self, location: Location) -> Option<&PlotSnapshot> {
        self.map.plots.iter().find(|plot| plot.location == location)
    }

    fn subject_location(&self, subject: &Subject) -> Option<Location> {
        subject.plot().map(|plot| self.plot_location(plot))
    }

    fn evaluate_predicate(&self, player: PlayerId, subject: &Subject, requirement: &Requirement) -> bool {
        let arguments = &requirement.arguments;
        match requirement.kind.as_str() {
            "REQUIREMENT_CITY_IS_CAPITAL" => subject
                .city()
                .and_then(|city| self.cities.get(&city))
                .is_some_and(|city| city.capital),
            "REQUIREMENT_PLOT_IS_LAKE" => self
                .subject_location(subject)
                .is_some_and(|location| self.is_lake(location)),
            "REQUIREMENT_PLOT_TERRAIN_TYPE_MATCHES" => {
                let Some(location) = self.subject_location(subject) else {
                    return false;
                };
                arguments.value("TerrainType").is_some_and(|terrain| {
                    self.terrain(location).as_deref() == Some(terrain)
                })
            }
            "REQUIREMENT_PLOT_BIOME_TYPE_MATCHES" => {
                let Some(location) = self.subject_location(subject) else {
                    return false;
                };
                arguments
                    .value("BiomeType")
                    .is_some_and(|biome| self.biome(location).as_deref() == Some(biome))
            }
            "REQUIREMENT_PLOT_HAS_CONSTRUCTIBLE" => {
                let Some(location) = self.subject_location(subject) else {
                    return false;
                };
                let Some(wanted) = arguments.value("ConstructibleType") else {
                    return false;
                };
                self.visible_constructibles(location)
                    .into_iter()
                    .any(|id| self.constructible_type(id) == Some(wanted))
            }
            "REQUIREMENT_UNIT_IS_COMBAT" => subject
                .unit()
                .is_some_and(|unit| self.unit_is_combat(unit)),
            "REQUIREMENT_PLAYER_HAS_AT_LEAST_NUM_CITIES" => {
                let player = match subject {
                    Subject::Player { player } => *player,
                    _ => player,
                };
                match arguments.number("Amount") {
                    Ok(Some(amount)) => self.cities(player).len() as f64 >= amount,
                    Ok(None) => false,
                    Err(err) => {
                        warn!(%err, "bad city count requirement");
                        false
                    }
                }
            }
            other => {
                warn!(kind = other, "requirement type not supported by snapshot");
                false
            }
        }
    }
}

impl WorldDataProvider for WorldSnapshot {
    fn capital(&self, player: PlayerId) -> Option<CityId> {
        self.cities
            .iter()
            .find(|(_, city)| city.owner == player && city.capital)
            .map(|(id, _)| *id)
    }

    fn cities(&self, player: PlayerId) -> Vec<CityId> {
        self.cities
            .iter()
            .filter(|(_, city)| city.owner == player)
            .map(|(id, _)| *id)
            .collect()
    }

    fn units(&self, player: PlayerId) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|(_, unit)| unit.owner == player)
            .map(|(id, _)| *id)
            .collect()
    }

    fn city_owner(&self, city: CityId) -> Option<PlayerId> {
        self.cities.get(&city).map(|city| city.owner)
    }

    fn city_location(&self, city: CityId) -> Option<Location> {
        self.cities.get(&city).map(|city| city.location)
    }

    fn purchased_plots(&self, city: CityId) -> Vec<PlotIndex> {
        self.cities
            .get(&city)
            .map(|city| {
                city.purchased_plots
                    .iter()
                    .map(|location| self.plot_index(*location))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn city_constructibles(&self, city: CityId) -> Vec<ConstructibleId> {
        self.constructibles
            .iter()
            .filter(|(_, c)| c.city == Some(city))
            .map(|(id, _)| *id)
            .collect()
    }

    fn maintenance(&self, city: CityId, constructible_type: &str) -> Maintenance {
        self.cities
            .get(&city)
            .and_then(|city| city.maintenance.get(constructible_type))
            .cloned()
            .unwrap_or_default()
    }

    fn unit_location(&self, unit: UnitId) -> Option<Location> {
        self.units.get(&unit).map(|unit| unit.location)
    }

    fn unit_is_combat(&self, unit: UnitId) -> bool {
        self.units.get(&unit).is_some_and(|unit| unit.combat)
    }

    fn plot_index(&self, location: Location) -> PlotIndex {
        let Some((x, y)) = self.grid(location) else {
            warn!(?location, "location is off the map");
            return OFF_MAP;
        };
        y.checked_mul(self.map.width)
            .and_then(|row| row.checked_add(x))
            .map_or(OFF_MAP, PlotIndex)
    }

    fn plot_location(&self, plot: PlotIndex) -> Location {
        let width = self.map.width;
        if width == 0 || plot.0 / width >= self.map.height {
            return OFF_MAP_LOCATION;
        }
        match (i32::try_from(plot.0 % width), i32::try_from(plot.0 / width)) {
            (Ok(x), Ok(y)) => Location::new(x, y),
            _ => OFF_MAP_LOCATION,
        }
    }

    fn visible_constructibles(&self, location: Location) -> Vec<ConstructibleId> {
        self.constructibles
            .iter()
            .filter(|(_, c)| c.location == location && !c.hidden)
            .map(|(id, _)| *id)
            .collect()
    }

    fn is_lake(&self, location: Location) -> bool {
        self.plot(location).is_some_and(|plot| plot.lake)
    }

    fn is_river(&self, location: Location) -> bool {
        self.plot(location)
            .is_some_and(|plot| plot.river != RiverKind::None)
    }

    fn is_navigable_river(&self, location: Location) -> bool {
        self.plot(location)
            .is_some_and(|plot| plot.river == RiverKind::Navigable)
    }

    fn is_natural_wonder(&self, location: Location) -> bool {
        self.plot(location).is_some_and(|plot| plot.natural_wonder)
    }

    fn biome(&self, location: Location) -> Option<DataId> {
        self.plot(location).and_then(|plot| plot.biome.clone())
    }

    fn feature(&self, location: Location) -> Option<PlotFeature> {
        self.plot(location).and_then(|plot| plot.feature.clone())
    }

    fn terrain(&self, location: Location) -> Option<DataId> {
        self.plot(location).and_then(|plot| plot.terrain.clone())
    }

    fn resource(&self, location: Location) -> Option<DataId> {
        self.plot(location).and_then(|plot| plot.resource.clone())
    }

    fn route(&self, location: Location) -> Option<DataId> {
        self.plot(location).and_then(|plot| plot.route.clone())
    }

    fn current_age(&self) -> Option<DataId> {
        self.current_age.clone()
    }
}

impl ConstructibleRegistry for WorldSnapshot {
    fn constructible_type(&self, constructible: ConstructibleId) -> Option<&str> {
        self.constructibles
            .get(&constructible)
            .map(|c| c.constructible_type.as_str())
    }

    fn definition(&self, constructible_type: &str) -> Option<&ConstructibleDef> {
        self.constructible_types
            .iter()
            .find(|def| def.constructible_type == constructible_type)
    }

    fn warehouse_constructible_types(&self, yield_change_id: &str) -> BTreeSet<DataId> {
        self.warehouse_links
            .get(yield_change_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl RequirementRegistry for WorldSnapshot {
    fn requirement_set(&self, requirement_set_id: &str) -> Option<&RequirementSet> {
        self.requirement_sets.get(requirement_set_id)
    }

    fn is_requirement_satisfied(
        &self,
        player: PlayerId,
        subject: &Subject,
        requirement: &Requirement,
    ) -> bool {
        match &requirement.kind {
            RequirementKind::Predicate(_) => self.evaluate_predicate(player, subject, requirement),
            // References are resolved by the evaluator before reaching here.
            RequirementKind::RequirementSetIsMet => false,
        }
    }
}
