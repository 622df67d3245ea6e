use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Data IDs are the game database type names (`BUILDING_LIBRARY`, `TERRAIN_GRASS`, ...)
pub type DataId = String;

/// Component IDs address live game objects (cities, units, constructibles).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId<T> {
    pub raw: u32,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> ComponentId<T> {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }
}

// Type-safe component IDs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityTag;
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitTag;
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstructibleTag;

pub type CityId = ComponentId<CityTag>;
pub type UnitId = ComponentId<UnitTag>;
pub type ConstructibleId = ComponentId<ConstructibleTag>;

/// Player ID is a simple index
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

/// Flat map index of a plot (`y * width + x`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotIndex(pub u32);

/// Map coordinate of a plot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
