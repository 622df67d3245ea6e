//! Collaborator contracts and the evaluation context.
//!
//! The engine never reaches for global game state. Everything it reads about
//! the world comes through these traits, bundled into an [`EvalContext`] that
//! callers pass to every entry point.

use std::collections::BTreeSet;

use policy_yields_protocol::{
    CityId, ConstructibleDef, ConstructibleId, DataId, Location, Maintenance, PlayerId,
    PlotFeature, PlotIndex, Requirement, RequirementSet, Subject, UnitId,
};

use crate::config::EvalOptions;

/// Read-only view of live world state.
pub trait WorldDataProvider {
    // Players
    fn capital(&self, player: PlayerId) -> Option<CityId>;
    fn cities(&self, player: PlayerId) -> Vec<CityId>;
    fn units(&self, player: PlayerId) -> Vec<UnitId>;

    // Cities
    fn city_owner(&self, city: CityId) -> Option<PlayerId>;
    fn city_location(&self, city: CityId) -> Option<Location>;
    fn purchased_plots(&self, city: CityId) -> Vec<PlotIndex>;
    /// Every constructible the city owns, hidden ones included.
    fn city_constructibles(&self, city: CityId) -> Vec<ConstructibleId>;
    /// Per-yield maintenance of a constructible type in this city.
    fn maintenance(&self, city: CityId, constructible_type: &str) -> Maintenance;

    // Units
    fn unit_location(&self, unit: UnitId) -> Option<Location>;
    fn unit_is_combat(&self, unit: UnitId) -> bool;

    // Map
    fn plot_index(&self, location: Location) -> PlotIndex;
    fn plot_location(&self, plot: PlotIndex) -> Location;
    /// Constructibles on the plot, hidden ones filtered out.
    fn visible_constructibles(&self, location: Location) -> Vec<ConstructibleId>;
    fn is_lake(&self, location: Location) -> bool;
    fn is_river(&self, location: Location) -> bool;
    fn is_navigable_river(&self, location: Location) -> bool;
    fn is_natural_wonder(&self, location: Location) -> bool;
    fn biome(&self, location: Location) -> Option<DataId>;
    fn feature(&self, location: Location) -> Option<PlotFeature>;
    fn terrain(&self, location: Location) -> Option<DataId>;
    fn resource(&self, location: Location) -> Option<DataId>;
    fn route(&self, location: Location) -> Option<DataId>;

    // Game
    fn current_age(&self) -> Option<DataId>;
}

/// Constructible instances and type definitions.
pub trait ConstructibleRegistry {
    fn constructible_type(&self, constructible: ConstructibleId) -> Option<&str>;
    fn definition(&self, constructible_type: &str) -> Option<&ConstructibleDef>;
    /// Constructible types linked to a warehouse yield change id.
    fn warehouse_constructible_types(&self, yield_change_id: &str) -> BTreeSet<DataId>;
}

/// Tag lookup for type ids (constructibles, terrains, ...).
pub trait TypeTags {
    fn has_tag(&self, type_id: &str, tag: &str) -> bool;
}

/// Unresolved-reference lookup and the host's single-requirement predicate.
pub trait RequirementRegistry {
    fn requirement_set(&self, requirement_set_id: &str) -> Option<&RequirementSet>;
    fn is_requirement_satisfied(
        &self,
        player: PlayerId,
        subject: &Subject,
        requirement: &Requirement,
    ) -> bool;
}

/// Everything an evaluation pass reads. Cheap to copy.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub world: &'a dyn WorldDataProvider,
    pub constructibles: &'a dyn ConstructibleRegistry,
    pub tags: &'a dyn TypeTags,
    pub requirements: &'a dyn RequirementRegistry,
    pub options: EvalOptions,
}

impl<'a> EvalContext<'a> {
    pub fn new(
        world: &'a dyn WorldDataProvider,
        constructibles: &'a dyn ConstructibleRegistry,
        tags: &'a dyn TypeTags,
        requirements: &'a dyn RequirementRegistry,
    ) -> Self {
        Self {
            world,
            constructibles,
            tags,
            requirements,
            options: EvalOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    /// Type definition of a placed constructible.
    pub fn definition_of(&self, constructible: ConstructibleId) -> Option<&'a ConstructibleDef> {
        let constructibles = self.constructibles;
        constructibles
            .constructible_type(constructible)
            .and_then(|constructible_type| constructibles.definition(constructible_type))
    }

    /// Purchased plots of a city that carry at least one visible constructible.
    pub fn built_plots(&self, city: CityId) -> Vec<(PlotIndex, Location)> {
        self.world
            .purchased_plots(city)
            .into_iter()
            .map(|plot| (plot, self.world.plot_location(plot)))
            .filter(|(_, location)| !self.world.visible_constructibles(*location).is_empty())
            .collect()
    }
}
