//! Constructible queries over a city's built structures.

use policy_yields_protocol::{
    Arguments, CityId, ConstructibleDef, ConstructibleId, DataId, Modifier, PlayerId, YieldType,
};
use tracing::warn;

use crate::{magnitude::MagnitudeArgs, EvalContext, EvalError, TypeTags};

pub const TAG_AGELESS: &str = "AGELESS";
pub const TAG_FULL_TILE: &str = "FULL_TILE";
pub const TAG_IGNORE_DISTRICT_PLACEMENT_CAP: &str = "IGNORE_DISTRICT_PLACEMENT_CAP";

/// A placed constructible with its type definition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityConstructible<'a> {
    pub id: ConstructibleId,
    pub definition: &'a ConstructibleDef,
}

/// How a count-based modifier selects constructibles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountArgs {
    Tag(String),
    ConstructibleType(DataId),
}

impl CountArgs {
    pub fn from_arguments(arguments: &Arguments) -> Option<Self> {
        if let Some(tag) = arguments.value("Tag") {
            return Some(CountArgs::Tag(tag.to_string()));
        }
        arguments
            .value("ConstructibleType")
            .map(|constructible_type| CountArgs::ConstructibleType(constructible_type.to_string()))
    }
}

/// Which maintenance channels a maintenance modifier touches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaintenanceChannels {
    pub gold: bool,
    pub happiness: bool,
}

impl MaintenanceChannels {
    pub fn from_arguments(arguments: &Arguments) -> Self {
        Self {
            gold: arguments.flag("Gold"),
            happiness: arguments.flag("Happiness"),
        }
    }

    pub fn includes(self, yield_type: YieldType) -> bool {
        match yield_type {
            YieldType::Gold => self.gold,
            YieldType::Happiness => self.happiness,
            _ => false,
        }
    }

    pub fn any(self) -> bool {
        self.gold || self.happiness
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaintenanceReduction {
    pub gold: f64,
    pub happiness: f64,
}

/// Every placed constructible of the city with its definition.
pub fn list_city_structures<'a>(ctx: &EvalContext<'a>, city: CityId) -> Vec<CityConstructible<'a>> {
    ctx.world
        .city_constructibles(city)
        .into_iter()
        .filter_map(|id| match ctx.definition_of(id) {
            Some(definition) => Some(CityConstructible { id, definition }),
            None => {
                warn!(?id, ?city, "constructible has no type definition");
                None
            }
        })
        .collect()
}

/// The first constructible per city whose type carries `tag`.
///
/// At most one structure is returned per city, even when several match.
pub fn structures_by_tag(ctx: &EvalContext<'_>, cities: &[CityId], tag: &str) -> Vec<ConstructibleId> {
    cities
        .iter()
        .filter_map(|city| {
            list_city_structures(ctx, *city)
                .into_iter()
                .find(|structure| {
                    ctx.tags
                        .has_tag(&structure.definition.constructible_type, tag)
                })
                .map(|structure| structure.id)
        })
        .collect()
}

pub fn count_by_tag(ctx: &EvalContext<'_>, cities: &[CityId], tag: &str) -> usize {
    structures_by_tag(ctx, cities, tag).len()
}

pub fn count_by_type(ctx: &EvalContext<'_>, cities: &[CityId], constructible_type: &str) -> usize {
    cities
        .iter()
        .flat_map(|city| ctx.world.city_constructibles(*city))
        .filter(|id| ctx.constructibles.constructible_type(*id) == Some(constructible_type))
        .count()
}

/// Count selected by the modifier's `Tag` or `ConstructibleType` argument.
pub fn count_for_modifier(ctx: &EvalContext<'_>, cities: &[CityId], modifier: &Modifier) -> usize {
    match CountArgs::from_arguments(&modifier.arguments) {
        Some(CountArgs::Tag(tag)) => count_by_tag(ctx, cities, &tag),
        Some(CountArgs::ConstructibleType(constructible_type)) => {
            count_by_type(ctx, cities, &constructible_type)
        }
        None => {
            let err = EvalError::UnhandledArguments {
                arguments: modifier.arguments.to_string(),
            };
            warn!(%err, modifier = modifier.label(), "cannot count constructibles");
            0
        }
    }
}

pub fn player_count_for_modifier(ctx: &EvalContext<'_>, player: PlayerId, modifier: &Modifier) -> usize {
    count_for_modifier(ctx, &ctx.world.cities(player), modifier)
}

/// Constructibles of the city that may receive `adjacency`.
///
/// Only the type's declared adjacencies are checked; whether the bonus is
/// realized at the actual placement is up to the caller.
pub fn list_structures_matching_adjacency(
    ctx: &EvalContext<'_>,
    city: CityId,
    adjacency: &str,
) -> Vec<ConstructibleId> {
    list_city_structures(ctx, city)
        .into_iter()
        .filter(|structure| structure.definition.has_adjacency(adjacency))
        .map(|structure| structure.id)
        .collect()
}

pub fn is_ageless(tags: &dyn TypeTags, constructible_type: &str) -> bool {
    tags.has_tag(constructible_type, TAG_AGELESS)
}

pub fn is_full_tile(tags: &dyn TypeTags, constructible_type: &str) -> bool {
    tags.has_tag(constructible_type, TAG_FULL_TILE)
}

/// Ageless types are always valid; others must belong to the current age.
pub fn is_valid_for_current_era(ctx: &EvalContext<'_>, definition: &ConstructibleDef) -> bool {
    if is_ageless(ctx.tags, &definition.constructible_type) {
        return true;
    }
    match current_age(ctx) {
        Ok(age) => definition.age.as_deref() == Some(age.as_str()),
        Err(err) => {
            warn!(%err, constructible = %definition.constructible_type, "era check failed");
            false
        }
    }
}

pub fn is_valid_for_quarter_placement(ctx: &EvalContext<'_>, definition: &ConstructibleDef) -> bool {
    if ctx
        .tags
        .has_tag(&definition.constructible_type, TAG_IGNORE_DISTRICT_PLACEMENT_CAP)
    {
        return false;
    }
    is_valid_for_current_era(ctx, definition)
}

fn current_age(ctx: &EvalContext<'_>) -> Result<DataId, EvalError> {
    ctx.world
        .current_age()
        .filter(|age| !age.is_empty())
        .ok_or(EvalError::UnknownEra(None))
}

/// Maintenance saved on one constructible type in `city` by a maintenance
/// efficiency modifier.
///
/// Channels without a `Gold`/`Happiness` flag and zero-cost yields are skipped.
/// Argument problems are logged and leave the channel at zero.
pub fn compute_maintenance_reduction(
    ctx: &EvalContext<'_>,
    city: CityId,
    definition: &ConstructibleDef,
    modifier: &Modifier,
) -> MaintenanceReduction {
    let channels = MaintenanceChannels::from_arguments(&modifier.arguments);
    let mut reduction = MaintenanceReduction::default();
    if !channels.any() {
        return reduction;
    }

    let magnitude = match MagnitudeArgs::from_arguments(&modifier.arguments) {
        Ok(magnitude) => magnitude,
        Err(err) => {
            warn!(%err, modifier = modifier.label(), "cannot compute maintenance reduction");
            return reduction;
        }
    };

    let maintenance = ctx.world.maintenance(city, &definition.constructible_type);
    for (yield_type, amount) in maintenance.iter() {
        let cost = -amount;
        if cost == 0.0 || !channels.includes(yield_type) {
            continue;
        }
        let delta = match magnitude.delta(1.0, cost) {
            Ok(delta) => delta,
            Err(err) => {
                warn!(%err, %yield_type, modifier = modifier.label(), "skipping maintenance channel");
                continue;
            }
        };
        match yield_type {
            YieldType::Gold => reduction.gold += delta,
            YieldType::Happiness => reduction.happiness += delta,
            _ => {}
        }
    }
    reduction
}
