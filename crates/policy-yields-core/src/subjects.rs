//! Candidate subjects per collection type.
//!
//! Resolution may overselect; requirement evaluation narrows the set.

use policy_yields_protocol::{CityId, CollectionType, PlayerId, Subject, UnitId};
use tracing::{debug, error, warn};

use crate::{EvalContext, EvalError};

/// Unfiltered subjects for `collection`, seen from `player`.
///
/// Never fails: unknown or unsupported collections and a missing parent
/// resolve to an empty list and are logged.
pub fn resolve_base_subjects(
    ctx: &EvalContext<'_>,
    player: PlayerId,
    collection: &CollectionType,
    parent: Option<&Subject>,
) -> Vec<Subject> {
    let subjects = match collection {
        CollectionType::PlayerCapitalCity => {
            let capital = ctx.world.capital(player);
            city_subjects(ctx, capital.into_iter())
        }

        // Other players' cities never receive our effects, so "all" is ours.
        CollectionType::PlayerCities | CollectionType::AllCities => {
            city_subjects(ctx, ctx.world.cities(player).into_iter())
        }

        CollectionType::PlayerPlotYields => player_plot_subjects(ctx, player),

        CollectionType::Owner => vec![Subject::Player { player }],

        CollectionType::CityPlotYields => match parent {
            Some(Subject::City { city, .. }) => {
                let city = *city;
                ctx.world
                    .purchased_plots(city)
                    .into_iter()
                    .map(|plot| Subject::Plot { city, plot })
                    .collect()
            }
            _ => {
                let err = EvalError::MissingParentSubject(collection.clone());
                error!(%err, ?parent, "cannot resolve nested collection");
                Vec::new()
            }
        },

        CollectionType::AllUnits | CollectionType::PlayerUnits => {
            unit_subjects(ctx, player, ctx.world.units(player).into_iter())
        }

        CollectionType::UnitCombat => {
            let combat = ctx
                .world
                .units(player)
                .into_iter()
                .filter(|unit| ctx.world.unit_is_combat(*unit));
            unit_subjects(ctx, player, combat)
        }

        CollectionType::UnitOccupiedCity => {
            warn!(collection = %collection, "collection not implemented");
            Vec::new()
        }

        // Recognized, but they carry no yields worth previewing.
        CollectionType::CitiesFollowingOwnerReligion | CollectionType::PlayerCombat => Vec::new(),

        CollectionType::Other(raw) => {
            let err = EvalError::UnknownCollectionType(raw.clone());
            warn!(%err, "unhandled collection type");
            Vec::new()
        }
    };

    debug!(collection = %collection, count = subjects.len(), "resolved base subjects");
    subjects
}

fn city_subjects(ctx: &EvalContext<'_>, cities: impl Iterator<Item = CityId>) -> Vec<Subject> {
    cities
        .filter_map(|city| {
            let Some(location) = ctx.world.city_location(city) else {
                warn!(?city, "city has no location, skipping subject");
                return None;
            };
            let Some(owner) = ctx.world.city_owner(city) else {
                warn!(?city, "city has no owner, skipping subject");
                return None;
            };
            Some(Subject::City {
                city,
                owner,
                plot: ctx.world.plot_index(location),
            })
        })
        .collect()
}

fn unit_subjects(
    ctx: &EvalContext<'_>,
    owner: PlayerId,
    units: impl Iterator<Item = UnitId>,
) -> Vec<Subject> {
    units
        .filter_map(|unit| {
            let Some(location) = ctx.world.unit_location(unit) else {
                warn!(?unit, "unit has no location, skipping subject");
                return None;
            };
            Some(Subject::Unit {
                unit,
                owner,
                plot: ctx.world.plot_index(location),
            })
        })
        .collect()
}

/// Every purchased plot of every city, followed by the built ones a second
/// time. Plot-yield modifiers in the game data count both passes.
fn player_plot_subjects(ctx: &EvalContext<'_>, player: PlayerId) -> Vec<Subject> {
    let mut subjects = Vec::new();
    for city in ctx.world.cities(player) {
        subjects.extend(
            ctx.world
                .purchased_plots(city)
                .into_iter()
                .map(|plot| Subject::Plot { city, plot }),
        );
        subjects.extend(
            ctx.built_plots(city)
                .into_iter()
                .map(|(plot, _)| Subject::Plot { city, plot }),
        );
    }
    subjects
}
