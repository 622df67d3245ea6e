//! Warehouse yield changes: a per-match yield over a city's built plots.

use policy_yields_protocol::{CityId, ConstructibleId, Location, WarehouseCondition, YieldChangeRule};
use tracing::{debug, warn};

use crate::{count_by_type, list_city_structures, EvalContext};

/// Yield granted to `city` by `rule`.
///
/// Plot conditions only look at purchased plots carrying a visible
/// constructible. The constructible condition counts the city's structures
/// of that type instead.
pub fn compute_warehouse_yield(ctx: &EvalContext<'_>, city: CityId, rule: &YieldChangeRule) -> f64 {
    let Some(condition) = rule.condition() else {
        warn!(rule = %rule.id, "warehouse rule has no implemented condition");
        return 0.0;
    };

    let built: Vec<Location> = ctx
        .built_plots(city)
        .into_iter()
        .map(|(_, location)| location)
        .collect();
    let world = ctx.world;
    let count_plots = |matches: &dyn Fn(Location) -> bool| {
        built.iter().filter(|location| matches(**location)).count()
    };

    let count = match condition {
        WarehouseCondition::Lake => count_plots(&|l| world.is_lake(l)),
        WarehouseCondition::MinorRiver => {
            count_plots(&|l| world.is_river(l) && !world.is_navigable_river(l))
        }
        WarehouseCondition::NavigableRiver => count_plots(&|l| world.is_navigable_river(l)),
        WarehouseCondition::Biome(biome) => {
            count_plots(&|l| world.biome(l).as_deref() == Some(biome))
        }
        WarehouseCondition::ConstructibleCount(constructible_type) => {
            count_by_type(ctx, &[city], constructible_type)
        }
        WarehouseCondition::Feature(feature) => count_plots(&|l| {
            world
                .feature(l)
                .is_some_and(|f| f.feature_type == feature)
        }),
        WarehouseCondition::FeatureClass(class) => count_plots(&|l| {
            world
                .feature(l)
                .is_some_and(|f| f.feature_class.as_deref() == Some(class))
        }),
        WarehouseCondition::NaturalWonder => count_plots(&|l| world.is_natural_wonder(l)),
        WarehouseCondition::Resource => count_plots(&|l| world.resource(l).is_some()),
        WarehouseCondition::Route => count_plots(&|l| world.route(l).is_some()),
        WarehouseCondition::Terrain(terrain) => {
            count_plots(&|l| world.terrain(l).as_deref() == Some(terrain))
        }
        WarehouseCondition::TerrainTag(tag) => count_plots(&|l| {
            world
                .terrain(l)
                .is_some_and(|terrain| ctx.tags.has_tag(&terrain, tag))
        }),
        WarehouseCondition::Overbuilt | WarehouseCondition::District(_) => {
            debug!(rule = %rule.id, ?condition, "condition has no yield computation");
            0
        }
    };

    count as f64 * rule.yield_change
}

/// Structures of `city` whose type is linked to the rule's id.
pub fn list_structures_matching_warehouse_rule(
    ctx: &EvalContext<'_>,
    city: CityId,
    rule: &YieldChangeRule,
) -> Vec<ConstructibleId> {
    let types = ctx.constructibles.warehouse_constructible_types(&rule.id);
    if types.is_empty() {
        return Vec::new();
    }
    list_city_structures(ctx, city)
        .into_iter()
        .filter(|structure| types.contains(&structure.definition.constructible_type))
        .map(|structure| structure.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use policy_yields_protocol::PlotFeature;

    use super::*;
    use crate::snapshot::{ConstructibleSnapshot, PlotSnapshot};
    use crate::testing::fixture_world;

    fn capital() -> CityId {
        CityId::new(1)
    }

    fn town() -> CityId {
        CityId::new(2)
    }

    fn rule(id: &str, yield_change: f64) -> YieldChangeRule {
        YieldChangeRule {
            id: id.to_string(),
            yield_change,
            ..Default::default()
        }
    }

    #[test]
    fn lakes_count_only_built_plots() {
        let world = fixture_world();
        let ctx = world.context();
        let lakes = YieldChangeRule {
            lake_in_city: true,
            ..rule("FoodLakes", 2.0)
        };

        // the capital also owns an empty lake at (0,0)
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &lakes), 2.0);
        assert_eq!(compute_warehouse_yield(&ctx, town(), &lakes), 2.0);
    }

    #[test]
    fn three_built_lakes_yield_six() {
        let mut world = fixture_world();
        let extra = [Location::new(0, 0), Location::new(2, 2)];
        world.map.plots.push(PlotSnapshot {
            location: Location::new(2, 2),
            lake: true,
            ..Default::default()
        });
        if let Some(city) = world.cities.get_mut(&capital()) {
            city.purchased_plots.push(Location::new(2, 2));
        }
        for (raw, location) in (200..).zip(extra) {
            world.constructibles.insert(
                ConstructibleId::new(raw),
                ConstructibleSnapshot {
                    constructible_type: "IMPROVEMENT_FISHING_BOAT".into(),
                    location,
                    city: Some(capital()),
                    hidden: false,
                },
            );
        }
        let ctx = world.context();
        let lakes = YieldChangeRule {
            lake_in_city: true,
            ..rule("FoodLakes", 2.0)
        };

        assert_eq!(compute_warehouse_yield(&ctx, capital(), &lakes), 6.0);
    }

    #[test]
    fn river_kinds_are_distinct() {
        let world = fixture_world();
        let ctx = world.context();
        let navigable = YieldChangeRule {
            navigable_river_in_city: true,
            ..rule("GoldNavigableRivers", 1.0)
        };
        let minor = YieldChangeRule {
            minor_river_in_city: true,
            ..rule("GoldMinorRivers", 1.0)
        };

        assert_eq!(compute_warehouse_yield(&ctx, capital(), &navigable), 1.0);
        assert_eq!(compute_warehouse_yield(&ctx, town(), &navigable), 0.0);
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &minor), 0.0);
        assert_eq!(compute_warehouse_yield(&ctx, town(), &minor), 1.0);
    }

    #[test]
    fn constructible_condition_counts_structures() {
        let world = fixture_world();
        let ctx = world.context();
        let libraries = YieldChangeRule {
            constructible_in_city: Some("BUILDING_LIBRARY".into()),
            ..rule("ScienceLibraries", 1.5)
        };
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &libraries), 1.5);
    }

    #[test]
    fn plot_attribute_conditions() {
        let world = fixture_world();
        let ctx = world.context();

        let grassland = YieldChangeRule {
            biome_in_city: Some("BIOME_GRASSLAND".into()),
            ..rule("Biome", 1.0)
        };
        let roads = YieldChangeRule {
            route_in_city: true,
            ..rule("Routes", 1.0)
        };
        let resources = YieldChangeRule {
            resource_in_city: true,
            ..rule("Resources", 1.0)
        };
        let open = YieldChangeRule {
            terrain_tag_in_city: Some("OPEN".into()),
            ..rule("OpenTerrain", 3.0)
        };
        let rough = YieldChangeRule {
            terrain_tag_in_city: Some("ROUGH".into()),
            ..rule("RoughTerrain", 3.0)
        };
        let coast = YieldChangeRule {
            terrain_in_city: Some("TERRAIN_COAST".into()),
            ..rule("Coast", 1.0)
        };

        assert_eq!(compute_warehouse_yield(&ctx, capital(), &grassland), 1.0);
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &roads), 1.0);
        // the iron hill has nothing built on it
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &resources), 0.0);
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &rough), 0.0);
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &open), 3.0);
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &coast), 1.0);
    }

    #[test]
    fn feature_conditions_match_type_and_class() {
        let mut world = fixture_world();
        if let Some(plot) = world
            .map
            .plots
            .iter_mut()
            .find(|plot| plot.location == Location::new(1, 1))
        {
            plot.feature = Some(PlotFeature {
                feature_type: "FEATURE_FOREST".into(),
                feature_class: Some("FEATURE_CLASS_VEGETATED".into()),
            });
        }
        let ctx = world.context();

        let forest = YieldChangeRule {
            feature_in_city: Some("FEATURE_FOREST".into()),
            ..rule("Forests", 1.0)
        };
        let vegetated = YieldChangeRule {
            feature_class_in_city: Some("FEATURE_CLASS_VEGETATED".into()),
            ..rule("Vegetated", 2.0)
        };
        let wonders = YieldChangeRule {
            natural_wonder_in_city: true,
            ..rule("Wonders", 1.0)
        };

        assert_eq!(compute_warehouse_yield(&ctx, capital(), &forest), 1.0);
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &vegetated), 2.0);
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &wonders), 0.0);
    }

    #[test]
    fn unimplemented_conditions_yield_nothing() {
        let world = fixture_world();
        let ctx = world.context();

        let overbuilt = YieldChangeRule {
            overbuilt: true,
            ..rule("Overbuilt", 5.0)
        };
        let district = YieldChangeRule {
            district_in_city: Some("DISTRICT_URBAN".into()),
            ..rule("District", 5.0)
        };

        assert_eq!(compute_warehouse_yield(&ctx, capital(), &overbuilt), 0.0);
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &district), 0.0);
        assert_eq!(compute_warehouse_yield(&ctx, capital(), &rule("Empty", 5.0)), 0.0);
    }

    #[test]
    fn structures_are_filtered_by_linked_types() {
        let world = fixture_world();
        let ctx = world.context();

        assert_eq!(
            list_structures_matching_warehouse_rule(&ctx, capital(), &rule("GoldNavigableRivers", 1.0)),
            vec![
                ConstructibleId::new(100),
                ConstructibleId::new(101),
                ConstructibleId::new(102)
            ]
        );
        assert_eq!(
            list_structures_matching_warehouse_rule(&ctx, capital(), &rule("FoodLakes", 2.0)),
            vec![ConstructibleId::new(103)]
        );
        assert!(list_structures_matching_warehouse_rule(&ctx, town(), &rule("FoodLakes", 2.0)).is_empty());
        assert!(list_structures_matching_warehouse_rule(&ctx, capital(), &rule("Unlinked", 1.0)).is_empty());
    }
}
