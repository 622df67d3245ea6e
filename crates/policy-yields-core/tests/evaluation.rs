//! End-to-end evaluation over the fixture world snapshot.

use policy_yields_core::{
    compute_delta, compute_maintenance_reduction, compute_warehouse_yield, list_city_structures,
    player_count_for_modifier, resolve_subjects_with_requirements, EvalError, EvalOptions,
    MaintenanceReduction, WorldSnapshot,
};
use policy_yields_protocol::{CityId, Modifier, PlayerId, Requirement, RequirementSet, Subject};

const PLAYER: PlayerId = PlayerId(0);

fn world() -> WorldSnapshot {
    WorldSnapshot::load(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/world.yaml")).unwrap()
}

fn modifier<'a>(world: &'a WorldSnapshot, id: &str) -> &'a Modifier {
    world
        .modifiers
        .iter()
        .find(|m| m.modifier_id.as_deref() == Some(id))
        .unwrap()
}

#[test]
fn capital_modifier_reaches_only_the_capital() {
    let world = world();
    let ctx = world.context();

    let subjects =
        resolve_subjects_with_requirements(&ctx, PLAYER, modifier(&world, "MOD_CAPITAL_SCIENCE"), None)
            .unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].city(), Some(CityId::new(1)));
}

#[test]
fn inverted_set_reference_excludes_the_capital() {
    let world = world();
    let ctx = world.context();

    let subjects = resolve_subjects_with_requirements(
        &ctx,
        PLAYER,
        modifier(&world, "MOD_NON_CAPITAL_CULTURE"),
        None,
    )
    .unwrap();
    let cities: Vec<_> = subjects.iter().filter_map(Subject::city).collect();
    assert_eq!(cities, vec![CityId::new(2)]);
}

#[test]
fn lake_plot_modifier_counts_built_plots_twice() {
    let world = world();
    let ctx = world.context();

    // capital: two purchased lakes, one of them built; town: one built lake
    let subjects =
        resolve_subjects_with_requirements(&ctx, PLAYER, modifier(&world, "MOD_LAKE_FOOD"), None)
            .unwrap();
    assert_eq!(subjects.len(), 5);
    assert!(subjects.iter().all(|s| matches!(s, Subject::Plot { .. })));
}

#[test]
fn combat_modifier_reaches_combat_units() {
    let world = world();
    let ctx = world.context();

    let subjects = resolve_subjects_with_requirements(
        &ctx,
        PLAYER,
        modifier(&world, "MOD_COMBAT_STRENGTH"),
        None,
    )
    .unwrap();
    assert_eq!(subjects.len(), 1);
    assert!(matches!(subjects[0], Subject::Unit { owner: PLAYER, .. }));
}

#[test]
fn maintenance_reduction_sums_over_city_structures() {
    let world = world();
    let ctx = world.context();
    let upkeep = modifier(&world, "MOD_BUILDING_UPKEEP");
    let capital = CityId::new(1);

    let total = list_city_structures(&ctx, capital)
        .into_iter()
        .map(|s| compute_maintenance_reduction(&ctx, capital, s.definition, upkeep))
        .fold(MaintenanceReduction::default(), |acc, r| MaintenanceReduction {
            gold: acc.gold + r.gold,
            happiness: acc.happiness + r.happiness,
        });

    // library 2 gold + 1 happiness, granary 1 gold, both halved
    assert_eq!(total, MaintenanceReduction { gold: -1.5, happiness: -0.5 });
}

#[test]
fn per_tag_modifier_counts_one_structure_per_city() {
    let world = world();
    let ctx = world.context();
    let per_tier = modifier(&world, "MOD_GOLD_PER_TIER_BUILDING");

    let count = player_count_for_modifier(&ctx, PLAYER, per_tier);
    assert_eq!(count, 2);
    assert_eq!(compute_delta(&per_tier.arguments, count as f64, 0.0), Ok(6.0));
}

#[test]
fn warehouse_rules_from_the_snapshot() {
    let world = world();
    let ctx = world.context();
    let yields = |city: u32| -> Vec<(String, f64)> {
        world
            .warehouse_yield_changes
            .iter()
            .map(|rule| (rule.id.clone(), compute_warehouse_yield(&ctx, CityId::new(city), rule)))
            .collect()
    };

    assert_eq!(
        yields(1),
        vec![
            ("FoodLakes".to_string(), 2.0),
            ("GoldNavigableRivers".to_string(), 1.0),
            ("ScienceLibraries".to_string(), 1.5),
            ("ProductionRough".to_string(), 0.0),
            ("HappinessOverbuilt".to_string(), 0.0),
        ]
    );
    assert_eq!(
        yields(2),
        vec![
            ("FoodLakes".to_string(), 2.0),
            ("GoldNavigableRivers".to_string(), 0.0),
            ("ScienceLibraries".to_string(), 1.5),
            ("ProductionRough".to_string(), 0.0),
            ("HappinessOverbuilt".to_string(), 0.0),
        ]
    );
}

#[test]
fn cyclic_requirement_sets_fail_instead_of_recursing() {
    let world = world();
    let ctx = world.context();
    let looping = Modifier::new("COLLECTION_PLAYER_CITIES", "EFFECT_CITY_ADJUST_YIELD")
        .with_subject_requirements(RequirementSet::all(vec![Requirement::set_reference(
            "REQSET_LOOP_A",
        )]));

    let result = resolve_subjects_with_requirements(&ctx, PLAYER, &looping, None);
    assert!(matches!(
        result,
        Err(EvalError::RequirementDepthExceeded { max_depth: 32, .. })
    ));
}

#[test]
fn depth_limit_comes_from_options() {
    let world = world();
    let ctx = world.context().with_options(EvalOptions {
        max_requirement_depth: 0,
    });

    let result = resolve_subjects_with_requirements(
        &ctx,
        PLAYER,
        modifier(&world, "MOD_NON_CAPITAL_CULTURE"),
        None,
    );
    assert_eq!(
        result,
        Err(EvalError::RequirementDepthExceeded {
            set_id: "REQSET_CAPITAL".to_string(),
            max_depth: 0,
        })
    );
}
