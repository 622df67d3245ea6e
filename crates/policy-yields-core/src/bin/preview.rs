//! Policy yield preview.
//!
//! Loads a world snapshot and prints, for one player, which subjects each
//! modifier reaches and what the warehouse rules yield per city.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use policy_yields_core::{
    compute_delta, compute_maintenance_reduction, compute_warehouse_yield, list_city_structures,
    list_structures_matching_warehouse_rule, player_count_for_modifier,
    resolve_subjects_with_requirements, CountArgs, EvalContext, MaintenanceChannels,
    MaintenanceReduction, PreviewConfig, WorldDataProvider, WorldSnapshot,
};
use policy_yields_protocol::{CityId, Modifier, PlayerId};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "policy-yields-preview")]
#[command(about = "Preview modifier subjects and warehouse yields", version)]
struct Cli {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// World snapshot, overrides the config
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Player to evaluate for
    #[arg(short, long)]
    player: Option<u8>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Subjects and magnitudes per modifier
    Modifiers,
    /// Warehouse yields per city
    Warehouse,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PreviewConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PreviewConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    fmt().with_env_filter(filter).with_target(false).init();

    let snapshot_path = cli.snapshot.clone().unwrap_or_else(|| config.snapshot.clone());
    let world = WorldSnapshot::load(&snapshot_path)
        .with_context(|| format!("loading snapshot {}", snapshot_path.display()))?;
    let player = cli
        .player
        .map(PlayerId)
        .or(config.player)
        .unwrap_or(world.local_player);

    info!(
        snapshot = %snapshot_path.display(),
        player = player.0,
        modifiers = world.modifiers.len(),
        rules = world.warehouse_yield_changes.len(),
        "loaded world"
    );

    let ctx = world.context().with_options(config.eval);
    match cli.command {
        Some(Commands::Modifiers) => preview_modifiers(&ctx, &world, player),
        Some(Commands::Warehouse) => preview_warehouse(&ctx, &world, player),
        None => {
            preview_modifiers(&ctx, &world, player);
            println!();
            preview_warehouse(&ctx, &world, player);
        }
    }
    Ok(())
}

fn preview_modifiers(ctx: &EvalContext<'_>, world: &WorldSnapshot, player: PlayerId) {
    println!("Modifiers (player {})", player.0);
    for modifier in &world.modifiers {
        let subjects = match resolve_subjects_with_requirements(ctx, player, modifier, None) {
            Ok(subjects) => subjects,
            Err(err) => {
                error!(%err, modifier = modifier.label(), "subject resolution failed");
                println!("  {:<32} error: {err}", modifier.label());
                continue;
            }
        };
        println!(
            "  {:<32} {} -> {} subject(s)",
            modifier.label(),
            modifier.collection_type,
            subjects.len()
        );

        if MaintenanceChannels::from_arguments(&modifier.arguments).any() {
            for subject in &subjects {
                if let Some(city) = subject.city() {
                    let reduction = city_maintenance_reduction(ctx, city, modifier);
                    println!(
                        "      city {:<4} gold {:+.2}  happiness {:+.2}",
                        city.raw, reduction.gold, reduction.happiness
                    );
                }
            }
        } else if CountArgs::from_arguments(&modifier.arguments).is_some() {
            let count = player_count_for_modifier(ctx, player, modifier);
            match compute_delta(&modifier.arguments, count as f64, 0.0) {
                Ok(delta) => println!("      {count} counted -> {delta:+.2}"),
                Err(err) => println!("      {count} counted, no magnitude: {err}"),
            }
        } else if let Ok(per_subject) = compute_delta(&modifier.arguments, 1.0, 0.0) {
            println!("      {per_subject:+.2} each");
        }
    }
}

fn city_maintenance_reduction(
    ctx: &EvalContext<'_>,
    city: CityId,
    modifier: &Modifier,
) -> MaintenanceReduction {
    list_city_structures(ctx, city)
        .into_iter()
        .map(|structure| compute_maintenance_reduction(ctx, city, structure.definition, modifier))
        .fold(MaintenanceReduction::default(), |total, r| MaintenanceReduction {
            gold: total.gold + r.gold,
            happiness: total.happiness + r.happiness,
        })
}

fn preview_warehouse(ctx: &EvalContext<'_>, world: &WorldSnapshot, player: PlayerId) {
    println!("Warehouse yields (player {})", player.0);
    for city in ctx.world.cities(player) {
        let name = world
            .cities
            .get(&city)
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        println!("  city {} {name}", city.raw);
        for rule in &world.warehouse_yield_changes {
            let amount = compute_warehouse_yield(ctx, city, rule);
            let structures = list_structures_matching_warehouse_rule(ctx, city, rule);
            println!(
                "      {:<24} {:<16} {amount:+.2}  ({} linked structure(s))",
                rule.id,
                rule.yield_type.as_deref().unwrap_or("-"),
                structures.len()
            );
        }
    }
}
