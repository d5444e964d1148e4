#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the Dust Devil enemy director.

mod roster;
mod simulation;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dust_devil_content::{load_catalog, load_curves, load_settings};
use dust_devil_core::{Command, TypeMask, UnitTemplate, Vec3};
use dust_devil_world::{self as world, query, World};

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.toml");
const BUNDLED_CURVES: &str = include_str!("../data/curves.toml");
const BUNDLED_SETTINGS: &str = include_str!("../data/settings.toml");

/// Budgeted enemy group director.
#[derive(Debug, Parser)]
#[command(name = "dust-devil")]
struct Cli {
    /// Unit catalog file; the bundled catalog is used when omitted.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Difficulty curve file; the bundled curves are used when omitted.
    #[arg(long, global = true)]
    curves: Option<PathBuf>,
    /// Director settings file; the bundled settings are used when omitted.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Overrides the random seed from the settings file.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Overrides the global difficulty from the settings file.
    #[arg(long, global = true)]
    difficulty: Option<f32>,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Allocates attack groups and prints their rosters as JSON.
    Allocate(AllocateArgs),
    /// Runs a headless pursuit of a scripted anchor and prints a summary as JSON.
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
struct AllocateArgs {
    /// Movement types the group may use, e.g. `ground,air`. Random when omitted.
    #[arg(long, value_parser = parse_whitelist)]
    whitelist: Option<TypeMask>,
    /// Catalog rows spawned as a fixed roster instead of a random draw.
    #[arg(long = "preset")]
    presets: Vec<String>,
    /// Number of groups to allocate.
    #[arg(long, default_value_t = 1)]
    groups: u32,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    /// Movement types the group may use, e.g. `ground,air`. Random when omitted.
    #[arg(long, value_parser = parse_whitelist)]
    whitelist: Option<TypeMask>,
    /// Catalog rows spawned as a fixed roster instead of a random draw.
    #[arg(long = "preset")]
    presets: Vec<String>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Frame length in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Where the group spawns, as `x,y,z`.
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
    spawn: Vec3,
    /// Starting position of the pursued anchor, as `x,y,z`.
    #[arg(long, value_parser = parse_vec3, default_value = "800,0,0")]
    anchor: Vec3,
    /// Anchor velocity in units per second, as `x,y,z`.
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
    anchor_velocity: Vec3,
    /// Members closer than this to the anchor are removed.
    #[arg(long, default_value_t = 150.0)]
    strike_radius: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (mut world, seed) = build_world(&cli)?;

    let output = match cli.mode {
        Mode::Allocate(args) => {
            let preset = resolve_presets(&world, &args.presets)?;
            let reports = roster::allocate(
                &mut world,
                args.whitelist.unwrap_or_else(TypeMask::empty),
                &preset,
                args.groups,
            );
            serde_json::to_string_pretty(&reports)?
        }
        Mode::Simulate(args) => {
            let scenario = simulation::Scenario {
                whitelist: args.whitelist.unwrap_or_else(TypeMask::empty),
                preset: resolve_presets(&world, &args.presets)?,
                frames: args.frames,
                frame: Duration::from_millis(args.frame_ms),
                spawn_location: args.spawn,
                anchor: args.anchor,
                anchor_velocity: args.anchor_velocity,
                strike_radius: args.strike_radius,
                seed,
            };
            let report = simulation::run(&mut world, &scenario);
            serde_json::to_string_pretty(&report)?
        }
    };
    println!("{output}");
    Ok(())
}

fn build_world(cli: &Cli) -> Result<(World, u64)> {
    let catalog = load_catalog(&read_or_bundled(cli.catalog.as_deref(), BUNDLED_CATALOG)?)
        .context("invalid unit catalog")?;
    let curves = load_curves(&read_or_bundled(cli.curves.as_deref(), BUNDLED_CURVES)?)
        .context("invalid difficulty curves")?;
    let mut config = load_settings(&read_or_bundled(
        cli.settings.as_deref(),
        BUNDLED_SETTINGS,
    )?)
    .context("invalid director settings")?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    let seed = config.seed;

    tracing::info!(
        templates = catalog.len(),
        seed,
        difficulty = config.global_difficulty,
        "director content loaded"
    );
    let mut world = World::new(config, catalog, curves);
    if let Some(difficulty) = cli.difficulty {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SetGlobalDifficulty { difficulty },
            &mut events,
        );
        anyhow::ensure!(!events.is_empty(), "invalid difficulty override {difficulty}");
    }
    Ok((world, seed))
}

fn read_or_bundled(path: Option<&Path>, bundled: &str) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => Ok(bundled.to_owned()),
    }
}

fn resolve_presets(world: &World, names: &[String]) -> Result<Vec<UnitTemplate>> {
    names
        .iter()
        .map(|name| {
            query::template_by_name(world, name)
                .cloned()
                .with_context(|| format!("unknown preset template `{name}`"))
        })
        .collect()
}

fn parse_whitelist(value: &str) -> Result<TypeMask, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|flag| !flag.is_empty())
        .try_fold(TypeMask::empty(), |mask, flag| {
            let bit = match flag.to_ascii_lowercase().as_str() {
                "ground" => TypeMask::GROUND,
                "air" => TypeMask::AIR,
                "burrow" => TypeMask::BURROW,
                other => return Err(format!("unknown movement type `{other}`")),
            };
            Ok(mask | bit)
        })
}

fn parse_vec3(value: &str) -> Result<Vec3, String> {
    let components = value
        .split(',')
        .map(|component| component.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| format!("invalid coordinate in `{value}`: {error}"))?;
    match components.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected `x,y,z`, got `{value}`")),
    }
}
