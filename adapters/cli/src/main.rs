#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Bastion experience.

mod config;
mod simulation;
mod store;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use bastion_core::{Difficulty, PointerTarget, SessionPhase, BASE_POSITION, PLAYER_START};
use bastion_rendering::{palette, Presentation, RenderingBackend, Scene};
use bastion_rendering_macroquad::MacroquadBackend;
use bastion_system_player::PlayerInput;
use bastion_world::query;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use self::{
    config::{FileConfig, Overrides, Settings},
    simulation::Simulation,
    store::JsonFileStore,
};

/// Fixed frame step used by the headless loop.
const HEADLESS_FRAME: Duration = Duration::from_millis(16);

/// Frames between two automatic shots in headless mode.
const HEADLESS_FIRE_EVERY: u32 = 30;

/// Top-down tower-defence arena: hold the base against waves of hostiles.
#[derive(Debug, Parser)]
#[command(name = "bastion", version, about)]
struct CliArgs {
    /// Difficulty of the first session (easy, medium or hard).
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,
    /// Seed for the spawn generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON file holding the high-score table.
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Runs a scripted session without opening a window.
    #[arg(long)]
    headless: bool,
    /// Frames simulated in headless mode.
    #[arg(long, default_value_t = 3_600)]
    frames: u32,
    /// Synchronises presentation with the display refresh rate.
    #[arg(long)]
    vsync: Option<bool>,
    /// Logs the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    Difficulty::from_name(value)
        .ok_or_else(|| format!("unknown difficulty `{value}`, expected easy, medium or hard"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Entry point for the Bastion command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let file = match &args.config {
        Some(path) => FileConfig::load(path).context("failed to load configuration")?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(
        Overrides {
            difficulty: args.difficulty,
            seed: args.seed,
            scores: args.scores.clone(),
            vsync: args.vsync,
            show_fps: args.show_fps,
        },
        file,
    );

    let store = JsonFileStore::new(settings.scores.clone());
    info!(
        difficulty = settings.difficulty.name(),
        seed = settings.seed,
        scores = %store.path().display(),
        "starting"
    );
    let simulation = Simulation::new(settings.difficulty, settings.seed, Box::new(store));
    info!("{}", query::welcome_banner(simulation.world()));

    if args.headless {
        run_headless(simulation, args.frames);
        return Ok(());
    }

    run_windowed(simulation, &settings)
}

fn run_windowed(mut simulation: Simulation, settings: &Settings) -> Result<()> {
    let mut scene = Scene::new(PLAYER_START);
    simulation.populate_scene(&mut scene);
    let presentation = Presentation::new("Bastion", palette::BACKGROUND, scene);

    MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_show_fps(settings.show_fps)
        .run(presentation, move |dt, input, scene| {
            simulation.frame(dt, input);
            simulation.populate_scene(scene);
        })
}

/// Plays one session with a scripted defender that periodically shoots the
/// hostile closest to the base.
fn run_headless(mut simulation: Simulation, frames: u32) {
    simulation.step(
        HEADLESS_FRAME,
        PlayerInput {
            start: true,
            ..PlayerInput::default()
        },
    );

    for frame in 1..frames {
        if query::phase(simulation.world()) != SessionPhase::Running {
            break;
        }
        let mut input = PlayerInput::default();
        if frame % HEADLESS_FIRE_EVERY == 0 {
            input.click = closest_hostile(&simulation);
        }
        simulation.step(HEADLESS_FRAME, input);
    }

    let world = simulation.world();
    let phase = query::phase(world);
    if phase == SessionPhase::Over {
        warn!(score = query::score(world), "base destroyed");
    }
    info!(
        ?phase,
        score = query::score(world),
        base_health = query::base_health(world),
        hostiles = query::hostile_view(world).len(),
        high_scores = ?simulation.high_scores().scores(),
        "headless run finished"
    );
}

fn closest_hostile(simulation: &Simulation) -> Option<PointerTarget> {
    let view = query::hostile_view(simulation.world());
    view.iter()
        .min_by(|left, right| {
            let left = left.position.distance(BASE_POSITION);
            let right = right.position.distance(BASE_POSITION);
            left.total_cmp(&right)
        })
        .map(|snapshot| PointerTarget {
            ground: Some(snapshot.position),
            hostile: Some(snapshot.id),
        })
}
