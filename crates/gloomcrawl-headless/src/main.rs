//! Headless scenario runner.
//!
//! Loads a JSON scenario (config, grid, spawns and a scripted input
//! sequence), plays it through the simulation core, and prints a line per
//! eventful frame or, with `--json`, every frame as JSON.
//!
//! ```text
//! gloomcrawl-headless scenarios/crypt.json --frames 600 --seed 7
//! RUST_LOG=gloomcrawl_core=debug gloomcrawl-headless scenarios/crypt.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use gloomcrawl_core::{EnemySpawn, FrameResult, Intent, SimConfig, Simulation, TileGrid};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the scenario JSON file
    scenario: PathBuf,

    /// Stop after this many frames (default: the script's length)
    #[arg(short, long)]
    frames: Option<u64>,

    /// Override the config's random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print every frame as a JSON line
    #[arg(long)]
    json: bool,
}

/// A scenario file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Scenario {
    #[serde(default)]
    config: SimConfig,
    /// Tile codes, one row per line of the map; 0 is floor.
    grid: Vec<Vec<u16>>,
    player_spawn: Vec2,
    #[serde(default)]
    enemies: Vec<EnemySpawn>,
    #[serde(default)]
    script: Vec<Segment>,
}

/// `frames` consecutive steps with the same input.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct Segment {
    frames: u64,
    #[serde(default = "default_elapsed_ms")]
    elapsed_ms: f32,
    #[serde(default)]
    intent: Intent,
}

fn default_elapsed_ms() -> f32 {
    1000.0 / 60.0
}

impl Scenario {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scenario: {}", path.display()))
    }

    /// Expands the script into one `(elapsed_ms, intent)` pair per frame.
    /// Frames past the script's end replay an idle frame.
    fn inputs(&self) -> impl Iterator<Item = (f32, Intent)> + '_ {
        self.script
            .iter()
            .flat_map(|s| (0..s.frames).map(move |_| (s.elapsed_ms, s.intent)))
            .chain(std::iter::repeat((default_elapsed_ms(), Intent::empty())))
    }

    fn script_len(&self) -> u64 {
        self.script.iter().map(|s| s.frames).sum()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn summarize(frame: &FrameResult) -> String {
    format!(
        "tick {:>5}  hp {:>3}  enemies {:>2}  projectiles {:>2}  {:?}",
        frame.tick,
        frame.player_hp,
        frame.enemies().count(),
        frame.projectiles().count(),
        frame.events,
    )
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut scenario = Scenario::load(&args.scenario)?;
    if let Some(seed) = args.seed {
        scenario.config.seed = seed;
    }
    let frames = args.frames.unwrap_or_else(|| scenario.script_len());

    let grid = TileGrid::from_rows(scenario.grid.clone(), scenario.config.tile_size())
        .context("Invalid grid")?;
    let mut sim = Simulation::new(scenario.config.clone()).context("Invalid config")?;
    sim.start(grid, scenario.player_spawn, &scenario.enemies)
        .context("Failed to start run")?;

    let mut last = None;
    for (elapsed_ms, intent) in scenario.inputs().take(usize::try_from(frames)?) {
        let frame = sim.step(elapsed_ms, intent)?;
        if args.json {
            println!("{}", serde_json::to_string(&frame)?);
        } else if !frame.events.is_empty() {
            println!("{}", summarize(&frame));
        }
        let defeated = frame.is_defeated;
        last = Some(frame);
        if defeated {
            warn!("player defeated, stopping");
            break;
        }
    }

    match last {
        Some(frame) => info!(
            tick = frame.tick,
            hp = frame.player_hp,
            enemies = frame.enemies().count(),
            phase = ?frame.phase,
            "scenario finished"
        ),
        None => info!("scenario had no frames"),
    }
    Ok(())
}
