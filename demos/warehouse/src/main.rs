//! warehouse: run the multi-agent warehouse simulation from the command line.
//!
//! Configuration comes from `SimConfig::default()`, then an optional TOML
//! file (`--config`), then individual flags.  The final summary is printed
//! to stdout as JSON; progress goes to stderr through `tracing`
//! (`RUST_LOG=debug` shows every move and block).

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use wh_core::{ConflictStrategyKind, GoalStrategyKind, SimConfig, SteppingKind, Tick};
use wh_output::{CsvWriter, RecordingObserver};
use wh_sim::{warehouse, NoopObserver, SimObserver, World, WorldSummary};
use wh_task::TaskManager;

/// Multi-agent warehouse simulation with space-time reservations.
#[derive(Parser, Debug)]
#[command(name = "warehouse")]
struct Args {
    /// TOML file whose keys mirror `SimConfig`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of agents
    #[arg(long)]
    agents: Option<usize>,

    /// Ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Master RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// random | spread | high_density
    #[arg(long)]
    goal_strategy: Option<GoalStrategyKind>,

    /// wait_then_replan | always_wait | always_replan | idle_on_block
    #[arg(long)]
    conflict_strategy: Option<ConflictStrategyKind>,

    /// sequential | two_phase
    #[arg(long)]
    stepping: Option<SteppingKind>,

    /// Blocked ticks before wait_then_replan replans
    #[arg(long)]
    max_retries: Option<u32>,

    /// Forced wait after a replan
    #[arg(long)]
    cooldown: Option<u32>,

    /// Write obstacles.csv, frames.csv and tick_reports.csv here
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Drop past reservations after every tick
    #[arg(long)]
    prune_reservations: bool,
}

impl Args {
    fn into_config(self) -> Result<(SimConfig, Option<PathBuf>, bool)> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SimConfig::default(),
        };
        if let Some(n) = self.agents { config.agent_count = n; }
        if let Some(n) = self.ticks { config.max_ticks = n; }
        if let Some(s) = self.seed { config.seed = s; }
        if let Some(g) = self.goal_strategy { config.goal_strategy = g; }
        if let Some(c) = self.conflict_strategy { config.conflict_strategy = c; }
        if let Some(s) = self.stepping { config.stepping = s; }
        if let Some(r) = self.max_retries { config.max_retries = r; }
        if let Some(c) = self.cooldown { config.cooldown_ticks = c; }
        config.validate()?;
        Ok((config, self.output_dir, self.prune_reservations))
    }
}

fn load_config(path: &Path) -> Result<SimConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Run to `max_ticks`, optionally pruning the ledger after every tick.
fn drive<O: SimObserver>(world: &mut World, goals: &mut TaskManager, observer: &mut O, prune: bool) -> WorldSummary {
    if !prune {
        return world.run(goals, observer);
    }
    let end = Tick(world.config.max_ticks);
    while world.tick() < end {
        world.run_ticks(1, goals, observer);
        let removed = world.prune_reservations();
        tracing::trace!(tick = %world.tick(), removed, "pruned reservations");
    }
    observer.on_sim_end(world.tick());
    world.summary()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (config, output_dir, prune) = Args::parse().into_config()?;
    tracing::info!(
        agents = config.agent_count,
        ticks = config.max_ticks,
        seed = config.seed,
        goal_strategy = %config.goal_strategy,
        conflict_strategy = %config.conflict_strategy,
        stepping = %config.stepping,
        "starting warehouse simulation"
    );

    let (mut world, mut goals) = warehouse(&config)?;
    tracing::info!(
        width = world.grid().width(),
        height = world.grid().height(),
        obstacles = world.grid().regions().len(),
        free_cells = world.grid().free_count(),
        "floor ready"
    );

    let t0 = Instant::now();
    let summary = match &output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            let mut rec = RecordingObserver::new(CsvWriter::new(dir)?);
            rec.record_floor(world.grid())?;
            let summary = drive(&mut world, &mut goals, &mut rec, prune);
            if let Some(e) = rec.take_error() {
                return Err(e).context("writing output");
            }
            if rec.overlap_count() > 0 {
                tracing::warn!(overlaps = rec.overlap_count(), "agents shared a cell during the run");
            }
            summary
        }
        None => drive(&mut world, &mut goals, &mut NoopObserver, prune),
    };
    let elapsed = t0.elapsed();

    tracing::info!(
        ticks = summary.tick.0,
        completed = summary.total_completed(),
        reservations = world.table().cell_count(),
        secs = elapsed.as_secs_f64(),
        "simulation complete"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
