//! Command-line entry point
//!
//! Loads an activity snapshot, runs the simulation to completion and streams
//! the frames as JSON lines for an external renderer to pick up.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use commit_breakout::calendar::{ActivityCalendar, CalendarSource, SnapshotSource};
use commit_breakout::consts::{DEFAULT_SEED, MAX_TICKS};
use commit_breakout::render::{FrameSink, JsonLinesSink, RenderOptions};
use commit_breakout::sim::{Outcome, Simulation};
use commit_breakout::{SimConfig, StrategyKind};

#[derive(Debug, Parser)]
#[command(name = "commit-breakout", version)]
#[command(about = "Replay a contribution calendar as a self-playing Breakout game")]
struct Args {
    /// Activity snapshot to replay: JSON array of {date, count} objects,
    /// dates ascending, whole weeks
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Paddle strategy: follow, column, row or random
    #[arg(long, default_value = "random")]
    strategy: String,

    /// Seed for the random strategy (fixed default keeps runs reproducible)
    #[arg(long)]
    seed: Option<u64>,

    /// Tick cap before the run is declared stalled
    #[arg(long, default_value_t = MAX_TICKS)]
    max_ticks: u64,

    /// Frame stream destination (default: <input stem>.frames.jsonl)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Playback rate hint forwarded to the renderer
    #[arg(long, default_value_t = 40)]
    fps: u32,

    /// Watermark text forwarded to the renderer
    #[arg(long)]
    watermark: Option<String>,

    /// Re-save the normalized snapshot alongside the run
    #[arg(long)]
    raw_output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let strategy: StrategyKind = args.strategy.parse()?;

    let calendar: ActivityCalendar = SnapshotSource::new(&args.input)
        .fetch()
        .with_context(|| format!("loading snapshot {}", args.input.display()))?;
    log::info!(
        "loaded {} weeks, {} total contributions",
        calendar.weeks(),
        calendar.total_count()
    );

    if let Some(path) = &args.raw_output {
        calendar
            .save(path)
            .with_context(|| format!("saving snapshot copy to {}", path.display()))?;
        log::info!("saved normalized snapshot to {}", path.display());
    }

    let cfg = SimConfig {
        strategy,
        seed: args.seed.unwrap_or(DEFAULT_SEED),
        max_ticks: args.max_ticks,
        ..SimConfig::default()
    };

    let mut sim = Simulation::new(&calendar, cfg).context("starting simulation")?;
    let playfield = sim.state().playfield;

    let output = args.output.unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("frames.jsonl");
        path
    });
    let writer = BufWriter::new(
        File::create(&output).with_context(|| format!("creating {}", output.display()))?,
    );
    let options = RenderOptions {
        fps: args.fps,
        watermark: args.watermark,
    };
    let mut sink = JsonLinesSink::new(writer, &playfield, &options)?;

    for frame in sim.by_ref() {
        sink.push(&frame)?;
    }
    sink.finish()?;

    let state = sim.state();
    match sim.outcome() {
        Some(Outcome::Cleared) => log::info!(
            "cleared in {} ticks, score {}",
            state.tick,
            state.score
        ),
        Some(Outcome::Stalled) => log::warn!(
            "stalled at the {}-tick cap with {} bricks left; frames kept",
            state.tick,
            state.wall.remaining()
        ),
        // The iterator only ends on a terminal phase
        None => {}
    }
    println!(
        "{} frames -> {} ({} of {} bricks destroyed, score {})",
        sink.frames_written(),
        output.display(),
        state.destroyed_bricks,
        state.wall.total(),
        state.score
    );

    Ok(())
}
