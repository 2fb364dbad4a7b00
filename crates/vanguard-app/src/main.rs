//! vanguard — headless multi-domain engagement simulator.
//!
//! Four operating modes over the same scenario input:
//!   mc           Monte-Carlo batch with aggregated statistics
//!   replay       single-run trajectory recording
//!   coordinator  distributed step driver over a Unix socket
//!   worker       distributed entity-subset stepper

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use vanguard_core::Entity;
use vanguard_mc::replay::ReplayConfig;
use vanguard_mc::runner::McConfig;
use vanguard_net::coordinator::{partition_round_robin, Coordinator};
use vanguard_sim::physics;
use vanguard_sim::scenario::{self, ScenarioDoc};

#[derive(Parser, Debug)]
#[command(name = "vanguard", about = "Headless multi-domain engagement simulator")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run N Monte-Carlo replications and write aggregated statistics.
    Mc {
        /// Scenario JSON path.
        #[arg(short, long)]
        scenario: Option<PathBuf>,
        /// Built-in scenario preset (alternative to --scenario).
        #[arg(short, long)]
        preset: Option<String>,
        /// Output JSON path (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of replications.
        #[arg(short = 'n', long, default_value = "100")]
        runs: usize,
        /// Base seed; run i uses seed + i.
        #[arg(long, default_value = "1")]
        seed: u32,
        /// Simulated seconds per run.
        #[arg(long, default_value = "600.0")]
        max_time: f64,
        /// Tick length in seconds.
        #[arg(long, default_value = "0.1")]
        dt: f64,
        /// Log per-run progress.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Record a single seeded run as a trajectory replay.
    Replay {
        #[arg(short, long)]
        scenario: Option<PathBuf>,
        /// Built-in scenario preset (alternative to --scenario).
        #[arg(short, long)]
        preset: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "1")]
        seed: u32,
        #[arg(long, default_value = "600.0")]
        max_time: f64,
        #[arg(long, default_value = "0.1")]
        dt: f64,
        /// Seconds between trajectory samples.
        #[arg(long, default_value = "1.0")]
        sample_interval: f64,
    },
    /// Drive N workers through step barriers over a Unix socket.
    Coordinator {
        #[arg(short, long)]
        scenario: PathBuf,
        /// Socket path workers connect to.
        #[arg(long)]
        socket: PathBuf,
        /// Number of workers to wait for.
        #[arg(short, long, default_value = "2")]
        workers: usize,
        #[arg(long, default_value = "600.0")]
        max_time: f64,
        #[arg(long, default_value = "0.1")]
        dt: f64,
        /// Barrier timeout per step, in milliseconds.
        #[arg(long, default_value = "5000")]
        step_timeout_ms: u64,
        /// Request a state sync every this many steps.
        #[arg(long, default_value = "100")]
        sync_every: u64,
    },
    /// Step an assigned entity subset under a coordinator.
    Worker {
        #[arg(short, long)]
        scenario: PathBuf,
        /// Socket path of the coordinator.
        #[arg(long)]
        socket: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vanguard=info,vanguard_sim=info,vanguard_net=info".into()),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::Mc {
            scenario,
            preset,
            output,
            runs,
            seed,
            max_time,
            dt,
            verbose,
        } => {
            let doc = resolve_scenario(scenario.as_ref(), preset.as_deref())?;
            let config = McConfig {
                num_runs: runs,
                base_seed: seed,
                max_sim_time: max_time,
                dt,
                verbose,
            };
            let report = vanguard_mc::run_batch(&doc, &config);
            let failures = report.runs.iter().filter(|r| r.error.is_some()).count();
            if failures > 0 {
                warn!(failures, "some runs reported errors");
            }
            write_json(output.as_deref(), &report)?;
            info!(runs = report.runs.len(), "batch complete");
        }
        Command::Replay {
            scenario,
            preset,
            output,
            seed,
            max_time,
            dt,
            sample_interval,
        } => {
            let doc = resolve_scenario(scenario.as_ref(), preset.as_deref())?;
            let config = ReplayConfig {
                seed,
                max_sim_time: max_time,
                dt,
                sample_interval,
            };
            // Replay mode aborts on the first fatal error.
            let report = vanguard_mc::record(&doc, &config)
                .context("replay run failed")?;
            write_json(output.as_deref(), &report)?;
            info!(
                samples = report.timeline.sample_times.len(),
                events = report.events.len(),
                "replay complete"
            );
        }
        Command::Coordinator {
            scenario,
            socket,
            workers,
            max_time,
            dt,
            step_timeout_ms,
            sync_every,
        } => {
            let doc = load_scenario(&scenario)?;
            run_coordinator(
                &doc,
                &socket,
                workers,
                max_time,
                dt,
                Duration::from_millis(step_timeout_ms),
                sync_every,
            )?;
        }
        Command::Worker { scenario, socket } => {
            let doc = load_scenario(&scenario)?;
            let world = vanguard_sim::build_world(&doc, 1)
                .context("building local world from scenario")?;
            let pool: Vec<Entity> = world.entities().to_vec();
            let mut update = |entity: &mut Entity, dt: f64, _time: f64| -> Result<(), String> {
                physics::step_entity(entity, dt);
                Ok(())
            };
            vanguard_net::worker::run(&socket, pool, &mut update)
                .context("worker terminated abnormally")?;
            info!("worker done");
        }
    }
    Ok(())
}

fn load_scenario(path: &PathBuf) -> anyhow::Result<ScenarioDoc> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    scenario::parse(&text).context("parsing scenario")
}

/// A scenario file wins over a preset; one of the two is required.
fn resolve_scenario(
    path: Option<&PathBuf>,
    preset: Option<&str>,
) -> anyhow::Result<ScenarioDoc> {
    match (path, preset) {
        (Some(path), _) => load_scenario(path),
        (None, Some(name)) => vanguard_sim::presets::preset(name).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown preset `{name}`; available: {}",
                vanguard_sim::presets::preset_names().join(", ")
            )
        }),
        (None, None) => anyhow::bail!("either --scenario or --preset is required"),
    }
}

fn write_json<T: serde::Serialize>(path: Option<&std::path::Path>, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("encoding output")?;
    match path {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing output {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_coordinator(
    doc: &ScenarioDoc,
    socket: &std::path::Path,
    workers: usize,
    max_time: f64,
    dt: f64,
    step_timeout: Duration,
    sync_every: u64,
) -> anyhow::Result<()> {
    // Build the world once to learn the entity ids to partition.
    let world = vanguard_sim::build_world(doc, 1).context("building world from scenario")?;
    let ids: Vec<String> = world.entities().iter().map(|e| e.id.clone()).collect();
    let assignments = partition_round_robin(&ids, workers);

    let mut coordinator =
        Coordinator::start(socket, &assignments).context("starting coordinator")?;

    let ticks = (max_time / dt).ceil() as u64;
    let mut time = 0.0;
    for tick in 1..=ticks {
        let ok = coordinator
            .step(dt, time, step_timeout)
            .context("step broadcast failed")?;
        if !ok {
            warn!(tick, time, "step barrier timed out; aborting");
            break;
        }
        time += dt;

        if sync_every > 0 && tick % sync_every == 0 {
            let slots = coordinator
                .sync(time, step_timeout)
                .context("sync broadcast failed")?;
            let reported: usize = slots.iter().flatten().map(|p| p.entities.len()).sum();
            info!(tick, time, entities = reported, "sync point");
        }
    }

    coordinator.shutdown(time);
    info!(time, "coordinator done");
    Ok(())
}
