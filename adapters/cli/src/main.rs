#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a cellular-automaton simulation headlessly.

mod render;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use cellsim_core::{
    seeded_source, AutostopPolicy, AutostopReason, Census, Preset, SimulationMode, Topology,
    UniformSource,
};
use cellsim_simulation::{query, Simulation, SimulationConfig};
use cellsim_system_epidemic::StatisticsSeries;
use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "cellsim", author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulation mode.
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Edge length of the square grid.
    #[arg(long)]
    dimension: Option<u32>,

    /// Neighbor resolution at the grid edges.
    #[arg(long, value_enum)]
    topology: Option<Edges>,

    /// Life-like rule such as `B3/S23`, or a named rule.
    #[arg(long)]
    rule: Option<String>,

    /// Wolfram rule number for the elementary strip.
    #[arg(long)]
    elementary_rule: Option<i64>,

    /// Cells per elementary row.
    #[arg(long)]
    width: Option<u32>,

    /// Elementary generations retained.
    #[arg(long)]
    generations: Option<u32>,

    /// Per-neighbor transmission probability.
    #[arg(long)]
    infection_probability: Option<f64>,

    /// Per-individual movement probability.
    #[arg(long)]
    movement_probability: Option<f64>,

    /// Fraction of the population infected when seeding.
    #[arg(long)]
    initial_infected: Option<f64>,

    /// Fraction of the population vaccinated when seeding.
    #[arg(long)]
    initial_vaccinated: Option<f64>,

    /// Steps an infection lasts.
    #[arg(long)]
    recovery_time: Option<u32>,

    /// Keep stepping through extinction, stagnation, and cycles.
    #[arg(long)]
    no_autostop: bool,

    /// Pattern to place at the grid center (life only).
    #[arg(long, value_parser = parse_preset)]
    preset: Option<Preset>,

    /// Seed the grid randomly before running.
    #[arg(long)]
    random: bool,

    /// Seed for every random draw.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Maximum number of generations to run.
    #[arg(long, default_value_t = 100)]
    steps: u64,

    /// Restore state from a saved file before running.
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the final state to this file.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print a JSON run summary instead of the final frame.
    #[arg(long)]
    stats_json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Life,
    Elementary,
    Epidemic,
}

impl From<Mode> for SimulationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Life => Self::Life,
            Mode::Elementary => Self::Elementary,
            Mode::Epidemic => Self::Epidemic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Edges {
    Bounded,
    Toroidal,
}

impl From<Edges> for Topology {
    fn from(edges: Edges) -> Self {
        match edges {
            Edges::Bounded => Self::Bounded,
            Edges::Toroidal => Self::Toroidal,
        }
    }
}

fn parse_preset(name: &str) -> Result<Preset, String> {
    Preset::from_name(name).ok_or_else(|| {
        let known: Vec<_> = Preset::ALL.iter().map(|preset| preset.name()).collect();
        format!("unknown preset `{name}`; expected one of {}", known.join(", "))
    })
}

#[derive(Debug, Serialize)]
struct RunSummary {
    mode: SimulationMode,
    generation: u64,
    autostop: Option<AutostopReason>,
    census: Option<Census>,
    statistics: Option<StatisticsSeries>,
}

/// Entry point for the cellsim command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    let config = resolve_config(&cli)?;
    let mut simulation =
        Simulation::from_config(&config).context("configuration was rejected")?;
    if cli.no_autostop {
        simulation.set_autostop(AutostopPolicy::disabled());
    }
    if let Some(path) = &cli.load {
        cellsim_persistence::load(&mut simulation, path)
            .with_context(|| format!("failed to load {}", path.display()))?;
    }

    let mut source = seeded_source(cli.seed);
    seed(&cli, &mut simulation, &mut source)?;

    let autostop = run(&mut simulation, &mut source, cli.steps);
    if let Some(reason) = autostop {
        info!(
            "stopped at generation {}: {}",
            query::generation(&simulation),
            reason.description()
        );
    }

    if cli.stats_json {
        let summary = RunSummary {
            mode: simulation.mode(),
            generation: query::generation(&simulation),
            autostop,
            census: query::census(&simulation),
            statistics: query::statistics(&simulation).map(|statistics| statistics.to_series()),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render::frame(&simulation.snapshot()));
        println!(
            "{} generation {}{}",
            simulation.mode(),
            query::generation(&simulation),
            autostop.map_or_else(String::new, |reason| format!(" ({})", reason.description()))
        );
    }

    if let Some(path) = &cli.save {
        cellsim_persistence::save(&simulation, path)
            .with_context(|| format!("failed to save {}", path.display()))?;
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(dimension) = cli.dimension {
        config.grid.dimension = dimension;
    }
    if let Some(edges) = cli.topology {
        config.grid.topology = edges.into();
    }
    if let Some(rule) = &cli.rule {
        config.life.rule.clone_from(rule);
    }
    if let Some(rule) = cli.elementary_rule {
        config.elementary.rule = rule;
    }
    if let Some(width) = cli.width {
        config.elementary.width = width;
    }
    if let Some(generations) = cli.generations {
        config.elementary.generations = generations;
    }

    let epidemic = &mut config.epidemic;
    if let Some(value) = cli.infection_probability {
        epidemic.infection_probability = value;
    }
    if let Some(value) = cli.movement_probability {
        epidemic.movement_probability = value;
    }
    if let Some(value) = cli.initial_infected {
        epidemic.initial_infected = value;
    }
    if let Some(value) = cli.initial_vaccinated {
        epidemic.initial_vaccinated = value;
    }
    if let Some(value) = cli.recovery_time {
        epidemic.recovery_time = value;
    }
    Ok(config)
}

/// Seeds the grid from the flags. A loaded file is kept as-is unless seeding is requested.
fn seed(
    cli: &Cli,
    simulation: &mut Simulation,
    source: &mut impl UniformSource,
) -> Result<()> {
    if let Some(preset) = cli.preset {
        simulation
            .load_preset(preset)
            .context("presets require life mode")?;
    } else if cli.random {
        simulation.randomize(source);
    } else if cli.load.is_none() {
        match simulation.mode() {
            SimulationMode::Elementary => simulation.seed_single()?,
            SimulationMode::Life | SimulationMode::Epidemic => simulation.randomize(source),
        }
    }
    Ok(())
}

/// Steps until `steps` generations ran or an autostop condition paused the run.
fn run(
    simulation: &mut Simulation,
    source: &mut impl UniformSource,
    steps: u64,
) -> Option<AutostopReason> {
    simulation.start();
    for _ in 0..steps {
        match simulation.tick(source) {
            Some(report) if report.autostop.is_some() => return report.autostop,
            Some(_) => {}
            None => break,
        }
    }
    simulation.pause();
    None
}
