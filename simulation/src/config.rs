//! Host-facing configuration, loadable from any serde format.

use std::time::Duration;

use cellsim_core::{
    AutostopPolicy, EpidemicParams, SimulationMode, Topology, DEFAULT_GRID_DIMENSION,
    DEFAULT_HISTORY_CAP, DEFAULT_STRIP_GENERATIONS, DEFAULT_STRIP_WIDTH, DEFAULT_TICK_INTERVAL,
};
use cellsim_system_life::DEFAULT_FILL_PROBABILITY;
use serde::{Deserialize, Serialize};

/// Complete engine configuration. Missing sections fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Mode activated on construction.
    pub mode: SimulationMode,
    /// Square grid shared by the life and epidemic modes.
    pub grid: GridConfig,
    /// Life-like rule and autostop settings.
    pub life: LifeConfig,
    /// Elementary rule and strip shape.
    pub elementary: ElementaryConfig,
    /// Epidemic model parameters.
    pub epidemic: EpidemicParams,
    /// Host tick cadence.
    pub timing: TimingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: SimulationMode::Life,
            grid: GridConfig::default(),
            life: LifeConfig::default(),
            elementary: ElementaryConfig::default(),
            epidemic: EpidemicParams::default(),
            timing: TimingConfig::default(),
        }
    }
}

/// Square grid shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length N of the N×N grid.
    pub dimension: u32,
    /// Neighbor resolution at the edges.
    pub topology: Topology,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_GRID_DIMENSION,
            topology: Topology::Bounded,
        }
    }
}

/// Life-like automaton settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    /// Rule text such as `B3/S23` or `conway`.
    pub rule: String,
    /// Conditions that halt a running simulation.
    pub autostop: AutostopPolicy,
    /// Fingerprints retained for cycle detection.
    pub history_cap: usize,
    /// Probability that `randomize` brings a cell alive.
    pub fill_probability: f64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            rule: "B3/S23".to_owned(),
            autostop: AutostopPolicy::default(),
            history_cap: DEFAULT_HISTORY_CAP,
            fill_probability: DEFAULT_FILL_PROBABILITY,
        }
    }
}

/// Elementary automaton settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementaryConfig {
    /// Wolfram rule number.
    pub rule: i64,
    /// Cells per row.
    pub width: u32,
    /// Retained generations.
    pub generations: u32,
}

impl Default for ElementaryConfig {
    fn default() -> Self {
        Self {
            rule: 30,
            width: DEFAULT_STRIP_WIDTH,
            generations: DEFAULT_STRIP_GENERATIONS,
        }
    }
}

/// Host tick cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between ticks in milliseconds.
    pub tick_interval_ms: u64,
}

impl TimingConfig {
    /// Cadence as a [`Duration`].
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
        }
    }
}
