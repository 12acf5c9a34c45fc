#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the cellular automaton engine.
//!
//! This crate defines the message surface that connects hosts, the
//! simulation façade, and the per-mode automata. Hosts submit [`Command`]
//! values describing desired mutations, the façade executes them via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. Automata implement the shared [`Automaton`] capability so the
//! façade can dispatch on the active mode without knowing the rule system.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

mod errors;
mod random;

pub use errors::{
    DimensionError, EngineError, ImportFormatError, ParameterError, RuleFormatError,
};
pub use random::{choose, seeded_source, UniformSource};

/// Smallest supported edge length for square grids.
pub const MIN_GRID_DIMENSION: u32 = 5;
/// Largest supported edge length for square grids.
pub const MAX_GRID_DIMENSION: u32 = 200;
/// Edge length used when no explicit dimension was configured.
pub const DEFAULT_GRID_DIMENSION: u32 = 20;

/// Smallest supported width or generation count for the elementary strip.
pub const MIN_STRIP_LENGTH: u32 = 50;
/// Largest supported width or generation count for the elementary strip.
pub const MAX_STRIP_LENGTH: u32 = 500;
/// Default number of cells in an elementary row.
pub const DEFAULT_STRIP_WIDTH: u32 = 100;
/// Default number of retained elementary generations.
pub const DEFAULT_STRIP_GENERATIONS: u32 = 100;

/// Number of fingerprints retained for life-like stagnation and cycle checks.
pub const DEFAULT_HISTORY_CAP: usize = 80;
/// Number of census entries retained by the epidemic statistics series.
pub const DEFAULT_STATISTICS_CAP: usize = 1_000;

/// Longest recovery duration accepted by the epidemic model.
pub const MAX_RECOVERY_TIME: u32 = 1_000;

/// Fastest cadence a host may request between ticks.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(20);
/// Slowest cadence a host may request between ticks.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_millis(1_000);
/// Cadence used when the host did not configure one.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Rule system driving the active simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// Two-dimensional life-like automaton with birth/survival sets.
    Life,
    /// One-dimensional elementary automaton driven by an 8-bit rule number.
    Elementary,
    /// Stochastic susceptible/infected/recovered/vaccinated model.
    Epidemic,
}

impl SimulationMode {
    /// Every supported mode in presentation order.
    pub const ALL: [SimulationMode; 3] = [Self::Life, Self::Elementary, Self::Epidemic];

    /// Tag written into persisted files for this mode.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Life => "conway",
            Self::Elementary => "1d",
            Self::Epidemic => "covid",
        }
    }

    /// Resolves a persisted mode tag, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.tag().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Life => "life",
            Self::Elementary => "elementary",
            Self::Epidemic => "epidemic",
        };
        f.write_str(label)
    }
}

/// Describes how neighbors beyond the grid edge are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Out-of-range neighbors are excluded.
    #[default]
    Bounded,
    /// Indices wrap modulo the grid dimension, forming a torus.
    Toroidal,
}

impl Topology {
    /// Builds the topology from the persisted `0`/`1` style flag.
    #[must_use]
    pub const fn from_flag(toroidal: bool) -> Self {
        if toroidal {
            Self::Toroidal
        } else {
            Self::Bounded
        }
    }

    /// Reports whether edges wrap around.
    #[must_use]
    pub const fn is_toroidal(self) -> bool {
        matches!(self, Self::Toroidal)
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Compartment occupied by an individual in the epidemic model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpidemicState {
    /// Healthy and able to catch the infection.
    #[default]
    Susceptible,
    /// Currently infected and contagious.
    Infected,
    /// Recovered and immune.
    Recovered,
    /// Vaccinated and immune.
    Vaccinated,
}

impl EpidemicState {
    /// Every state in manual-edit cycle order.
    pub const ALL: [EpidemicState; 4] = [
        Self::Susceptible,
        Self::Infected,
        Self::Recovered,
        Self::Vaccinated,
    ];

    /// Single-letter code used by persisted files.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Susceptible => 'S',
            Self::Infected => 'I',
            Self::Recovered => 'R',
            Self::Vaccinated => 'V',
        }
    }

    /// Resolves a state letter regardless of case.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.letter() == letter.to_ascii_uppercase())
    }

    /// Numeric code exposed through flat state exports (S=0, I=1, R=2, V=3).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Susceptible => 0,
            Self::Infected => 1,
            Self::Recovered => 2,
            Self::Vaccinated => 3,
        }
    }

    /// Next state in the manual edit cycle S → I → R → V → S.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Susceptible => Self::Infected,
            Self::Infected => Self::Recovered,
            Self::Recovered => Self::Vaccinated,
            Self::Vaccinated => Self::Susceptible,
        }
    }
}

/// Engine-initiated halt condition detected after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutostopReason {
    /// Every life cell died.
    Extinction,
    /// The step did not change a single cell.
    Stagnation,
    /// The current generation was already seen within the retained history.
    CycleDetected,
    /// No infected individuals remain.
    EpidemicContained,
}

impl AutostopReason {
    /// Human readable explanation suitable for host notifications.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Extinction => "the world went extinct (every cell is dead)",
            Self::Stagnation => "no cell changed during the last generation",
            Self::CycleDetected => "a previously seen generation repeated",
            Self::EpidemicContained => "the epidemic was contained (no infected remain)",
        }
    }
}

/// Independently toggleable autostop conditions for the life-like automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutostopPolicy {
    /// Halt once every cell is dead.
    pub extinction: bool,
    /// Halt once a step leaves the grid unchanged.
    pub stagnation: bool,
    /// Halt once the current fingerprint repeats within the history.
    pub cycle: bool,
}

impl AutostopPolicy {
    /// Policy that never halts the simulation.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            extinction: false,
            stagnation: false,
            cycle: false,
        }
    }
}

impl Default for AutostopPolicy {
    fn default() -> Self {
        Self {
            extinction: true,
            stagnation: true,
            cycle: false,
        }
    }
}

/// Tunable parameters of the epidemic model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpidemicParams {
    /// Fraction of cells seeded as infected by `randomize`.
    pub initial_infected: f64,
    /// Fraction of cells seeded as vaccinated by `randomize`.
    pub initial_vaccinated: f64,
    /// Probability that an infected cell infects one susceptible neighbor per step.
    pub infection_probability: f64,
    /// Probability that a cell swaps places with a random neighbor per step.
    pub movement_probability: f64,
    /// Number of steps an infection lasts before recovery.
    pub recovery_time: u32,
}

impl EpidemicParams {
    /// Validates every probability and the recovery duration.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let probabilities = [
            ("initial infected fraction", self.initial_infected),
            ("initial vaccinated fraction", self.initial_vaccinated),
            ("infection probability", self.infection_probability),
            ("movement probability", self.movement_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParameterError::ProbabilityOutOfRange { name, value });
            }
        }

        if self.recovery_time == 0 || self.recovery_time > MAX_RECOVERY_TIME {
            return Err(ParameterError::RecoveryTimeOutOfRange {
                value: self.recovery_time,
            });
        }

        Ok(())
    }
}

impl Default for EpidemicParams {
    fn default() -> Self {
        Self {
            initial_infected: 0.02,
            initial_vaccinated: 0.0,
            infection_probability: 0.3,
            movement_probability: 0.2,
            recovery_time: 10,
        }
    }
}

/// Named seed patterns available to the life-like automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    /// Diagonal spaceship of period four.
    Glider,
    /// Three-cell period-two oscillator.
    Blinker,
    /// Six-cell period-two oscillator.
    Toad,
    /// Two diagonal blocks forming a period-two oscillator.
    Beacon,
    /// Abbreviated Gosper glider gun seed.
    GosperGliderGunSmall,
}

impl Preset {
    /// Every preset in catalogue order.
    pub const ALL: [Preset; 5] = [
        Self::Glider,
        Self::Blinker,
        Self::Toad,
        Self::Beacon,
        Self::GosperGliderGunSmall,
    ];

    /// Catalogue name of the preset.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Glider => "glider",
            Self::Blinker => "blinker",
            Self::Toad => "toad",
            Self::Beacon => "beacon",
            Self::GosperGliderGunSmall => "gosper-glider-gun-small",
        }
    }

    /// Resolves a catalogue name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }
}

/// Population counts per epidemic compartment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Census {
    /// Number of susceptible individuals.
    pub susceptible: u32,
    /// Number of infected individuals.
    pub infected: u32,
    /// Number of recovered individuals.
    pub recovered: u32,
    /// Number of vaccinated individuals.
    pub vaccinated: u32,
}

impl Census {
    /// Tallies the provided states.
    #[must_use]
    pub fn from_states(states: impl IntoIterator<Item = EpidemicState>) -> Self {
        let mut census = Self::default();
        for state in states {
            match state {
                EpidemicState::Susceptible => census.susceptible += 1,
                EpidemicState::Infected => census.infected += 1,
                EpidemicState::Recovered => census.recovered += 1,
                EpidemicState::Vaccinated => census.vaccinated += 1,
            }
        }
        census
    }

    /// Count recorded for a single compartment.
    #[must_use]
    pub const fn count(&self, state: EpidemicState) -> u32 {
        match state {
            EpidemicState::Susceptible => self.susceptible,
            EpidemicState::Infected => self.infected,
            EpidemicState::Recovered => self.recovered,
            EpidemicState::Vaccinated => self.vaccinated,
        }
    }

    /// Total population across every compartment.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.susceptible + self.infected + self.recovered + self.vaccinated
    }
}

/// Summary produced by a single generation transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Generation counter after the step completed.
    pub generation: u64,
    /// Whether any cell differs from the previous generation.
    pub changed: bool,
    /// First autostop condition triggered by the step, if any.
    pub autostop: Option<AutostopReason>,
}

/// Value held by a single cell, tagged by the rule system that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellValue {
    /// Alive/dead cell of the life-like or elementary automaton.
    Binary(bool),
    /// Individual of the epidemic model.
    Epidemic {
        /// Compartment the individual occupies.
        state: EpidemicState,
        /// Steps elapsed since the infection started; zero otherwise.
        infection_age: u32,
    },
}

/// Read-only, mode-tagged capture of every cell in the active automaton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    mode: SimulationMode,
    rows: u32,
    columns: u32,
    topology: Topology,
    generation: u64,
    cells: Vec<CellValue>,
}

impl Snapshot {
    /// Captures a new snapshot from row-major cell values.
    #[must_use]
    pub fn new(
        mode: SimulationMode,
        rows: u32,
        columns: u32,
        topology: Topology,
        generation: u64,
        cells: Vec<CellValue>,
    ) -> Self {
        debug_assert_eq!(
            cells.len() as u64,
            u64::from(rows) * u64::from(columns),
            "snapshot cells must cover the full grid"
        );
        Self {
            mode,
            rows,
            columns,
            topology,
            generation,
            cells,
        }
    }

    /// Mode of the automaton that produced the snapshot.
    #[must_use]
    pub const fn mode(&self) -> SimulationMode {
        self.mode
    }

    /// Provides the `(rows, columns)` dimensions of the captured grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Neighbor topology in effect when the snapshot was taken.
    #[must_use]
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Generation counter at capture time.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the value stored at the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellValue> {
        if cell.row() >= self.rows || cell.column() >= self.columns {
            return None;
        }
        let index = cell.row() as usize * self.columns as usize + cell.column() as usize;
        self.cells.get(index).copied()
    }

    /// Iterates every cell in row-major order alongside its coordinate.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellValue)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, value)| {
            let index = index as u32;
            (CellCoord::new(index / columns, index % columns), *value)
        })
    }
}

/// Shared capability implemented by every rule system.
pub trait Automaton {
    /// Mode implemented by the automaton.
    fn mode(&self) -> SimulationMode;

    /// Performs one full generation transition, including autostop evaluation.
    fn advance(&mut self, source: &mut dyn UniformSource) -> StepReport;

    /// Captures the current cell state.
    fn snapshot(&self) -> Snapshot;
}

/// Commands that express all permissible simulation mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Switches to the provided mode, discarding all state.
    SelectMode {
        /// Mode to activate.
        mode: SimulationMode,
    },
    /// Reinitializes the square grid used by the life and epidemic modes.
    ResizeGrid {
        /// Requested edge length.
        dimension: u32,
        /// Neighbor topology for the new grid.
        topology: Topology,
    },
    /// Reinitializes the elementary strip.
    ResizeStrip {
        /// Number of cells per row.
        width: u32,
        /// Number of retained generations.
        generations: u32,
    },
    /// Parses and installs a life-like rule string such as `B3/S23`.
    ApplyLifeRule {
        /// Rule text supplied by the host.
        rule: String,
    },
    /// Installs an elementary rule number.
    ApplyElementaryRule {
        /// Rule number supplied by the host; must fit within 0..=255.
        rule_number: i64,
    },
    /// Installs epidemic parameters.
    ConfigureEpidemic {
        /// Parameters to validate and apply.
        params: EpidemicParams,
    },
    /// Replaces the life-like autostop policy.
    ConfigureAutostop {
        /// Conditions that should halt the simulation.
        policy: AutostopPolicy,
    },
    /// Updates the cadence the host uses between ticks.
    SetTickInterval {
        /// Requested delay between ticks.
        interval: Duration,
    },
    /// Performs the mode's manual edit on a cell (toggle or state cycle).
    EditCell {
        /// Cell to edit.
        cell: CellCoord,
    },
    /// Seeds the active mode with random content.
    Randomize,
    /// Seeds the elementary strip with a single centered live cell.
    SeedSingle,
    /// Places a named life-like preset.
    LoadPreset {
        /// Preset to place.
        preset: Preset,
    },
    /// Resets every cell to its empty/default value.
    Clear,
    /// Enables host-driven ticking.
    Start,
    /// Disables host-driven ticking.
    Pause,
    /// Host timer fired; steps only while running.
    Tick,
    /// Performs a single manual step regardless of the running flag.
    StepOnce,
}

/// Events broadcast by the simulation after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new mode became active.
    ModeSelected {
        /// Mode that became active.
        mode: SimulationMode,
    },
    /// Confirms that the grid was reinitialized with new dimensions.
    GridReset {
        /// Mode owning the grid.
        mode: SimulationMode,
        /// Number of rows in the new grid.
        rows: u32,
        /// Number of columns in the new grid.
        columns: u32,
    },
    /// Confirms a square grid shape stored while the elementary mode is active.
    ///
    /// It takes effect the next time a square mode is selected.
    GridShapeStored {
        /// Stored edge length.
        dimension: u32,
        /// Stored neighbor topology.
        topology: Topology,
    },
    /// Confirms a strip shape stored while a square mode is active.
    ///
    /// It takes effect the next time the elementary mode is selected.
    StripShapeStored {
        /// Stored number of cells per row.
        width: u32,
        /// Stored number of retained generations.
        generations: u32,
    },
    /// Confirms that the host tick cadence changed.
    TickIntervalChanged {
        /// Delay the host should use between ticks.
        interval: Duration,
    },
    /// Confirms that a rule or parameter set was installed.
    RuleApplied {
        /// Mode whose configuration changed.
        mode: SimulationMode,
    },
    /// Confirms a manual cell edit.
    CellEdited {
        /// Cell that changed.
        cell: CellCoord,
        /// Value stored after the edit.
        value: CellValue,
    },
    /// Confirms that the grid was reseeded.
    Seeded {
        /// Mode that was reseeded.
        mode: SimulationMode,
    },
    /// Confirms that every cell was reset.
    Cleared {
        /// Mode that was cleared.
        mode: SimulationMode,
    },
    /// Host-driven ticking resumed.
    Started,
    /// Host-driven ticking halted.
    Paused,
    /// A generation transition completed.
    GenerationAdvanced {
        /// Summary of the transition.
        report: StepReport,
    },
    /// The engine halted ticking on its own.
    Autostopped {
        /// Condition that triggered the halt.
        reason: AutostopReason,
    },
    /// A command failed validation; state is unchanged.
    CommandRejected {
        /// Reason the command was rejected.
        error: EngineError,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        AutostopPolicy, Census, CellCoord, CellValue, EpidemicParams, EpidemicState,
        ParameterError, Preset, SimulationMode, Snapshot, Topology,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn epidemic_params_round_trip_through_bincode() {
        assert_round_trip(&EpidemicParams::default());
    }

    #[test]
    fn autostop_policy_round_trips_through_bincode() {
        assert_round_trip(&AutostopPolicy {
            extinction: false,
            stagnation: true,
            cycle: true,
        });
    }

    #[test]
    fn mode_tags_resolve_case_insensitively() {
        assert_eq!(SimulationMode::from_tag(" CONWAY "), Some(SimulationMode::Life));
        assert_eq!(SimulationMode::from_tag("covid"), Some(SimulationMode::Epidemic));
        assert_eq!(SimulationMode::from_tag("1d"), Some(SimulationMode::Elementary));
        assert_eq!(SimulationMode::from_tag("hex"), None);
    }

    #[test]
    fn epidemic_states_cycle_through_all_compartments() {
        let mut state = EpidemicState::Susceptible;
        let mut visited = Vec::new();
        for _ in 0..4 {
            visited.push(state);
            state = state.next();
        }
        assert_eq!(visited, EpidemicState::ALL.to_vec());
        assert_eq!(state, EpidemicState::Susceptible);
    }

    #[test]
    fn state_letters_parse_lowercase() {
        assert_eq!(EpidemicState::from_letter('v'), Some(EpidemicState::Vaccinated));
        assert_eq!(EpidemicState::from_letter('x'), None);
    }

    #[test]
    fn census_totals_every_compartment() {
        let census = Census::from_states([
            EpidemicState::Susceptible,
            EpidemicState::Infected,
            EpidemicState::Infected,
            EpidemicState::Vaccinated,
        ]);
        assert_eq!(census.infected, 2);
        assert_eq!(census.count(EpidemicState::Recovered), 0);
        assert_eq!(census.total(), 4);
    }

    #[test]
    fn params_reject_probability_above_one() {
        let params = EpidemicParams {
            infection_probability: 1.5,
            ..EpidemicParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParameterError::ProbabilityOutOfRange {
                name: "infection probability",
                value: 1.5,
            })
        );
    }

    #[test]
    fn params_reject_zero_recovery_time() {
        let params = EpidemicParams {
            recovery_time: 0,
            ..EpidemicParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn preset_names_resolve() {
        assert_eq!(Preset::from_name("Blinker"), Some(Preset::Blinker));
        assert_eq!(Preset::from_name("unknown"), None);
    }

    #[test]
    fn snapshot_enumerates_row_major() {
        let cells = (0..6).map(|index| CellValue::Binary(index % 2 == 0)).collect();
        let snapshot = Snapshot::new(SimulationMode::Life, 2, 3, Topology::Bounded, 0, cells);
        let coords: Vec<CellCoord> = snapshot.iter().map(|(cell, _)| cell).collect();
        assert_eq!(coords[4], CellCoord::new(1, 1));
        assert_eq!(snapshot.cell(CellCoord::new(1, 2)), Some(CellValue::Binary(false)));
        assert_eq!(snapshot.cell(CellCoord::new(2, 0)), None);
    }
}
