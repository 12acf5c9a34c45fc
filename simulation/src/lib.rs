#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state that dispatches to the active rule system.
//!
//! The [`Simulation`] owns exactly one automaton at a time. Switching modes or
//! resizing always rebuilds that automaton from scratch, while rule text,
//! epidemic parameters, and autostop conditions persist across rebuilds.
//! Hosts either call the typed mutators directly or submit [`Command`] values
//! through [`apply`], which reports outcomes as [`Event`] values.

use std::time::Duration;

use cellsim_core::{
    Automaton, AutostopPolicy, CellCoord, CellValue, Command, EngineError, EpidemicParams,
    Event, ParameterError, Preset, SimulationMode, Snapshot, StepReport, Topology, UniformSource,
    MAX_TICK_INTERVAL, MIN_TICK_INTERVAL,
};
use cellsim_grid::{validate_dimension, SquareGrid};
use cellsim_system_elementary::{
    validate_generations, validate_width, ElementaryAutomaton, ElementaryRule,
};
use cellsim_system_epidemic::{EpidemicAutomaton, EpidemicCell};
use cellsim_system_life::{LifeAutomaton, LifeRule};
use log::info;

mod config;

pub use config::{ElementaryConfig, GridConfig, LifeConfig, SimulationConfig, TimingConfig};

/// Validates a host tick cadence against the supported range.
pub fn validate_tick_interval(interval: Duration) -> Result<Duration, ParameterError> {
    if (MIN_TICK_INTERVAL..=MAX_TICK_INTERVAL).contains(&interval) {
        Ok(interval)
    } else {
        Err(ParameterError::TickIntervalOutOfRange {
            millis: interval.as_millis(),
        })
    }
}

/// Automaton backing the active mode.
#[derive(Clone, Debug)]
pub enum ModeState {
    /// Two-dimensional life-like automaton.
    Life(LifeAutomaton),
    /// One-dimensional elementary automaton.
    Elementary(ElementaryAutomaton),
    /// Epidemic model.
    Epidemic(EpidemicAutomaton),
}

impl ModeState {
    fn as_automaton(&self) -> &dyn Automaton {
        match self {
            Self::Life(automaton) => automaton,
            Self::Elementary(automaton) => automaton,
            Self::Epidemic(automaton) => automaton,
        }
    }

    fn as_automaton_mut(&mut self) -> &mut dyn Automaton {
        match self {
            Self::Life(automaton) => automaton,
            Self::Elementary(automaton) => automaton,
            Self::Epidemic(automaton) => automaton,
        }
    }
}

impl Automaton for ModeState {
    fn mode(&self) -> SimulationMode {
        self.as_automaton().mode()
    }

    fn advance(&mut self, source: &mut dyn UniformSource) -> StepReport {
        self.as_automaton_mut().advance(source)
    }

    fn snapshot(&self) -> Snapshot {
        self.as_automaton().snapshot()
    }
}

/// Validated settings that survive mode switches and resizes.
#[derive(Clone, Debug)]
struct Settings {
    dimension: u32,
    topology: Topology,
    strip_width: u32,
    strip_generations: u32,
    life_rule: LifeRule,
    autostop: AutostopPolicy,
    history_cap: usize,
    fill_probability: f64,
    elementary_rule: ElementaryRule,
    epidemic: EpidemicParams,
    tick_interval: Duration,
}

impl Settings {
    fn from_config(config: &SimulationConfig) -> Result<Self, EngineError> {
        let fill_probability = config.life.fill_probability;
        if !(0.0..=1.0).contains(&fill_probability) {
            return Err(ParameterError::ProbabilityOutOfRange {
                name: "fill probability",
                value: fill_probability,
            }
            .into());
        }
        config.epidemic.validate()?;

        Ok(Self {
            dimension: validate_dimension(config.grid.dimension)?,
            topology: config.grid.topology,
            strip_width: validate_width(config.elementary.width)?,
            strip_generations: validate_generations(config.elementary.generations)?,
            life_rule: LifeRule::parse(&config.life.rule)?,
            autostop: config.life.autostop,
            history_cap: config.life.history_cap.max(1),
            fill_probability,
            elementary_rule: ElementaryRule::from_number(config.elementary.rule)?,
            epidemic: config.epidemic,
            tick_interval: validate_tick_interval(config.timing.tick_interval())?,
        })
    }
}

/// Owns the active automaton, its persistent settings, and the running flag.
#[derive(Clone, Debug)]
pub struct Simulation {
    state: ModeState,
    settings: Settings,
    running: bool,
}

impl Simulation {
    /// Builds a paused simulation from a configuration, validating every field.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, EngineError> {
        let settings = Settings::from_config(config)?;
        let state = build_state(&settings, config.mode)?;
        info!(
            "created {} simulation on a {}x{} {:?} grid",
            config.mode, settings.dimension, settings.dimension, settings.topology
        );
        Ok(Self {
            state,
            settings,
            running: false,
        })
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> SimulationMode {
        self.state.mode()
    }

    /// Automaton backing the active mode.
    #[must_use]
    pub const fn state(&self) -> &ModeState {
        &self.state
    }

    /// Captures the active automaton's cells.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Reports whether host ticks currently advance the simulation.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Lets subsequent ticks advance the simulation.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Makes subsequent ticks no-ops.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Cadence the host should use between ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.settings.tick_interval
    }

    /// Validates and stores a new tick cadence.
    pub fn set_tick_interval(&mut self, interval: Duration) -> Result<(), EngineError> {
        self.settings.tick_interval = validate_tick_interval(interval)?;
        Ok(())
    }

    /// Switches to `mode`, discarding every cell, history, and statistic.
    pub fn select_mode(&mut self, mode: SimulationMode) -> Result<(), EngineError> {
        self.state = build_state(&self.settings, mode)?;
        self.running = false;
        info!("switched to {mode} mode");
        Ok(())
    }

    /// Reinitializes the square grid used by the life and epidemic modes.
    ///
    /// The new shape is remembered while the elementary mode is active and
    /// used the next time a square mode is selected.
    pub fn resize(&mut self, dimension: u32, topology: Topology) -> Result<(), EngineError> {
        let dimension = validate_dimension(dimension)?;
        self.settings.dimension = dimension;
        self.settings.topology = topology;
        if self.mode() != SimulationMode::Elementary {
            self.rebuild()?;
        }
        Ok(())
    }

    /// Reinitializes the elementary strip.
    pub fn resize_strip(&mut self, width: u32, generations: u32) -> Result<(), EngineError> {
        let width = validate_width(width)?;
        let generations = validate_generations(generations)?;
        self.settings.strip_width = width;
        self.settings.strip_generations = generations;
        if self.mode() == SimulationMode::Elementary {
            self.rebuild()?;
        }
        Ok(())
    }

    /// Parses and installs a life-like rule; cells are left untouched.
    pub fn apply_life_rule(&mut self, text: &str) -> Result<LifeRule, EngineError> {
        let rule = LifeRule::parse(text)?;
        self.settings.life_rule = rule;
        if let ModeState::Life(life) = &mut self.state {
            life.set_rule(rule);
        }
        info!("installed life rule {rule}");
        Ok(rule)
    }

    /// Validates and installs an elementary rule number.
    pub fn apply_elementary_rule(&mut self, number: i64) -> Result<ElementaryRule, EngineError> {
        let rule = ElementaryRule::from_number(number)?;
        self.settings.elementary_rule = rule;
        if let ModeState::Elementary(strip) = &mut self.state {
            strip.set_rule(rule);
        }
        info!("installed elementary {rule}");
        Ok(rule)
    }

    /// Validates and installs epidemic parameters.
    pub fn apply_epidemic_params(&mut self, params: EpidemicParams) -> Result<(), EngineError> {
        params.validate()?;
        self.settings.epidemic = params;
        if let ModeState::Epidemic(epidemic) = &mut self.state {
            epidemic.set_params(params)?;
        }
        Ok(())
    }

    /// Replaces the life-like autostop conditions.
    pub fn set_autostop(&mut self, policy: AutostopPolicy) {
        self.settings.autostop = policy;
        if let ModeState::Life(life) = &mut self.state {
            life.set_policy(policy);
        }
    }

    /// Stores `value` at `cell`.
    ///
    /// Elementary edits address the current row, so only the column is used.
    /// Returns `Ok(false)` when the cell lies outside the grid.
    pub fn set_cell(&mut self, cell: CellCoord, value: CellValue) -> Result<bool, EngineError> {
        let actual = self.mode();
        match (&mut self.state, value) {
            (ModeState::Life(life), CellValue::Binary(alive)) => Ok(life.set_cell(cell, alive)),
            (ModeState::Elementary(strip), CellValue::Binary(alive)) => {
                Ok(strip.set_cell(cell.column(), alive))
            }
            (ModeState::Epidemic(epidemic), CellValue::Epidemic { state, .. }) => {
                Ok(epidemic.set_cell(cell, state))
            }
            (_, CellValue::Binary(_)) => Err(EngineError::ModeMismatch {
                expected: SimulationMode::Life,
                actual,
            }),
            (_, CellValue::Epidemic { .. }) => Err(EngineError::ModeMismatch {
                expected: SimulationMode::Epidemic,
                actual,
            }),
        }
    }

    /// Applies the mode's manual edit: toggle for binary cells, S → I → R → V
    /// for the epidemic. Returns the stored value, or `None` outside the grid.
    pub fn edit_cell(&mut self, cell: CellCoord) -> Option<CellValue> {
        match &mut self.state {
            ModeState::Life(life) => life.toggle_cell(cell).map(CellValue::Binary),
            ModeState::Elementary(strip) => strip.toggle_cell(cell.column()).map(CellValue::Binary),
            ModeState::Epidemic(epidemic) => {
                epidemic
                    .cycle_cell(cell)
                    .map(|state| CellValue::Epidemic {
                        state,
                        infection_age: 0,
                    })
            }
        }
    }

    /// Seeds the active mode with random content.
    pub fn randomize<S>(&mut self, source: &mut S)
    where
        S: UniformSource + ?Sized,
    {
        match &mut self.state {
            ModeState::Life(life) => life.randomize(source, self.settings.fill_probability),
            ModeState::Elementary(strip) => strip.seed_random(source),
            ModeState::Epidemic(epidemic) => epidemic.randomize(source),
        }
    }

    /// Seeds the elementary strip with a single centered live cell.
    pub fn seed_single(&mut self) -> Result<(), EngineError> {
        let actual = self.mode();
        match &mut self.state {
            ModeState::Elementary(strip) => {
                strip.seed_single();
                Ok(())
            }
            _ => Err(EngineError::ModeMismatch {
                expected: SimulationMode::Elementary,
                actual,
            }),
        }
    }

    /// Resets every cell of the active mode to its empty value.
    pub fn clear(&mut self) {
        match &mut self.state {
            ModeState::Life(life) => life.clear(),
            ModeState::Elementary(strip) => strip.clear(),
            ModeState::Epidemic(epidemic) => epidemic.clear(),
        }
    }

    /// Clears the life grid and places a catalogue pattern.
    pub fn load_preset(&mut self, preset: Preset) -> Result<(), EngineError> {
        self.life_mut()?.load_preset(preset);
        Ok(())
    }

    /// Seeds the life grid from an external variate sequence.
    pub fn load_from_variates(
        &mut self,
        values: &[f64],
        threshold: f64,
    ) -> Result<(), EngineError> {
        self.life_mut()?.load_from_variates(values, threshold);
        Ok(())
    }

    /// Brings the `k` cells with the largest variates alive.
    pub fn load_top_k(&mut self, values: &[f64], k: usize) -> Result<(), EngineError> {
        self.life_mut()?.load_top_k(values, k);
        Ok(())
    }

    /// Replaces the active state with persisted life cells.
    pub fn restore_life(
        &mut self,
        cells: SquareGrid<bool>,
        topology: Topology,
    ) -> Result<(), EngineError> {
        let dimension = cells.dimension();
        let mut life = LifeAutomaton::from_cells(cells, topology)?;
        configure_life(&mut life, &self.settings);
        self.settings.dimension = dimension;
        self.settings.topology = topology;
        self.install(ModeState::Life(life));
        Ok(())
    }

    /// Replaces the active state with a persisted epidemic population.
    pub fn restore_epidemic(
        &mut self,
        cells: SquareGrid<EpidemicCell>,
        topology: Topology,
    ) -> Result<(), EngineError> {
        let dimension = cells.dimension();
        let mut epidemic = EpidemicAutomaton::from_cells(cells, topology)?;
        epidemic.set_params(self.settings.epidemic)?;
        self.settings.dimension = dimension;
        self.settings.topology = topology;
        self.install(ModeState::Epidemic(epidemic));
        Ok(())
    }

    /// Replaces the active state with persisted elementary generations.
    pub fn restore_elementary(
        &mut self,
        width: u32,
        generations: u32,
        rule: ElementaryRule,
        rows: Vec<Vec<bool>>,
    ) -> Result<(), EngineError> {
        let strip = ElementaryAutomaton::from_history(width, generations, rule, rows)?;
        self.settings.strip_width = width;
        self.settings.strip_generations = generations;
        self.settings.elementary_rule = rule;
        self.install(ModeState::Elementary(strip));
        Ok(())
    }

    /// Host timer callback: steps only while running.
    ///
    /// An autostop condition pauses the simulation before the report is returned.
    pub fn tick<S>(&mut self, source: &mut S) -> Option<StepReport>
    where
        S: UniformSource + ?Sized,
    {
        if !self.running {
            return None;
        }
        Some(self.step_once(source))
    }

    /// Performs a single generation regardless of the running flag.
    pub fn step_once<S>(&mut self, source: &mut S) -> StepReport
    where
        S: UniformSource + ?Sized,
    {
        let report = match &mut self.state {
            ModeState::Life(life) => life.step(),
            ModeState::Elementary(strip) => strip.step(),
            ModeState::Epidemic(epidemic) => epidemic.step(source),
        };

        if let Some(reason) = report.autostop {
            if self.running {
                info!(
                    "autostop at generation {}: {}",
                    report.generation,
                    reason.description()
                );
            }
            self.running = false;
        }
        report
    }

    fn life_mut(&mut self) -> Result<&mut LifeAutomaton, EngineError> {
        let actual = self.mode();
        match &mut self.state {
            ModeState::Life(life) => Ok(life),
            _ => Err(EngineError::ModeMismatch {
                expected: SimulationMode::Life,
                actual,
            }),
        }
    }

    fn rebuild(&mut self) -> Result<(), EngineError> {
        let state = build_state(&self.settings, self.mode())?;
        self.install(state);
        Ok(())
    }

    fn install(&mut self, state: ModeState) {
        self.state = state;
        self.running = false;
    }
}

impl Default for Simulation {
    fn default() -> Self {
        let config = SimulationConfig::default();
        let settings = Settings {
            dimension: config.grid.dimension,
            topology: config.grid.topology,
            strip_width: config.elementary.width,
            strip_generations: config.elementary.generations,
            life_rule: LifeRule::conway(),
            autostop: config.life.autostop,
            history_cap: config.life.history_cap,
            fill_probability: config.life.fill_probability,
            elementary_rule: ElementaryRule::default(),
            epidemic: config.epidemic,
            tick_interval: config.timing.tick_interval(),
        };
        let mut life = LifeAutomaton::default();
        configure_life(&mut life, &settings);
        Self {
            state: ModeState::Life(life),
            settings,
            running: false,
        }
    }
}

fn configure_life(life: &mut LifeAutomaton, settings: &Settings) {
    life.set_rule(settings.life_rule);
    life.set_policy(settings.autostop);
    life.set_history_capacity(settings.history_cap);
}

fn build_state(settings: &Settings, mode: SimulationMode) -> Result<ModeState, EngineError> {
    let state = match mode {
        SimulationMode::Life => {
            let mut life = LifeAutomaton::new(settings.dimension, settings.topology)?;
            configure_life(&mut life, settings);
            ModeState::Life(life)
        }
        SimulationMode::Elementary => {
            let mut strip =
                ElementaryAutomaton::new(settings.strip_width, settings.strip_generations)?;
            strip.set_rule(settings.elementary_rule);
            ModeState::Elementary(strip)
        }
        SimulationMode::Epidemic => {
            let mut epidemic = EpidemicAutomaton::new(settings.dimension, settings.topology)?;
            epidemic.set_params(settings.epidemic)?;
            ModeState::Epidemic(epidemic)
        }
    };
    Ok(state)
}

/// Executes `command` against the simulation and records the resulting events.
///
/// Rejected commands leave the simulation untouched and emit
/// [`Event::CommandRejected`].
pub fn apply(
    simulation: &mut Simulation,
    command: Command,
    source: &mut dyn UniformSource,
    out_events: &mut Vec<Event>,
) {
    if let Err(error) = execute(simulation, command, source, out_events) {
        out_events.push(Event::CommandRejected { error });
    }
}

fn execute(
    simulation: &mut Simulation,
    command: Command,
    source: &mut dyn UniformSource,
    out_events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    match command {
        Command::SelectMode { mode } => {
            simulation.select_mode(mode)?;
            out_events.push(Event::ModeSelected { mode });
            push_grid_reset(simulation, out_events);
        }
        Command::ResizeGrid {
            dimension,
            topology,
        } => {
            simulation.resize(dimension, topology)?;
            if simulation.mode() == SimulationMode::Elementary {
                out_events.push(Event::GridShapeStored {
                    dimension,
                    topology,
                });
            } else {
                push_grid_reset(simulation, out_events);
            }
        }
        Command::ResizeStrip { width, generations } => {
            simulation.resize_strip(width, generations)?;
            if simulation.mode() == SimulationMode::Elementary {
                push_grid_reset(simulation, out_events);
            } else {
                out_events.push(Event::StripShapeStored { width, generations });
            }
        }
        Command::ApplyLifeRule { rule } => {
            let _ = simulation.apply_life_rule(&rule)?;
            out_events.push(Event::RuleApplied {
                mode: SimulationMode::Life,
            });
        }
        Command::ApplyElementaryRule { rule_number } => {
            let _ = simulation.apply_elementary_rule(rule_number)?;
            out_events.push(Event::RuleApplied {
                mode: SimulationMode::Elementary,
            });
        }
        Command::ConfigureEpidemic { params } => {
            simulation.apply_epidemic_params(params)?;
            out_events.push(Event::RuleApplied {
                mode: SimulationMode::Epidemic,
            });
        }
        Command::ConfigureAutostop { policy } => {
            simulation.set_autostop(policy);
            out_events.push(Event::RuleApplied {
                mode: SimulationMode::Life,
            });
        }
        Command::SetTickInterval { interval } => {
            simulation.set_tick_interval(interval)?;
            out_events.push(Event::TickIntervalChanged {
                interval: simulation.tick_interval(),
            });
        }
        Command::EditCell { cell } => {
            if let Some(value) = simulation.edit_cell(cell) {
                out_events.push(Event::CellEdited { cell, value });
            }
        }
        Command::Randomize => {
            simulation.randomize(source);
            out_events.push(Event::Seeded {
                mode: simulation.mode(),
            });
        }
        Command::SeedSingle => {
            simulation.seed_single()?;
            out_events.push(Event::Seeded {
                mode: SimulationMode::Elementary,
            });
        }
        Command::LoadPreset { preset } => {
            simulation.load_preset(preset)?;
            out_events.push(Event::Seeded {
                mode: SimulationMode::Life,
            });
        }
        Command::Clear => {
            simulation.clear();
            out_events.push(Event::Cleared {
                mode: simulation.mode(),
            });
        }
        Command::Start => {
            if !simulation.is_running() {
                simulation.start();
                out_events.push(Event::Started);
            }
        }
        Command::Pause => {
            if simulation.is_running() {
                simulation.pause();
                out_events.push(Event::Paused);
            }
        }
        Command::Tick => {
            if let Some(report) = simulation.tick(source) {
                push_step(report, true, out_events);
            }
        }
        Command::StepOnce => {
            let was_running = simulation.is_running();
            let report = simulation.step_once(source);
            push_step(report, was_running, out_events);
        }
    }
    Ok(())
}

fn push_grid_reset(simulation: &Simulation, out_events: &mut Vec<Event>) {
    let (rows, columns) = simulation.snapshot().dimensions();
    out_events.push(Event::GridReset {
        mode: simulation.mode(),
        rows,
        columns,
    });
}

fn push_step(report: StepReport, was_running: bool, out_events: &mut Vec<Event>) {
    out_events.push(Event::GenerationAdvanced { report });
    if let Some(reason) = report.autostop {
        out_events.push(Event::Autostopped { reason });
        if was_running {
            out_events.push(Event::Paused);
        }
    }
}

/// Query functions that provide read-only access to the simulation state.
pub mod query {
    use std::time::Duration;

    use super::{ModeState, Simulation};
    use cellsim_core::{AutostopPolicy, Census, EpidemicParams, SimulationMode, Snapshot, Topology};
    use cellsim_grid::History;
    use cellsim_system_elementary::ElementaryRule;
    use cellsim_system_epidemic::EpidemicStatistics;
    use cellsim_system_life::LifeRule;

    /// Active mode.
    #[must_use]
    pub fn mode(simulation: &Simulation) -> SimulationMode {
        simulation.mode()
    }

    /// Captures the active automaton's cells.
    #[must_use]
    pub fn snapshot(simulation: &Simulation) -> Snapshot {
        simulation.snapshot()
    }

    /// Edge length configured for the square modes.
    #[must_use]
    pub fn dimension(simulation: &Simulation) -> u32 {
        simulation.settings.dimension
    }

    /// Topology configured for the square modes.
    #[must_use]
    pub fn topology(simulation: &Simulation) -> Topology {
        simulation.settings.topology
    }

    /// Width and retained generation count configured for the elementary strip.
    #[must_use]
    pub fn strip_shape(simulation: &Simulation) -> (u32, u32) {
        (
            simulation.settings.strip_width,
            simulation.settings.strip_generations,
        )
    }

    /// Generation counter of the active automaton.
    #[must_use]
    pub fn generation(simulation: &Simulation) -> u64 {
        match simulation.state() {
            ModeState::Life(life) => life.generation(),
            ModeState::Elementary(strip) => strip.generation(),
            ModeState::Epidemic(epidemic) => epidemic.generation(),
        }
    }

    /// Reports whether host ticks advance the simulation.
    #[must_use]
    pub fn is_running(simulation: &Simulation) -> bool {
        simulation.is_running()
    }

    /// Cadence the host should use between ticks.
    #[must_use]
    pub fn tick_interval(simulation: &Simulation) -> Duration {
        simulation.tick_interval()
    }

    /// Current epidemic census, when the epidemic mode is active.
    #[must_use]
    pub fn census(simulation: &Simulation) -> Option<Census> {
        match simulation.state() {
            ModeState::Epidemic(epidemic) => Some(epidemic.census()),
            _ => None,
        }
    }

    /// Recorded epidemic series, when the epidemic mode is active.
    #[must_use]
    pub fn statistics(simulation: &Simulation) -> Option<&EpidemicStatistics> {
        match simulation.state() {
            ModeState::Epidemic(epidemic) => Some(epidemic.statistics()),
            _ => None,
        }
    }

    /// Configured life-like rule.
    #[must_use]
    pub fn life_rule(simulation: &Simulation) -> LifeRule {
        simulation.settings.life_rule
    }

    /// Configured life-like autostop conditions.
    #[must_use]
    pub fn autostop(simulation: &Simulation) -> AutostopPolicy {
        simulation.settings.autostop
    }

    /// Configured elementary rule.
    #[must_use]
    pub fn elementary_rule(simulation: &Simulation) -> ElementaryRule {
        simulation.settings.elementary_rule
    }

    /// Configured epidemic parameters.
    #[must_use]
    pub fn epidemic_params(simulation: &Simulation) -> EpidemicParams {
        simulation.settings.epidemic
    }

    /// Retained elementary rows, when the elementary mode is active.
    #[must_use]
    pub fn elementary_history(simulation: &Simulation) -> Option<&History<Vec<bool>>> {
        match simulation.state() {
            ModeState::Elementary(strip) => Some(strip.history()),
            _ => None,
        }
    }

    /// Flattened numeric state of the active automaton.
    ///
    /// Binary cells map to `0`/`1` (the elementary mode exports its current
    /// row); epidemic cells map to S=0, I=1, R=2, V=3.
    #[must_use]
    pub fn flat_state(simulation: &Simulation) -> Vec<u8> {
        match simulation.state() {
            ModeState::Life(life) => life
                .cells()
                .cells()
                .iter()
                .map(|alive| u8::from(*alive))
                .collect(),
            ModeState::Elementary(strip) => {
                strip.state().iter().map(|alive| u8::from(*alive)).collect()
            }
            ModeState::Epidemic(epidemic) => epidemic
                .cells()
                .cells()
                .iter()
                .map(|cell| cell.state.code())
                .collect(),
        }
    }
}
