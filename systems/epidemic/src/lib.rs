#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent-based susceptible/infected/recovered/vaccinated model on a square grid.
//!
//! Unlike the binary automata this model evolves a single grid in place. A
//! generation runs three phases in order:
//!
//! 1. movement, where individuals swap places with a random neighbor,
//! 2. infection, where infected individuals expose susceptible neighbors and
//!    age towards recovery,
//! 3. commit, where every queued exposure that still targets a susceptible
//!    individual becomes an infection.

use cellsim_core::{
    choose, Automaton, AutostopReason, Census, CellCoord, CellValue, DimensionError,
    EpidemicParams, EpidemicState, ParameterError, SimulationMode, Snapshot, StepReport, Topology,
    UniformSource, DEFAULT_GRID_DIMENSION,
};
use cellsim_grid::{neighbors, validate_dimension, SquareGrid};
use log::{debug, info};

mod statistics;

pub use statistics::{EpidemicStatistics, StatisticsSeries};

/// Single individual of the epidemic grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EpidemicCell {
    /// Compartment the individual occupies.
    pub state: EpidemicState,
    /// Steps since the infection started; zero for every other state.
    pub infection_age: u32,
}

impl EpidemicCell {
    /// Fresh individual in `state` with a zero infection age.
    #[must_use]
    pub const fn new(state: EpidemicState) -> Self {
        Self {
            state,
            infection_age: 0,
        }
    }
}

/// Epidemic automaton owning the population grid and its census series.
#[derive(Clone, Debug)]
pub struct EpidemicAutomaton {
    grid: SquareGrid<EpidemicCell>,
    topology: Topology,
    params: EpidemicParams,
    statistics: EpidemicStatistics,
    generation: u64,
}

impl EpidemicAutomaton {
    /// Creates an N×N grid where everyone is susceptible.
    pub fn new(dimension: u32, topology: Topology) -> Result<Self, DimensionError> {
        let dimension = validate_dimension(dimension)?;
        Ok(Self::empty(dimension, topology))
    }

    fn empty(dimension: u32, topology: Topology) -> Self {
        Self {
            grid: SquareGrid::new(dimension, EpidemicCell::default()),
            topology,
            params: EpidemicParams::default(),
            statistics: EpidemicStatistics::default(),
            generation: 0,
        }
    }

    /// Creates an automaton populated with `cells`.
    pub fn from_cells(
        cells: SquareGrid<EpidemicCell>,
        topology: Topology,
    ) -> Result<Self, DimensionError> {
        let mut automaton = Self::new(cells.dimension(), topology)?;
        automaton.grid = cells;
        Ok(automaton)
    }

    /// Edge length of the grid.
    #[must_use]
    pub const fn dimension(&self) -> u32 {
        self.grid.dimension()
    }

    /// Neighbor topology fixed at construction.
    #[must_use]
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Active parameters.
    #[must_use]
    pub const fn params(&self) -> EpidemicParams {
        self.params
    }

    /// Validates and installs new parameters; the grid is left untouched.
    pub fn set_params(&mut self, params: EpidemicParams) -> Result<(), ParameterError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Current population.
    #[must_use]
    pub fn cells(&self) -> &SquareGrid<EpidemicCell> {
        &self.grid
    }

    /// Recorded census series.
    #[must_use]
    pub fn statistics(&self) -> &EpidemicStatistics {
        &self.statistics
    }

    /// Number of steps taken since the last reseed.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Tallies the current population.
    #[must_use]
    pub fn census(&self) -> Census {
        Census::from_states(self.grid.cells().iter().map(|cell| cell.state))
    }

    /// Seeds the population from the configured initial fractions.
    ///
    /// One variate `r` is drawn per cell: `r < infected` seeds an infection,
    /// `r < infected + vaccinated` a vaccination, anything else stays
    /// susceptible. The statistics restart with the seeded census.
    pub fn randomize<S>(&mut self, source: &mut S)
    where
        S: UniformSource + ?Sized,
    {
        let infected = self.params.initial_infected;
        let vaccinated = infected + self.params.initial_vaccinated;
        for cell in self.grid.cells_mut() {
            let roll = source.draw();
            let state = if roll < infected {
                EpidemicState::Infected
            } else if roll < vaccinated {
                EpidemicState::Vaccinated
            } else {
                EpidemicState::Susceptible
            };
            *cell = EpidemicCell::new(state);
        }

        self.generation = 0;
        self.statistics.clear();
        let census = self.census();
        self.statistics.record(census);
        info!(
            "seeded epidemic grid: S={} I={} R={} V={}",
            census.susceptible, census.infected, census.recovered, census.vaccinated
        );
    }

    /// Advances a cell through S → I → R → V → S, resetting its age.
    pub fn cycle_cell(&mut self, cell: CellCoord) -> Option<EpidemicState> {
        let next = self.grid.get(cell)?.state.next();
        let _ = self.set_cell(cell, next);
        Some(next)
    }

    /// Places `state` at `cell` with a zero age. Edits outside the grid are ignored.
    pub fn set_cell(&mut self, cell: CellCoord, state: EpidemicState) -> bool {
        let applied = self.grid.set(cell, EpidemicCell::new(state));
        if applied {
            self.statistics.clear();
        }
        applied
    }

    /// Makes everyone susceptible again.
    pub fn clear(&mut self) {
        self.grid.fill(EpidemicCell::default());
        self.statistics.clear();
        self.generation = 0;
    }

    /// Runs movement, infection, and commit, then records the census.
    pub fn step<S>(&mut self, source: &mut S) -> StepReport
    where
        S: UniformSource + ?Sized,
    {
        let before = self.grid.clone();

        self.move_individuals(source);
        let exposed = self.spread_infection(source);
        for cell in exposed {
            if let Some(target) = self.grid.get_mut(cell) {
                if target.state == EpidemicState::Susceptible {
                    *target = EpidemicCell::new(EpidemicState::Infected);
                }
            }
        }

        self.generation = self.generation.saturating_add(1);
        let census = self.census();
        self.statistics.record(census);
        let autostop = (census.infected == 0).then_some(AutostopReason::EpidemicContained);

        debug!(
            "epidemic generation {}: S={} I={} R={} V={}",
            self.generation,
            census.susceptible,
            census.infected,
            census.recovered,
            census.vaccinated
        );

        StepReport {
            generation: self.generation,
            changed: before != self.grid,
            autostop,
        }
    }

    fn move_individuals<S>(&mut self, source: &mut S)
    where
        S: UniformSource + ?Sized,
    {
        let dimension = self.grid.dimension();
        let mut swaps = Vec::new();
        for cell in self.grid.coords() {
            if source.draw() < self.params.movement_probability {
                let neighborhood = neighbors(dimension, self.topology, cell);
                if let Some(target) = choose(source, neighborhood.as_slice()) {
                    swaps.push((cell, *target));
                }
            }
        }

        for (first, second) in swaps {
            self.grid.swap_cells(first, second);
        }
    }

    /// Exposes susceptible neighbors of every infected cell and ages infections.
    ///
    /// Recoveries take effect immediately, so a cell that recovers this step
    /// does not expose cells visited after it.
    fn spread_infection<S>(&mut self, source: &mut S) -> Vec<CellCoord>
    where
        S: UniformSource + ?Sized,
    {
        let dimension = self.grid.dimension();
        let recovery_time = self.params.recovery_time;
        let mut exposed = Vec::new();

        for row in 0..dimension {
            for column in 0..dimension {
                let cell = CellCoord::new(row, column);
                let is_infected = self
                    .grid
                    .get(cell)
                    .is_some_and(|individual| individual.state == EpidemicState::Infected);
                if !is_infected {
                    continue;
                }

                for neighbor in neighbors(dimension, self.topology, cell).iter() {
                    let susceptible = self
                        .grid
                        .get(neighbor)
                        .is_some_and(|individual| individual.state == EpidemicState::Susceptible);
                    if susceptible && source.draw() < self.params.infection_probability {
                        exposed.push(neighbor);
                    }
                }

                if let Some(individual) = self.grid.get_mut(cell) {
                    individual.infection_age += 1;
                    if individual.infection_age >= recovery_time {
                        *individual = EpidemicCell::new(EpidemicState::Recovered);
                    }
                }
            }
        }

        exposed
    }
}

impl Default for EpidemicAutomaton {
    fn default() -> Self {
        Self::empty(DEFAULT_GRID_DIMENSION, Topology::Bounded)
    }
}

impl Automaton for EpidemicAutomaton {
    fn mode(&self) -> SimulationMode {
        SimulationMode::Epidemic
    }

    fn advance(&mut self, source: &mut dyn UniformSource) -> StepReport {
        self.step(source)
    }

    fn snapshot(&self) -> Snapshot {
        let dimension = self.dimension();
        let cells = self
            .grid
            .cells()
            .iter()
            .map(|cell| CellValue::Epidemic {
                state: cell.state,
                infection_age: cell.infection_age,
            })
            .collect();
        Snapshot::new(
            SimulationMode::Epidemic,
            dimension,
            dimension,
            self.topology,
            self.generation,
            cells,
        )
    }
}
