#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Two-dimensional life-like automaton with fingerprint-based autostop.

use std::cmp::Ordering;

use cellsim_core::{
    Automaton, AutostopPolicy, AutostopReason, CellCoord, CellValue, DimensionError, Preset,
    SimulationMode, Snapshot, StepReport, Topology, UniformSource, DEFAULT_GRID_DIMENSION,
    DEFAULT_HISTORY_CAP,
};
use cellsim_grid::{neighbors, validate_dimension, DoubleBuffer, History, SquareGrid};
use log::{debug, info};
use sha2::{Digest, Sha256};

pub mod presets;
mod rule;

pub use rule::{LifeRule, NeighborSet};

/// Probability that a cell starts alive when the host randomizes without a preference.
pub const DEFAULT_FILL_PROBABILITY: f64 = 0.3;
/// Variate threshold used when seeding from an external uniform sequence.
pub const DEFAULT_VARIATE_THRESHOLD: f64 = 0.5;

/// SHA-256 digest of a flattened generation, used as an equality proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Hashes the grid as one `0`/`1` byte per cell in row-major order.
#[must_use]
pub fn fingerprint(grid: &SquareGrid<bool>) -> Fingerprint {
    let mut hasher = Sha256::new();
    let flattened: Vec<u8> = grid.cells().iter().map(|alive| u8::from(*alive)).collect();
    hasher.update(&flattened);
    Fingerprint(hasher.finalize().into())
}

/// Writes the successor of `current` into `next` and reports whether any cell changed.
///
/// Every read observes `current`, so no cell sees a value written during the
/// same generation.
pub fn step_into(
    current: &SquareGrid<bool>,
    next: &mut SquareGrid<bool>,
    rule: LifeRule,
    topology: Topology,
) -> bool {
    debug_assert_eq!(current.dimension(), next.dimension());
    let dimension = current.dimension();
    let mut changed = false;

    for (index, cell) in current.coords().enumerate() {
        let alive = current.cells()[index];
        let live_neighbors = neighbors(dimension, topology, cell)
            .iter()
            .filter(|neighbor| current.get(*neighbor).copied().unwrap_or(false))
            .count() as u32;
        let successor = rule.next_state(alive, live_neighbors);
        changed |= successor != alive;
        next.cells_mut()[index] = successor;
    }

    changed
}

/// Life-like automaton owning its double buffer, rule, and fingerprint history.
#[derive(Clone, Debug)]
pub struct LifeAutomaton {
    buffers: DoubleBuffer<bool>,
    topology: Topology,
    rule: LifeRule,
    policy: AutostopPolicy,
    history: History<Fingerprint>,
    generation: u64,
}

impl LifeAutomaton {
    /// Creates an empty N×N grid.
    pub fn new(dimension: u32, topology: Topology) -> Result<Self, DimensionError> {
        let dimension = validate_dimension(dimension)?;
        Ok(Self::empty(dimension, topology))
    }

    fn empty(dimension: u32, topology: Topology) -> Self {
        Self {
            buffers: DoubleBuffer::new(dimension, false),
            topology,
            rule: LifeRule::conway(),
            policy: AutostopPolicy::default(),
            history: History::new(DEFAULT_HISTORY_CAP),
            generation: 0,
        }
    }

    /// Creates an automaton whose first generation is `cells`.
    pub fn from_cells(
        cells: SquareGrid<bool>,
        topology: Topology,
    ) -> Result<Self, DimensionError> {
        let mut automaton = Self::new(cells.dimension(), topology)?;
        automaton.buffers.replace_front(cells);
        Ok(automaton)
    }

    /// Edge length of the grid.
    #[must_use]
    pub fn dimension(&self) -> u32 {
        self.buffers.front().dimension()
    }

    /// Neighbor topology fixed at construction.
    #[must_use]
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Active birth/survival rule.
    #[must_use]
    pub const fn rule(&self) -> LifeRule {
        self.rule
    }

    /// Installs a new rule; the grid is left untouched.
    pub fn set_rule(&mut self, rule: LifeRule) {
        self.rule = rule;
    }

    /// Active autostop policy.
    #[must_use]
    pub const fn policy(&self) -> AutostopPolicy {
        self.policy
    }

    /// Replaces the autostop policy.
    pub fn set_policy(&mut self, policy: AutostopPolicy) {
        self.policy = policy;
    }

    /// Changes how many fingerprints are retained for cycle detection.
    pub fn set_history_capacity(&mut self, capacity: usize) {
        self.history.set_capacity(capacity);
    }

    /// Retained fingerprints, oldest first.
    #[must_use]
    pub fn history(&self) -> &History<Fingerprint> {
        &self.history
    }

    /// Number of steps taken since the last reseed.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Current generation.
    #[must_use]
    pub fn cells(&self) -> &SquareGrid<bool> {
        self.buffers.front()
    }

    /// Number of live cells.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.cells().cells().iter().filter(|alive| **alive).count()
    }

    /// Reports whether every cell is dead.
    #[must_use]
    pub fn is_extinct(&self) -> bool {
        !self.cells().cells().iter().any(|alive| *alive)
    }

    /// Paints a single cell. Edits outside the grid are ignored.
    pub fn set_cell(&mut self, cell: CellCoord, alive: bool) -> bool {
        let applied = self.buffers.front_mut().set(cell, alive);
        if applied {
            self.history.clear();
        }
        applied
    }

    /// Flips a single cell, returning its new value.
    pub fn toggle_cell(&mut self, cell: CellCoord) -> Option<bool> {
        let alive = !*self.cells().get(cell)?;
        let _ = self.set_cell(cell, alive);
        Some(alive)
    }

    /// Kills every cell.
    pub fn clear(&mut self) {
        self.buffers.front_mut().fill(false);
        self.reseeded();
    }

    /// Brings each cell alive independently with probability `fill_probability`.
    pub fn randomize<S>(&mut self, source: &mut S, fill_probability: f64)
    where
        S: UniformSource + ?Sized,
    {
        for cell in self.buffers.front_mut().cells_mut() {
            *cell = source.draw() < fill_probability;
        }
        self.reseeded();
    }

    /// Clears the grid and places a catalogue pattern.
    pub fn load_preset(&mut self, preset: Preset) {
        let dimension = self.dimension();
        let grid = self.buffers.front_mut();
        grid.fill(false);
        for cell in presets::placements(preset, dimension) {
            let _ = grid.set(cell, true);
        }
        info!(
            "loaded {} preset on {dimension}x{dimension} grid",
            preset.name()
        );
        self.reseeded();
    }

    /// Marks cell `i` (row-major) alive iff `values[i] >= threshold`.
    ///
    /// Only the first N² values are consumed; cells beyond the supplied values
    /// keep their state.
    pub fn load_from_variates(&mut self, values: &[f64], threshold: f64) {
        for (cell, value) in self.buffers.front_mut().cells_mut().iter_mut().zip(values) {
            *cell = *value >= threshold;
        }
        self.reseeded();
    }

    /// Brings exactly the `k` cells with the largest variates alive.
    ///
    /// Missing values count as zero and ties favor the lower index. `k == 0`
    /// leaves the grid untouched.
    pub fn load_top_k(&mut self, values: &[f64], k: usize) {
        if k == 0 {
            return;
        }

        let grid = self.buffers.front_mut();
        let mut ranked: Vec<(usize, f64)> = (0..grid.len())
            .map(|index| (index, values.get(index).copied().unwrap_or(0.0)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        grid.fill(false);
        for (index, _) in ranked.into_iter().take(k) {
            grid.cells_mut()[index] = true;
        }
        self.reseeded();
    }

    /// Advances one generation and evaluates the autostop policy.
    pub fn step(&mut self) -> StepReport {
        let changed = {
            let (current, next) = self.buffers.split();
            step_into(current, next, self.rule, self.topology)
        };
        self.buffers.swap();
        self.generation = self.generation.saturating_add(1);

        let current = fingerprint(self.buffers.front());
        let _ = self.history.push(current);
        let autostop = self.evaluate_autostop(changed, &current);

        debug!(
            "life generation {} changed={changed} alive={} autostop={autostop:?}",
            self.generation,
            self.alive_count()
        );

        StepReport {
            generation: self.generation,
            changed,
            autostop,
        }
    }

    fn evaluate_autostop(&self, changed: bool, current: &Fingerprint) -> Option<AutostopReason> {
        if self.policy.extinction && self.is_extinct() {
            return Some(AutostopReason::Extinction);
        }
        if self.policy.stagnation && !changed {
            return Some(AutostopReason::Stagnation);
        }
        if self.policy.cycle && self.history.occurrences(current) > 1 {
            return Some(AutostopReason::CycleDetected);
        }
        None
    }

    fn reseeded(&mut self) {
        self.history.clear();
        self.generation = 0;
    }
}

impl Default for LifeAutomaton {
    fn default() -> Self {
        Self::empty(DEFAULT_GRID_DIMENSION, Topology::Bounded)
    }
}

impl Automaton for LifeAutomaton {
    fn mode(&self) -> SimulationMode {
        SimulationMode::Life
    }

    fn advance(&mut self, _source: &mut dyn UniformSource) -> StepReport {
        self.step()
    }

    fn snapshot(&self) -> Snapshot {
        let dimension = self.dimension();
        let cells = self
            .cells()
            .cells()
            .iter()
            .map(|alive| CellValue::Binary(*alive))
            .collect();
        Snapshot::new(
            SimulationMode::Life,
            dimension,
            dimension,
            self.topology,
            self.generation,
            cells,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_distinguishes_single_cell_edits() {
        let mut grid = SquareGrid::new(5, false);
        let empty = fingerprint(&grid);
        assert!(grid.set(CellCoord::new(0, 0), true));
        assert_ne!(fingerprint(&grid), empty);
    }

    #[test]
    fn manual_edit_clears_history() {
        let mut life = LifeAutomaton::new(8, Topology::Bounded).expect("valid dimension");
        life.set_policy(AutostopPolicy::disabled());
        let _ = life.step();
        assert_eq!(life.history().len(), 1);
        assert_eq!(life.toggle_cell(CellCoord::new(3, 3)), Some(true));
        assert!(life.history().is_empty());
    }

    #[test]
    fn out_of_range_edits_are_ignored() {
        let mut life = LifeAutomaton::new(6, Topology::Bounded).expect("valid dimension");
        assert!(!life.set_cell(CellCoord::new(6, 0), true));
        assert_eq!(life.toggle_cell(CellCoord::new(0, 9)), None);
        assert!(life.is_extinct());
    }

    #[test]
    fn rejects_undersized_grid() {
        assert!(LifeAutomaton::new(4, Topology::Toroidal).is_err());
    }
}
