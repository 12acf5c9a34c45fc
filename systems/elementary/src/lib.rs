#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! One-dimensional elementary automaton with a scrolling generation history.

use std::mem;

use cellsim_core::{
    Automaton, CellValue, DimensionError, ImportFormatError, SimulationMode, Snapshot,
    StepReport, Topology, UniformSource, DEFAULT_STRIP_GENERATIONS, DEFAULT_STRIP_WIDTH,
    MAX_STRIP_LENGTH, MIN_STRIP_LENGTH,
};
use cellsim_grid::History;
use log::{debug, info};

mod rule;

pub use rule::{ElementaryRule, CATALOGUE};

/// Validates the number of cells per row.
pub fn validate_width(width: u32) -> Result<u32, DimensionError> {
    DimensionError::check("strip width", width, MIN_STRIP_LENGTH, MAX_STRIP_LENGTH)
}

/// Validates the number of retained generations.
pub fn validate_generations(generations: u32) -> Result<u32, DimensionError> {
    DimensionError::check(
        "generation count",
        generations,
        MIN_STRIP_LENGTH,
        MAX_STRIP_LENGTH,
    )
}

/// Writes the successor of `row` into `next`, wrapping at both ends.
pub fn evolve_into(row: &[bool], next: &mut Vec<bool>, rule: ElementaryRule) {
    let width = row.len();
    next.clear();
    next.extend((0..width).map(|index| {
        let left = row[(index + width - 1) % width];
        let right = row[(index + 1) % width];
        rule.output(left, row[index], right)
    }));
}

/// Computes the successor of `row`, wrapping at both ends.
#[must_use]
pub fn evolve(row: &[bool], rule: ElementaryRule) -> Vec<bool> {
    let mut next = Vec::with_capacity(row.len());
    evolve_into(row, &mut next, rule);
    next
}

/// Elementary automaton holding the current row and its recent predecessors.
#[derive(Clone, Debug)]
pub struct ElementaryAutomaton {
    current: Vec<bool>,
    scratch: Vec<bool>,
    rule: ElementaryRule,
    history: History<Vec<bool>>,
    generation: u64,
}

impl ElementaryAutomaton {
    /// Creates an all-dead strip with an empty history.
    pub fn new(width: u32, generations: u32) -> Result<Self, DimensionError> {
        let width = validate_width(width)?;
        let generations = validate_generations(generations)?;
        Ok(Self::empty(width, generations))
    }

    fn empty(width: u32, generations: u32) -> Self {
        Self {
            current: vec![false; width as usize],
            scratch: Vec::with_capacity(width as usize),
            rule: ElementaryRule::default(),
            history: History::new(generations as usize),
            generation: 0,
        }
    }

    /// Rebuilds an automaton from persisted generations, oldest first.
    ///
    /// The newest row becomes the current state. Nothing is built unless every
    /// row matches `width` and the rows fit within `generations`.
    pub fn from_history(
        width: u32,
        generations: u32,
        rule: ElementaryRule,
        rows: Vec<Vec<bool>>,
    ) -> Result<Self, ImportFormatError> {
        let mut automaton = Self::new(width, generations)?;
        if rows.is_empty() {
            return Err(ImportFormatError::MissingGenerations);
        }
        if rows.len() > generations as usize {
            return Err(ImportFormatError::TooManyGenerations {
                cap: generations,
                found: rows.len(),
            });
        }
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != width as usize)
        {
            return Err(ImportFormatError::ColumnCountMismatch {
                row,
                expected: width,
                found: cells.len(),
            });
        }

        automaton.rule = rule;
        for row in rows {
            automaton.current.clone_from(&row);
            let _ = automaton.history.push(row);
        }
        Ok(automaton)
    }

    /// Number of cells per row.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.current.len() as u32
    }

    /// Number of generations retained for display.
    #[must_use]
    pub fn generation_cap(&self) -> u32 {
        self.history.capacity() as u32
    }

    /// Changes the retained generation count, keeping the newest rows.
    pub fn set_generation_cap(&mut self, generations: u32) -> Result<(), DimensionError> {
        let generations = validate_generations(generations)?;
        self.history.set_capacity(generations as usize);
        Ok(())
    }

    /// Active rule.
    #[must_use]
    pub const fn rule(&self) -> ElementaryRule {
        self.rule
    }

    /// Installs a new rule without touching the cells.
    pub fn set_rule(&mut self, rule: ElementaryRule) {
        self.rule = rule;
    }

    /// Current row.
    #[must_use]
    pub fn state(&self) -> &[bool] {
        &self.current
    }

    /// Retained rows, oldest first.
    #[must_use]
    pub fn history(&self) -> &History<Vec<bool>> {
        &self.history
    }

    /// Number of steps taken since the last reseed.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Seeds a single live cell at `width / 2`.
    pub fn seed_single(&mut self) {
        self.current.fill(false);
        let middle = self.current.len() / 2;
        if let Some(cell) = self.current.get_mut(middle) {
            *cell = true;
        }
        self.reseed();
        info!("seeded elementary strip with a single cell at column {middle}");
    }

    /// Seeds every cell alive with probability one half.
    pub fn seed_random<S>(&mut self, source: &mut S)
    where
        S: UniformSource + ?Sized,
    {
        for cell in &mut self.current {
            *cell = source.draw() < 0.5;
        }
        self.reseed();
    }

    /// Kills every cell and forgets the history.
    pub fn clear(&mut self) {
        self.current.fill(false);
        self.history.clear();
        self.generation = 0;
    }

    /// Sets one cell of the current row, mirroring it into the newest
    /// history row. Edits outside the strip are ignored.
    pub fn set_cell(&mut self, column: u32, alive: bool) -> bool {
        let index = column as usize;
        let Some(cell) = self.current.get_mut(index) else {
            return false;
        };
        *cell = alive;
        if let Some(mirrored) = self
            .history
            .latest_mut()
            .and_then(|latest| latest.get_mut(index))
        {
            *mirrored = alive;
        }
        true
    }

    /// Flips one cell of the current row, returning its new value.
    pub fn toggle_cell(&mut self, column: u32) -> Option<bool> {
        let alive = !*self.current.get(column as usize)?;
        let _ = self.set_cell(column, alive);
        Some(alive)
    }

    /// Computes the next row and appends it to the history.
    pub fn step(&mut self) -> StepReport {
        if self.history.is_empty() {
            let _ = self.history.push(self.current.clone());
        }

        evolve_into(&self.current, &mut self.scratch, self.rule);
        let changed = self.scratch != self.current;
        mem::swap(&mut self.current, &mut self.scratch);
        let _ = self.history.push(self.current.clone());
        self.generation = self.generation.saturating_add(1);

        debug!(
            "elementary generation {} under {} changed={changed}",
            self.generation, self.rule
        );

        StepReport {
            generation: self.generation,
            changed,
            autostop: None,
        }
    }

    fn reseed(&mut self) {
        self.history.clear();
        let _ = self.history.push(self.current.clone());
        self.generation = 0;
    }
}

impl Default for ElementaryAutomaton {
    fn default() -> Self {
        Self::empty(DEFAULT_STRIP_WIDTH, DEFAULT_STRIP_GENERATIONS)
    }
}

impl Automaton for ElementaryAutomaton {
    fn mode(&self) -> SimulationMode {
        SimulationMode::Elementary
    }

    fn advance(&mut self, _source: &mut dyn UniformSource) -> StepReport {
        self.step()
    }

    /// Rows are the retained generations, or the current row alone when the
    /// history is empty.
    fn snapshot(&self) -> Snapshot {
        let cells: Vec<CellValue> = if self.history.is_empty() {
            self.current.iter().map(|alive| CellValue::Binary(*alive)).collect()
        } else {
            self.history
                .iter()
                .flatten()
                .map(|alive| CellValue::Binary(*alive))
                .collect()
        };
        let rows = self.history.len().max(1) as u32;
        Snapshot::new(
            SimulationMode::Elementary,
            rows,
            self.width(),
            Topology::Toroidal,
            self.generation,
            cells,
        )
    }
}
