#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid storage, neighbor resolution, and bounded histories shared by the automata.

use std::{collections::VecDeque, mem};

use cellsim_core::{CellCoord, DimensionError, Topology, MAX_GRID_DIMENSION, MIN_GRID_DIMENSION};

/// Offsets of the 8-connected Moore neighborhood in row-major order.
const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Validates a square grid edge length against the supported bounds.
pub fn validate_dimension(dimension: u32) -> Result<u32, DimensionError> {
    DimensionError::check(
        "grid dimension",
        dimension,
        MIN_GRID_DIMENSION,
        MAX_GRID_DIMENSION,
    )
}

/// Dense row-major storage for an N×N grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SquareGrid<T> {
    dimension: u32,
    cells: Vec<T>,
}

impl<T: Clone> SquareGrid<T> {
    /// Creates a grid with every cell set to `fill`.
    #[must_use]
    pub fn new(dimension: u32, fill: T) -> Self {
        let side = dimension as usize;
        Self {
            dimension,
            cells: vec![fill; side * side],
        }
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> SquareGrid<T> {
    /// Builds a grid from row-major cells, returning `None` when the count does not match.
    #[must_use]
    pub fn from_cells(dimension: u32, cells: Vec<T>) -> Option<Self> {
        let side = dimension as usize;
        (cells.len() == side * side).then_some(Self { dimension, cells })
    }

    /// Edge length of the grid.
    #[must_use]
    pub const fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Number of cells stored in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell stored at `cell`, if it lies inside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&T> {
        self.index_of(cell).and_then(|index| self.cells.get(index))
    }

    /// Returns a mutable reference to the cell stored at `cell`.
    pub fn get_mut(&mut self, cell: CellCoord) -> Option<&mut T> {
        self.index_of(cell)
            .and_then(move |index| self.cells.get_mut(index))
    }

    /// Stores `value` at `cell`; returns `false` when the cell is outside the grid.
    pub fn set(&mut self, cell: CellCoord, value: T) -> bool {
        match self.get_mut(cell) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Exchanges the contents of two cells.
    pub fn swap_cells(&mut self, first: CellCoord, second: CellCoord) {
        if let (Some(a), Some(b)) = (self.index_of(first), self.index_of(second)) {
            self.cells.swap(a, b);
        }
    }

    /// Row-major view of every cell.
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Mutable row-major view of every cell.
    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Iterates the grid one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.dimension.max(1) as usize)
    }

    /// Iterates every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let dimension = self.dimension;
        (0..dimension)
            .flat_map(move |row| (0..dimension).map(move |column| CellCoord::new(row, column)))
    }

    /// Converts a coordinate into a row-major index.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() < self.dimension && cell.column() < self.dimension {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.dimension).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Neighbors of a single cell resolved against a topology.
#[derive(Clone, Copy, Debug)]
pub struct Neighborhood {
    cells: [CellCoord; 8],
    len: usize,
}

impl Neighborhood {
    /// Resolved neighbors in row-major offset order.
    #[must_use]
    pub fn as_slice(&self) -> &[CellCoord] {
        &self.cells[..self.len]
    }

    /// Number of resolved neighbors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Reports whether no neighbor was resolved.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates the resolved neighbors.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.as_slice().iter().copied()
    }
}

/// Resolves the Moore neighborhood of `cell` on an N×N grid.
///
/// Bounded grids drop neighbors that fall outside; toroidal grids wrap them
/// modulo `dimension`.
#[must_use]
pub fn neighbors(dimension: u32, topology: Topology, cell: CellCoord) -> Neighborhood {
    let mut resolved = Neighborhood {
        cells: [CellCoord::new(0, 0); 8],
        len: 0,
    };
    if dimension == 0 {
        return resolved;
    }

    let side = i64::from(dimension);
    for (row_offset, column_offset) in MOORE_OFFSETS {
        let row = i64::from(cell.row()) + row_offset;
        let column = i64::from(cell.column()) + column_offset;
        let wrapped = match topology {
            Topology::Toroidal => Some((row.rem_euclid(side), column.rem_euclid(side))),
            Topology::Bounded => {
                ((0..side).contains(&row) && (0..side).contains(&column)).then_some((row, column))
            }
        };
        if let Some((row, column)) = wrapped {
            resolved.cells[resolved.len] = CellCoord::new(row as u32, column as u32);
            resolved.len += 1;
        }
    }
    resolved
}

/// Pair of equally sized grids where the next generation is written to the back.
#[derive(Clone, Debug)]
pub struct DoubleBuffer<T> {
    front: SquareGrid<T>,
    back: SquareGrid<T>,
}

impl<T: Clone> DoubleBuffer<T> {
    /// Creates both buffers with every cell set to `fill`.
    #[must_use]
    pub fn new(dimension: u32, fill: T) -> Self {
        Self {
            front: SquareGrid::new(dimension, fill.clone()),
            back: SquareGrid::new(dimension, fill),
        }
    }

    /// Replaces the front buffer, resizing the back buffer to match.
    pub fn replace_front(&mut self, grid: SquareGrid<T>) {
        if grid.dimension() != self.back.dimension() {
            self.back = grid.clone();
        }
        self.front = grid;
    }
}

impl<T> DoubleBuffer<T> {
    /// Current generation.
    #[must_use]
    pub fn front(&self) -> &SquareGrid<T> {
        &self.front
    }

    /// Mutable access to the current generation, used by manual edits.
    pub fn front_mut(&mut self) -> &mut SquareGrid<T> {
        &mut self.front
    }

    /// Splits the buffers into the readable current and writable next generation.
    pub fn split(&mut self) -> (&SquareGrid<T>, &mut SquareGrid<T>) {
        (&self.front, &mut self.back)
    }

    /// Promotes the back buffer to the current generation.
    pub fn swap(&mut self) {
        mem::swap(&mut self.front, &mut self.back);
    }
}

/// Capped FIFO that evicts its oldest entry once full.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    /// Creates an empty history retaining at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `entry`, returning the evicted oldest entry when the cap was reached.
    pub fn push(&mut self, entry: T) -> Option<T> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Most recently pushed entry.
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Mutable access to the most recently pushed entry.
    pub fn latest_mut(&mut self) -> Option<&mut T> {
        self.entries.back_mut()
    }

    /// Iterates entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the cap, discarding the oldest entries that no longer fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            let _ = self.entries.pop_front();
        }
    }

    /// Discards every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: PartialEq> History<T> {
    /// Counts how many retained entries equal `value`.
    #[must_use]
    pub fn occurrences(&self, value: &T) -> usize {
        self.entries.iter().filter(|entry| *entry == value).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_corner_has_three_neighbors() {
        let resolved = neighbors(5, Topology::Bounded, CellCoord::new(0, 0));
        assert_eq!(
            resolved.as_slice(),
            &[
                CellCoord::new(0, 1),
                CellCoord::new(1, 0),
                CellCoord::new(1, 1)
            ]
        );
    }

    #[test]
    fn toroidal_corner_wraps_to_opposite_edges() {
        let resolved = neighbors(5, Topology::Toroidal, CellCoord::new(0, 0));
        assert_eq!(resolved.len(), 8);
        assert_eq!(resolved.as_slice()[0], CellCoord::new(4, 4));
        assert!(resolved.iter().any(|cell| cell == CellCoord::new(0, 4)));
    }

    #[test]
    fn interior_cells_ignore_topology() {
        let cell = CellCoord::new(2, 2);
        let bounded: Vec<_> = neighbors(5, Topology::Bounded, cell).iter().collect();
        let toroidal: Vec<_> = neighbors(5, Topology::Toroidal, cell).iter().collect();
        assert_eq!(bounded, toroidal);
    }

    #[test]
    fn dimension_validation_enforces_minimum() {
        assert!(validate_dimension(4).is_err());
        assert_eq!(validate_dimension(5), Ok(5));
        assert!(validate_dimension(201).is_err());
    }

    #[test]
    fn history_evicts_oldest_entry() {
        let mut history = History::new(3);
        for value in 0..3 {
            assert_eq!(history.push(value), None);
        }
        assert_eq!(history.push(3), Some(0));
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(history.len(), history.capacity());
    }

    #[test]
    fn shrinking_history_keeps_newest_entries() {
        let mut history = History::new(5);
        for value in 0..5 {
            let _ = history.push(value);
        }
        history.set_capacity(2);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn history_counts_occurrences() {
        let mut history = History::new(4);
        for value in [1, 2, 1, 3] {
            let _ = history.push(value);
        }
        assert_eq!(history.occurrences(&1), 2);
        assert_eq!(history.occurrences(&9), 0);
    }

    #[test]
    fn double_buffer_swap_promotes_back() {
        let mut buffers = DoubleBuffer::new(5, false);
        {
            let (_, next) = buffers.split();
            assert!(next.set(CellCoord::new(1, 1), true));
        }
        assert_eq!(buffers.front().get(CellCoord::new(1, 1)), Some(&false));
        buffers.swap();
        assert_eq!(buffers.front().get(CellCoord::new(1, 1)), Some(&true));
    }

    #[test]
    fn grid_rejects_out_of_range_writes() {
        let mut grid = SquareGrid::new(5, 0u8);
        assert!(!grid.set(CellCoord::new(5, 0), 1));
        assert!(grid.cells().iter().all(|value| *value == 0));
        assert_eq!(grid.rows().count(), 5);
        assert_eq!(grid.coords().nth(6), Some(CellCoord::new(1, 1)));
    }
}
