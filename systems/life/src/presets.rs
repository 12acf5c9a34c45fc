//! Catalogue of seed patterns and their placement on the grid.

use cellsim_core::{CellCoord, Preset};

const GLIDER: &[(i64, i64)] = &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
const BLINKER: &[(i64, i64)] = &[(0, 0), (0, 1), (0, 2)];
const TOAD: &[(i64, i64)] = &[(-1, 0), (-1, 1), (-1, 2), (0, -1), (0, 0), (0, 1)];
const BEACON: &[(i64, i64)] = &[
    (0, 0),
    (0, 1),
    (1, 0),
    (1, 1),
    (2, 2),
    (2, 3),
    (3, 2),
    (3, 3),
];
const GOSPER_GUN_SMALL: &[(i64, i64)] = &[
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 1),
    (1, 2),
    (3, 10),
    (3, 11),
    (4, 10),
    (4, 11),
];

/// Offsets of the live cells relative to the preset's anchor.
#[must_use]
pub fn offsets(preset: Preset) -> &'static [(i64, i64)] {
    match preset {
        Preset::Glider => GLIDER,
        Preset::Blinker => BLINKER,
        Preset::Toad => TOAD,
        Preset::Beacon => BEACON,
        Preset::GosperGliderGunSmall => GOSPER_GUN_SMALL,
    }
}

/// Anchor cell of the preset on an N×N grid, as `(row, column)`.
///
/// Most patterns are centered on the midpoint; the gun sits at a fixed offset
/// from the top-left corner so it has room to emit.
#[must_use]
pub fn anchor(preset: Preset, dimension: u32) -> (i64, i64) {
    let mid = i64::from(dimension / 2);
    match preset {
        Preset::Glider | Preset::Beacon => (mid - 2, mid - 2),
        Preset::Blinker => (mid, mid - 1),
        Preset::Toad => (mid, mid),
        Preset::GosperGliderGunSmall => (2, 2),
    }
}

/// Cells occupied by the preset, skipping any that fall outside the grid.
pub fn placements(preset: Preset, dimension: u32) -> impl Iterator<Item = CellCoord> {
    let (base_row, base_column) = anchor(preset, dimension);
    let side = i64::from(dimension);
    offsets(preset).iter().filter_map(move |(row, column)| {
        let row = base_row + row;
        let column = base_column + column;
        ((0..side).contains(&row) && (0..side).contains(&column))
            .then(|| CellCoord::new(row as u32, column as u32))
    })
}
