//! Plain-text rendering of simulation frames.

use cellsim_core::{CellCoord, CellValue, Snapshot};

const ALIVE: char = '#';
const DEAD: char = '.';

/// Character drawn for a single cell value.
fn glyph(value: CellValue) -> char {
    match value {
        CellValue::Binary(true) => ALIVE,
        CellValue::Binary(false) => DEAD,
        CellValue::Epidemic { state, .. } => state.letter(),
    }
}

/// Renders `snapshot` as one text line per grid row.
pub(crate) fn frame(snapshot: &Snapshot) -> String {
    let (rows, columns) = snapshot.dimensions();
    let mut text = String::with_capacity((rows as usize) * (columns as usize + 1));
    for row in 0..rows {
        text.extend(
            (0..columns)
                .filter_map(|column| snapshot.cell(CellCoord::new(row, column)))
                .map(glyph),
        );
        text.push('\n');
    }
    text
}
