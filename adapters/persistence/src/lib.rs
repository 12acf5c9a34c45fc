#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Plain-text persistence for the simulation façade.
//!
//! State is stored as a comma-separated table. Square grids write a mode row,
//! an `n,<N>,toroidal,<0|1>` header, and N rows of N cells. Elementary strips
//! write `width,<W>,generations,<G>` and `rule,<R>` headers followed by one row
//! per retained generation, oldest first. Imports are parsed and validated in
//! full before the façade is touched, so a rejected file leaves the running
//! simulation exactly as it was.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use cellsim_core::{EngineError, ImportFormatError, SimulationMode};
use cellsim_simulation::{ModeState, Simulation};
use log::info;
use thiserror::Error;

mod table;

use table::Persisted;

/// Failure raised while saving or loading persisted state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the file failed.
    #[error("failed to access {}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// The payload is malformed.
    #[error(transparent)]
    Format(#[from] ImportFormatError),
    /// The façade refused the decoded state.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Serializes the active mode's state.
#[must_use]
pub fn export(simulation: &Simulation) -> String {
    let mut lines = vec![table::mode_row(simulation.mode())];
    match simulation.state() {
        ModeState::Life(life) => {
            lines.push(table::square_header(life.dimension(), life.topology()));
            lines.extend(
                life.cells()
                    .rows()
                    .map(|row| table::data_row(row.iter().map(|alive| u8::from(*alive)))),
            );
        }
        ModeState::Epidemic(epidemic) => {
            lines.push(table::square_header(
                epidemic.dimension(),
                epidemic.topology(),
            ));
            lines.extend(
                epidemic
                    .cells()
                    .rows()
                    .map(|row| table::data_row(row.iter().map(|cell| cell.state.letter()))),
            );
        }
        ModeState::Elementary(strip) => {
            lines.push(table::elementary_header(
                strip.width(),
                strip.generation_cap(),
                strip.rule(),
            ));
            if strip.history().is_empty() {
                lines.push(row_of_bits(strip.state()));
            } else {
                lines.extend(strip.history().iter().map(|row| row_of_bits(row)));
            }
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn row_of_bits(row: &[bool]) -> String {
    table::data_row(row.iter().map(|alive| u8::from(*alive)))
}

/// Replaces the façade state with the decoded payload.
///
/// The mode named by the payload becomes active and the simulation pauses.
/// Payloads without a mode row are read as life grids.
pub fn import(simulation: &mut Simulation, text: &str) -> Result<(), PersistenceError> {
    let persisted = table::parse(text)?;
    let mode = match persisted {
        Persisted::Life { cells, topology } => {
            simulation.restore_life(cells, topology)?;
            SimulationMode::Life
        }
        Persisted::Epidemic { cells, topology } => {
            simulation.restore_epidemic(cells, topology)?;
            SimulationMode::Epidemic
        }
        Persisted::Elementary {
            width,
            generations,
            rule,
            rows,
        } => {
            simulation.restore_elementary(width, generations, rule, rows)?;
            SimulationMode::Elementary
        }
    };
    info!("imported {mode} state");
    Ok(())
}

/// Writes [`export`] output to `path`.
pub fn save(simulation: &Simulation, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    fs::write(path, export(simulation)).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("saved {} state to {}", simulation.mode(), path.display());
    Ok(())
}

/// Reads `path` and hands its contents to [`import`].
pub fn load(simulation: &mut Simulation, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    import(simulation, &text)
}
