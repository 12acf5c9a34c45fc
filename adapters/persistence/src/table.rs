//! Comma-separated table codec for persisted simulation state.

use cellsim_core::{EpidemicState, ImportFormatError, SimulationMode, Topology};
use cellsim_grid::{validate_dimension, SquareGrid};
use cellsim_system_elementary::{validate_generations, validate_width, ElementaryRule};
use cellsim_system_epidemic::EpidemicCell;
use log::warn;

const FIELD_DELIMITER: char = ',';
const MODE_FIELD: &str = "mode";
const SIZE_FIELD: &str = "n";
const TOROIDAL_FIELD: &str = "toroidal";
const WIDTH_FIELD: &str = "width";
const GENERATIONS_FIELD: &str = "generations";
const RULE_FIELD: &str = "rule";

/// Fully validated contents of a persisted table.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Persisted {
    Life {
        cells: SquareGrid<bool>,
        topology: Topology,
    },
    Epidemic {
        cells: SquareGrid<EpidemicCell>,
        topology: Topology,
    },
    Elementary {
        width: u32,
        generations: u32,
        rule: ElementaryRule,
        rows: Vec<Vec<bool>>,
    },
}

/// Interpretation of a single data token.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Letter(EpidemicState),
    Unrecognized,
}

impl Token {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(value) = raw.parse::<i64>() {
            return Self::Number(value as f64);
        }
        if let Ok(value) = raw.parse::<f64>() {
            if value.is_finite() {
                return Self::Number(value);
            }
        }
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => {
                EpidemicState::from_letter(letter).map_or(Self::Unrecognized, Self::Letter)
            }
            _ => Self::Unrecognized,
        }
    }
}

/// Tracks tokens that were accepted through the lenient fallback.
#[derive(Default)]
struct Leniency {
    fallbacks: usize,
}

impl Leniency {
    fn life(&mut self, raw: &str) -> bool {
        match Token::parse(raw) {
            Token::Number(value) => value.trunc() != 0.0,
            Token::Letter(_) | Token::Unrecognized => {
                self.fallbacks += 1;
                false
            }
        }
    }

    fn epidemic(&mut self, raw: &str) -> EpidemicCell {
        match Token::parse(raw) {
            Token::Letter(state) => EpidemicCell::new(state),
            Token::Number(_) | Token::Unrecognized => {
                self.fallbacks += 1;
                EpidemicCell::default()
            }
        }
    }

    fn elementary(&mut self, raw: &str) -> bool {
        match raw.trim().parse::<i64>() {
            Ok(value) => value != 0,
            Err(_) => {
                self.fallbacks += 1;
                false
            }
        }
    }

    fn report(&self) {
        if self.fallbacks > 0 {
            warn!(
                "{} unrecognized cell tokens were imported as empty cells",
                self.fallbacks
            );
        }
    }
}

/// Parses a persisted table without touching any engine state.
pub(crate) fn parse(text: &str) -> Result<Persisted, ImportFormatError> {
    let mut rows = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split(FIELD_DELIMITER).map(str::trim).collect::<Vec<_>>());

    let mut header = rows.next().ok_or(ImportFormatError::Empty)?;
    let mut mode = SimulationMode::Life;
    if field_is(&header, MODE_FIELD) {
        let tag = header
            .get(1)
            .copied()
            .ok_or(ImportFormatError::MissingHeader(MODE_FIELD))?;
        mode = SimulationMode::from_tag(tag)
            .ok_or_else(|| ImportFormatError::UnknownMode(tag.to_owned()))?;
        header = rows.next().ok_or(ImportFormatError::MissingHeader(
            if mode == SimulationMode::Elementary {
                WIDTH_FIELD
            } else {
                SIZE_FIELD
            },
        ))?;
    }

    let data: Vec<Vec<&str>> = match mode {
        SimulationMode::Elementary => {
            if field_is(&header, SIZE_FIELD) {
                header = rows
                    .next()
                    .ok_or(ImportFormatError::MissingHeader(WIDTH_FIELD))?;
            }
            let rule_row = rows
                .next()
                .ok_or(ImportFormatError::MissingHeader(RULE_FIELD))?;
            let data = rows.collect();
            return parse_elementary(&header, &rule_row, data);
        }
        SimulationMode::Life | SimulationMode::Epidemic => rows.collect(),
    };

    let (dimension, topology) = parse_square_header(&header)?;
    check_shape(&data, dimension)?;

    let mut leniency = Leniency::default();
    let persisted = if mode == SimulationMode::Epidemic {
        let cells = data
            .iter()
            .flatten()
            .map(|raw| leniency.epidemic(raw))
            .collect();
        Persisted::Epidemic {
            cells: square(dimension, cells)?,
            topology,
        }
    } else {
        let cells = data.iter().flatten().map(|raw| leniency.life(raw)).collect();
        Persisted::Life {
            cells: square(dimension, cells)?,
            topology,
        }
    };
    leniency.report();
    Ok(persisted)
}

fn parse_square_header(header: &[&str]) -> Result<(u32, Topology), ImportFormatError> {
    if !field_is(header, SIZE_FIELD) {
        return Err(ImportFormatError::MissingHeader(SIZE_FIELD));
    }
    let dimension = validate_dimension(number_field(header, 1, SIZE_FIELD)?)?;
    let topology = match header.get(3) {
        Some(raw) => {
            let flag: i64 = raw.parse().map_err(|_| ImportFormatError::InvalidHeader {
                field: TOROIDAL_FIELD,
                value: (*raw).to_owned(),
            })?;
            Topology::from_flag(flag != 0)
        }
        None => Topology::Bounded,
    };
    Ok((dimension, topology))
}

fn parse_elementary(
    header: &[&str],
    rule_row: &[&str],
    data: Vec<Vec<&str>>,
) -> Result<Persisted, ImportFormatError> {
    if !field_is(header, WIDTH_FIELD) {
        return Err(ImportFormatError::MissingHeader(WIDTH_FIELD));
    }
    let width = validate_width(number_field(header, 1, WIDTH_FIELD)?)?;
    let generations = validate_generations(number_field(header, 3, GENERATIONS_FIELD)?)?;

    if !field_is(rule_row, RULE_FIELD) {
        return Err(ImportFormatError::MissingHeader(RULE_FIELD));
    }
    let rule = ElementaryRule::from_number(number_field(rule_row, 1, RULE_FIELD)?)?;

    if data.is_empty() {
        return Err(ImportFormatError::MissingGenerations);
    }
    if data.len() > generations as usize {
        return Err(ImportFormatError::TooManyGenerations {
            cap: generations,
            found: data.len(),
        });
    }
    check_columns(&data, width)?;

    let mut leniency = Leniency::default();
    let rows = data
        .iter()
        .map(|row| row.iter().map(|raw| leniency.elementary(raw)).collect())
        .collect();
    leniency.report();

    Ok(Persisted::Elementary {
        width,
        generations,
        rule,
        rows,
    })
}

fn field_is(row: &[&str], name: &str) -> bool {
    row.first()
        .is_some_and(|field| field.eq_ignore_ascii_case(name))
}

fn number_field<T: std::str::FromStr>(
    row: &[&str],
    index: usize,
    field: &'static str,
) -> Result<T, ImportFormatError> {
    let raw = row
        .get(index)
        .copied()
        .ok_or(ImportFormatError::MissingHeader(field))?;
    raw.parse().map_err(|_| ImportFormatError::InvalidHeader {
        field,
        value: raw.to_owned(),
    })
}

fn check_shape(data: &[Vec<&str>], dimension: u32) -> Result<(), ImportFormatError> {
    if data.len() != dimension as usize {
        return Err(ImportFormatError::RowCountMismatch {
            expected: dimension,
            found: data.len(),
        });
    }
    check_columns(data, dimension)
}

fn check_columns(data: &[Vec<&str>], expected: u32) -> Result<(), ImportFormatError> {
    match data
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != expected as usize)
    {
        Some((row, cells)) => Err(ImportFormatError::ColumnCountMismatch {
            row,
            expected,
            found: cells.len(),
        }),
        None => Ok(()),
    }
}

fn square<T>(dimension: u32, cells: Vec<T>) -> Result<SquareGrid<T>, ImportFormatError> {
    let found = cells.len();
    SquareGrid::from_cells(dimension, cells).ok_or(ImportFormatError::RowCountMismatch {
        expected: dimension,
        found: found / dimension.max(1) as usize,
    })
}

/// Renders the mode header row.
pub(crate) fn mode_row(mode: SimulationMode) -> String {
    format!("{MODE_FIELD}{FIELD_DELIMITER}{}", mode.tag())
}

/// Renders the square grid header row.
pub(crate) fn square_header(dimension: u32, topology: Topology) -> String {
    format!(
        "{SIZE_FIELD}{d}{dimension}{d}{TOROIDAL_FIELD}{d}{}",
        u8::from(topology.is_toroidal()),
        d = FIELD_DELIMITER
    )
}

/// Renders the elementary header rows.
pub(crate) fn elementary_header(width: u32, generations: u32, rule: ElementaryRule) -> String {
    format!(
        "{WIDTH_FIELD}{d}{width}{d}{GENERATIONS_FIELD}{d}{generations}\n{RULE_FIELD}{d}{}",
        rule.number(),
        d = FIELD_DELIMITER
    )
}

/// Joins one row of rendered cells.
pub(crate) fn data_row<I, T>(cells: I) -> String
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    cells
        .into_iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()
        .join(&FIELD_DELIMITER.to_string())
}
