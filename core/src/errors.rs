//! Error taxonomy shared by every engine crate.

use thiserror::Error;

use crate::SimulationMode;

/// Malformed life-like rule text or an out-of-range elementary rule number.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleFormatError {
    /// The rule text did not contain the `/` separating birth and survival.
    #[error("rule `{0}` is missing the `/` separator; expected a form like B3/S23")]
    MissingSeparator(String),
    /// The birth half did not begin with `B`.
    #[error("rule `{0}` must start its birth half with `B`")]
    MissingBirthPrefix(String),
    /// The survival half did not begin with `S`.
    #[error("rule `{0}` must start its survival half with `S`")]
    MissingSurvivalPrefix(String),
    /// Elementary rule numbers must fit within a byte.
    #[error("elementary rule number {0} is outside 0..=255")]
    ElementaryOutOfRange(i64),
}

/// Requested grid dimension lies outside the supported bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{label} {requested} is outside the supported range {minimum}..={maximum}")]
pub struct DimensionError {
    /// Name of the rejected dimension.
    pub label: &'static str,
    /// Value supplied by the caller.
    pub requested: u32,
    /// Smallest accepted value.
    pub minimum: u32,
    /// Largest accepted value.
    pub maximum: u32,
}

impl DimensionError {
    /// Validates `requested` against an inclusive range.
    pub fn check(
        label: &'static str,
        requested: u32,
        minimum: u32,
        maximum: u32,
    ) -> Result<u32, Self> {
        if (minimum..=maximum).contains(&requested) {
            Ok(requested)
        } else {
            Err(Self {
                label,
                requested,
                minimum,
                maximum,
            })
        }
    }
}

/// Numeric configuration outside its documented range.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParameterError {
    /// A probability or fraction fell outside `[0, 1]`.
    #[error("{name} must lie within [0, 1], got {value}")]
    ProbabilityOutOfRange {
        /// Parameter that was rejected.
        name: &'static str,
        /// Value supplied by the caller.
        value: f64,
    },
    /// Recovery must take at least one step.
    #[error("recovery time {value} is outside the supported range 1..=1000")]
    RecoveryTimeOutOfRange {
        /// Value supplied by the caller.
        value: u32,
    },
    /// The host requested a tick cadence outside the supported range.
    #[error("tick interval of {millis} ms is outside the supported range 20..=1000 ms")]
    TickIntervalOutOfRange {
        /// Requested cadence in milliseconds.
        millis: u128,
    },
}

/// Structurally invalid persisted state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ImportFormatError {
    /// The payload contained no rows.
    #[error("persisted state is empty")]
    Empty,
    /// The `mode` header named an unknown rule system.
    #[error("unknown mode `{0}`")]
    UnknownMode(String),
    /// A required header row or token was absent.
    #[error("missing `{0}` header")]
    MissingHeader(&'static str),
    /// A header token could not be parsed.
    #[error("invalid `{field}` header value `{value}`")]
    InvalidHeader {
        /// Header field that failed to parse.
        field: &'static str,
        /// Raw token found in the payload.
        value: String,
    },
    /// The number of data rows does not match the declared grid.
    #[error("expected {expected} data rows, found {found}")]
    RowCountMismatch {
        /// Rows declared by the header.
        expected: u32,
        /// Rows present in the payload.
        found: usize,
    },
    /// A data row does not match the declared grid width.
    #[error("row {row} holds {found} cells, expected {expected}")]
    ColumnCountMismatch {
        /// Zero-based data row index.
        row: usize,
        /// Columns declared by the header.
        expected: u32,
        /// Cells present in the row.
        found: usize,
    },
    /// More generations were stored than the declared cap retains.
    #[error("payload holds {found} generations but only {cap} are retained")]
    TooManyGenerations {
        /// Generation cap declared by the header.
        cap: u32,
        /// Generation rows present in the payload.
        found: usize,
    },
    /// An elementary payload carried no generation rows.
    #[error("elementary payload holds no generations")]
    MissingGenerations,
    /// The declared dimensions are unsupported.
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    /// The declared rule is unsupported.
    #[error(transparent)]
    Rule(#[from] RuleFormatError),
}

/// Aggregate error returned by façade operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EngineError {
    /// Rule text or number was rejected.
    #[error(transparent)]
    Rule(#[from] RuleFormatError),
    /// Grid dimension was rejected.
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    /// Persisted state was rejected.
    #[error(transparent)]
    Import(#[from] ImportFormatError),
    /// Numeric configuration was rejected.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    /// The operation only applies to a different mode.
    #[error("operation requires {expected} mode but {actual} mode is active")]
    ModeMismatch {
        /// Mode the operation applies to.
        expected: SimulationMode,
        /// Mode that is currently active.
        actual: SimulationMode,
    },
}
