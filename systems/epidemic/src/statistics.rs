//! Bounded per-step census series.

use cellsim_core::{Census, EpidemicState, DEFAULT_STATISTICS_CAP};
use cellsim_grid::History;
use serde::Serialize;

/// Census recorded after every epidemic step, oldest entries evicted first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpidemicStatistics {
    entries: History<Census>,
}

impl EpidemicStatistics {
    /// Creates an empty series retaining at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: History::new(capacity),
        }
    }

    /// Appends a census.
    pub fn record(&mut self, census: Census) {
        let _ = self.entries.push(census);
    }

    /// Discards every recorded census.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Most recent census.
    #[must_use]
    pub fn latest(&self) -> Option<&Census> {
        self.entries.latest()
    }

    /// Iterates recorded censuses, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Census> + '_ {
        self.entries.iter()
    }

    /// Count of `state` at every recorded step.
    #[must_use]
    pub fn series(&self, state: EpidemicState) -> Vec<u32> {
        self.entries.iter().map(|census| census.count(state)).collect()
    }

    /// Column-oriented copy of the whole series.
    #[must_use]
    pub fn to_series(&self) -> StatisticsSeries {
        StatisticsSeries {
            susceptible: self.series(EpidemicState::Susceptible),
            infected: self.series(EpidemicState::Infected),
            recovered: self.series(EpidemicState::Recovered),
            vaccinated: self.series(EpidemicState::Vaccinated),
        }
    }
}

impl Default for EpidemicStatistics {
    fn default() -> Self {
        Self::new(DEFAULT_STATISTICS_CAP)
    }
}

/// Per-state time series suitable for plotting or JSON export.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatisticsSeries {
    /// Susceptible counts per step.
    pub susceptible: Vec<u32>,
    /// Infected counts per step.
    pub infected: Vec<u32>,
    /// Recovered counts per step.
    pub recovered: Vec<u32>,
    /// Vaccinated counts per step.
    pub vaccinated: Vec<u32>,
}
