//! Birth/survival rule sets and their `B<digits>/S<digits>` text form.

use std::{fmt, str::FromStr};

use cellsim_core::RuleFormatError;

const CONWAY_ALIAS: &str = "conway";
const MAX_NEIGHBORS: u32 = 8;

/// Subset of the neighbor counts `0..=8`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NeighborSet(u16);

impl NeighborSet {
    /// Set containing no counts.
    pub const EMPTY: Self = Self(0);

    /// Builds a set from the provided counts, ignoring anything above eight.
    #[must_use]
    pub fn from_counts(counts: impl IntoIterator<Item = u32>) -> Self {
        counts
            .into_iter()
            .filter(|count| *count <= MAX_NEIGHBORS)
            .fold(Self::EMPTY, |set, count| Self(set.0 | (1 << count)))
    }

    /// Reports whether `count` belongs to the set.
    #[must_use]
    pub const fn contains(self, count: u32) -> bool {
        count <= MAX_NEIGHBORS && self.0 & (1 << count) != 0
    }

    /// Iterates the members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u32> {
        (0..=MAX_NEIGHBORS).filter(move |count| self.contains(*count))
    }

    /// Reports whether the set has no members.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Life-like rule: which neighbor counts give birth and which let a cell survive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LifeRule {
    birth: NeighborSet,
    survive: NeighborSet,
}

impl LifeRule {
    /// Creates a rule from explicit birth and survival sets.
    #[must_use]
    pub const fn new(birth: NeighborSet, survive: NeighborSet) -> Self {
        Self { birth, survive }
    }

    /// Classic Game of Life, B3/S23.
    #[must_use]
    pub const fn conway() -> Self {
        Self {
            birth: NeighborSet(1 << 3),
            survive: NeighborSet((1 << 2) | (1 << 3)),
        }
    }

    /// Parses `B<digits>/S<digits>` (case-insensitive) or the alias `conway`.
    ///
    /// Digits are deduplicated and any other character after the prefix
    /// letter is ignored.
    pub fn parse(text: &str) -> Result<Self, RuleFormatError> {
        let trimmed = text.trim();
        let lowered = trimmed.to_ascii_lowercase();
        let normalized = if lowered == CONWAY_ALIAS {
            "b3/s23"
        } else {
            lowered.as_str()
        };

        let Some((birth, survive)) = normalized.split_once('/') else {
            return Err(RuleFormatError::MissingSeparator(trimmed.to_owned()));
        };
        let Some(birth) = birth.trim().strip_prefix('b') else {
            return Err(RuleFormatError::MissingBirthPrefix(trimmed.to_owned()));
        };
        let Some(survive) = survive.trim().strip_prefix('s') else {
            return Err(RuleFormatError::MissingSurvivalPrefix(trimmed.to_owned()));
        };

        Ok(Self {
            birth: digits(birth),
            survive: digits(survive),
        })
    }

    /// Counts at which a dead cell comes alive.
    #[must_use]
    pub const fn birth(&self) -> NeighborSet {
        self.birth
    }

    /// Counts at which a live cell stays alive.
    #[must_use]
    pub const fn survive(&self) -> NeighborSet {
        self.survive
    }

    /// Next state of a cell given its current state and live-neighbor count.
    #[must_use]
    pub const fn next_state(&self, alive: bool, live_neighbors: u32) -> bool {
        if alive {
            self.survive.contains(live_neighbors)
        } else {
            self.birth.contains(live_neighbors)
        }
    }
}

impl Default for LifeRule {
    fn default() -> Self {
        Self::conway()
    }
}

impl FromStr for LifeRule {
    type Err = RuleFormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Display for LifeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B")?;
        for count in self.birth.iter() {
            write!(f, "{count}")?;
        }
        f.write_str("/S")?;
        for count in self.survive.iter() {
            write!(f, "{count}")?;
        }
        Ok(())
    }
}

fn digits(text: &str) -> NeighborSet {
    NeighborSet::from_counts(text.chars().filter_map(|ch| ch.to_digit(10)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_rule() {
        let rule = LifeRule::parse("B3/S23").expect("rule parses");
        assert_eq!(rule, LifeRule::conway());
    }

    #[test]
    fn conway_alias_ignores_case() {
        assert_eq!(LifeRule::parse("  Conway "), Ok(LifeRule::conway()));
    }

    #[test]
    fn rejects_missing_separator() {
        assert_eq!(
            LifeRule::parse("B3S23"),
            Err(RuleFormatError::MissingSeparator("B3S23".to_owned()))
        );
    }

    #[test]
    fn rejects_wrong_birth_letter() {
        assert_eq!(
            LifeRule::parse("X3/S23"),
            Err(RuleFormatError::MissingBirthPrefix("X3/S23".to_owned()))
        );
    }

    #[test]
    fn rejects_wrong_survival_letter() {
        assert!(matches!(
            LifeRule::parse("B3/X23"),
            Err(RuleFormatError::MissingSurvivalPrefix(_))
        ));
    }

    #[test]
    fn deduplicates_digits_and_skips_noise() {
        let rule = LifeRule::parse("b336/s2a3,9").expect("permissive parse");
        assert_eq!(rule.birth().iter().collect::<Vec<_>>(), vec![3, 6]);
        assert_eq!(rule.survive().iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn empty_sets_are_legal() {
        let rule = LifeRule::parse("B/S").expect("degenerate rule parses");
        assert!(rule.birth().is_empty());
        assert!(rule.survive().is_empty());
        assert!(!rule.next_state(true, 2));
    }

    #[test]
    fn displays_canonical_form() {
        let rule: LifeRule = "b63/s32".parse().expect("rule parses");
        assert_eq!(rule.to_string(), "B36/S23");
    }

    #[test]
    fn next_state_follows_sets() {
        let rule = LifeRule::conway();
        assert!(rule.next_state(false, 3));
        assert!(!rule.next_state(false, 2));
        assert!(rule.next_state(true, 2));
        assert!(!rule.next_state(true, 4));
    }
}
