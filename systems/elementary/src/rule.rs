//! Wolfram rule numbers for three-cell neighborhoods.

use std::fmt;

use cellsim_core::RuleFormatError;

/// Elementary rule number; bit `p` holds the successor of neighborhood pattern `p`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementaryRule(u8);

/// Rules offered to hosts as a starting point, with a short characterization.
pub const CATALOGUE: [(ElementaryRule, &str); 6] = [
    (ElementaryRule(30), "chaotic behavior, usable as a random generator"),
    (ElementaryRule(90), "Sierpinski-style fractal, linear behavior"),
    (ElementaryRule(110), "computationally universal, complex behavior"),
    (ElementaryRule(184), "traffic flow model with moving particles"),
    (ElementaryRule(54), "complex interacting structures"),
    (ElementaryRule(73), "repetitive, structured patterns"),
];

impl ElementaryRule {
    /// Wraps a rule number that already fits in a byte.
    #[must_use]
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// Validates an arbitrary integer as a rule number.
    pub fn from_number(number: i64) -> Result<Self, RuleFormatError> {
        u8::try_from(number)
            .map(Self)
            .map_err(|_| RuleFormatError::ElementaryOutOfRange(number))
    }

    /// Raw rule number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Successor of the neighborhood pattern `(left << 2) | (center << 1) | right`.
    #[must_use]
    pub const fn output_for_pattern(self, pattern: u8) -> bool {
        pattern < 8 && (self.0 >> pattern) & 1 == 1
    }

    /// Successor of a cell given its left neighbor, itself, and its right neighbor.
    #[must_use]
    pub const fn output(self, left: bool, center: bool, right: bool) -> bool {
        let pattern = ((left as u8) << 2) | ((center as u8) << 1) | right as u8;
        self.output_for_pattern(pattern)
    }

    /// Eight-digit binary rendering, most significant pattern first.
    #[must_use]
    pub fn binary(self) -> String {
        format!("{:08b}", self.0)
    }

    /// Catalogue description, if the rule is one of the listed ones.
    #[must_use]
    pub fn description(self) -> Option<&'static str> {
        CATALOGUE
            .iter()
            .find(|(rule, _)| *rule == self)
            .map(|(_, description)| *description)
    }
}

impl Default for ElementaryRule {
    fn default() -> Self {
        Self(30)
    }
}

impl fmt::Display for ElementaryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_30_pattern_six_is_dead() {
        let rule = ElementaryRule::new(30);
        assert!(!rule.output_for_pattern(6));
        assert!(!rule.output(true, true, false));
        assert!(rule.output(true, false, false));
    }

    #[test]
    fn rejects_numbers_outside_a_byte() {
        assert_eq!(
            ElementaryRule::from_number(256),
            Err(RuleFormatError::ElementaryOutOfRange(256))
        );
        assert!(ElementaryRule::from_number(-1).is_err());
        assert_eq!(ElementaryRule::from_number(255), Ok(ElementaryRule::new(255)));
    }

    #[test]
    fn binary_is_zero_padded() {
        assert_eq!(ElementaryRule::new(30).binary(), "00011110");
        assert_eq!(ElementaryRule::new(0).binary(), "00000000");
    }

    #[test]
    fn catalogue_rules_have_descriptions() {
        for (rule, description) in CATALOGUE {
            assert_eq!(rule.description(), Some(description));
        }
        assert_eq!(ElementaryRule::new(1).description(), None);
    }
}
