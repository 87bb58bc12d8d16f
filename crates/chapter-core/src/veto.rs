//! Veto threshold arithmetic
//!
//! A book is vetoed permanently once the share of distinct vetoing members
//! meets or exceeds the club's configured threshold. The tally is plain
//! data so the rule can be tested without a store.

use serde::{Deserialize, Serialize};

/// Snapshot of the veto state for one book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetoTally {
    /// Distinct members who vetoed this book
    pub vetoes: usize,
    /// Total members in the club
    pub members: usize,
}

impl VetoTally {
    #[must_use]
    pub fn new(vetoes: usize, members: usize) -> Self {
        Self { vetoes, members }
    }

    /// Percentage of the membership that has vetoed (0.0 for an empty club)
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.members == 0 {
            return 0.0;
        }
        self.vetoes as f64 / self.members as f64 * 100.0
    }

    /// Whether the tally meets or exceeds the club threshold
    #[must_use]
    pub fn meets(&self, threshold_percent: u8) -> bool {
        self.percentage() >= f64::from(threshold_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_of_empty_club_is_zero() {
        let tally = VetoTally::new(0, 0);
        assert_eq!(tally.percentage(), 0.0);
        assert!(!tally.meets(1));
    }

    #[test]
    fn exact_threshold_counts_as_met() {
        // 2 of 4 members = 50%, threshold 50 -> vetoed
        assert!(VetoTally::new(2, 4).meets(50));
    }

    #[test]
    fn below_threshold_not_met() {
        // 1 of 3 members = 33.3%, threshold 34 -> not vetoed
        assert!(!VetoTally::new(1, 3).meets(34));
    }

    #[test]
    fn one_member_club_vetoes_alone() {
        assert!(VetoTally::new(1, 1).meets(100));
    }

    #[test]
    fn rounding_does_not_help_a_short_tally() {
        // 99 of 100 at threshold 100 stays unvetoed
        assert!(!VetoTally::new(99, 100).meets(100));
        assert!(VetoTally::new(100, 100).meets(100));
    }
}
