//! Admin-configurable club policy
//!
//! Controls how the club picks its next book and whether members can veto
//! suggestions. Thresholds are percentages of the membership, 1-100.

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// How the next book is chosen from the candidate pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    /// Weight-adjusted random draw
    Random,
    /// Most upvotes wins, earliest suggestion breaks ties
    Voting,
}

/// Per-club settings, editable by admins only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClubPolicy {
    /// Whether members may veto suggestions at all
    pub veto_enabled: bool,
    /// Percentage of members needed to veto a book (1-100)
    pub veto_threshold_percent: u8,
    pub selection_method: SelectionMethod,
    /// Percentage needed to select via voting (1-100)
    pub voting_threshold_percent: u8,
}

impl Default for ClubPolicy {
    fn default() -> Self {
        Self {
            veto_enabled: true,
            veto_threshold_percent: 50,
            selection_method: SelectionMethod::Random,
            voting_threshold_percent: 50,
        }
    }
}

impl ClubPolicy {
    /// Reject thresholds outside 1-100
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !(1..=100).contains(&self.veto_threshold_percent) {
            return Err(PolicyError::VetoThresholdOutOfRange(
                self.veto_threshold_percent,
            ));
        }
        if !(1..=100).contains(&self.voting_threshold_percent) {
            return Err(PolicyError::VotingThresholdOutOfRange(
                self.voting_threshold_percent,
            ));
        }
        Ok(())
    }
}
