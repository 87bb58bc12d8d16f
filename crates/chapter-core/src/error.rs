//! Error types for Chapter Core
//!
//! Covers the three places domain logic can refuse:
//! - Selection over an empty candidate pool
//! - Policy values outside their valid range
//! - Recurrence patterns that fail to parse

/// Book-selection failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// No suggested, non-vetoed books to draw from
    #[error("no books available to select")]
    EmptyPool,
}

/// Club policy validation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// Veto threshold outside 1-100
    #[error("veto threshold must be between 1 and 100, got {0}")]
    VetoThresholdOutOfRange(u8),

    /// Voting threshold outside 1-100
    #[error("voting threshold must be between 1 and 100, got {0}")]
    VotingThresholdOutOfRange(u8),
}

/// Meeting recurrence parse failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecurrenceError {
    /// Unknown pattern keyword
    #[error("unknown recurrence pattern: {0}")]
    UnknownPattern(String),

    /// Weekday name did not parse
    #[error("invalid weekday: {0}")]
    InvalidWeekday(String),

    /// Ordinal outside 1st-5th
    #[error("invalid ordinal: {0}")]
    InvalidOrdinal(String),

    /// Day of month outside 1-31
    #[error("invalid day of month: {0}")]
    InvalidDayOfMonth(String),

    /// Details string malformed for the pattern
    #[error("malformed recurrence details: {0}")]
    MalformedDetails(String),
}
