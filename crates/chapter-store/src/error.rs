//! Store error type
//!
//! One aggregate enum in the style of the core error modules: lookup
//! failures, authorization refusals, domain-rule violations (converted
//! from `chapter-core` errors) and snapshot IO.

use chapter_core::error::{PolicyError, RecurrenceError, SelectionError};

/// Everything a store operation can refuse with
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    // Lookups
    #[error("club not found")]
    ClubNotFound,
    #[error("member not found in this club")]
    MemberNotFound,
    #[error("book not found")]
    BookNotFound,
    #[error("discussion not found")]
    DiscussionNotFound,
    #[error("post not found")]
    PostNotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("rating not found")]
    RatingNotFound,
    #[error("meeting not found")]
    MeetingNotFound,

    // Identity & authorization
    #[error("invalid session")]
    InvalidSession,
    #[error("not a member of this club")]
    NotAMember,
    #[error("admin privileges required")]
    NotAdmin,
    #[error("only the current host may do this")]
    NotHost,
    #[error("only the author may do this")]
    NotAuthor,
    #[error("a club must keep at least one admin")]
    LastAdmin,

    // Domain rules
    #[error("veto system is disabled for this club")]
    VetoDisabled,
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidStars(u8),
    #[error("content cannot be empty")]
    EmptyContent,

    // Snapshot persistence
    #[error("snapshot io: {0}")]
    SnapshotIo(#[from] std::io::Error),
    #[error("snapshot encoding: {0}")]
    SnapshotEncoding(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether this is a missing-entity failure (HTTP 404 territory)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ClubNotFound
                | Self::MemberNotFound
                | Self::BookNotFound
                | Self::DiscussionNotFound
                | Self::PostNotFound
                | Self::CommentNotFound
                | Self::RatingNotFound
                | Self::MeetingNotFound
        )
    }

    /// Whether the caller lacked permission (as opposed to identity)
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            Self::NotAMember
                | Self::NotAdmin
                | Self::NotHost
                | Self::NotAuthor
                | Self::LastAdmin
                | Self::VetoDisabled
        )
    }
}
