//! Chapter Core - book-club domain logic
//!
//! The workflow engine behind a club:
//! - Typed identifiers and entities (clubs, members, books, meetings)
//! - Book-selection engine (weighted random draw, vote-count draw)
//! - Veto threshold arithmetic
//! - Admin-configurable club policy
//! - Meeting recurrence patterns and next-occurrence computation
//! - iCalendar event rendering for meetings
//!
//! Everything here is pure: no IO, no locking. The store crate layers
//! coordination and authorization on top.

#![warn(unreachable_pub)]

pub mod error;
pub mod ics;
pub mod policy;
pub mod schedule;
pub mod selection;
pub mod types;
pub mod veto;

// Re-exports for convenience
pub use error::{PolicyError, RecurrenceError, SelectionError};
pub use ics::IcsEvent;
pub use policy::{ClubPolicy, SelectionMethod};
pub use schedule::Recurrence;
pub use selection::{select_book, Candidate};
pub use types::{
    Book, BookId, BookStatus, BookVote, Club, ClubId, Comment, CommentId, Discussion,
    DiscussionId, Meeting, MeetingId, MeetingSchedule, MeetingStatus, Member, MemberId, Post,
    PostId, Rating, RatingId, ReviewComment, Rsvp, RsvpStatus, VoteKind,
};
pub use veto::VetoTally;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
