//! Chapter Store - the coordination layer
//!
//! An in-memory registry of clubs, members, books, votes, discussions,
//! ratings, schedules, meetings and RSVPs behind a single
//! [`parking_lot::RwLock`]. Every workflow operation is a method on
//! [`Store`] that resolves the caller's session token, enforces the
//! authorization invariants (membership, admin, host, author) and applies
//! the domain rules from `chapter-core`.
//!
//! A store can optionally be backed by a JSON snapshot file: state is
//! loaded on open and rewritten atomically after each mutation.

#![warn(unreachable_pub)]

pub mod error;
mod snapshot;
mod state;
pub mod store;
pub mod views;

pub use error::StoreError;
pub use store::{
    CreateMeeting, JoinResult, ScheduleParams, SelectionResult, Store, SuggestBook, VetoOutcome,
};
pub use views::{
    BookView, ClubOverview, CommentView, DiscussionView, MeetingView, MeetingsOverview,
    MemberView, PostView, RatingView, RatingsView, ReviewCommentView, RsvpEntry, RsvpSummary,
    RsvpView, ScheduleView,
};
