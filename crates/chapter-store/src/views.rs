//! Read-model types returned by store queries
//!
//! These are what the HTTP layer serializes. They carry denormalized
//! display names and tallies, and never include session tokens.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use chapter_core::policy::ClubPolicy;
use chapter_core::schedule::Recurrence;
use chapter_core::types::{
    BookId, BookStatus, ClubId, CommentId, DiscussionId, MeetingId, MeetingStatus, MemberId,
    PostId, RatingId, RsvpStatus,
};

/// A member as other members see them
#[derive(Debug, Clone, Serialize)]
pub struct MemberView {
    pub id: MemberId,
    pub display_name: String,
    pub is_admin: bool,
    pub joined_at: DateTime<Utc>,
}

/// A book plus its tallies
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub isbn: String,
    pub cover_url: Option<String>,
    pub suggested_by: String,
    pub suggested_at: DateTime<Utc>,
    pub status: BookStatus,
    pub selected_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub weight: f64,
    pub vetoed: bool,
    pub upvotes: usize,
    pub veto_percentage: f64,
}

/// RSVP counts for a meeting
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RsvpSummary {
    pub yes: usize,
    pub no: usize,
    pub maybe: usize,
}

/// A meeting plus its host name and RSVP counts
#[derive(Debug, Clone, Serialize)]
pub struct MeetingView {
    pub id: MeetingId,
    pub title: String,
    pub book_id: Option<BookId>,
    pub host_id: MemberId,
    pub host_name: String,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub location: String,
    pub description: String,
    pub notes: String,
    pub status: MeetingStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub rsvps: RsvpSummary,
}

/// A club's schedule plus the computed next meeting date
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    pub current_host: MemberId,
    pub current_host_name: String,
    pub recurrence: Recurrence,
    /// Human-readable form of the recurrence
    pub recurrence_label: String,
    pub default_duration_minutes: u32,
    pub is_active: bool,
    pub next_occurrence: NaiveDate,
}

/// Everything the club page shows
#[derive(Debug, Clone, Serialize)]
pub struct ClubOverview {
    pub id: ClubId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub policy: ClubPolicy,
    pub created_at: DateTime<Utc>,
    pub members: Vec<MemberView>,
    /// The caller, when their session belongs to this club
    pub current_member: Option<MemberView>,
    pub suggested_books: Vec<BookView>,
    pub current_book: Option<BookView>,
    pub completed_books: Vec<BookView>,
    pub next_meeting: Option<MeetingView>,
}

/// The meetings page: upcoming ascending, recent past descending
#[derive(Debug, Clone, Serialize)]
pub struct MeetingsOverview {
    pub upcoming: Vec<MeetingView>,
    pub past: Vec<MeetingView>,
    pub schedule: Option<ScheduleView>,
}

/// One member's RSVP page for a meeting
#[derive(Debug, Clone, Serialize)]
pub struct RsvpView {
    pub meeting: MeetingView,
    pub current: Option<RsvpEntry>,
    /// Members who answered yes, with what they bring
    pub attending: Vec<RsvpEntry>,
}

/// A single RSVP row with the member's name
#[derive(Debug, Clone, Serialize)]
pub struct RsvpEntry {
    pub member_id: MemberId,
    pub member_name: String,
    pub status: RsvpStatus,
    pub bringing: String,
    pub notes: String,
}

/// A discussion comment with its (recursive) replies
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: CommentId,
    pub author_name: String,
    pub content: String,
    pub is_spoiler: bool,
    pub created_at: DateTime<Utc>,
    pub likes: usize,
    pub replies: Vec<CommentView>,
}

/// A discussion post with likes and nested comments
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: PostId,
    pub author_name: String,
    pub content: String,
    pub is_spoiler: bool,
    pub created_at: DateTime<Utc>,
    pub likes: usize,
    pub comments: Vec<CommentView>,
}

/// A discussion thread with all its posts
#[derive(Debug, Clone, Serialize)]
pub struct DiscussionView {
    pub id: DiscussionId,
    pub book_id: BookId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub posts: Vec<PostView>,
}

/// One rating with its social trimmings
#[derive(Debug, Clone, Serialize)]
pub struct RatingView {
    pub id: RatingId,
    pub member_id: MemberId,
    pub author_name: String,
    pub stars: u8,
    pub review: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes: usize,
    pub comments: Vec<ReviewCommentView>,
}

/// A flat comment under a review
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCommentView {
    pub id: CommentId,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// The ratings page for a book
#[derive(Debug, Clone, Serialize)]
pub struct RatingsView {
    pub book_id: BookId,
    /// Mean stars rounded to one decimal; absent with no ratings
    pub average: Option<f64>,
    pub total: usize,
    /// The caller's own rating, when identified
    pub user_rating: Option<RatingView>,
    pub ratings: Vec<RatingView>,
}
