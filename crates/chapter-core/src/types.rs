//! Core types for Chapter
//!
//! Typed identifiers and the entities they name. These are plain data:
//! constructors stamp timestamps and defaults, the store enforces the
//! workflow invariants around them.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::policy::ClubPolicy;
use crate::schedule::Recurrence;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh identifier
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique club identifier
    ClubId
);
entity_id!(
    /// Unique member identifier
    MemberId
);
entity_id!(
    /// Unique book identifier
    BookId
);
entity_id!(
    /// Unique discussion-thread identifier
    DiscussionId
);
entity_id!(
    /// Unique discussion-post identifier
    PostId
);
entity_id!(
    /// Unique comment identifier (discussion or review comments)
    CommentId
);
entity_id!(
    /// Unique rating identifier
    RatingId
);
entity_id!(
    /// Unique meeting identifier
    MeetingId
);

/// Where a book sits in the suggestion-to-completion workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Suggested,
    Reading,
    Completed,
}

/// Meeting lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// RSVP answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Yes,
    No,
    Maybe,
}

/// Kind of vote a member can cast on a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Upvote,
    Veto,
}

/// A book club
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    /// Unique 8-character uppercase join code
    pub code: String,
    pub description: String,
    pub policy: ClubPolicy,
    pub created_at: DateTime<Utc>,
}

impl Club {
    /// Create a club with the given (already unique) join code
    #[must_use]
    pub fn new(name: impl Into<String>, code: String, description: impl Into<String>) -> Self {
        Self {
            id: ClubId::new(),
            name: name.into(),
            code,
            description: description.into(),
            policy: ClubPolicy::default(),
            created_at: Utc::now(),
        }
    }
}

/// Characters used in join codes. No lowercase: codes are compared uppercased.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a club join code
pub const CODE_LEN: usize = 8;

/// Generate a candidate 8-character join code. Uniqueness is the caller's
/// problem: regenerate on collision.
pub fn generate_join_code<R: Rng>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generate a session token: 32 random bytes, hex-encoded (64 chars).
pub fn generate_session_token<R: Rng>(rng: &mut R) -> String {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    hex::encode(bytes)
}

/// A club member, identified per-request by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub club_id: ClubId,
    pub display_name: String,
    /// Unique random token; never exposed in views of other members
    pub session_token: String,
    pub joined_at: DateTime<Utc>,
    pub is_admin: bool,
}

impl Member {
    #[must_use]
    pub fn new(
        club_id: ClubId,
        display_name: impl Into<String>,
        session_token: String,
        is_admin: bool,
    ) -> Self {
        Self {
            id: MemberId::new(),
            club_id,
            display_name: display_name.into(),
            session_token,
            joined_at: Utc::now(),
            is_admin,
        }
    }
}

/// A suggested, current, or finished book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub club_id: ClubId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub isbn: String,
    pub cover_url: Option<String>,
    pub suggested_by: MemberId,
    pub suggested_at: DateTime<Utc>,
    pub status: BookStatus,
    pub selected_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Draw weight for random selection
    pub weight: f64,
    /// Permanently excluded from draws once the veto threshold is met
    pub vetoed: bool,
}

impl Book {
    #[must_use]
    pub fn suggest(
        club_id: ClubId,
        suggested_by: MemberId,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: BookId::new(),
            club_id,
            title: title.into(),
            author: author.into(),
            description: String::new(),
            isbn: String::new(),
            cover_url: None,
            suggested_by,
            suggested_at: Utc::now(),
            status: BookStatus::Suggested,
            selected_at: None,
            completed_at: None,
            weight: 1.0,
            vetoed: false,
        }
    }
}

/// A member's vote on a book. At most one per (book, member, kind).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookVote {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub kind: VoteKind,
    pub created_at: DateTime<Utc>,
}

/// A discussion thread attached to a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
    pub id: DiscussionId,
    pub book_id: BookId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A top-level post inside a discussion thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub discussion_id: DiscussionId,
    pub author_id: MemberId,
    pub content: String,
    pub is_spoiler: bool,
    pub created_at: DateTime<Utc>,
    /// Members who currently like this post (toggle semantics)
    pub likes: BTreeSet<MemberId>,
}

/// A comment on a discussion post; nests arbitrarily via `parent_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    pub author_id: MemberId,
    pub content: String,
    pub is_spoiler: bool,
    pub created_at: DateTime<Utc>,
    pub likes: BTreeSet<MemberId>,
}

/// A star rating with optional review text. One per (book, member).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub book_id: BookId,
    pub member_id: MemberId,
    /// 1-5
    pub stars: u8,
    pub review: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes: BTreeSet<MemberId>,
    pub comments: Vec<ReviewComment>,
}

/// A flat comment under a review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: CommentId,
    pub author_id: MemberId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// The single recurring-meeting schedule a club may have
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingSchedule {
    pub club_id: ClubId,
    /// Exactly one current host; reassigned on transfer, no history kept
    pub current_host: MemberId,
    pub recurrence: Recurrence,
    pub default_duration_minutes: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A scheduled (or finished, or cancelled) meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub club_id: ClubId,
    pub book_id: Option<BookId>,
    pub host_id: MemberId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub location: String,
    pub description: String,
    /// Post-meeting notes
    pub notes: String,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// One RSVP per (meeting, member); resubmission updates in place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rsvp {
    pub meeting_id: MeetingId,
    pub member_id: MemberId,
    pub status: RsvpStatus,
    /// What the member is bringing (food, drinks, ...)
    pub bringing: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn join_codes_are_eight_uppercase_chars() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let code = generate_join_code(&mut rng);
            assert_eq!(code.len(), CODE_LEN);
            assert!(code
                .bytes()
                .all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn session_tokens_are_unique_and_sized() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = generate_session_token(&mut rng);
        let b = generate_session_token(&mut rng);
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn suggested_book_starts_unweighted_and_unvetoed() {
        let book = Book::suggest(ClubId::new(), MemberId::new(), "Dune", "Frank Herbert");
        assert_eq!(book.status, BookStatus::Suggested);
        assert_eq!(book.weight, 1.0);
        assert!(!book.vetoed);
        assert!(book.selected_at.is_none());
    }
}
