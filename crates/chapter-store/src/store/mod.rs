//! The store handle and its operation modules
//!
//! `Store` owns the state behind one `RwLock`. Operations live in
//! per-concern modules (`clubs`, `books`, `meetings`, `social`), each an
//! `impl Store` block; this module holds construction, the snapshot hook,
//! the session/authorization helpers and the shared view builders.

mod books;
mod clubs;
mod meetings;
mod social;

use std::path::PathBuf;

use parking_lot::RwLock;

use chapter_core::types::{
    Book, ClubId, Comment, CommentId, Meeting, Member, PostId, Rating, RsvpStatus, VoteKind,
};
use chapter_core::veto::VetoTally;

use crate::error::StoreError;
use crate::snapshot;
use crate::state::State;
use crate::views::{
    BookView, CommentView, MeetingView, MemberView, PostView, RatingView, ReviewCommentView,
    RsvpSummary,
};

pub use books::{SelectionResult, SuggestBook, VetoOutcome};
pub use clubs::JoinResult;
pub use meetings::{CreateMeeting, ScheduleParams};

/// The club registry. Cheap to share behind an `Arc`; all methods take
/// `&self`.
pub struct Store {
    state: RwLock<State>,
    snapshot_path: Option<PathBuf>,
}

impl Store {
    /// A store with no persistence; state dies with the process
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(State::default()),
            snapshot_path: None,
        }
    }

    /// A store backed by a JSON snapshot, loaded if it exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = snapshot::load(&path)?.unwrap_or_default();
        tracing::info!(
            path = %path.display(),
            clubs = state.clubs.len(),
            "opened store snapshot"
        );
        Ok(Self {
            state: RwLock::new(state),
            snapshot_path: Some(path),
        })
    }

    /// Rewrite the snapshot (no-op for in-memory stores). Called by every
    /// mutating operation while the write lock is still held, so snapshots
    /// never interleave.
    pub(crate) fn commit(&self, state: &State) -> Result<(), StoreError> {
        if let Some(path) = &self.snapshot_path {
            snapshot::save(path, state)?;
        }
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::in_memory()
    }
}

// --- session and authorization helpers ---

pub(crate) fn require_member(state: &State, token: &str) -> Result<Member, StoreError> {
    state
        .member_by_token(token)
        .cloned()
        .ok_or(StoreError::InvalidSession)
}

/// Resolve the caller and check they belong to the given club
pub(crate) fn require_member_of(
    state: &State,
    token: &str,
    club_id: ClubId,
) -> Result<Member, StoreError> {
    let member = require_member(state, token)?;
    if member.club_id != club_id {
        return Err(StoreError::NotAMember);
    }
    Ok(member)
}

/// Resolve the caller as an admin of the given club
pub(crate) fn require_admin_of(
    state: &State,
    token: &str,
    club_id: ClubId,
) -> Result<Member, StoreError> {
    let member = require_member_of(state, token, club_id)?;
    if !member.is_admin {
        return Err(StoreError::NotAdmin);
    }
    Ok(member)
}

// --- shared view builders ---

pub(crate) fn member_view(member: &Member) -> MemberView {
    MemberView {
        id: member.id,
        display_name: member.display_name.clone(),
        is_admin: member.is_admin,
        joined_at: member.joined_at,
    }
}

pub(crate) fn book_view(state: &State, book: &Book) -> BookView {
    let tally: VetoTally = state.veto_tally(book.id, book.club_id);
    BookView {
        id: book.id,
        title: book.title.clone(),
        author: book.author.clone(),
        description: book.description.clone(),
        isbn: book.isbn.clone(),
        cover_url: book.cover_url.clone(),
        suggested_by: state.member_name(book.suggested_by),
        suggested_at: book.suggested_at,
        status: book.status,
        selected_at: book.selected_at,
        completed_at: book.completed_at,
        weight: book.weight,
        vetoed: book.vetoed,
        upvotes: state.vote_count(book.id, VoteKind::Upvote),
        veto_percentage: tally.percentage(),
    }
}

pub(crate) fn meeting_view(state: &State, meeting: &Meeting) -> MeetingView {
    let mut summary = RsvpSummary::default();
    for rsvp in state.rsvps.iter().filter(|r| r.meeting_id == meeting.id) {
        match rsvp.status {
            RsvpStatus::Yes => summary.yes += 1,
            RsvpStatus::No => summary.no += 1,
            RsvpStatus::Maybe => summary.maybe += 1,
        }
    }
    MeetingView {
        id: meeting.id,
        title: meeting.title.clone(),
        book_id: meeting.book_id,
        host_id: meeting.host_id,
        host_name: state.member_name(meeting.host_id),
        starts_at: meeting.starts_at,
        duration_minutes: meeting.duration_minutes,
        location: meeting.location.clone(),
        description: meeting.description.clone(),
        notes: meeting.notes.clone(),
        status: meeting.status,
        completed_at: meeting.completed_at,
        rsvps: summary,
    }
}

pub(crate) fn post_view(state: &State, post_id: PostId) -> Option<PostView> {
    let post = state.posts.get(&post_id)?;
    Some(PostView {
        id: post.id,
        author_name: state.member_name(post.author_id),
        content: post.content.clone(),
        is_spoiler: post.is_spoiler,
        created_at: post.created_at,
        likes: post.likes.len(),
        comments: comment_tree(state, post_id, None),
    })
}

/// Build the nested comment tree under one post, children sorted oldest
/// first at every level
pub(crate) fn comment_tree(
    state: &State,
    post_id: PostId,
    parent: Option<CommentId>,
) -> Vec<CommentView> {
    let mut children: Vec<&Comment> = state
        .comments
        .values()
        .filter(|c| c.post_id == post_id && c.parent_id == parent)
        .collect();
    children.sort_by_key(|c| c.created_at);
    children
        .into_iter()
        .map(|c| CommentView {
            id: c.id,
            author_name: state.member_name(c.author_id),
            content: c.content.clone(),
            is_spoiler: c.is_spoiler,
            created_at: c.created_at,
            likes: c.likes.len(),
            replies: comment_tree(state, post_id, Some(c.id)),
        })
        .collect()
}

pub(crate) fn rating_view(state: &State, rating: &Rating) -> RatingView {
    RatingView {
        id: rating.id,
        member_id: rating.member_id,
        author_name: state.member_name(rating.member_id),
        stars: rating.stars,
        review: rating.review.clone(),
        created_at: rating.created_at,
        updated_at: rating.updated_at,
        likes: rating.likes.len(),
        comments: rating
            .comments
            .iter()
            .map(|c| ReviewCommentView {
                id: c.id,
                author_name: state.member_name(c.author_id),
                content: c.content.clone(),
                created_at: c.created_at,
            })
            .collect(),
    }
}

