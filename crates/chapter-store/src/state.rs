//! The in-memory tables and their lookup helpers
//!
//! All tables live in one serializable struct so that a snapshot is a
//! single JSON document. Vote and RSVP rows are plain vectors: a club
//! holds a handful of each, linear scans are the honest data structure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use chapter_core::types::{
    Book, BookId, BookVote, Club, ClubId, Comment, CommentId, Discussion, DiscussionId, Meeting,
    MeetingId, MeetingSchedule, Member, MemberId, Post, PostId, Rating, RatingId, Rsvp, VoteKind,
};
use chapter_core::veto::VetoTally;

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct State {
    pub(crate) clubs: BTreeMap<ClubId, Club>,
    pub(crate) members: BTreeMap<MemberId, Member>,
    pub(crate) books: BTreeMap<BookId, Book>,
    pub(crate) votes: Vec<BookVote>,
    pub(crate) discussions: BTreeMap<DiscussionId, Discussion>,
    pub(crate) posts: BTreeMap<PostId, Post>,
    pub(crate) comments: BTreeMap<CommentId, Comment>,
    pub(crate) ratings: BTreeMap<RatingId, Rating>,
    pub(crate) schedules: BTreeMap<ClubId, MeetingSchedule>,
    pub(crate) meetings: BTreeMap<MeetingId, Meeting>,
    pub(crate) rsvps: Vec<Rsvp>,
}

impl State {
    pub(crate) fn club_by_code(&self, code: &str) -> Option<&Club> {
        let code = code.to_ascii_uppercase();
        self.clubs.values().find(|c| c.code == code)
    }

    pub(crate) fn member_by_token(&self, token: &str) -> Option<&Member> {
        self.members.values().find(|m| m.session_token == token)
    }

    pub(crate) fn club_members(&self, club_id: ClubId) -> impl Iterator<Item = &Member> {
        self.members.values().filter(move |m| m.club_id == club_id)
    }

    pub(crate) fn member_count(&self, club_id: ClubId) -> usize {
        self.club_members(club_id).count()
    }

    pub(crate) fn admin_count(&self, club_id: ClubId) -> usize {
        self.club_members(club_id).filter(|m| m.is_admin).count()
    }

    pub(crate) fn club_books(&self, club_id: ClubId) -> impl Iterator<Item = &Book> {
        self.books.values().filter(move |b| b.club_id == club_id)
    }

    /// Distinct members who cast the given vote on a book
    pub(crate) fn vote_count(&self, book_id: BookId, kind: VoteKind) -> usize {
        self.votes
            .iter()
            .filter(|v| v.book_id == book_id && v.kind == kind)
            .count()
    }

    pub(crate) fn has_vote(&self, book_id: BookId, member_id: MemberId, kind: VoteKind) -> bool {
        self.votes
            .iter()
            .any(|v| v.book_id == book_id && v.member_id == member_id && v.kind == kind)
    }

    pub(crate) fn veto_tally(&self, book_id: BookId, club_id: ClubId) -> VetoTally {
        VetoTally::new(
            self.vote_count(book_id, VoteKind::Veto),
            self.member_count(club_id),
        )
    }

    /// Display name for views; members may have left since posting
    pub(crate) fn member_name(&self, member_id: MemberId) -> String {
        self.members
            .get(&member_id)
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| "former member".to_string())
    }
}
