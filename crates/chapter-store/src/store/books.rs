//! The book workflow: suggest, select, complete, veto, upvote

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use chapter_core::selection::{select_book, Candidate};
use chapter_core::types::{Book, BookId, BookStatus, BookVote, VoteKind};

use crate::error::StoreError;
use crate::views::BookView;

use super::{book_view, require_member_of, Store};

/// Fields a member supplies when suggesting a book
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub cover_url: Option<String>,
}

/// Outcome of a selection draw
#[derive(Debug, Clone, Serialize)]
pub struct SelectionResult {
    pub selected: BookView,
    /// The previously-Reading book that was closed out, if any
    pub completed: Option<BookId>,
}

/// Outcome of casting a veto
#[derive(Debug, Clone, Serialize)]
pub struct VetoOutcome {
    pub book_id: BookId,
    pub vetoed: bool,
    pub veto_percentage: f64,
}

impl Store {
    /// Add a suggestion to the club's pool
    pub fn suggest_book(
        &self,
        token: &str,
        code: &str,
        fields: SuggestBook,
    ) -> Result<BookView, StoreError> {
        let mut state = self.state.write();
        let club_id = state.club_by_code(code).ok_or(StoreError::ClubNotFound)?.id;
        let member = require_member_of(&state, token, club_id)?;

        if fields.title.trim().is_empty() || fields.author.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let mut book = Book::suggest(club_id, member.id, fields.title.trim(), fields.author.trim());
        book.description = fields.description;
        book.isbn = fields.isbn;
        book.cover_url = fields.cover_url;

        tracing::info!(club = %code, book = %book.id, title = %book.title, "book suggested");

        let view = book_view(&state, &book);
        state.books.insert(book.id, book);
        self.commit(&state)?;
        Ok(view)
    }

    /// Draw the club's next book with a caller-supplied RNG.
    ///
    /// Applies the full transition: the current Reading book (if any) is
    /// completed, the winner moves Suggested -> Reading. Any member may
    /// trigger this.
    pub fn select_next_book_with_rng<R: Rng>(
        &self,
        token: &str,
        code: &str,
        rng: &mut R,
    ) -> Result<SelectionResult, StoreError> {
        let mut state = self.state.write();
        let club = state.club_by_code(code).ok_or(StoreError::ClubNotFound)?;
        let (club_id, method) = (club.id, club.policy.selection_method);
        require_member_of(&state, token, club_id)?;

        let candidates: Vec<Candidate> = state
            .club_books(club_id)
            .filter(|b| b.status == BookStatus::Suggested && !b.vetoed)
            .map(|b| Candidate {
                id: b.id,
                weight: b.weight,
                upvotes: state.vote_count(b.id, VoteKind::Upvote) as u32,
                suggested_at: b.suggested_at,
            })
            .collect();

        let winner = select_book(method, &candidates, rng)?;
        let now = Utc::now();

        let completed = state
            .books
            .values_mut()
            .find(|b| b.club_id == club_id && b.status == BookStatus::Reading)
            .map(|b| {
                b.status = BookStatus::Completed;
                b.completed_at = Some(now);
                b.id
            });

        let selected = {
            let book = state.books.get_mut(&winner).ok_or(StoreError::BookNotFound)?;
            book.status = BookStatus::Reading;
            book.selected_at = Some(now);
            book.clone()
        };

        tracing::info!(
            club = %code,
            book = %winner,
            title = %selected.title,
            pool = candidates.len(),
            ?method,
            "book selected"
        );

        let result = SelectionResult {
            selected: book_view(&state, &selected),
            completed,
        };
        self.commit(&state)?;
        Ok(result)
    }

    /// Draw the club's next book with the thread RNG
    pub fn select_next_book(&self, token: &str, code: &str) -> Result<SelectionResult, StoreError> {
        self.select_next_book_with_rng(token, code, &mut rand::thread_rng())
    }

    /// Mark a book finished directly (any member of its club)
    pub fn complete_book(&self, token: &str, book_id: BookId) -> Result<BookView, StoreError> {
        let mut state = self.state.write();
        let club_id = state
            .books
            .get(&book_id)
            .ok_or(StoreError::BookNotFound)?
            .club_id;
        require_member_of(&state, token, club_id)?;

        let book = state.books.get_mut(&book_id).ok_or(StoreError::BookNotFound)?;
        book.status = BookStatus::Completed;
        book.completed_at = Some(Utc::now());
        let snapshot = book.clone();

        tracing::info!(book = %book_id, "book completed");
        let view = book_view(&state, &snapshot);
        self.commit(&state)?;
        Ok(view)
    }

    /// Cast a veto. Idempotent per member; once the club threshold is met
    /// the book is excluded from draws for good.
    pub fn cast_veto(&self, token: &str, book_id: BookId) -> Result<VetoOutcome, StoreError> {
        let mut state = self.state.write();
        let club_id = state
            .books
            .get(&book_id)
            .ok_or(StoreError::BookNotFound)?
            .club_id;

        let policy = state
            .clubs
            .get(&club_id)
            .ok_or(StoreError::ClubNotFound)?
            .policy;
        if !policy.veto_enabled {
            return Err(StoreError::VetoDisabled);
        }

        let member = require_member_of(&state, token, club_id)?;

        if !state.has_vote(book_id, member.id, VoteKind::Veto) {
            state.votes.push(BookVote {
                book_id,
                member_id: member.id,
                kind: VoteKind::Veto,
                created_at: Utc::now(),
            });
        }

        let tally = state.veto_tally(book_id, club_id);
        let vetoed = tally.meets(policy.veto_threshold_percent);
        if vetoed {
            if let Some(book) = state.books.get_mut(&book_id) {
                book.vetoed = true;
            }
            tracing::info!(
                book = %book_id,
                percentage = tally.percentage(),
                "veto threshold met; book excluded"
            );
        }

        let outcome = VetoOutcome {
            book_id,
            vetoed: state.books.get(&book_id).map(|b| b.vetoed).unwrap_or(false),
            veto_percentage: tally.percentage(),
        };
        self.commit(&state)?;
        Ok(outcome)
    }

    /// Upvote a suggestion (idempotent). Returns the new upvote count.
    pub fn cast_upvote(&self, token: &str, book_id: BookId) -> Result<usize, StoreError> {
        let mut state = self.state.write();
        let club_id = state
            .books
            .get(&book_id)
            .ok_or(StoreError::BookNotFound)?
            .club_id;
        let member = require_member_of(&state, token, club_id)?;

        if !state.has_vote(book_id, member.id, VoteKind::Upvote) {
            state.votes.push(BookVote {
                book_id,
                member_id: member.id,
                kind: VoteKind::Upvote,
                created_at: Utc::now(),
            });
        }
        let count = state.vote_count(book_id, VoteKind::Upvote);
        self.commit(&state)?;
        Ok(count)
    }
}
