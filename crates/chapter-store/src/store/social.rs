//! Discussions, posts, nested comments, likes, ratings and reviews

use chrono::Utc;

use chapter_core::types::{
    BookId, Comment, CommentId, Discussion, DiscussionId, PostId, Rating, RatingId, ReviewComment,
};

use crate::error::StoreError;
use crate::views::{DiscussionView, PostView, RatingsView};

use super::{post_view, rating_view, require_member_of, Store};

impl Store {
    /// Open a discussion thread on a book
    pub fn create_discussion(
        &self,
        token: &str,
        book_id: BookId,
        title: &str,
    ) -> Result<DiscussionView, StoreError> {
        let mut state = self.state.write();
        let club_id = state
            .books
            .get(&book_id)
            .ok_or(StoreError::BookNotFound)?
            .club_id;
        require_member_of(&state, token, club_id)?;

        if title.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let discussion = Discussion {
            id: DiscussionId::new(),
            book_id,
            title: title.trim().to_string(),
            created_at: Utc::now(),
        };
        let view = DiscussionView {
            id: discussion.id,
            book_id,
            title: discussion.title.clone(),
            created_at: discussion.created_at,
            posts: Vec::new(),
        };
        tracing::info!(book = %book_id, discussion = %discussion.id, "discussion created");
        state.discussions.insert(discussion.id, discussion);
        self.commit(&state)?;
        Ok(view)
    }

    /// All discussion threads on a book, newest first
    pub fn discussions_for_book(&self, book_id: BookId) -> Result<Vec<DiscussionView>, StoreError> {
        let state = self.state.read();
        if !state.books.contains_key(&book_id) {
            return Err(StoreError::BookNotFound);
        }
        let mut views: Vec<DiscussionView> = state
            .discussions
            .values()
            .filter(|d| d.book_id == book_id)
            .map(|d| build_discussion_view(&state, d))
            .collect();
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(views)
    }

    /// One thread with all posts and their comment trees
    pub fn discussion_view(&self, discussion_id: DiscussionId) -> Result<DiscussionView, StoreError> {
        let state = self.state.read();
        let discussion = state
            .discussions
            .get(&discussion_id)
            .ok_or(StoreError::DiscussionNotFound)?;
        Ok(build_discussion_view(&state, discussion))
    }

    /// Add a post to a thread
    pub fn add_post(
        &self,
        token: &str,
        discussion_id: DiscussionId,
        content: &str,
        is_spoiler: bool,
    ) -> Result<PostView, StoreError> {
        let mut state = self.state.write();
        let book_id = state
            .discussions
            .get(&discussion_id)
            .ok_or(StoreError::DiscussionNotFound)?
            .book_id;
        let club_id = state
            .books
            .get(&book_id)
            .ok_or(StoreError::BookNotFound)?
            .club_id;
        let member = require_member_of(&state, token, club_id)?;

        if content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let post = chapter_core::types::Post {
            id: PostId::new(),
            discussion_id,
            author_id: member.id,
            content: content.trim().to_string(),
            is_spoiler,
            created_at: Utc::now(),
            likes: Default::default(),
        };
        let post_id = post.id;
        state.posts.insert(post_id, post);

        let view = post_view(&state, post_id).ok_or(StoreError::PostNotFound)?;
        self.commit(&state)?;
        Ok(view)
    }

    /// Like or unlike a post. Returns whether the caller now likes it.
    pub fn toggle_post_like(&self, token: &str, post_id: PostId) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        let club_id = self.post_club(&state, post_id)?;
        let member = require_member_of(&state, token, club_id)?;

        let post = state.posts.get_mut(&post_id).ok_or(StoreError::PostNotFound)?;
        let liked = if post.likes.remove(&member.id) {
            false
        } else {
            post.likes.insert(member.id);
            true
        };
        self.commit(&state)?;
        Ok(liked)
    }

    /// Comment on a post, optionally as a reply to another comment
    pub fn add_comment(
        &self,
        token: &str,
        post_id: PostId,
        parent_id: Option<CommentId>,
        content: &str,
        is_spoiler: bool,
    ) -> Result<PostView, StoreError> {
        let mut state = self.state.write();
        let club_id = self.post_club(&state, post_id)?;
        let member = require_member_of(&state, token, club_id)?;

        if content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }
        if let Some(parent) = parent_id {
            if !state
                .comments
                .get(&parent)
                .is_some_and(|c| c.post_id == post_id)
            {
                return Err(StoreError::CommentNotFound);
            }
        }

        let comment = Comment {
            id: CommentId::new(),
            post_id,
            parent_id,
            author_id: member.id,
            content: content.trim().to_string(),
            is_spoiler,
            created_at: Utc::now(),
            likes: Default::default(),
        };
        state.comments.insert(comment.id, comment);

        let view = post_view(&state, post_id).ok_or(StoreError::PostNotFound)?;
        self.commit(&state)?;
        Ok(view)
    }

    /// Like or unlike a comment
    pub fn toggle_comment_like(
        &self,
        token: &str,
        comment_id: CommentId,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        let post_id = state
            .comments
            .get(&comment_id)
            .ok_or(StoreError::CommentNotFound)?
            .post_id;
        let club_id = self.post_club(&state, post_id)?;
        let member = require_member_of(&state, token, club_id)?;

        let comment = state
            .comments
            .get_mut(&comment_id)
            .ok_or(StoreError::CommentNotFound)?;
        let liked = if comment.likes.remove(&member.id) {
            false
        } else {
            comment.likes.insert(member.id);
            true
        };
        self.commit(&state)?;
        Ok(liked)
    }

    /// Rate a book 1-5 stars with an optional review; one rating per
    /// member, resubmission updates in place
    pub fn submit_rating(
        &self,
        token: &str,
        book_id: BookId,
        stars: u8,
        review: &str,
    ) -> Result<RatingsView, StoreError> {
        let mut state = self.state.write();
        let club_id = state
            .books
            .get(&book_id)
            .ok_or(StoreError::BookNotFound)?
            .club_id;
        let member = require_member_of(&state, token, club_id)?;

        if !(1..=5).contains(&stars) {
            return Err(StoreError::InvalidStars(stars));
        }

        let now = Utc::now();
        let existing = state
            .ratings
            .values_mut()
            .find(|r| r.book_id == book_id && r.member_id == member.id);
        match existing {
            Some(rating) => {
                rating.stars = stars;
                rating.review = review.to_string();
                rating.updated_at = now;
            }
            None => {
                let rating = Rating {
                    id: RatingId::new(),
                    book_id,
                    member_id: member.id,
                    stars,
                    review: review.to_string(),
                    created_at: now,
                    updated_at: now,
                    likes: Default::default(),
                    comments: Vec::new(),
                };
                state.ratings.insert(rating.id, rating);
            }
        }

        tracing::debug!(book = %book_id, member = %member.id, stars, "rating submitted");
        let view = build_ratings_view(&state, book_id, Some(member.id));
        self.commit(&state)?;
        Ok(view)
    }

    /// The ratings page for a book; `token` only personalizes
    /// `user_rating`
    pub fn ratings_view(
        &self,
        book_id: BookId,
        token: Option<&str>,
    ) -> Result<RatingsView, StoreError> {
        let state = self.state.read();
        if !state.books.contains_key(&book_id) {
            return Err(StoreError::BookNotFound);
        }
        let viewer = token.and_then(|t| state.member_by_token(t)).map(|m| m.id);
        Ok(build_ratings_view(&state, book_id, viewer))
    }

    /// Like or unlike a review
    pub fn toggle_review_like(&self, token: &str, rating_id: RatingId) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        let book_id = state
            .ratings
            .get(&rating_id)
            .ok_or(StoreError::RatingNotFound)?
            .book_id;
        let club_id = state
            .books
            .get(&book_id)
            .ok_or(StoreError::BookNotFound)?
            .club_id;
        let member = require_member_of(&state, token, club_id)?;

        let rating = state
            .ratings
            .get_mut(&rating_id)
            .ok_or(StoreError::RatingNotFound)?;
        let liked = if rating.likes.remove(&member.id) {
            false
        } else {
            rating.likes.insert(member.id);
            true
        };
        self.commit(&state)?;
        Ok(liked)
    }

    /// Comment on a review (flat, non-empty)
    pub fn add_review_comment(
        &self,
        token: &str,
        rating_id: RatingId,
        content: &str,
    ) -> Result<RatingsView, StoreError> {
        let mut state = self.state.write();
        let book_id = state
            .ratings
            .get(&rating_id)
            .ok_or(StoreError::RatingNotFound)?
            .book_id;
        let club_id = state
            .books
            .get(&book_id)
            .ok_or(StoreError::BookNotFound)?
            .club_id;
        let member = require_member_of(&state, token, club_id)?;

        if content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let rating = state
            .ratings
            .get_mut(&rating_id)
            .ok_or(StoreError::RatingNotFound)?;
        rating.comments.push(ReviewComment {
            id: CommentId::new(),
            author_id: member.id,
            content: content.trim().to_string(),
            created_at: Utc::now(),
        });

        let view = build_ratings_view(&state, book_id, Some(member.id));
        self.commit(&state)?;
        Ok(view)
    }

    /// Delete a rating (its author only)
    pub fn delete_rating(&self, token: &str, rating_id: RatingId) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let rating = state
            .ratings
            .get(&rating_id)
            .ok_or(StoreError::RatingNotFound)?;
        let (book_id, author_id) = (rating.book_id, rating.member_id);
        let club_id = state
            .books
            .get(&book_id)
            .ok_or(StoreError::BookNotFound)?
            .club_id;
        let member = require_member_of(&state, token, club_id)?;
        if author_id != member.id {
            return Err(StoreError::NotAuthor);
        }

        state.ratings.remove(&rating_id);
        self.commit(&state)?;
        Ok(())
    }

    /// Club a post belongs to, via its discussion's book
    fn post_club(
        &self,
        state: &crate::state::State,
        post_id: PostId,
    ) -> Result<chapter_core::types::ClubId, StoreError> {
        let discussion_id = state
            .posts
            .get(&post_id)
            .ok_or(StoreError::PostNotFound)?
            .discussion_id;
        let book_id = state
            .discussions
            .get(&discussion_id)
            .ok_or(StoreError::DiscussionNotFound)?
            .book_id;
        Ok(state
            .books
            .get(&book_id)
            .ok_or(StoreError::BookNotFound)?
            .club_id)
    }
}

fn build_discussion_view(state: &crate::state::State, discussion: &Discussion) -> DiscussionView {
    let mut posts: Vec<PostView> = state
        .posts
        .values()
        .filter(|p| p.discussion_id == discussion.id)
        .filter_map(|p| post_view(state, p.id))
        .collect();
    posts.sort_by_key(|p| p.created_at);
    DiscussionView {
        id: discussion.id,
        book_id: discussion.book_id,
        title: discussion.title.clone(),
        created_at: discussion.created_at,
        posts,
    }
}

fn build_ratings_view(
    state: &crate::state::State,
    book_id: BookId,
    viewer: Option<chapter_core::types::MemberId>,
) -> RatingsView {
    let mut ratings: Vec<_> = state
        .ratings
        .values()
        .filter(|r| r.book_id == book_id)
        .collect();
    ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = ratings.len();
    let average = if total == 0 {
        None
    } else {
        let sum: u32 = ratings.iter().map(|r| u32::from(r.stars)).sum();
        Some((sum as f64 / total as f64 * 10.0).round() / 10.0)
    };

    let user_rating = viewer.and_then(|member_id| {
        ratings
            .iter()
            .find(|r| r.member_id == member_id)
            .map(|r| rating_view(state, r))
    });

    RatingsView {
        book_id,
        average,
        total,
        user_rating,
        ratings: ratings.into_iter().map(|r| rating_view(state, r)).collect(),
    }
}
