//! Club membership operations: create, join, leave, policy, admin roles

use chrono::Utc;
use serde::Serialize;

use chapter_core::policy::ClubPolicy;
use chapter_core::types::{
    generate_join_code, generate_session_token, BookStatus, Club, ClubId, Member, MemberId,
};

use crate::error::StoreError;
use crate::state::State;
use crate::views::{ClubOverview, MemberView};

use super::{book_view, meeting_view, member_view, require_admin_of, require_member_of, Store};

/// What a freshly created or joined member needs to carry on
#[derive(Debug, Clone, Serialize)]
pub struct JoinResult {
    pub club_id: ClubId,
    pub club_code: String,
    pub member_id: MemberId,
    /// Present exactly once; the caller must keep it
    pub session_token: String,
}

impl Store {
    /// Create a club; the creator becomes its founding admin
    pub fn create_club(
        &self,
        name: &str,
        description: &str,
        display_name: &str,
    ) -> Result<JoinResult, StoreError> {
        let mut rng = rand::thread_rng();
        let mut state = self.state.write();

        let mut code = generate_join_code(&mut rng);
        while state.club_by_code(&code).is_some() {
            code = generate_join_code(&mut rng);
        }

        let club = Club::new(name, code.clone(), description);
        let token = fresh_token(&state, &mut rng);
        let member = Member::new(club.id, display_name, token.clone(), true);

        tracing::info!(club = %code, member = %member.id, "club created");

        let result = JoinResult {
            club_id: club.id,
            club_code: code,
            member_id: member.id,
            session_token: token,
        };
        state.clubs.insert(club.id, club);
        state.members.insert(member.id, member);
        self.commit(&state)?;
        Ok(result)
    }

    /// Join an existing club by its code
    pub fn join_club(&self, code: &str, display_name: &str) -> Result<JoinResult, StoreError> {
        let mut rng = rand::thread_rng();
        let mut state = self.state.write();

        let club = state.club_by_code(code).ok_or(StoreError::ClubNotFound)?;
        let (club_id, club_code) = (club.id, club.code.clone());

        let token = fresh_token(&state, &mut rng);
        let member = Member::new(club_id, display_name, token.clone(), false);

        tracing::info!(club = %club_code, member = %member.id, "member joined");

        let result = JoinResult {
            club_id,
            club_code,
            member_id: member.id,
            session_token: token,
        };
        state.members.insert(member.id, member);
        self.commit(&state)?;
        Ok(result)
    }

    /// Leave a club. The last member takes the club (and everything in it)
    /// with them; otherwise the last admin must hand off before leaving.
    pub fn leave_club(&self, token: &str, code: &str) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let club_id = state.club_by_code(code).ok_or(StoreError::ClubNotFound)?.id;
        let member = require_member_of(&state, token, club_id)?;

        if state.member_count(club_id) == 1 {
            tracing::info!(club = %code, "last member left; deleting club");
            delete_club_cascade(&mut state, club_id);
            self.commit(&state)?;
            return Ok(());
        }
        if member.is_admin && state.admin_count(club_id) == 1 {
            return Err(StoreError::LastAdmin);
        }

        state.members.remove(&member.id);
        state.votes.retain(|v| v.member_id != member.id);
        state.rsvps.retain(|r| r.member_id != member.id);

        // A departing host hands the schedule to the longest-standing admin
        if let Some(schedule) = state.schedules.get(&club_id) {
            if schedule.current_host == member.id {
                let successor = state
                    .club_members(club_id)
                    .filter(|m| m.is_admin)
                    .min_by_key(|m| m.joined_at)
                    .map(|m| m.id);
                if let (Some(successor), Some(schedule)) =
                    (successor, state.schedules.get_mut(&club_id))
                {
                    schedule.current_host = successor;
                    tracing::info!(club = %code, host = %successor, "host reassigned on leave");
                }
            }
        }

        tracing::info!(club = %code, member = %member.id, "member left");
        self.commit(&state)?;
        Ok(())
    }

    /// Replace the club policy (admin only)
    pub fn update_policy(
        &self,
        token: &str,
        code: &str,
        policy: ClubPolicy,
    ) -> Result<ClubPolicy, StoreError> {
        policy.validate()?;
        let mut state = self.state.write();
        let club_id = state.club_by_code(code).ok_or(StoreError::ClubNotFound)?.id;
        require_admin_of(&state, token, club_id)?;

        if let Some(club) = state.clubs.get_mut(&club_id) {
            club.policy = policy;
        }
        tracing::info!(club = %code, "policy updated");
        self.commit(&state)?;
        Ok(policy)
    }

    /// Grant admin to a member (admin only)
    pub fn promote_member(
        &self,
        token: &str,
        code: &str,
        target: MemberId,
    ) -> Result<MemberView, StoreError> {
        let mut state = self.state.write();
        let club_id = state.club_by_code(code).ok_or(StoreError::ClubNotFound)?.id;
        require_admin_of(&state, token, club_id)?;

        let member = state
            .members
            .get_mut(&target)
            .filter(|m| m.club_id == club_id)
            .ok_or(StoreError::MemberNotFound)?;
        member.is_admin = true;
        let view = member_view(member);
        tracing::info!(club = %code, member = %target, "member promoted");
        self.commit(&state)?;
        Ok(view)
    }

    /// Revoke admin from a member (admin only). Rejected when it would
    /// leave the club without any admin.
    pub fn demote_member(
        &self,
        token: &str,
        code: &str,
        target: MemberId,
    ) -> Result<MemberView, StoreError> {
        let mut state = self.state.write();
        let club_id = state.club_by_code(code).ok_or(StoreError::ClubNotFound)?.id;
        require_admin_of(&state, token, club_id)?;

        let was_admin = state
            .members
            .get(&target)
            .filter(|m| m.club_id == club_id)
            .ok_or(StoreError::MemberNotFound)?
            .is_admin;
        if was_admin && state.admin_count(club_id) == 1 {
            return Err(StoreError::LastAdmin);
        }

        let member = state
            .members
            .get_mut(&target)
            .ok_or(StoreError::MemberNotFound)?;
        member.is_admin = false;
        let view = member_view(member);
        tracing::info!(club = %code, member = %target, "member demoted");
        self.commit(&state)?;
        Ok(view)
    }

    /// The club page: members, book shelves, next meeting. Works without a
    /// session; `current_member` is filled when the token belongs here.
    pub fn club_overview(
        &self,
        code: &str,
        token: Option<&str>,
    ) -> Result<ClubOverview, StoreError> {
        let state = self.state.read();
        let club = state
            .club_by_code(code)
            .ok_or(StoreError::ClubNotFound)?
            .clone();

        let current_member = token
            .and_then(|t| state.member_by_token(t))
            .filter(|m| m.club_id == club.id)
            .map(member_view);

        let mut members: Vec<MemberView> =
            state.club_members(club.id).map(member_view).collect();
        members.sort_by_key(|m| m.joined_at);

        let mut suggested = Vec::new();
        let mut completed = Vec::new();
        let mut current_book = None;
        for book in state.club_books(club.id) {
            match book.status {
                BookStatus::Suggested if !book.vetoed => {
                    suggested.push(book_view(&state, book));
                }
                BookStatus::Reading => current_book = Some(book_view(&state, book)),
                BookStatus::Completed => completed.push(book_view(&state, book)),
                _ => {}
            }
        }
        suggested.sort_by_key(|b| b.suggested_at);
        completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

        let now = Utc::now();
        let next_meeting = state
            .meetings
            .values()
            .filter(|m| {
                m.club_id == club.id
                    && m.status == chapter_core::types::MeetingStatus::Scheduled
                    && m.starts_at >= now
            })
            .min_by_key(|m| m.starts_at)
            .map(|m| meeting_view(&state, m));

        Ok(ClubOverview {
            id: club.id,
            name: club.name,
            code: club.code,
            description: club.description,
            policy: club.policy,
            created_at: club.created_at,
            members,
            current_member,
            suggested_books: suggested,
            current_book,
            completed_books: completed,
            next_meeting,
        })
    }
}

fn fresh_token<R: rand::Rng>(state: &State, rng: &mut R) -> String {
    let mut token = generate_session_token(rng);
    while state.member_by_token(&token).is_some() {
        token = generate_session_token(rng);
    }
    token
}

/// Remove a club and every row that hangs off it
fn delete_club_cascade(state: &mut State, club_id: ClubId) {
    let book_ids: Vec<_> = state.club_books(club_id).map(|b| b.id).collect();
    let discussion_ids: Vec<_> = state
        .discussions
        .values()
        .filter(|d| book_ids.contains(&d.book_id))
        .map(|d| d.id)
        .collect();
    let post_ids: Vec<_> = state
        .posts
        .values()
        .filter(|p| discussion_ids.contains(&p.discussion_id))
        .map(|p| p.id)
        .collect();
    let meeting_ids: Vec<_> = state
        .meetings
        .values()
        .filter(|m| m.club_id == club_id)
        .map(|m| m.id)
        .collect();

    state.comments.retain(|_, c| !post_ids.contains(&c.post_id));
    state.posts.retain(|id, _| !post_ids.contains(id));
    state
        .discussions
        .retain(|id, _| !discussion_ids.contains(id));
    state.ratings.retain(|_, r| !book_ids.contains(&r.book_id));
    state.votes.retain(|v| !book_ids.contains(&v.book_id));
    state.rsvps.retain(|r| !meeting_ids.contains(&r.meeting_id));
    state.meetings.retain(|id, _| !meeting_ids.contains(id));
    state.schedules.remove(&club_id);
    state.books.retain(|id, _| !book_ids.contains(id));
    state.members.retain(|_, m| m.club_id != club_id);
    state.clubs.remove(&club_id);
}
