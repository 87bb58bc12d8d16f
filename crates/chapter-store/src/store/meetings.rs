//! Meeting schedule, host rotation, meetings and RSVPs

use chrono::{DateTime, Utc};
use serde::Deserialize;

use chapter_core::ics::IcsEvent;
use chapter_core::schedule::Recurrence;
use chapter_core::types::{
    BookId, Meeting, MeetingId, MeetingSchedule, MeetingStatus, MemberId, Rsvp, RsvpStatus,
};

use crate::error::StoreError;
use crate::views::{MeetingView, MeetingsOverview, RsvpEntry, RsvpView, ScheduleView};

use super::{meeting_view, require_member_of, Store};

/// Recurrence settings as clients submit them
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleParams {
    /// `weekly`, `biweekly`, `monthly_day` or `monthly_date`
    pub recurrence_pattern: String,
    /// e.g. `Tuesday`, `4th Tuesday`, `15`
    pub recurrence_details: String,
    #[serde(default = "default_duration")]
    pub default_duration_minutes: u32,
}

fn default_duration() -> u32 {
    120
}

/// Fields for a new meeting
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeeting {
    pub title: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub book_id: Option<BookId>,
}

impl Store {
    /// Create or update the club's single schedule. The first member to
    /// set one up becomes host; afterwards only the current host may
    /// change it.
    pub fn setup_schedule(
        &self,
        token: &str,
        code: &str,
        params: ScheduleParams,
    ) -> Result<ScheduleView, StoreError> {
        let recurrence =
            Recurrence::parse(&params.recurrence_pattern, &params.recurrence_details)?;

        let mut state = self.state.write();
        let club_id = state.club_by_code(code).ok_or(StoreError::ClubNotFound)?.id;
        let member = require_member_of(&state, token, club_id)?;

        match state.schedules.get_mut(&club_id) {
            Some(schedule) => {
                if schedule.current_host != member.id {
                    return Err(StoreError::NotHost);
                }
                schedule.recurrence = recurrence;
                schedule.default_duration_minutes = params.default_duration_minutes;
                tracing::info!(club = %code, %recurrence, "schedule updated");
            }
            None => {
                state.schedules.insert(
                    club_id,
                    MeetingSchedule {
                        club_id,
                        current_host: member.id,
                        recurrence,
                        default_duration_minutes: params.default_duration_minutes,
                        is_active: true,
                        created_at: Utc::now(),
                    },
                );
                tracing::info!(club = %code, host = %member.id, %recurrence, "schedule created");
            }
        }

        let view = schedule_view_for(&state, club_id).ok_or(StoreError::ClubNotFound)?;
        self.commit(&state)?;
        Ok(view)
    }

    /// Hand the host role to another member of the club (host only).
    /// A plain reassignment; no history is kept.
    pub fn transfer_host(
        &self,
        token: &str,
        code: &str,
        new_host: MemberId,
    ) -> Result<ScheduleView, StoreError> {
        let mut state = self.state.write();
        let club_id = state.club_by_code(code).ok_or(StoreError::ClubNotFound)?.id;
        let member = require_member_of(&state, token, club_id)?;

        let schedule = state
            .schedules
            .get(&club_id)
            .ok_or(StoreError::NotHost)?;
        if schedule.current_host != member.id {
            return Err(StoreError::NotHost);
        }
        if !state
            .members
            .get(&new_host)
            .is_some_and(|m| m.club_id == club_id)
        {
            return Err(StoreError::MemberNotFound);
        }

        if let Some(schedule) = state.schedules.get_mut(&club_id) {
            schedule.current_host = new_host;
        }
        tracing::info!(club = %code, from = %member.id, to = %new_host, "host transferred");

        let view = schedule_view_for(&state, club_id).ok_or(StoreError::ClubNotFound)?;
        self.commit(&state)?;
        Ok(view)
    }

    /// Schedule a meeting. When the club has a schedule, only its current
    /// host may do this; the host is RSVP'd yes automatically.
    pub fn create_meeting(
        &self,
        token: &str,
        code: &str,
        fields: CreateMeeting,
    ) -> Result<MeetingView, StoreError> {
        let mut state = self.state.write();
        let club_id = state.club_by_code(code).ok_or(StoreError::ClubNotFound)?.id;
        let member = require_member_of(&state, token, club_id)?;

        if let Some(schedule) = state.schedules.get(&club_id) {
            if schedule.current_host != member.id {
                return Err(StoreError::NotHost);
            }
        }
        if fields.title.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }
        if let Some(book_id) = fields.book_id {
            if !state
                .books
                .get(&book_id)
                .is_some_and(|b| b.club_id == club_id)
            {
                return Err(StoreError::BookNotFound);
            }
        }

        let duration = fields.duration_minutes.unwrap_or_else(|| {
            state
                .schedules
                .get(&club_id)
                .map(|s| s.default_duration_minutes)
                .unwrap_or_else(default_duration)
        });

        let now = Utc::now();
        let meeting = Meeting {
            id: MeetingId::new(),
            club_id,
            book_id: fields.book_id,
            host_id: member.id,
            title: fields.title.trim().to_string(),
            starts_at: fields.starts_at,
            duration_minutes: duration,
            location: fields.location,
            description: fields.description,
            notes: String::new(),
            status: MeetingStatus::Scheduled,
            created_at: now,
            completed_at: None,
        };
        let meeting_id = meeting.id;

        tracing::info!(club = %code, meeting = %meeting_id, starts = %meeting.starts_at, "meeting scheduled");

        state.meetings.insert(meeting_id, meeting);
        state.rsvps.push(Rsvp {
            meeting_id,
            member_id: member.id,
            status: RsvpStatus::Yes,
            bringing: String::new(),
            notes: "Host".to_string(),
            created_at: now,
            updated_at: now,
        });

        let view = state
            .meetings
            .get(&meeting_id)
            .map(|m| meeting_view(&state, m))
            .ok_or(StoreError::MeetingNotFound)?;
        self.commit(&state)?;
        Ok(view)
    }

    /// Mark a meeting held (any member of the club)
    pub fn complete_meeting(
        &self,
        token: &str,
        meeting_id: MeetingId,
    ) -> Result<MeetingView, StoreError> {
        let mut state = self.state.write();
        let club_id = state
            .meetings
            .get(&meeting_id)
            .ok_or(StoreError::MeetingNotFound)?
            .club_id;
        require_member_of(&state, token, club_id)?;

        let meeting = state
            .meetings
            .get_mut(&meeting_id)
            .ok_or(StoreError::MeetingNotFound)?;
        meeting.status = MeetingStatus::Completed;
        meeting.completed_at = Some(Utc::now());
        let snapshot = meeting.clone();

        tracing::info!(meeting = %meeting_id, "meeting completed");
        let view = meeting_view(&state, &snapshot);
        self.commit(&state)?;
        Ok(view)
    }

    /// Cancel a meeting (its host only)
    pub fn cancel_meeting(
        &self,
        token: &str,
        meeting_id: MeetingId,
    ) -> Result<MeetingView, StoreError> {
        let mut state = self.state.write();
        let meeting = state
            .meetings
            .get(&meeting_id)
            .ok_or(StoreError::MeetingNotFound)?;
        let (club_id, host_id) = (meeting.club_id, meeting.host_id);
        let member = require_member_of(&state, token, club_id)?;
        if host_id != member.id {
            return Err(StoreError::NotHost);
        }

        let meeting = state
            .meetings
            .get_mut(&meeting_id)
            .ok_or(StoreError::MeetingNotFound)?;
        meeting.status = MeetingStatus::Cancelled;
        let snapshot = meeting.clone();

        tracing::info!(meeting = %meeting_id, "meeting cancelled");
        let view = meeting_view(&state, &snapshot);
        self.commit(&state)?;
        Ok(view)
    }

    /// Submit or update the caller's RSVP (one row per member per meeting)
    pub fn submit_rsvp(
        &self,
        token: &str,
        meeting_id: MeetingId,
        status: RsvpStatus,
        bringing: String,
        notes: String,
    ) -> Result<RsvpView, StoreError> {
        let mut state = self.state.write();
        let club_id = state
            .meetings
            .get(&meeting_id)
            .ok_or(StoreError::MeetingNotFound)?
            .club_id;
        let member = require_member_of(&state, token, club_id)?;

        let now = Utc::now();
        match state
            .rsvps
            .iter_mut()
            .find(|r| r.meeting_id == meeting_id && r.member_id == member.id)
        {
            Some(rsvp) => {
                rsvp.status = status;
                rsvp.bringing = bringing;
                rsvp.notes = notes;
                rsvp.updated_at = now;
            }
            None => state.rsvps.push(Rsvp {
                meeting_id,
                member_id: member.id,
                status,
                bringing,
                notes,
                created_at: now,
                updated_at: now,
            }),
        }

        tracing::debug!(meeting = %meeting_id, member = %member.id, ?status, "rsvp recorded");
        let view = self.build_rsvp_view(&state, meeting_id, member.id)?;
        self.commit(&state)?;
        Ok(view)
    }

    /// The RSVP page: the caller's answer plus who is coming and what
    /// they bring
    pub fn rsvp_view(&self, token: &str, meeting_id: MeetingId) -> Result<RsvpView, StoreError> {
        let state = self.state.read();
        let club_id = state
            .meetings
            .get(&meeting_id)
            .ok_or(StoreError::MeetingNotFound)?
            .club_id;
        let member = require_member_of(&state, token, club_id)?;
        self.build_rsvp_view(&state, meeting_id, member.id)
    }

    /// The meetings page for a club
    pub fn meetings_overview(&self, code: &str) -> Result<MeetingsOverview, StoreError> {
        let state = self.state.read();
        let club_id = state.club_by_code(code).ok_or(StoreError::ClubNotFound)?.id;

        let now = Utc::now();
        let mut upcoming: Vec<MeetingView> = state
            .meetings
            .values()
            .filter(|m| {
                m.club_id == club_id && m.status == MeetingStatus::Scheduled && m.starts_at >= now
            })
            .map(|m| meeting_view(&state, m))
            .collect();
        upcoming.sort_by_key(|m| m.starts_at);

        let mut past: Vec<MeetingView> = state
            .meetings
            .values()
            .filter(|m| {
                m.club_id == club_id
                    && matches!(m.status, MeetingStatus::Completed | MeetingStatus::Cancelled)
            })
            .map(|m| meeting_view(&state, m))
            .collect();
        past.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));
        past.truncate(10);

        Ok(MeetingsOverview {
            upcoming,
            past,
            schedule: schedule_view_for(&state, club_id),
        })
    }

    /// Render a meeting as an iCalendar file. No session required, the
    /// download link is shared around.
    pub fn meeting_ics(&self, meeting_id: MeetingId) -> Result<String, StoreError> {
        let state = self.state.read();
        let meeting = state
            .meetings
            .get(&meeting_id)
            .ok_or(StoreError::MeetingNotFound)?;

        let event = IcsEvent {
            uid: format!("{}@chapter", meeting.id),
            summary: meeting.title.clone(),
            starts_at: meeting.starts_at,
            duration_minutes: meeting.duration_minutes,
            location: meeting.location.clone(),
            description: meeting.description.clone(),
            cancelled: meeting.status == MeetingStatus::Cancelled,
        };
        Ok(event.render())
    }

    fn build_rsvp_view(
        &self,
        state: &crate::state::State,
        meeting_id: MeetingId,
        member_id: MemberId,
    ) -> Result<RsvpView, StoreError> {
        let meeting = state
            .meetings
            .get(&meeting_id)
            .ok_or(StoreError::MeetingNotFound)?;

        let entry = |r: &Rsvp| RsvpEntry {
            member_id: r.member_id,
            member_name: state.member_name(r.member_id),
            status: r.status,
            bringing: r.bringing.clone(),
            notes: r.notes.clone(),
        };

        let current = state
            .rsvps
            .iter()
            .find(|r| r.meeting_id == meeting_id && r.member_id == member_id)
            .map(entry);
        let attending = state
            .rsvps
            .iter()
            .filter(|r| r.meeting_id == meeting_id && r.status == RsvpStatus::Yes)
            .map(entry)
            .collect();

        Ok(RsvpView {
            meeting: meeting_view(state, meeting),
            current,
            attending,
        })
    }
}

fn schedule_view_for(state: &crate::state::State, club_id: chapter_core::types::ClubId) -> Option<ScheduleView> {
    let schedule = state.schedules.get(&club_id)?;
    let today = Utc::now().date_naive();
    Some(ScheduleView {
        current_host: schedule.current_host,
        current_host_name: state.member_name(schedule.current_host),
        recurrence: schedule.recurrence,
        recurrence_label: schedule.recurrence.to_string(),
        default_duration_minutes: schedule.default_duration_minutes,
        is_active: schedule.is_active,
        next_occurrence: schedule.recurrence.next_occurrence(today),
    })
}
