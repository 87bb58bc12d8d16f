//! Schedule, host rotation, meeting and RSVP tests

use chrono::{Duration, Utc};

use chapter_core::types::{MeetingStatus, RsvpStatus};
use chapter_store::{CreateMeeting, ScheduleParams, Store, StoreError};

fn weekly_schedule() -> ScheduleParams {
    ScheduleParams {
        recurrence_pattern: "weekly".to_string(),
        recurrence_details: "Tuesday".to_string(),
        default_duration_minutes: 90,
    }
}

fn meeting_in(hours: i64) -> CreateMeeting {
    CreateMeeting {
        title: "Chapter check-in".to_string(),
        starts_at: Utc::now() + Duration::hours(hours),
        duration_minutes: None,
        location: "The library".to_string(),
        description: String::new(),
        book_id: None,
    }
}

#[test]
fn first_scheduler_becomes_host() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();

    let view = store
        .setup_schedule(&bob.session_token, &code, weekly_schedule())
        .unwrap();
    assert_eq!(view.current_host, bob.member_id);
    assert_eq!(view.current_host_name, "Bob");
    assert_eq!(view.default_duration_minutes, 90);

    // Everyone else is locked out of schedule changes now
    match store.setup_schedule(&alice.session_token, &code, weekly_schedule()) {
        Err(StoreError::NotHost) => {}
        other => panic!("expected NotHost, got {other:?}"),
    }
}

#[test]
fn bad_recurrence_is_rejected_up_front() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let params = ScheduleParams {
        recurrence_pattern: "fortnightly".to_string(),
        recurrence_details: "Tuesday".to_string(),
        default_duration_minutes: 90,
    };
    assert!(matches!(
        store.setup_schedule(&alice.session_token, &alice.club_code, params),
        Err(StoreError::Recurrence(_))
    ));
}

#[test]
fn only_the_host_creates_meetings_once_scheduled() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();

    store
        .setup_schedule(&alice.session_token, &code, weekly_schedule())
        .unwrap();

    match store.create_meeting(&bob.session_token, &code, meeting_in(24)) {
        Err(StoreError::NotHost) => {}
        other => panic!("expected NotHost, got {other:?}"),
    }

    let meeting = store
        .create_meeting(&alice.session_token, &code, meeting_in(24))
        .unwrap();
    assert_eq!(meeting.host_id, alice.member_id);
    // Falls back to the schedule default
    assert_eq!(meeting.duration_minutes, 90);
}

#[test]
fn any_member_creates_meetings_without_a_schedule() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();

    let meeting = store
        .create_meeting(&bob.session_token, &code, meeting_in(24))
        .unwrap();
    assert_eq!(meeting.host_id, bob.member_id);
    assert_eq!(meeting.duration_minutes, 120);
}

#[test]
fn the_host_is_rsvped_yes_automatically() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();

    let meeting = store
        .create_meeting(&alice.session_token, &code, meeting_in(24))
        .unwrap();
    assert_eq!(meeting.rsvps.yes, 1);

    let view = store.rsvp_view(&alice.session_token, meeting.id).unwrap();
    let current = view.current.unwrap();
    assert_eq!(current.status, RsvpStatus::Yes);
    assert_eq!(view.attending.len(), 1);
}

#[test]
fn transfer_host_moves_meeting_creation_rights() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();

    store
        .setup_schedule(&alice.session_token, &code, weekly_schedule())
        .unwrap();
    let view = store
        .transfer_host(&alice.session_token, &code, bob.member_id)
        .unwrap();
    assert_eq!(view.current_host, bob.member_id);

    assert!(matches!(
        store.create_meeting(&alice.session_token, &code, meeting_in(24)),
        Err(StoreError::NotHost)
    ));
    assert!(store.create_meeting(&bob.session_token, &code, meeting_in(24)).is_ok());
}

#[test]
fn departing_host_hands_off_to_the_longest_standing_admin() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();
    let carol = store.join_club(&code, "Carol").unwrap();
    store
        .promote_member(&alice.session_token, &code, carol.member_id)
        .unwrap();

    store
        .setup_schedule(&bob.session_token, &code, weekly_schedule())
        .unwrap();
    store.leave_club(&bob.session_token, &code).unwrap();

    // Alice and Carol are both admins; Alice joined first
    let overview = store.meetings_overview(&code).unwrap();
    let schedule = overview.schedule.unwrap();
    assert_eq!(schedule.current_host, alice.member_id);
    assert_eq!(schedule.current_host_name, "Alice");

    // And the role actually moved: Alice may now change the schedule
    assert!(store
        .setup_schedule(&alice.session_token, &code, weekly_schedule())
        .is_ok());
}

#[test]
fn host_cannot_be_transferred_outside_the_club() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();
    let outsider = store.create_club("Rivals", "", "Mallory").unwrap();

    store
        .setup_schedule(&alice.session_token, &code, weekly_schedule())
        .unwrap();
    assert!(matches!(
        store.transfer_host(&alice.session_token, &code, outsider.member_id),
        Err(StoreError::MemberNotFound)
    ));
}

#[test]
fn rsvps_upsert_one_row_per_member() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();

    let meeting = store
        .create_meeting(&alice.session_token, &code, meeting_in(24))
        .unwrap();

    let view = store
        .submit_rsvp(
            &bob.session_token,
            meeting.id,
            RsvpStatus::Yes,
            "Snacks".to_string(),
            String::new(),
        )
        .unwrap();
    assert_eq!(view.meeting.rsvps.yes, 2);
    assert_eq!(view.attending.len(), 2);

    // A second answer replaces the first
    let view = store
        .submit_rsvp(
            &bob.session_token,
            meeting.id,
            RsvpStatus::Maybe,
            String::new(),
            "might be late".to_string(),
        )
        .unwrap();
    assert_eq!(view.meeting.rsvps.yes, 1);
    assert_eq!(view.meeting.rsvps.maybe, 1);
    assert_eq!(view.current.unwrap().status, RsvpStatus::Maybe);
    assert_eq!(view.attending.len(), 1);
}

#[test]
fn only_the_meeting_host_may_cancel() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();

    let meeting = store
        .create_meeting(&alice.session_token, &code, meeting_in(24))
        .unwrap();

    assert!(matches!(
        store.cancel_meeting(&bob.session_token, meeting.id),
        Err(StoreError::NotHost)
    ));

    let cancelled = store.cancel_meeting(&alice.session_token, meeting.id).unwrap();
    assert_eq!(cancelled.status, MeetingStatus::Cancelled);
}

#[test]
fn any_member_may_mark_a_meeting_completed() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();

    let meeting = store
        .create_meeting(&alice.session_token, &code, meeting_in(-24))
        .unwrap();
    let done = store.complete_meeting(&bob.session_token, meeting.id).unwrap();
    assert_eq!(done.status, MeetingStatus::Completed);
    assert!(done.completed_at.is_some());
}

#[test]
fn overview_splits_upcoming_from_past() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();

    let future = store
        .create_meeting(&alice.session_token, &code, meeting_in(48))
        .unwrap();
    let past = store
        .create_meeting(&alice.session_token, &code, meeting_in(-48))
        .unwrap();
    store.complete_meeting(&alice.session_token, past.id).unwrap();

    let overview = store.meetings_overview(&code).unwrap();
    assert_eq!(overview.upcoming.len(), 1);
    assert_eq!(overview.upcoming[0].id, future.id);
    assert_eq!(overview.past.len(), 1);
    assert_eq!(overview.past[0].id, past.id);
    assert!(overview.schedule.is_none());
}

#[test]
fn ics_export_carries_the_meeting_fields() {
    let store = Store::in_memory();
    let alice = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = alice.club_code.clone();

    let meeting = store
        .create_meeting(&alice.session_token, &code, meeting_in(24))
        .unwrap();
    let ics = store.meeting_ics(meeting.id).unwrap();

    assert!(ics.starts_with("BEGIN:VCALENDAR"));
    assert!(ics.contains("SUMMARY:Chapter check-in"));
    assert!(ics.contains("LOCATION:The library"));
    assert!(ics.contains("STATUS:CONFIRMED"));
    assert!(ics.contains("\r\n"));

    store.cancel_meeting(&alice.session_token, meeting.id).unwrap();
    let ics = store.meeting_ics(meeting.id).unwrap();
    assert!(ics.contains("STATUS:CANCELLED"));
}
