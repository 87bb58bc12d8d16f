//! Membership and admin invariants: a club always keeps at least one admin

use chapter_core::policy::ClubPolicy;
use chapter_store::{Store, StoreError};

#[test]
fn founder_starts_as_admin() {
    let store = Store::in_memory();
    let founder = store.create_club("Page Turners", "", "Alice").unwrap();

    let overview = store
        .club_overview(&founder.club_code, Some(&founder.session_token))
        .unwrap();
    let me = overview.current_member.unwrap();
    assert!(me.is_admin);
    assert_eq!(me.display_name, "Alice");
    assert_eq!(overview.members.len(), 1);
}

#[test]
fn joining_member_is_not_an_admin() {
    let store = Store::in_memory();
    let founder = store.create_club("Page Turners", "", "Alice").unwrap();
    let joined = store.join_club(&founder.club_code, "Bob").unwrap();

    let overview = store
        .club_overview(&founder.club_code, Some(&joined.session_token))
        .unwrap();
    assert!(!overview.current_member.unwrap().is_admin);
}

#[test]
fn join_codes_are_case_insensitive() {
    let store = Store::in_memory();
    let founder = store.create_club("Page Turners", "", "Alice").unwrap();
    let lowered = founder.club_code.to_lowercase();
    assert!(store.join_club(&lowered, "Bob").is_ok());
}

#[test]
fn promote_and_demote_round_trip() {
    let store = Store::in_memory();
    let founder = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = founder.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();

    store
        .promote_member(&founder.session_token, &code, bob.member_id)
        .unwrap();
    let overview = store.club_overview(&code, Some(&bob.session_token)).unwrap();
    assert!(overview.current_member.unwrap().is_admin);

    store
        .demote_member(&founder.session_token, &code, bob.member_id)
        .unwrap();
    let overview = store.club_overview(&code, Some(&bob.session_token)).unwrap();
    assert!(!overview.current_member.unwrap().is_admin);
}

#[test]
fn cannot_demote_the_last_admin() {
    let store = Store::in_memory();
    let founder = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = founder.club_code.clone();
    store.join_club(&code, "Bob").unwrap();

    match store.demote_member(&founder.session_token, &code, founder.member_id) {
        Err(StoreError::LastAdmin) => {}
        other => panic!("expected LastAdmin, got {other:?}"),
    }
}

#[test]
fn last_admin_cannot_leave_while_others_remain() {
    let store = Store::in_memory();
    let founder = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = founder.club_code.clone();
    store.join_club(&code, "Bob").unwrap();

    match store.leave_club(&founder.session_token, &code) {
        Err(StoreError::LastAdmin) => {}
        other => panic!("expected LastAdmin, got {other:?}"),
    }
}

#[test]
fn ordinary_member_can_leave_and_loses_their_session() {
    let store = Store::in_memory();
    let founder = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = founder.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();

    store.leave_club(&bob.session_token, &code).unwrap();

    let overview = store.club_overview(&code, Some(&bob.session_token)).unwrap();
    assert!(overview.current_member.is_none());
    assert_eq!(overview.members.len(), 1);
}

#[test]
fn sole_member_leaving_deletes_the_club() {
    let store = Store::in_memory();
    let founder = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = founder.club_code.clone();

    store.leave_club(&founder.session_token, &code).unwrap();

    match store.club_overview(&code, None) {
        Err(StoreError::ClubNotFound) => {}
        other => panic!("expected ClubNotFound, got {other:?}"),
    }
}

#[test]
fn policy_updates_are_admin_only() {
    let store = Store::in_memory();
    let founder = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = founder.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();

    let policy = ClubPolicy {
        veto_threshold_percent: 75,
        ..ClubPolicy::default()
    };
    match store.update_policy(&bob.session_token, &code, policy.clone()) {
        Err(StoreError::NotAdmin) => {}
        other => panic!("expected NotAdmin, got {other:?}"),
    }

    store.update_policy(&founder.session_token, &code, policy).unwrap();
    let overview = store.club_overview(&code, None).unwrap();
    assert_eq!(overview.policy.veto_threshold_percent, 75);
}

#[test]
fn out_of_range_thresholds_are_rejected() {
    let store = Store::in_memory();
    let founder = store.create_club("Page Turners", "", "Alice").unwrap();

    let policy = ClubPolicy {
        veto_threshold_percent: 0,
        ..ClubPolicy::default()
    };
    assert!(matches!(
        store.update_policy(&founder.session_token, &founder.club_code, policy),
        Err(StoreError::Policy(_))
    ));

    let policy = ClubPolicy {
        voting_threshold_percent: 101,
        ..ClubPolicy::default()
    };
    assert!(matches!(
        store.update_policy(&founder.session_token, &founder.club_code, policy),
        Err(StoreError::Policy(_))
    ));
}

#[test]
fn promote_is_admin_only() {
    let store = Store::in_memory();
    let founder = store.create_club("Page Turners", "", "Alice").unwrap();
    let code = founder.club_code.clone();
    let bob = store.join_club(&code, "Bob").unwrap();
    let carol = store.join_club(&code, "Carol").unwrap();

    assert!(matches!(
        store.promote_member(&bob.session_token, &code, carol.member_id),
        Err(StoreError::NotAdmin)
    ));
}
