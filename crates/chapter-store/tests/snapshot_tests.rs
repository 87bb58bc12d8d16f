//! Snapshot persistence: state survives a restart

use chapter_core::types::BookStatus;
use chapter_store::{Store, SuggestBook};

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chapter.json");

    let (code, token) = {
        let store = Store::open(&path).unwrap();
        let alice = store.create_club("Page Turners", "A cosy club", "Alice").unwrap();
        store.join_club(&alice.club_code, "Bob").unwrap();
        store
            .suggest_book(
                &alice.session_token,
                &alice.club_code,
                SuggestBook {
                    title: "Dune".to_string(),
                    author: "Frank Herbert".to_string(),
                    ..SuggestBook::default()
                },
            )
            .unwrap();
        store.select_next_book(&alice.session_token, &alice.club_code).unwrap();
        (alice.club_code, alice.session_token)
    };

    let store = Store::open(&path).unwrap();
    let overview = store.club_overview(&code, Some(&token)).unwrap();

    assert_eq!(overview.name, "Page Turners");
    assert_eq!(overview.members.len(), 2);
    // The session token is still honoured after the reload
    assert!(overview.current_member.unwrap().is_admin);
    let current = overview.current_book.unwrap();
    assert_eq!(current.title, "Dune");
    assert_eq!(current.status, BookStatus::Reading);
}

#[test]
fn opening_a_missing_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("fresh.json")).unwrap();
    assert!(store.create_club("New Club", "", "Alice").is_ok());
}

#[test]
fn no_stray_temp_file_is_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chapter.json");
    let store = Store::open(&path).unwrap();
    store.create_club("Page Turners", "", "Alice").unwrap();

    assert!(path.exists());
    assert!(!dir.path().join("chapter.json.tmp").exists());
}
