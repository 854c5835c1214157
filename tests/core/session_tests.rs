//! Tests for the signed-in session
//!
//! Tests cover:
//! - Login/logout persistence
//! - Auth broadcast delivery and unsubscription
//! - Session restore with a token probe
//! - File-backed storage

use std::path::PathBuf;

use chillrate::api::User;
use chillrate::session::{
    AuthEvent, FileStore, KeyValueStore, MemoryStore, Session, TOKEN_KEY, USER_KEY,
};

fn coach() -> User {
    User {
        id: "7".to_string(),
        name: None,
        email: "ivan@example.com".to_string(),
    }
}

fn memory_session() -> Session {
    Session::new(Box::new(MemoryStore::default()))
}

fn temp_store_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("chillrate-test-{}", std::process::id()))
        .join(format!("{}.json", name))
}

// ============================================
// Login / Logout Tests
// ============================================

#[test]
fn test_login_persists_token_and_user() {
    let mut session = memory_session();
    session.login(coach(), "tok-1", false).unwrap();

    assert_eq!(session.token().as_deref(), Some("tok-1"));
    assert_eq!(session.user(), Some(coach()));
}

#[test]
fn test_login_notify_flag() {
    let mut session = memory_session();
    let (_id, events) = session.subscribe();

    session.login(coach(), "tok-1", false).unwrap();
    assert!(events.try_recv().is_err());

    session.login(coach(), "tok-2", true).unwrap();
    assert_eq!(events.try_recv().ok(), Some(AuthEvent::SignedIn(coach())));
}

#[test]
fn test_logout_clears_and_broadcasts() {
    let mut session = memory_session();
    let (_a, first) = session.subscribe();
    let (_b, second) = session.subscribe();
    session.login(coach(), "tok", false).unwrap();

    session.logout().unwrap();

    assert!(session.token().is_none());
    assert!(session.user().is_none());
    assert_eq!(first.try_recv().ok(), Some(AuthEvent::SignedOut));
    assert_eq!(second.try_recv().ok(), Some(AuthEvent::SignedOut));
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let mut session = memory_session();
    let (id, events) = session.subscribe();
    assert!(session.unsubscribe(id));
    assert!(!session.unsubscribe(id));

    session.logout().unwrap();
    assert!(events.try_recv().is_err());
}

#[test]
fn test_dropped_receivers_are_pruned() {
    let mut session = memory_session();
    let (_id, events) = session.subscribe();
    drop(events);
    session.logout().unwrap();
    assert_eq!(session.broadcast().subscriber_count(), 0);
}

// ============================================
// Restore Tests
// ============================================

#[test]
fn test_restore_without_token_signs_out() {
    let mut session = memory_session();
    let (_id, events) = session.subscribe();
    let mut probed = false;

    let user = session.restore(|_| {
        probed = true;
        true
    });

    assert!(user.is_none());
    assert!(!probed);
    assert_eq!(events.try_recv().ok(), Some(AuthEvent::SignedOut));
}

#[test]
fn test_restore_with_live_token() {
    let mut session = memory_session();
    session.login(coach(), "tok", false).unwrap();
    let (_id, events) = session.subscribe();

    let user = session.restore(|token| token == "tok");

    assert_eq!(user, Some(coach()));
    assert_eq!(events.try_recv().ok(), Some(AuthEvent::SignedIn(coach())));
}

#[test]
fn test_restore_with_dead_token() {
    let mut session = memory_session();
    session.login(coach(), "expired", false).unwrap();
    let (_id, events) = session.subscribe();

    assert!(session.restore(|_| false).is_none());
    assert_eq!(events.try_recv().ok(), Some(AuthEvent::SignedOut));
}

#[test]
fn test_unreadable_user_profile() {
    let mut store = MemoryStore::default();
    store.set(TOKEN_KEY, "tok").unwrap();
    store.set(USER_KEY, "{ broken").unwrap();
    let session = Session::new(Box::new(store));

    assert!(session.token().is_some());
    assert!(session.user().is_none());
}

// ============================================
// File Store Tests
// ============================================

#[test]
fn test_file_store_persists_between_opens() {
    let path = temp_store_path("persist");
    let _ = std::fs::remove_file(&path);

    let mut store = FileStore::open(path.clone());
    store.set(TOKEN_KEY, "abc").unwrap();

    let reopened = FileStore::open(path.clone());
    assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("abc"));

    let mut reopened = reopened;
    reopened.remove(TOKEN_KEY).unwrap();
    assert!(FileStore::open(path.clone()).get(TOKEN_KEY).is_none());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_file_store_ignores_corrupt_file() {
    let path = temp_store_path("corrupt");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json at all").unwrap();

    let store = FileStore::open(path.clone());
    assert!(store.get(TOKEN_KEY).is_none());
    assert_eq!(store.path(), &path);

    let _ = std::fs::remove_file(&path);
}
