//! Tests for the correlation registry.

use chrono::{Duration, TimeZone, Utc};
use strictly_chat::{CorrelationRegistry, GameSession, Seating, Side};

fn seating() -> Seating {
    Seating::new("alice".to_string(), "bob".to_string(), Side::First)
}

fn session(token: &str, minute: u32) -> GameSession<u8> {
    let at = Utc
        .with_ymd_and_hms(2026, 1, 1, 12, minute, 0)
        .single()
        .expect("Invalid timestamp");
    GameSession::new(0, seating(), token.to_string(), at)
}

#[test]
fn test_claim_is_exclusive() {
    let registry = CorrelationRegistry::new();
    registry.insert(session("m1", 0));

    let claimed = registry.claim("m1").expect("Session missing");

    assert_eq!(claimed.token(), "m1");
    assert!(registry.claim("m1").is_none());
    assert!(registry.is_claimed("m1"));
    assert!(registry.lookup("m1", |_| ()).is_none());
}

#[test]
fn test_claimed_session_keeps_seating() {
    let registry = CorrelationRegistry::new();
    registry.insert(session("m1", 0));

    let _claimed = registry.claim("m1").expect("Session missing");

    assert!(registry.contains("m1"));
    assert_eq!(registry.seating("m1"), Some(seating()));
    assert_eq!(registry.seating("m9"), None);
}

#[test]
fn test_insert_releases_claim() {
    let registry = CorrelationRegistry::new();
    registry.insert(session("m1", 0));
    let claimed = registry.claim("m1").expect("Session missing");

    assert!(registry.insert(claimed).is_none());

    assert!(!registry.is_claimed("m1"));
    assert!(registry.claim("m1").is_some());
}

#[test]
fn test_replace_moves_key() {
    let registry = CorrelationRegistry::new();
    registry.insert(session("m1", 0));

    let mut claimed = registry.claim("m1").expect("Session missing");
    claimed.record_move(Side::Second, Utc::now());
    claimed.rearm("m2".to_string(), Utc::now());
    registry.replace("m1", claimed);

    assert!(!registry.contains("m1"));
    assert_eq!(registry.tokens(), vec!["m2".to_string()]);
    let to_move = registry.seating("m2").map(|s| *s.to_move());
    assert_eq!(to_move, Some(Side::Second));
}

#[test]
fn test_clones_share_sessions() {
    let registry = CorrelationRegistry::new();
    let handle = registry.clone();

    handle.insert(session("m1", 0));

    assert_eq!(registry.len(), 1);
    assert!(registry.remove("m1"));
    assert!(!handle.remove("m1"));
}

#[test]
fn test_remove_drops_claimed_token() {
    let registry = CorrelationRegistry::new();
    registry.insert(session("m1", 0));
    let _claimed = registry.claim("m1").expect("Session missing");

    assert!(registry.remove("m1"));

    assert!(registry.is_empty());
    assert_eq!(registry.seating("m1"), None);
}

#[test]
fn test_insert_reports_displaced_session() {
    let registry = CorrelationRegistry::new();

    assert!(registry.insert(session("m1", 0)).is_none());
    assert!(registry.insert(session("m1", 5)).is_some());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_lookup_reads_without_removing() {
    let registry = CorrelationRegistry::new();
    registry.insert(session("m1", 0));

    let side = registry.lookup("m1", |s| s.side_of("bob"));

    assert_eq!(side, Some(Some(Side::Second)));
    assert!(registry.contains("m1"));
    assert_eq!(registry.lookup("m9", |s| s.side_of("bob")), None);
}

#[test]
fn test_evict_idle_keeps_recent_sessions() {
    let registry = CorrelationRegistry::new();
    registry.insert(session("old", 0));
    registry.insert(session("recent", 50));
    let now = Utc
        .with_ymd_and_hms(2026, 1, 1, 12, 55, 0)
        .single()
        .expect("Invalid timestamp");

    let evicted = registry.evict_idle(Duration::minutes(30), now);

    assert_eq!(evicted, vec!["old".to_string()]);
    assert_eq!(registry.tokens(), vec!["recent".to_string()]);
}

#[test]
fn test_evict_idle_skips_claimed_sessions() {
    let registry = CorrelationRegistry::new();
    registry.insert(session("m1", 0));
    let _claimed = registry.claim("m1").expect("Session missing");

    let evicted = registry.evict_idle(Duration::minutes(1), Utc::now());

    assert!(evicted.is_empty());
    assert!(registry.contains("m1"));
}

#[test]
fn test_record_move_refreshes_activity() {
    let mut s = session("m1", 0);
    let later = Utc
        .with_ymd_and_hms(2026, 1, 1, 13, 0, 0)
        .single()
        .expect("Invalid timestamp");

    s.record_move(Side::Second, later);

    assert_eq!(*s.moves_played(), 1);
    assert_eq!(s.last_active(), &later);
    assert!(s.created_at() < s.last_active());
    assert_eq!(*s.seating().to_move(), Side::Second);
    assert_eq!(s.side_owner(Side::First), "alice");
    assert_eq!(s.opponent(), "bob");
}
