//! End-to-end tests for a shuffle session
//!
//! Tests complete workflows as an organizer runs them:
//! - Several group rounds, then stepping back and re-running
//! - Persisting a session and picking it up again
//! - Loading snapshots written by older releases

use rand::rngs::StdRng;
use rand::SeedableRng;
use shuffly_engine::codec;
use shuffly_engine::{
    Category, DisplayFormat, DisplayOptions, EventSnapshot, GroupSettings, MemberSeparator,
    ShuffleError, ShuffleSession,
};

const ROSTER: &str = "Alice\nBruno\nChloe\nDmitri\nElena\nFarah\nGus\nHana";

fn session(seed: u64) -> ShuffleSession {
    let mut session = ShuffleSession::with_seed(seed);
    session.set_roster_text(ROSTER);
    session.set_settings(GroupSettings::with_count(2));
    session
}

#[test]
fn test_rounds_accumulate_tags_and_history() {
    let mut s = session(11);
    for round in 1..=3 {
        let outcome = s.assign_groups().unwrap();
        assert_eq!(outcome.round, round);
        assert_eq!(outcome.assignment.sizes(), vec![4, 4]);
    }
    assert!(s.roster().iter().all(|e| e.history.len() == 3));
    assert_eq!(codec::latest_round(s.roster()), Some(3));
    assert_eq!(s.round_hint(Category::Groups), "Round 3/3");
    assert_eq!(s.round_hint(Category::Order), "Not run yet");
}

#[test]
fn test_second_round_avoids_first_round_pairs_when_possible() {
    // Four members in two groups: the only all-new split exists, and the
    // placement must find it.
    let mut s = ShuffleSession::with_seed(5);
    s.set_roster_text("Alice#1A\nBruno#1A\nChloe#1B\nDmitri#1B");
    s.set_settings(GroupSettings::with_count(2));
    let outcome = s.assign_groups().unwrap();
    for group in &outcome.assignment.groups {
        let names = group.names();
        assert!(
            !(names.contains(&"Alice") && names.contains(&"Bruno")),
            "repeat pair in {:?}",
            names
        );
    }
    assert!(s.stats_text().contains("all-new"));
}

#[test]
fn test_back_then_rerun_branches_history() {
    let mut s = session(21);
    s.assign_groups().unwrap();
    let after_first = s.roster_text();
    s.assign_groups().unwrap();

    assert!(s.back(Category::Groups));
    assert_eq!(s.roster_text(), after_first);

    let rerun = s.assign_groups().unwrap();
    assert_eq!(rerun.round, 2);
    assert!(s.history().len(Category::Groups) >= 2);
    assert!(!s.history().can_go_forward(Category::Groups));
    assert!(s.back(Category::Groups));
    assert_eq!(s.roster_text(), after_first);
}

#[test]
fn test_session_survives_snapshot() {
    let mut s = session(31);
    s.set_fixed_order(vec!["1: Hana".into()]);
    s.set_roles(vec!["Host".into(), "Scribe".into()]);
    s.assign_groups().unwrap();
    s.assign_groups().unwrap();
    s.assign_order().unwrap();
    s.assign_roles().unwrap();

    let json = s.snapshot().to_json().unwrap();
    let snapshot = EventSnapshot::from_json(&json).unwrap();
    assert_eq!(snapshot.data_version, EventSnapshot::CURRENT_VERSION);
    assert_eq!(snapshot.members_data.members.len(), 8);

    let mut resumed = ShuffleSession::from_snapshot(&snapshot, StdRng::seed_from_u64(1));
    assert_eq!(resumed.roster_text(), s.roster_text());
    assert_eq!(resumed.views(), s.views());
    assert!(resumed.order_text().starts_with("1. Hana"));

    let next = resumed.assign_groups().unwrap();
    assert_eq!(next.round, 3);
    assert!(resumed.back(Category::Groups));
    assert!(resumed.back(Category::Groups));
    assert!(!resumed.back(Category::Groups));
}

#[test]
fn test_legacy_snapshot_loads() {
    let legacy = r#"{
        "members_data": { "members": ["Alice", "Bruno", "Chloe"] },
        "group_rounds": [
            { "round": 1, "timestamp": 1700000000000, "groups": { "A": ["Alice", "Chloe"], "B": ["Bruno"] } }
        ],
        "order_rounds": [
            { "round": 1, "timestamp": 1700000001000, "result": ["Chloe", "Alice", "Bruno"] }
        ],
        "co_occurrence_cache": { "Alice-Chloe": 1 }
    }"#;
    let snapshot = EventSnapshot::from_json(legacy).unwrap();
    let s = ShuffleSession::from_snapshot(&snapshot, StdRng::seed_from_u64(1));
    assert_eq!(s.roster_text(), "Alice#1A\nBruno#1B\nChloe#1A");
    assert_eq!(s.order_text(), "1. Chloe\n2. Alice\n3. Bruno");
    assert_eq!(s.round_hint(Category::Groups), "Round 1/1");
}

#[test]
fn test_display_options_rerender_current_round() {
    let mut s = session(41);
    s.assign_groups().unwrap();
    s.set_display_options(DisplayOptions {
        format: DisplayFormat::Name,
        member_separator: MemberSeparator::Comma,
        ..Default::default()
    });
    let text = s.groups_text();
    assert!(text.starts_with("A: "));
    assert_eq!(text.lines().filter(|l| !l.is_empty()).count(), 2);
}

#[test]
fn test_clear_history_resets_everything() {
    let mut s = session(51);
    s.assign_groups().unwrap();
    s.assign_order().unwrap();
    s.clear_history();
    assert_eq!(s.roster_text(), ROSTER);
    assert!(s.history().is_empty());
    let outcome = s.assign_groups().unwrap();
    assert_eq!(outcome.round, 1);
}

#[test]
fn test_errors_leave_other_views() {
    let mut s = ShuffleSession::with_seed(61);
    assert_eq!(s.assign_groups().unwrap_err(), ShuffleError::EmptyRoster);
    s.set_roster_text("Alice\nBruno");
    s.assign_order().unwrap();
    assert_eq!(s.assign_roles().unwrap_err(), ShuffleError::EmptyRoles);
    assert!(!s.order_text().is_empty());
    assert_eq!(s.roles_text(), "");
}
