//! Shuffle property tests: randomized checks of the engine invariants.
//!
//! Tests verify:
//! - Roster text survives parse then encode
//! - Co-occurrence counts are symmetric
//! - Group rounds partition the roster into balanced groups
//! - Order rounds are permutations with pins honored
//! - Role rounds keep every member exactly once

use std::collections::HashMap;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shuffly_engine::codec::{self, MemberEntry, RoundTag};
use shuffly_engine::{assign_groups, assign_order, assign_roles, overlap, GroupSettings};

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][a-z]{0,7}"
}

fn entry_strategy() -> impl Strategy<Value = MemberEntry> {
    tagged_entry(name_strategy(), 20, 'Z')
}

/// Entries drawn from a small tag space, so members share and repeat tags
fn crowded_entry() -> impl Strategy<Value = MemberEntry> {
    tagged_entry("[A-E]", 4, 'C')
}

fn tagged_entry(
    names: impl Strategy<Value = String>,
    max_round: u32,
    last_group: char,
) -> impl Strategy<Value = MemberEntry> {
    (
        names,
        prop::collection::vec((1..max_round, prop::char::range('A', last_group)), 0..5),
    )
        .prop_map(|(name, tags)| MemberEntry {
            name,
            history: tags
                .into_iter()
                .map(|(round, group)| RoundTag::new(round, group))
                .collect(),
        })
}

fn distinct_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(name_strategy(), 1..max).prop_map(|set| set.into_iter().collect())
}

fn counts(names: &[String]) -> HashMap<&str, usize> {
    let mut map = HashMap::new();
    for n in names {
        *map.entry(n.as_str()).or_default() += 1;
    }
    map
}

proptest! {
    #[test]
    fn prop_roster_text_round_trips(entries in prop::collection::vec(entry_strategy(), 0..12)) {
        let text = codec::encode(&entries);
        prop_assert_eq!(codec::parse(&text), entries);
    }

    #[test]
    fn prop_overlap_is_symmetric(
        entries in prop::collection::vec(crowded_entry(), 0..10),
        ignore_last in any::<bool>(),
    ) {
        let co = overlap(&entries, ignore_last);
        for a in &entries {
            for b in &entries {
                prop_assert_eq!(
                    co.get(&a.name, &b.name),
                    co.get(&b.name, &a.name),
                    "{} vs {}", a.name, b.name
                );
            }
        }
    }

    #[test]
    fn prop_groups_partition_and_balance(
        names in distinct_names(30),
        group_count in 1usize..8,
        rounds in 1usize..4,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let settings = GroupSettings::with_count(group_count);
        let mut entries: Vec<MemberEntry> = names.iter().map(MemberEntry::new).collect();

        for expected_round in 1..=rounds as u32 {
            let outcome = assign_groups(&entries, &settings, &mut rng).unwrap();
            prop_assert_eq!(outcome.round, expected_round);
            prop_assert_eq!(outcome.assignment.member_count(), names.len());

            let sizes = outcome.assignment.sizes();
            let min = sizes.iter().min().copied().unwrap_or(0);
            let max = sizes.iter().max().copied().unwrap_or(0);
            prop_assert!(max - min <= 1, "unbalanced sizes {:?}", sizes);

            for name in &names {
                let hits = outcome
                    .assignment
                    .groups
                    .iter()
                    .filter(|g| g.members.iter().any(|m| &m.name == name))
                    .count();
                prop_assert_eq!(hits, 1);
            }
            prop_assert!(outcome
                .entries
                .iter()
                .all(|e| e.history.len() == expected_round as usize));
            entries = outcome.entries;
        }
    }

    #[test]
    fn prop_order_is_permutation_with_pins(
        names in distinct_names(20),
        pin in 0usize..20,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let target = names[pin % names.len()].clone();
        let position = pin % names.len() + 1;
        let lines = vec![format!("{}: {}", position, target)];

        let outcome = assign_order(&names, &lines, &mut rng).unwrap();
        prop_assert!(outcome.warnings.is_empty());
        prop_assert_eq!(counts(&outcome.order), counts(&names));
        prop_assert_eq!(&outcome.order[position - 1], &target);
    }

    #[test]
    fn prop_roles_cover_every_member_once(
        names in distinct_names(20),
        roles in prop::collection::vec("[a-z]{1,6}", 1..6),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let assignments = assign_roles(&names, &roles, &mut rng).unwrap();
        let got: Vec<String> = assignments.iter().map(|a| a.name.clone()).collect();
        prop_assert_eq!(counts(&got), counts(&names));
        let assigned = assignments.iter().filter(|a| a.role.is_some()).count();
        prop_assert_eq!(assigned, roles.len().min(names.len()));
    }
}
