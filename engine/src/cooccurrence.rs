//! Co-occurrence accounting
//!
//! Counts, for every pair of members, how many earlier rounds put them in
//! the same group. Derived from tag histories on demand; never stored as
//! primary state.

use std::collections::{HashMap, HashSet};

use crate::codec::{MemberEntry, RoundTag};

/// Symmetric `name × name → shared rounds` table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoOccurrence {
    counts: HashMap<String, HashMap<String, u32>>,
}

impl CoOccurrence {
    /// Shared rounds between `a` and `b` (0 for unknown names)
    pub fn get(&self, a: &str, b: &str) -> u32 {
        self.counts
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of shared rounds between `member` and each of `others`
    pub fn score<'a, I>(&self, member: &str, others: I) -> u32
    where
        I: IntoIterator<Item = &'a str>,
    {
        others.into_iter().map(|o| self.get(member, o)).sum()
    }

    /// Row for one member
    pub fn row(&self, name: &str) -> Option<&HashMap<String, u32>> {
        self.counts.get(name)
    }

    /// Names with a row in the table
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Largest count in the table
    pub fn max_count(&self) -> u32 {
        self.counts
            .values()
            .flat_map(|row| row.values().copied())
            .max()
            .unwrap_or(0)
    }

    /// Plain nested map, e.g. for the snapshot cache
    pub fn to_map(&self) -> HashMap<String, HashMap<String, u32>> {
        self.counts.clone()
    }
}

/// Compute co-occurrence counts for `entries`.
///
/// A pair shares a round when both carry the same tag; a tag repeated in
/// one history still counts once. With `ignore_last` each member's final
/// tag is left out, which is what the statistics view wants while it
/// inspects the round that tag belongs to.
pub fn overlap(entries: &[MemberEntry], ignore_last: bool) -> CoOccurrence {
    let mut histories: HashMap<&str, HashSet<RoundTag>> = HashMap::new();
    for e in entries {
        let tags = if ignore_last && !e.history.is_empty() {
            &e.history[..e.history.len() - 1]
        } else {
            &e.history[..]
        };
        histories.insert(e.name.as_str(), tags.iter().copied().collect());
    }

    let mut counts: HashMap<String, HashMap<String, u32>> = HashMap::new();
    for (a, a_tags) in &histories {
        let row = counts.entry((*a).to_string()).or_default();
        for (b, b_tags) in &histories {
            if a == b {
                continue;
            }
            let shared = a_tags.intersection(b_tags).count() as u32;
            row.insert((*b).to_string(), shared);
        }
    }

    CoOccurrence { counts }
}
