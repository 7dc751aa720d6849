//! Repeat-pairing statistics for the round on display.
//!
//! The co-occurrence table handed in should leave out the displayed round
//! itself (see [`overlap`](crate::cooccurrence::overlap) with
//! `ignore_last`), otherwise every pair in a group counts as a repeat.

use std::collections::{BTreeMap, BTreeSet};

use crate::cooccurrence::CoOccurrence;
use crate::groups::GroupAssignment;

/// Text shown when nothing stands out
pub const NO_STATS: &str = "No statistics yet";

/// Average earlier pairings within one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPairingRate {
    pub label: String,
    pub rate: f64,
}

/// Everything the statistics view reports
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairingStats {
    /// Groups with a non-zero rate, highest first
    pub group_rates: Vec<GroupPairingRate>,
    /// Members keyed by their highest repeat count with a group-mate
    pub repeat_members: BTreeMap<u32, BTreeSet<String>>,
    /// Members meeting only new people this round
    pub all_new: Vec<String>,
}

impl PairingStats {
    pub fn is_empty(&self) -> bool {
        self.group_rates.is_empty() && self.repeat_members.is_empty() && self.all_new.is_empty()
    }
}

/// Collect pairing statistics for `assignment`
pub fn pairing_stats(assignment: &GroupAssignment, co: &CoOccurrence) -> PairingStats {
    let mut stats = PairingStats::default();

    for group in &assignment.groups {
        let names = group.names();
        if names.len() < 2 {
            continue;
        }
        let mut total = 0u32;
        let mut pairs = 0u32;
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                let count = co.get(a, b);
                total += count;
                pairs += 1;
                if count > 0 {
                    for member in [a, b] {
                        bump_max(&mut stats.repeat_members, member, count);
                    }
                }
            }
        }
        let rate = f64::from(total) / f64::from(pairs);
        if rate > 0.0 {
            stats.group_rates.push(GroupPairingRate {
                label: group.label.clone(),
                rate,
            });
        }
    }
    stats
        .group_rates
        .sort_by(|a, b| b.rate.total_cmp(&a.rate));

    let mut seen = BTreeSet::new();
    let everyone: Vec<&str> = assignment
        .groups
        .iter()
        .flat_map(|g| g.members.iter().map(|m| m.name.as_str()))
        .filter(|n| seen.insert(*n))
        .collect();
    if everyone.len() > 1 {
        stats.all_new = everyone
            .iter()
            .filter(|member| {
                assignment
                    .groups
                    .iter()
                    .filter(|g| g.members.iter().any(|m| m.name == **member))
                    .flat_map(|g| g.members.iter())
                    .all(|other| other.name == **member || co.get(member, &other.name) == 0)
            })
            .map(|m| m.to_string())
            .collect();
    }

    stats
}

/// Keep each member only under their highest count
fn bump_max(by_count: &mut BTreeMap<u32, BTreeSet<String>>, member: &str, count: u32) {
    let current = by_count
        .iter()
        .find(|(_, names)| names.contains(member))
        .map(|(c, _)| *c);
    match current {
        Some(c) if c >= count => {}
        Some(c) => {
            if let Some(names) = by_count.get_mut(&c) {
                names.remove(member);
                if names.is_empty() {
                    by_count.remove(&c);
                }
            }
            by_count.entry(count).or_default().insert(member.to_string());
        }
        None => {
            by_count.entry(count).or_default().insert(member.to_string());
        }
    }
}

/// Render pairing statistics as text
pub fn format_stats(assignment: &GroupAssignment, co: &CoOccurrence) -> String {
    let stats = pairing_stats(assignment, co);
    if stats.is_empty() {
        return NO_STATS.to_string();
    }

    let mut sections: Vec<Vec<String>> = Vec::new();

    if !stats.group_rates.is_empty() {
        let mut lines = vec!["⚠ Groups with repeat pairings:".to_string()];
        lines.extend(
            stats
                .group_rates
                .iter()
                .map(|g| format!("  {} (pairing rate {:.2})", g.label, g.rate)),
        );
        sections.push(lines);
    }

    if !stats.repeat_members.is_empty() {
        let mut lines = vec!["⚠ Members with repeat pairings:".to_string()];
        for (count, names) in stats.repeat_members.iter().rev() {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            lines.push(format!("  {} (paired {}x before)", names.join(" & "), count));
        }
        sections.push(lines);
    }

    if !stats.all_new.is_empty() {
        sections.push(vec![
            "✓ Members with all-new pairings:".to_string(),
            format!("  {}", stats.all_new.join(", ")),
        ]);
    }

    sections
        .into_iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse;
    use crate::cooccurrence::overlap;
    use crate::groups::GroupLayout;

    fn render(roster: &str, groups: usize) -> String {
        let entries = parse(roster);
        let assignment = GroupAssignment::from_entries(&entries, &GroupLayout::with_count(groups));
        format_stats(&assignment, &overlap(&entries, true))
    }

    #[test]
    fn test_no_history_means_no_stats() {
        assert_eq!(render("Ann", 1), NO_STATS);
        assert_eq!(render("", 2), NO_STATS);
    }

    #[test]
    fn test_first_round_is_all_new() {
        let text = render("Ann#1A\nBen#1A\nCid#1B", 2);
        assert_eq!(text, "✓ Members with all-new pairings:\n  Ann, Ben, Cid");
    }

    #[test]
    fn test_repeat_pair_is_reported() {
        // Ann+Ben and Cid+Dot shared round 1 and meet again in round 2
        let text = render("Ann#1A#2A\nBen#1A#2A\nCid#1B#2B\nDot#1B#2B\nEve#1A#2B", 2);
        let expected = [
            "⚠ Groups with repeat pairings:",
            "  A (pairing rate 1.00)",
            "  B (pairing rate 0.33)",
            "",
            "⚠ Members with repeat pairings:",
            "  Ann & Ben & Cid & Dot (paired 1x before)",
            "",
            "✓ Members with all-new pairings:",
            "  Eve",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_member_listed_under_highest_count() {
        let text = render("Ann#1A#2A#3A\nBen#1A#2A#3A\nCid#1B#2A#3A", 2);
        assert!(text.contains("  Ann & Ben (paired 2x before)"));
        assert!(text.contains("  Cid (paired 1x before)"));
        let two = text.find("2x").unwrap();
        let one = text.find("1x").unwrap();
        assert!(two < one);
    }

    #[test]
    fn test_all_new_members_alongside_repeats() {
        let text = render("Ann#1A#2A\nBen#1A#2A\nCid#1B#2B\nDot#1A#2B", 2);
        assert!(text.contains("  Ann & Ben (paired 1x before)"));
        assert!(text.ends_with("✓ Members with all-new pairings:\n  Cid, Dot"));
    }
}
