//! Balanced group assignment with co-occurrence avoidance.
//!
//! Fixed members are placed first and stay in their previous group unless
//! that group already runs more than one member ahead of the smallest.
//! Everyone else is placed in roster order: empty groups are filled first,
//! then each member goes to whichever smallest group they have shared the
//! fewest past rounds with. Every tie is broken uniformly at random.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::layout::{GroupLayout, GroupSettings};
use crate::codec::{self, MemberEntry};
use crate::cooccurrence::{overlap, CoOccurrence};
use crate::error::{ShuffleError, ShuffleResult};

/// A member placed in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// One labelled group and its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: char,
    pub label: String,
    pub members: Vec<GroupMember>,
}

impl Group {
    /// Member names in group order
    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A complete partition of the roster into the layout's groups
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub groups: Vec<Group>,
}

impl GroupAssignment {
    /// Rebuild the grouping a roster's latest tags describe.
    ///
    /// Entries whose last tag is missing or outside the layout go to the
    /// first empty group, otherwise the first smallest one.
    pub fn from_entries(entries: &[MemberEntry], layout: &GroupLayout) -> Self {
        let mut slots: Vec<Vec<usize>> = vec![Vec::new(); layout.len()];
        for (idx, entry) in entries.iter().enumerate() {
            let slot = entry
                .last_group()
                .and_then(|g| layout.position(g))
                .unwrap_or_else(|| first_empty_or_smallest(&slots));
            slots[slot].push(idx);
        }
        Self::from_slots(entries, layout, &slots)
    }

    fn from_slots(entries: &[MemberEntry], layout: &GroupLayout, slots: &[Vec<usize>]) -> Self {
        let groups = layout
            .ids()
            .iter()
            .zip(slots)
            .map(|(id, members)| Group {
                id: *id,
                label: layout.label(*id),
                members: members
                    .iter()
                    .map(|&i| GroupMember {
                        name: entries[i].name.clone(),
                        role: None,
                    })
                    .collect(),
            })
            .collect();
        Self { groups }
    }

    /// Give each group's members `roles` in turn, cycling when a group has
    /// more members than there are roles.
    ///
    /// Members keep roster order within a group, so the member listed
    /// first in the roster gets the first role.
    pub fn cycle_roles(&mut self, roles: &[String]) {
        if roles.is_empty() {
            return;
        }
        for group in &mut self.groups {
            for (i, member) in group.members.iter_mut().enumerate() {
                member.role = Some(roles[i % roles.len()].clone());
            }
        }
    }

    /// Group sizes in layout order
    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Group::len).collect()
    }

    /// Total number of placed members
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Group holding the first member called `name`
    pub fn group_of(&self, name: &str) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| g.members.iter().any(|m| m.name == name))
    }
}

/// Result of a successful group assignment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    /// Round number written into every member's history
    pub round: u32,
    /// The new partition
    pub assignment: GroupAssignment,
    /// Roster with the new round's tag appended to every entry
    pub entries: Vec<MemberEntry>,
}

impl GroupOutcome {
    /// Encoded roster after this round
    pub fn roster_text(&self) -> String {
        codec::encode(&self.entries)
    }
}

/// Partition `entries` into groups for the next round.
pub fn assign_groups<R: Rng + ?Sized>(
    entries: &[MemberEntry],
    settings: &GroupSettings,
    rng: &mut R,
) -> ShuffleResult<GroupOutcome> {
    if entries.is_empty() {
        return Err(ShuffleError::EmptyRoster);
    }

    let round = codec::next_round(entries);
    let layout = settings.layout();
    let co = overlap(entries, false);

    let fixed: HashSet<&str> = settings
        .fixed_members
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();
    let (fixed_idx, free_idx): (Vec<usize>, Vec<usize>) =
        (0..entries.len()).partition(|&i| fixed.contains(entries[i].name.as_str()));

    debug!(
        round,
        groups = layout.len(),
        fixed = fixed_idx.len(),
        free = free_idx.len(),
        "Assigning groups"
    );

    let mut slots: Vec<Vec<usize>> = vec![Vec::new(); layout.len()];

    for &idx in &fixed_idx {
        let preferred = entries[idx].last_group().and_then(|g| layout.position(g));
        let slot = match preferred {
            Some(p) if slots[p].len() <= min_size(&slots) + 1 => p,
            _ => random_empty_or_smallest(&slots, rng),
        };
        slots[slot].push(idx);
    }

    for &idx in &free_idx {
        let slot = place_free(entries, &co, &slots, idx, rng);
        slots[slot].push(idx);
    }

    // Roster order inside each group keeps role cycling reproducible from
    // the tags alone.
    for members in &mut slots {
        members.sort_unstable();
    }

    let mut placement = vec![0usize; entries.len()];
    for (slot, members) in slots.iter().enumerate() {
        for &idx in members {
            placement[idx] = slot;
        }
    }

    let updated: Vec<MemberEntry> = entries
        .iter()
        .zip(&placement)
        .map(|(e, &slot)| e.with_tag(round, layout.ids()[slot]))
        .collect();

    let mut assignment = GroupAssignment::from_slots(entries, &layout, &slots);
    assignment.cycle_roles(&clean_roles(&settings.roles));

    info!(
        round,
        members = entries.len(),
        groups = layout.len(),
        sizes = ?assignment.sizes(),
        "Groups assigned"
    );

    Ok(GroupOutcome {
        round,
        assignment,
        entries: updated,
    })
}

fn place_free<R: Rng + ?Sized>(
    entries: &[MemberEntry],
    co: &CoOccurrence,
    slots: &[Vec<usize>],
    idx: usize,
    rng: &mut R,
) -> usize {
    let empty = empty_slots(slots);
    if let Some(&slot) = empty.choose(rng) {
        return slot;
    }

    let name = entries[idx].name.as_str();
    let scored: Vec<(usize, u32)> = smallest_slots(slots)
        .into_iter()
        .map(|slot| {
            let others = slots[slot].iter().map(|&j| entries[j].name.as_str());
            (slot, co.score(name, others))
        })
        .collect();
    let best = scored.iter().map(|(_, s)| *s).min().unwrap_or(0);
    let tied: Vec<usize> = scored
        .into_iter()
        .filter(|(_, s)| *s == best)
        .map(|(slot, _)| slot)
        .collect();

    tied.choose(rng).copied().unwrap_or(0)
}

fn random_empty_or_smallest<R: Rng + ?Sized>(slots: &[Vec<usize>], rng: &mut R) -> usize {
    let empty = empty_slots(slots);
    if let Some(&slot) = empty.choose(rng) {
        return slot;
    }
    smallest_slots(slots).choose(rng).copied().unwrap_or(0)
}

fn first_empty_or_smallest(slots: &[Vec<usize>]) -> usize {
    let min = min_size(slots);
    slots
        .iter()
        .position(Vec::is_empty)
        .or_else(|| slots.iter().position(|s| s.len() == min))
        .unwrap_or(0)
}

fn empty_slots(slots: &[Vec<usize>]) -> Vec<usize> {
    (0..slots.len()).filter(|&i| slots[i].is_empty()).collect()
}

fn smallest_slots(slots: &[Vec<usize>]) -> Vec<usize> {
    let min = min_size(slots);
    (0..slots.len()).filter(|&i| slots[i].len() == min).collect()
}

fn min_size(slots: &[Vec<usize>]) -> usize {
    slots.iter().map(Vec::len).min().unwrap_or(0)
}

/// Trimmed, non-blank roles in order
pub(crate) fn clean_roles(roles: &[String]) -> Vec<String> {
    roles
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}
