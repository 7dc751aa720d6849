//! Event snapshot: the persisted form of a roster and its round history.
//!
//! Members are stored once with stable ids; every round refers to them by
//! id and name. Group rounds keep the resolved groups rather than tagged
//! roster text, so a snapshot reads the same whoever renders it.
//!
//! ```text
//! {
//!   "data_version": 2,
//!   "members_data": { "members": [{ "id": 1, "name": "Alice" }] },
//!   "group_rounds": [{ "round": 1, "assignments": [...], "settings": {...} }],
//!   "order_rounds": [{ "round": 1, "order": [{ "member_id": 1, "name": "Alice" }] }],
//!   "role_rounds":  [{ "round": 1, "assignments": [{ "name": "Alice", "role": "Lead" }] }],
//!   "co_occurrence_cache": { "Alice": { "Bob": 1 } },
//!   "cursors": { "groups": 0, "order": 0, "roles": 0 }
//! }
//! ```

pub mod wire;

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::codec::{self, MemberEntry, RoundTag};
use crate::cooccurrence::overlap;
use crate::error::{ShuffleError, ShuffleResult};
use crate::history::{
    Category, GroupRound, OrderRound, RoleRound, RoundEntry, RoundHistory, RoundLog,
};
use crate::roles::RoleAssignment;

pub use wire::{
    GroupRoundRecord, GroupSlot, MemberRef, MembersData, OrderRoundRecord, RoleRoundRecord,
    RoleSlot, RoundCursors, SnapshotMember,
};

/// Persisted event state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSnapshot {
    #[serde(default = "legacy_version")]
    pub data_version: u32,
    #[serde(default)]
    pub members_data: MembersData,
    #[serde(default)]
    pub group_rounds: Vec<GroupRoundRecord>,
    #[serde(default)]
    pub order_rounds: Vec<OrderRoundRecord>,
    #[serde(default)]
    pub role_rounds: Vec<RoleRoundRecord>,
    #[serde(default, deserialize_with = "wire::skip_cache")]
    pub co_occurrence_cache: BTreeMap<String, BTreeMap<String, u32>>,
    #[serde(default)]
    pub cursors: RoundCursors,
}

fn legacy_version() -> u32 {
    1
}

impl Default for EventSnapshot {
    fn default() -> Self {
        Self {
            data_version: Self::CURRENT_VERSION,
            members_data: MembersData::default(),
            group_rounds: Vec::new(),
            order_rounds: Vec::new(),
            role_rounds: Vec::new(),
            co_occurrence_cache: BTreeMap::new(),
            cursors: RoundCursors::default(),
        }
    }
}

impl EventSnapshot {
    /// Current schema version
    pub const CURRENT_VERSION: u32 = 2;

    /// Capture `roster` and every round of `history`
    pub fn capture(roster: &[MemberEntry], history: &RoundHistory) -> Self {
        let members: Vec<SnapshotMember> = roster
            .iter()
            .enumerate()
            .map(|(i, e)| SnapshotMember {
                id: i as u32 + 1,
                name: e.name.clone(),
            })
            .collect();
        let directory = Directory::new(&members);

        let group_rounds = history
            .groups()
            .entries()
            .iter()
            .map(|entry| GroupRoundRecord {
                round: entry.payload.tag_round(),
                timestamp: Some(entry.timestamp),
                assignments: group_slots(&entry.payload, &directory),
                groups: None,
                settings: entry.payload.settings.clone(),
            })
            .collect();

        let order_rounds = history
            .order()
            .entries()
            .iter()
            .map(|entry| {
                let mut ids = directory.round();
                OrderRoundRecord {
                    round: entry.round,
                    timestamp: Some(entry.timestamp),
                    order: entry
                        .payload
                        .order
                        .iter()
                        .map(|name| MemberRef {
                            member_id: ids.next_id(name),
                            name: name.clone(),
                        })
                        .collect(),
                    result: Vec::new(),
                }
            })
            .collect();

        let role_rounds = history
            .roles()
            .entries()
            .iter()
            .map(|entry| {
                let mut ids = directory.round();
                RoleRoundRecord {
                    round: entry.round,
                    timestamp: Some(entry.timestamp),
                    assignments: entry
                        .payload
                        .assignments
                        .iter()
                        .map(|a| RoleSlot {
                            member_id: ids.next_id(&a.name),
                            name: a.name.clone(),
                            role: a.role.clone(),
                        })
                        .collect(),
                    roles: BTreeMap::new(),
                }
            })
            .collect();

        let co_occurrence_cache = overlap(roster, false)
            .to_map()
            .into_iter()
            .map(|(name, row)| (name, row.into_iter().collect()))
            .collect();

        Self {
            data_version: Self::CURRENT_VERSION,
            members_data: MembersData { members },
            group_rounds,
            order_rounds,
            role_rounds,
            co_occurrence_cache,
            cursors: RoundCursors {
                groups: history.cursor(Category::Groups),
                order: history.cursor(Category::Order),
                roles: history.cursor(Category::Roles),
            },
        }
    }

    /// Parse a stored snapshot
    pub fn from_json(json: &str) -> ShuffleResult<Self> {
        let mut snapshot: Self =
            serde_json::from_str(json).map_err(|e| ShuffleError::parse(e.to_string()))?;

        if snapshot.data_version > Self::CURRENT_VERSION {
            return Err(ShuffleError::parse(format!(
                "unsupported data_version {} (newest known is {})",
                snapshot.data_version,
                Self::CURRENT_VERSION
            )));
        }

        snapshot.members_data.normalize();
        Ok(snapshot)
    }

    /// Parse a stored snapshot, falling back to an empty one when it is
    /// unreadable
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Failed to load snapshot, starting empty");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> ShuffleResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ShuffleError::parse(e.to_string()))
    }

    /// Rebuild the tagged roster and round history.
    ///
    /// Group rounds are replayed in stored order. Round `r` drops any tags
    /// numbered `r` or later and adds one tag to every member it places,
    /// so each rebuilt roster carries exactly the tags of rounds 1..=r it
    /// was shuffled from. Round references resolve by member id first,
    /// then by name.
    ///
    /// Each cursor goes back to its stored position, or to the newest round
    /// when none was stored or it is out of range. The returned roster is
    /// the one of the group round under the cursor.
    pub fn restore(&self) -> (Vec<MemberEntry>, RoundHistory) {
        let now = Utc::now();
        let mut members = self.members_data.members.clone();
        if members.is_empty() {
            members = self.names_from_rounds();
        }
        let mut roster: Vec<MemberEntry> =
            members.iter().map(|m| MemberEntry::new(&m.name)).collect();

        let mut group_entries = Vec::with_capacity(self.group_rounds.len());
        let mut last_round = 0u32;
        for stored in &self.group_rounds {
            let round = if stored.round > 0 {
                stored.round
            } else {
                last_round + 1
            };
            last_round = round;
            // a round replayed after navigating back branches from its base
            for entry in &mut roster {
                entry.history.retain(|t| t.round < round);
            }

            let mut placed = vec![false; members.len()];
            for slot in stored.slots() {
                for member in &slot.members {
                    match resolve(&members, &placed, member) {
                        Some(idx) => {
                            placed[idx] = true;
                            roster[idx].history.push(RoundTag::new(round, slot.group_id));
                        }
                        None => {
                            debug!(name = %member.name, round, "Unknown member in stored round")
                        }
                    }
                }
            }

            group_entries.push(RoundEntry {
                round: group_entries.len() as u32 + 1,
                timestamp: stored.timestamp.unwrap_or(now),
                payload: GroupRound::new(codec::encode(&roster), stored.settings.clone()),
            });
        }

        let order_entries = self
            .order_rounds
            .iter()
            .enumerate()
            .map(|(i, stored)| RoundEntry {
                round: if stored.round > 0 { stored.round } else { i as u32 + 1 },
                timestamp: stored.timestamp.unwrap_or(now),
                payload: OrderRound {
                    order: stored
                        .refs()
                        .iter()
                        .map(|r| display_name(&members, r.member_id, &r.name))
                        .collect(),
                },
            })
            .collect();

        let role_entries = self
            .role_rounds
            .iter()
            .enumerate()
            .map(|(i, stored)| RoundEntry {
                round: if stored.round > 0 { stored.round } else { i as u32 + 1 },
                timestamp: stored.timestamp.unwrap_or(now),
                payload: RoleRound {
                    assignments: stored
                        .slots()
                        .into_iter()
                        .map(|s| {
                            let name = display_name(&members, s.member_id, &s.name);
                            RoleAssignment::new(name, s.role)
                        })
                        .collect(),
                },
            })
            .collect();

        let mut history = RoundHistory::from_logs(
            RoundLog::from_entries(group_entries),
            RoundLog::from_entries(order_entries),
            RoundLog::from_entries(role_entries),
        );
        for (category, cursor) in [
            (Category::Groups, self.cursors.groups),
            (Category::Order, self.cursors.order),
            (Category::Roles, self.cursors.roles),
        ] {
            if let Some(index) = cursor {
                if !history.seek(category, index) {
                    debug!(category = %category, index, "Stored cursor out of range");
                }
            }
        }
        if history.can_go_forward(Category::Groups) {
            if let Some(current) = history.current_groups() {
                roster = current.payload.entries();
            }
        }

        info!(
            members = roster.len(),
            group_rounds = self.group_rounds.len(),
            order_rounds = self.order_rounds.len(),
            role_rounds = self.role_rounds.len(),
            "Snapshot restored"
        );

        (roster, history)
    }

    /// Members recovered from the rounds themselves, for snapshots stored
    /// without a member list
    fn names_from_rounds(&self) -> Vec<SnapshotMember> {
        let mut names: Vec<String> = Vec::new();
        if let Some(last) = self.group_rounds.last() {
            for slot in last.slots() {
                names.extend(slot.members.into_iter().map(|m| m.name));
            }
        }
        names
            .into_iter()
            .filter(|n| !n.is_empty())
            .enumerate()
            .map(|(i, name)| SnapshotMember {
                id: i as u32 + 1,
                name,
            })
            .collect()
    }
}

/// Groups of one recorded round, as placed by that round's own tags.
///
/// Members without a tag for the round (added after it was played) are
/// left out so a restore does not invent placements for them.
fn group_slots(round: &GroupRound, directory: &Directory<'_>) -> Vec<GroupSlot> {
    let layout = round.settings.layout();
    let tag_round = round.tag_round();
    let mut slots: Vec<GroupSlot> = layout
        .ids()
        .iter()
        .map(|&id| GroupSlot {
            group_id: id,
            group_name: layout.label(id),
            members: Vec::new(),
        })
        .collect();

    let mut ids = directory.round();
    for entry in round.entries() {
        let member_id = ids.next_id(&entry.name);
        let Some(tag) = entry.history.last().copied().filter(|t| t.round == tag_round) else {
            continue;
        };
        match layout.position(tag.group) {
            Some(pos) => slots[pos].members.push(MemberRef {
                member_id,
                name: entry.name,
            }),
            None => debug!(name = %entry.name, group = %tag.group, "Tag outside layout"),
        }
    }
    slots
}

/// Index of the member `member` refers to, skipping ones already placed
/// in the current round
fn resolve(members: &[SnapshotMember], placed: &[bool], member: &MemberRef) -> Option<usize> {
    let free = |i: &usize| !placed[*i];
    member
        .member_id
        .and_then(|id| (0..members.len()).filter(free).find(|&i| members[i].id == id))
        .or_else(|| {
            (0..members.len())
                .filter(free)
                .find(|&i| members[i].name == member.name)
        })
}

fn display_name(members: &[SnapshotMember], member_id: Option<u32>, name: &str) -> String {
    if !name.is_empty() {
        return name.to_string();
    }
    member_id
        .and_then(|id| members.iter().find(|m| m.id == id))
        .map(|m| m.name.clone())
        .unwrap_or_default()
}

/// Name -> ids lookup for writing round references
struct Directory<'a> {
    ids: HashMap<&'a str, Vec<u32>>,
}

impl<'a> Directory<'a> {
    fn new(members: &'a [SnapshotMember]) -> Self {
        let mut ids: HashMap<&str, Vec<u32>> = HashMap::new();
        for m in members {
            ids.entry(m.name.as_str()).or_default().push(m.id);
        }
        Self { ids }
    }

    /// Fresh cursor for one round: repeated names take successive ids
    fn round(&self) -> RoundIds<'_, 'a> {
        RoundIds {
            directory: self,
            used: HashMap::new(),
        }
    }
}

struct RoundIds<'d, 'a> {
    directory: &'d Directory<'a>,
    used: HashMap<String, usize>,
}

impl RoundIds<'_, '_> {
    fn next_id(&mut self, name: &str) -> Option<u32> {
        let ids = self.directory.ids.get(name)?;
        let seen = self.used.entry(name.to_string()).or_default();
        let id = ids.get(*seen).copied();
        *seen += 1;
        id
    }
}
