//! Stored record shapes, including the older forms still found in saved
//! events.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::groups::GroupSettings;

/// A roster member with its stable id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredMember")]
pub struct SnapshotMember {
    /// 1-based; 0 until [`MembersData::normalize`] assigns one
    pub id: u32,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredMember {
    Full {
        #[serde(default)]
        id: u32,
        name: String,
    },
    Name(String),
}

impl From<StoredMember> for SnapshotMember {
    fn from(stored: StoredMember) -> Self {
        match stored {
            StoredMember::Full { id, name } => Self { id, name },
            StoredMember::Name(name) => Self { id: 0, name },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembersData {
    #[serde(default)]
    pub members: Vec<SnapshotMember>,
}

impl MembersData {
    /// Give members stored without an id their 1-based position
    pub fn normalize(&mut self) {
        for (i, member) in self.members.iter_mut().enumerate() {
            if member.id == 0 {
                member.id = i as u32 + 1;
            }
        }
    }
}

/// Where each category's navigation stood when the snapshot was taken.
///
/// Indexes are 0-based positions in the stored round lists. Missing or
/// out-of-range values fall back to the newest round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCursors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<usize>,
}

/// Reference from a round to a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredMemberRef")]
pub struct MemberRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<u32>,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredMemberRef {
    Full {
        #[serde(default)]
        member_id: Option<u32>,
        #[serde(default)]
        name: String,
    },
    Name(String),
}

impl From<StoredMemberRef> for MemberRef {
    fn from(stored: StoredMemberRef) -> Self {
        match stored {
            StoredMemberRef::Full { member_id, name } => Self { member_id, name },
            StoredMemberRef::Name(name) => Self {
                member_id: None,
                name,
            },
        }
    }
}

/// One group within a stored group round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSlot {
    pub group_id: char,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub members: Vec<MemberRef>,
}

/// Older group shapes: a letter-keyed map or a plain list of name lists
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LegacyGroups {
    Keyed(BTreeMap<String, Vec<MemberRef>>),
    Listed(Vec<Vec<MemberRef>>),
}

impl LegacyGroups {
    pub fn into_slots(self) -> Vec<GroupSlot> {
        match self {
            Self::Keyed(map) => map
                .into_iter()
                .filter_map(|(key, members)| {
                    let group_id = key.chars().rev().find(char::is_ascii_uppercase)?;
                    Some(GroupSlot {
                        group_id,
                        group_name: key,
                        members,
                    })
                })
                .collect(),
            Self::Listed(lists) => lists
                .into_iter()
                .zip(b'A'..=b'Z')
                .map(|(members, id)| GroupSlot {
                    group_id: char::from(id),
                    group_name: String::new(),
                    members,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRoundRecord {
    #[serde(default)]
    pub round: u32,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignments: Vec<GroupSlot>,
    #[serde(default, skip_serializing)]
    pub groups: Option<LegacyGroups>,
    #[serde(default)]
    pub settings: GroupSettings,
}

impl GroupRoundRecord {
    /// Group slots, falling back to the older `groups` field
    pub fn slots(&self) -> Vec<GroupSlot> {
        if !self.assignments.is_empty() {
            return self.assignments.clone();
        }
        self.groups
            .clone()
            .map(LegacyGroups::into_slots)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRoundRecord {
    #[serde(default)]
    pub round: u32,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order: Vec<MemberRef>,
    #[serde(default, skip_serializing)]
    pub result: Vec<String>,
}

impl OrderRoundRecord {
    /// Ordered references, falling back to the older `result` names
    pub fn refs(&self) -> Vec<MemberRef> {
        if !self.order.is_empty() {
            return self.order.clone();
        }
        self.result
            .iter()
            .map(|name| MemberRef {
                member_id: None,
                name: name.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<u32>,
    pub name: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRoundRecord {
    #[serde(default)]
    pub round: u32,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignments: Vec<RoleSlot>,
    /// Older `{name: role}` form
    #[serde(default, skip_serializing)]
    pub roles: BTreeMap<String, String>,
}

impl RoleRoundRecord {
    pub fn slots(&self) -> Vec<RoleSlot> {
        if !self.assignments.is_empty() {
            return self.assignments.clone();
        }
        self.roles
            .iter()
            .map(|(name, role)| RoleSlot {
                member_id: None,
                name: name.clone(),
                role: Some(role.clone()),
            })
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTimestamp {
    Millis(i64),
    Text(String),
}

/// Accept RFC 3339 text or epoch milliseconds; anything unreadable is
/// dropped rather than failing the whole load
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<StoredTimestamp>::deserialize(deserializer)?;
    Ok(stored.and_then(|ts| match ts {
        StoredTimestamp::Millis(ms) => Utc.timestamp_millis_opt(ms).single(),
        StoredTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
    }))
}

/// The cache is derived data; whatever shape was stored is skipped
pub(crate) fn skip_cache<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, BTreeMap<String, u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    serde::de::IgnoredAny::deserialize(deserializer)?;
    Ok(BTreeMap::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_accept_names_or_objects() {
        let mut data: MembersData =
            serde_json::from_str(r#"{"members":["Alice",{"id":7,"name":"Bob"}]}"#).unwrap();
        data.normalize();
        assert_eq!(data.members[0].id, 1);
        assert_eq!(data.members[0].name, "Alice");
        assert_eq!(data.members[1].id, 7);
    }

    #[test]
    fn test_timestamp_forms() {
        let json = r#"[
            {"round":1,"timestamp":1704067200000},
            {"round":2,"timestamp":"2024-01-01T00:00:00Z"},
            {"round":3,"timestamp":"yesterday"},
            {"round":4}
        ]"#;
        let rounds: Vec<OrderRoundRecord> = serde_json::from_str(json).unwrap();
        let expected = Utc.timestamp_opt(1_704_067_200, 0).unwrap();
        assert_eq!(rounds[0].timestamp, Some(expected));
        assert_eq!(rounds[1].timestamp, Some(expected));
        assert_eq!(rounds[2].timestamp, None);
        assert_eq!(rounds[3].timestamp, None);
    }

    #[test]
    fn test_legacy_group_shapes() {
        let keyed: GroupRoundRecord = serde_json::from_str(
            r#"{"round":1,"groups":{"A":[{"member_id":1,"name":"X"}],"グループB":["Y"]}}"#,
        )
        .unwrap();
        let slots = keyed.slots();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].group_id, 'A');
        assert_eq!(slots[1].group_id, 'B');
        assert_eq!(slots[1].members[0].name, "Y");

        let listed: GroupRoundRecord =
            serde_json::from_str(r#"{"round":1,"groups":[["A","B"],["C","D"]]}"#).unwrap();
        let slots = listed.slots();
        assert_eq!(slots[1].group_id, 'B');
        assert_eq!(slots[1].members.len(), 2);
    }

    #[test]
    fn test_legacy_order_and_roles() {
        let order: OrderRoundRecord =
            serde_json::from_str(r#"{"round":1,"result":["B","A"]}"#).unwrap();
        assert_eq!(order.refs()[0].name, "B");

        let roles: RoleRoundRecord =
            serde_json::from_str(r#"{"round":1,"roles":{"A":"Leader"}}"#).unwrap();
        let slots = roles.slots();
        assert_eq!(slots[0].name, "A");
        assert_eq!(slots[0].role.as_deref(), Some("Leader"));
    }

    #[test]
    fn test_legacy_fields_are_not_written() {
        let record = OrderRoundRecord {
            round: 1,
            timestamp: None,
            order: vec![MemberRef {
                member_id: Some(1),
                name: "A".into(),
            }],
            result: vec!["A".into()],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"round":1,"order":[{"member_id":1,"name":"A"}]}"#);
    }
}
