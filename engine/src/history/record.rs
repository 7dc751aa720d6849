//! Round payloads for each history category.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::{self, MemberEntry};
use crate::groups::engine::clean_roles;
use crate::groups::{GroupAssignment, GroupSettings};
use crate::roles::RoleAssignment;

/// The three independent kinds of round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Groups,
    Order,
    Roles,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Groups, Category::Order, Category::Roles];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groups => "groups",
            Self::Order => "order",
            Self::Roles => "roles",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished group round: the whole tagged roster plus the settings it
/// was shuffled with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRound {
    /// Encoded roster, tags up to and including this round
    #[serde(alias = "membersRaw")]
    pub roster: String,
    #[serde(default)]
    pub settings: GroupSettings,
}

impl GroupRound {
    pub fn new(roster: impl Into<String>, settings: GroupSettings) -> Self {
        Self {
            roster: roster.into(),
            settings,
        }
    }

    pub fn entries(&self) -> Vec<MemberEntry> {
        codec::parse(&self.roster)
    }

    /// Round number carried by the roster's tags (0 before any round)
    pub fn tag_round(&self) -> u32 {
        codec::latest_round(&self.entries()).unwrap_or(0)
    }

    /// The grouping this round's tags describe, roles included
    pub fn assignment(&self) -> GroupAssignment {
        let mut assignment =
            GroupAssignment::from_entries(&self.entries(), &self.settings.layout());
        assignment.cycle_roles(&clean_roles(&self.settings.roles));
        assignment
    }

    /// Same roster content as `other`, ignoring spacing differences
    pub fn same_roster(&self, other: &GroupRound) -> bool {
        self.entries() == other.entries()
    }
}

/// A finished order round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRound {
    /// Names in position order
    #[serde(alias = "result")]
    pub order: Vec<String>,
}

/// A finished role round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRound {
    pub assignments: Vec<RoleAssignment>,
}

/// Any one round, tagged by category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoundRecord {
    Groups(GroupRound),
    Order(OrderRound),
    Roles(RoleRound),
}

impl RoundRecord {
    pub fn category(&self) -> Category {
        match self {
            Self::Groups(_) => Category::Groups,
            Self::Order(_) => Category::Order,
            Self::Roles(_) => Category::Roles,
        }
    }
}

impl From<GroupRound> for RoundRecord {
    fn from(round: GroupRound) -> Self {
        Self::Groups(round)
    }
}

impl From<OrderRound> for RoundRecord {
    fn from(round: OrderRound) -> Self {
        Self::Order(round)
    }
}

impl From<RoleRound> for RoundRecord {
    fn from(round: RoleRound) -> Self {
        Self::Roles(round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_and_display() {
        assert_eq!(
            serde_json::to_string(&Category::Groups).unwrap(),
            "\"groups\""
        );
        let parsed: Category = serde_json::from_str("\"roles\"").unwrap();
        assert_eq!(parsed, Category::Roles);
        assert_eq!(Category::Order.to_string(), "order");
    }

    #[test]
    fn test_group_round_rebuilds_assignment() {
        let settings = GroupSettings {
            group_count: 2,
            roles: vec!["Lead".into()],
            ..Default::default()
        };
        let round = GroupRound::new("A#1B\nB#1A\nC#1B", settings);
        assert_eq!(round.tag_round(), 1);
        let assignment = round.assignment();
        assert_eq!(assignment.groups[0].names(), vec!["B"]);
        assert_eq!(assignment.groups[1].names(), vec!["A", "C"]);
        assert_eq!(
            assignment.groups[1].members[1].role.as_deref(),
            Some("Lead")
        );
    }

    #[test]
    fn test_same_roster_ignores_spacing() {
        let a = GroupRound::new("A#1A\nB#1B", GroupSettings::default());
        let b = GroupRound::new(" A #1A, B#1B ", GroupSettings::with_count(5));
        assert!(a.same_roster(&b));
    }

    #[test]
    fn test_legacy_payload_field_names() {
        let record: RoundRecord = serde_json::from_str(r#"{"membersRaw":"A#1A"}"#).unwrap();
        assert_eq!(record.category(), Category::Groups);
        let record: RoundRecord = serde_json::from_str(r#"{"result":["B","A"]}"#).unwrap();
        assert_eq!(
            record,
            RoundRecord::Order(OrderRound {
                order: vec!["B".into(), "A".into()]
            })
        );
        let record: RoundRecord =
            serde_json::from_str(r#"{"assignments":[{"name":"A","role":null}]}"#).unwrap();
        assert_eq!(record.category(), Category::Roles);
    }
}
