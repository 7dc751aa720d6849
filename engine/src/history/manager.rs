//! Per-category round history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::log::{RoundEntry, RoundLog};
use super::record::{Category, GroupRound, OrderRound, RoleRound, RoundRecord};

/// Group, order and role rounds, each with its own cursor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundHistory {
    groups: RoundLog<GroupRound>,
    order: RoundLog<OrderRound>,
    roles: RoundLog<RoleRound>,
}

impl RoundHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a history from already-built logs
    pub fn from_logs(
        groups: RoundLog<GroupRound>,
        order: RoundLog<OrderRound>,
        roles: RoundLog<RoleRound>,
    ) -> Self {
        Self {
            groups,
            order,
            roles,
        }
    }

    pub fn groups(&self) -> &RoundLog<GroupRound> {
        &self.groups
    }

    pub fn order(&self) -> &RoundLog<OrderRound> {
        &self.order
    }

    pub fn roles(&self) -> &RoundLog<RoleRound> {
        &self.roles
    }

    /// Record a finished round, stamped now.
    ///
    /// Returns whether anything was appended: a group round whose roster
    /// matches the newest group round is skipped, and the groups cursor
    /// moves to that round instead.
    pub fn record(&mut self, record: impl Into<RoundRecord>) -> bool {
        self.record_at(record, Utc::now())
    }

    /// [`record`](Self::record) with an explicit timestamp
    pub fn record_at(
        &mut self,
        record: impl Into<RoundRecord>,
        timestamp: DateTime<Utc>,
    ) -> bool {
        let record = record.into();
        let category = record.category();
        let round = match record {
            RoundRecord::Groups(round) => {
                if self
                    .groups
                    .last()
                    .is_some_and(|last| last.payload.same_roster(&round))
                {
                    debug!("Group roster unchanged, not recording");
                    self.groups.seek_last();
                    return false;
                }
                self.groups.record_at(round, timestamp).round
            }
            RoundRecord::Order(round) => self.order.record_at(round, timestamp).round,
            RoundRecord::Roles(round) => self.roles.record_at(round, timestamp).round,
        };
        info!(category = %category, round, "Round recorded");
        true
    }

    /// Step `category` back one round. Returns false at the first round.
    pub fn back(&mut self, category: Category) -> bool {
        match category {
            Category::Groups => self.groups.back(),
            Category::Order => self.order.back(),
            Category::Roles => self.roles.back(),
        }
    }

    /// Step `category` forward one round. Returns false at the newest round.
    pub fn forward(&mut self, category: Category) -> bool {
        match category {
            Category::Groups => self.groups.forward(),
            Category::Order => self.order.forward(),
            Category::Roles => self.roles.forward(),
        }
    }

    /// Move `category`'s cursor to `index`. Returns false when out of range.
    pub fn seek(&mut self, category: Category, index: usize) -> bool {
        match category {
            Category::Groups => self.groups.seek(index),
            Category::Order => self.order.seek(index),
            Category::Roles => self.roles.seek(index),
        }
    }

    /// Record under `category`'s cursor
    pub fn current(&self, category: Category) -> Option<RoundRecord> {
        match category {
            Category::Groups => self
                .groups
                .current()
                .map(|e| RoundRecord::Groups(e.payload.clone())),
            Category::Order => self
                .order
                .current()
                .map(|e| RoundRecord::Order(e.payload.clone())),
            Category::Roles => self
                .roles
                .current()
                .map(|e| RoundRecord::Roles(e.payload.clone())),
        }
    }

    pub fn current_groups(&self) -> Option<&RoundEntry<GroupRound>> {
        self.groups.current()
    }

    pub fn current_order(&self) -> Option<&RoundEntry<OrderRound>> {
        self.order.current()
    }

    pub fn current_roles(&self) -> Option<&RoundEntry<RoleRound>> {
        self.roles.current()
    }

    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Groups => self.groups.len(),
            Category::Order => self.order.len(),
            Category::Roles => self.roles.len(),
        }
    }

    pub fn cursor(&self, category: Category) -> Option<usize> {
        match category {
            Category::Groups => self.groups.cursor(),
            Category::Order => self.order.cursor(),
            Category::Roles => self.roles.cursor(),
        }
    }

    pub fn position_label(&self, category: Category) -> Option<String> {
        match category {
            Category::Groups => self.groups.position_label(),
            Category::Order => self.order.position_label(),
            Category::Roles => self.roles.position_label(),
        }
    }

    pub fn can_go_back(&self, category: Category) -> bool {
        match category {
            Category::Groups => self.groups.can_go_back(),
            Category::Order => self.order.can_go_back(),
            Category::Roles => self.roles.can_go_back(),
        }
    }

    pub fn can_go_forward(&self, category: Category) -> bool {
        match category {
            Category::Groups => self.groups.can_go_forward(),
            Category::Order => self.order.can_go_forward(),
            Category::Roles => self.roles.can_go_forward(),
        }
    }

    /// True when no category has any round
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.len(*c) == 0)
    }

    /// Drop every round in every category
    pub fn clear(&mut self) {
        let dropped: usize = Category::ALL.iter().map(|c| self.len(*c)).sum();
        self.groups.clear();
        self.order.clear();
        self.roles.clear();
        info!(dropped, "History cleared");
    }
}
