//! Flat, time-ordered view across all categories.
//!
//! The per-category logs are the source of truth. The timeline is derived
//! from them for display and export, and can be read back to rebuild the
//! logs from older saved data that only kept a single list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::log::{RoundEntry, RoundLog};
use super::manager::RoundHistory;
use super::record::{Category, GroupRound, RoundRecord};
use crate::groups::GroupSettings;

/// One round as it appears in the flat timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineItem {
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub data: RoundRecord,
}

/// A stored timeline element: a full item, or a bare roster string from
/// saves that only kept group rosters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimelineEntry {
    Item(TimelineItem),
    Roster(String),
}

impl RoundHistory {
    /// Every recorded round ordered by time; rounds with equal timestamps
    /// keep groups, order, roles order
    pub fn timeline(&self) -> Vec<TimelineItem> {
        let mut items: Vec<TimelineItem> = Vec::new();
        items.extend(
            self.groups()
                .entries()
                .iter()
                .map(|e| item(e, RoundRecord::Groups(e.payload.clone()))),
        );
        items.extend(
            self.order()
                .entries()
                .iter()
                .map(|e| item(e, RoundRecord::Order(e.payload.clone()))),
        );
        items.extend(
            self.roles()
                .entries()
                .iter()
                .map(|e| item(e, RoundRecord::Roles(e.payload.clone()))),
        );
        // stable sort keeps category order for equal timestamps
        items.sort_by_key(|i| i.timestamp);
        items
    }

    /// Rebuild per-category logs from a flat timeline.
    ///
    /// Missing round numbers continue the category's count; missing
    /// timestamps become now. Items whose payload does not match their
    /// declared category are filed by payload.
    pub fn from_timeline<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = TimelineEntry>,
    {
        let now = Utc::now();
        let mut groups = Vec::new();
        let mut order = Vec::new();
        let mut roles = Vec::new();

        for entry in entries {
            let (round, timestamp, record) = match entry {
                TimelineEntry::Item(item) => {
                    if item.category != item.data.category() {
                        warn!(
                            declared = %item.category,
                            actual = %item.data.category(),
                            "Timeline item category mismatch"
                        );
                    }
                    (item.round, item.timestamp.unwrap_or(now), item.data)
                }
                TimelineEntry::Roster(roster) => (
                    None,
                    now,
                    RoundRecord::Groups(GroupRound::new(roster, GroupSettings::default())),
                ),
            };
            match record {
                RoundRecord::Groups(p) => push(&mut groups, round, timestamp, p),
                RoundRecord::Order(p) => push(&mut order, round, timestamp, p),
                RoundRecord::Roles(p) => push(&mut roles, round, timestamp, p),
            }
        }

        RoundHistory::from_logs(
            RoundLog::from_entries(groups),
            RoundLog::from_entries(order),
            RoundLog::from_entries(roles),
        )
    }
}

fn item<T>(entry: &RoundEntry<T>, data: RoundRecord) -> TimelineItem {
    TimelineItem {
        category: data.category(),
        round: Some(entry.round),
        timestamp: Some(entry.timestamp),
        data,
    }
}

fn push<T>(
    log: &mut Vec<RoundEntry<T>>,
    round: Option<u32>,
    timestamp: DateTime<Utc>,
    payload: T,
) {
    let round = round
        .filter(|r| *r > 0)
        .unwrap_or_else(|| log.len() as u32 + 1);
    log.push(RoundEntry {
        round,
        timestamp,
        payload,
    });
}
