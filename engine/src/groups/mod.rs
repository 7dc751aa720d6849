//! Group assignment
//!
//! - [`layout`]: group ids, labels and the organizer settings behind them
//! - [`engine`]: the balanced, co-occurrence-aware assignment itself

pub mod engine;
pub mod layout;

pub use engine::{assign_groups, Group, GroupAssignment, GroupMember, GroupOutcome};
pub use layout::{clamp_group_count, GroupLayout, GroupSettings, MAX_GROUPS, MIN_GROUPS};
