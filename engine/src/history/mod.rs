//! Round history
//!
//! Each category (groups, order, roles) keeps its own append-only log with
//! a cursor for back/forward navigation. A flat timeline across all three
//! is derived on demand.

pub mod log;
pub mod manager;
pub mod record;
pub mod timeline;

pub use self::log::{RoundEntry, RoundLog};
pub use manager::RoundHistory;
pub use record::{Category, GroupRound, OrderRound, RoleRound, RoundRecord};
pub use timeline::{TimelineEntry, TimelineItem};
