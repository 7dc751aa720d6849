//! Shuffly engine
//!
//! This library provides:
//! - Balanced group assignment that avoids repeating earlier pairings
//! - Order shuffling with pinned positions
//! - Role assignment across the roster
//! - Per-category round history with back/forward navigation
//! - A versioned JSON snapshot of an event
//!
//! # Roster text
//!
//! The roster is plain text, one member per line. Each completed group
//! round appends a `#<round><group>` tag:
//!
//! ```text
//! Alice#1A#2C
//! Bob#1B#2A
//! ```
//!
//! Tags are the source of truth for pairing history: who met whom is
//! recomputed from them whenever it is needed.
//!
//! # Usage
//!
//! ```
//! use shuffly_engine::{Category, GroupSettings, ShuffleSession};
//!
//! let mut session = ShuffleSession::with_seed(7);
//! session.set_roster_text("Alice\nBob\nCarol\nDave");
//! session.set_settings(GroupSettings::with_count(2));
//! session.assign_groups().unwrap();
//! assert_eq!(session.round_hint(Category::Groups), "Round 1/1");
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod codec;
pub mod cooccurrence;
pub mod display;
pub mod error;
pub mod groups;
pub mod history;
pub mod order;
pub mod roles;
pub mod sample;
pub mod session;
pub mod snapshot;

// Re-export roster codec types
pub use codec::{MemberEntry, RoundTag};

// Re-export engine entry points
pub use cooccurrence::{overlap, CoOccurrence};
pub use groups::{assign_groups, GroupAssignment, GroupLayout, GroupOutcome, GroupSettings};
pub use order::{assign_order, OrderOutcome};
pub use roles::{assign_roles, RoleAssignment};

// Re-export history types
pub use history::{Category, GroupRound, OrderRound, RoleRound, RoundHistory, RoundRecord};

// Re-export display types
pub use display::{DisplayFormat, DisplayOptions, GroupSeparator, MemberSeparator};

pub use error::{ShuffleError, ShuffleResult};
pub use session::{ShuffleSession, Views};
pub use snapshot::{EventSnapshot, RoundCursors};
