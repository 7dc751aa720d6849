//! Text rendering of results
//!
//! Pure functions from assignments and options to the strings organizers
//! copy out. Nothing here touches history or randomness.

pub mod groups;
pub mod stats;
pub mod text;

pub use groups::{format_groups, DisplayFormat, DisplayOptions, GroupSeparator, MemberSeparator};
pub use stats::{format_stats, pairing_stats, GroupPairingRate, PairingStats, NO_STATS};
pub use text::{
    export_text, format_order, format_roles, member_count_text, round_hint, size_hint_text,
    NOT_RUN,
};
