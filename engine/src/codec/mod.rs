//! Roster text codecs
//!
//! - [`entry`]: the strict canonical `Name#1A#2B` grammar
//! - [`legacy`]: best-effort decoding of the human-edited display form

pub mod entry;
pub mod legacy;

pub use entry::{
    display_names, encode, latest_round, names, next_round, parse, split_lines, strip_history,
    MemberEntry, RoundTag,
};
pub use legacy::{decode_display, decode_line, decode_token};
