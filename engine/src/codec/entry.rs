//! Canonical roster encoding
//!
//! One member per line: the name, followed by zero or more `#<round><G>`
//! tags recording the group the member landed in on each round.
//!
//! ```text
//! Alice#1A#2C
//! Bob#1B#2A
//! Carol
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)([A-Z])").expect("TAG_RE regex should compile"));

static LINE_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n,]+").expect("LINE_SPLIT_RE regex should compile"));

/// One round's placement of a member: round number plus group letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundTag {
    /// Round number (1-indexed)
    pub round: u32,
    /// Group letter, `A`..=`Z`
    pub group: char,
}

impl RoundTag {
    pub fn new(round: u32, group: char) -> Self {
        Self { round, group }
    }
}

impl fmt::Display for RoundTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}{}", self.round, self.group)
    }
}

/// A roster member with its placement history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEntry {
    /// Display name (text before the first `#`)
    pub name: String,
    /// Placements, oldest first
    pub history: Vec<RoundTag>,
}

impl MemberEntry {
    /// Create an entry with no history
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            history: Vec::new(),
        }
    }

    /// Parse a single roster line
    pub fn parse_line(line: &str) -> Self {
        let name = line.split('#').next().unwrap_or_default().trim().to_string();
        let history = TAG_RE
            .captures_iter(line)
            .filter_map(|caps| {
                let round: u32 = caps[1].parse().ok().filter(|r| *r > 0)?;
                let group = caps[2].chars().next()?;
                Some(RoundTag::new(round, group))
            })
            .collect();
        Self { name, history }
    }

    /// Group letter of the most recent placement
    pub fn last_group(&self) -> Option<char> {
        self.history.last().map(|t| t.group)
    }

    /// Highest round number this member carries
    pub fn latest_round(&self) -> Option<u32> {
        self.history.iter().map(|t| t.round).max()
    }

    /// Copy of this entry with one more placement appended
    pub fn with_tag(&self, round: u32, group: char) -> Self {
        let mut next = self.clone();
        next.history.push(RoundTag::new(round, group));
        next
    }
}

impl fmt::Display for MemberEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for tag in &self.history {
            write!(f, "{}", tag)?;
        }
        Ok(())
    }
}

/// Split raw roster text into trimmed, non-blank lines.
///
/// Newlines, carriage returns and commas all separate entries.
pub fn split_lines(text: &str) -> Vec<&str> {
    LINE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse raw roster text into entries
pub fn parse(text: &str) -> Vec<MemberEntry> {
    split_lines(text)
        .into_iter()
        .map(MemberEntry::parse_line)
        .collect()
}

/// Encode entries back into raw roster text, one per line
pub fn encode(entries: &[MemberEntry]) -> String {
    entries
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Names only, in roster order
pub fn names(entries: &[MemberEntry]) -> Vec<String> {
    entries.iter().map(|e| e.name.clone()).collect()
}

/// Name-only display form of raw roster text
pub fn display_names(text: &str) -> String {
    split_lines(text)
        .into_iter()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop every placement, keeping names in order
pub fn strip_history(entries: &[MemberEntry]) -> Vec<MemberEntry> {
    entries.iter().map(|e| MemberEntry::new(&e.name)).collect()
}

/// Highest round number present anywhere in the roster
pub fn latest_round(entries: &[MemberEntry]) -> Option<u32> {
    entries.iter().filter_map(MemberEntry::latest_round).max()
}

/// Round number the next group assignment will use
pub fn next_round(entries: &[MemberEntry]) -> u32 {
    latest_round(entries).map_or(1, |r| r + 1)
}
