//! Forgiving decoder for the human-edited display form.
//!
//! Older rosters were edited as `name#<n> 巡目：<label>` (or the English
//! `name#round <n>: <label>`) with the group's display label instead of its
//! letter. This decoder turns such lines back into raw text. It never
//! fails: a label that no longer resolves degrades to a round-only tag
//! (`#3`), which the canonical parser then ignores.

use regex::Regex;
use std::sync::LazyLock;

use crate::groups::GroupLayout;

static CANONICAL_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)([A-Z])$").expect("CANONICAL_TOKEN_RE regex should compile")
});

static LABELLED_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)\s*巡目|(?i:round)\s*(\d+))\s*[:：]\s*(.+)$")
        .expect("LABELLED_TOKEN_RE regex should compile")
});

static GROUP_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:グループ|(?i:group))\s*").expect("GROUP_PREFIX_RE regex should compile")
});

static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("LINE_RE regex should compile"));

/// A tag recovered from display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTag {
    pub round: String,
    /// `None` when the label could not be resolved
    pub group: Option<char>,
}

impl DecodedTag {
    fn to_raw(&self) -> String {
        match self.group {
            Some(g) => format!("#{}{}", self.round, g),
            None => format!("#{}", self.round),
        }
    }
}

/// Decode one display token (the text between two `#`)
pub fn decode_token(token: &str, layout: &GroupLayout) -> String {
    let token = token.trim();

    if let Some(caps) = CANONICAL_TOKEN_RE.captures(token) {
        return format!("#{}{}", &caps[1], &caps[2]);
    }

    if let Some(caps) = LABELLED_TOKEN_RE.captures(token) {
        let round = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let label = caps[3].trim();
        let group = layout.id_for_label(label).or_else(|| {
            let stripped = GROUP_PREFIX_RE.replace(label, "");
            layout.id_for_label(stripped.trim())
        });
        return DecodedTag { round, group }.to_raw();
    }

    format!("#{}", token.trim_start_matches('#'))
}

/// Decode one display line into a raw roster line
pub fn decode_line(line: &str, layout: &GroupLayout) -> Option<String> {
    let mut parts = line.split('#').filter(|p| !p.is_empty());
    let base = parts.next()?.trim();
    let tags: String = parts.map(|tok| decode_token(tok, layout)).collect();
    let raw = format!("{}{}", base, tags);
    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}

/// Decode display text (newline separated) into raw roster text
pub fn decode_display(text: &str, layout: &GroupLayout) -> String {
    LINE_RE
        .split(text)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(|l| decode_line(l, layout))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::entry::{parse, RoundTag};
    use crate::groups::GroupSettings;

    fn layout() -> GroupLayout {
        GroupSettings {
            custom_labels: vec!["Red".into(), "Blue".into()],
            ..Default::default()
        }
        .layout()
    }

    #[test]
    fn test_canonical_tokens_pass_through() {
        assert_eq!(decode_display("Alice#1A#2B", &layout()), "Alice#1A#2B");
    }

    #[test]
    fn test_japanese_round_label_resolves() {
        let raw = decode_display("Alice#1巡目：Blue#2 巡目 : Red", &layout());
        assert_eq!(raw, "Alice#1B#2A");
    }

    #[test]
    fn test_english_round_label_resolves() {
        let raw = decode_display("Bob#Round 3: Blue", &layout());
        assert_eq!(raw, "Bob#3B");
    }

    #[test]
    fn test_group_prefix_is_stripped() {
        let plain = GroupLayout::with_count(3);
        assert_eq!(decode_display("Cy#1巡目：グループC", &plain), "Cy#1C");
        assert_eq!(decode_display("Cy#round 2: Group B", &plain), "Cy#2B");
    }

    #[test]
    fn test_unresolved_label_degrades_to_round_only() {
        let raw = decode_display("Dee#4巡目：Green", &layout());
        assert_eq!(raw, "Dee#4");
        // the canonical parser drops the degraded tag instead of failing
        let entries = parse(&raw);
        assert_eq!(entries[0].name, "Dee");
        assert!(entries[0].history.is_empty());
    }

    #[test]
    fn test_unknown_tokens_are_kept() {
        assert_eq!(decode_display("Eve#note", &layout()), "Eve#note");
    }

    #[test]
    fn test_blank_lines_dropped_and_tags_parse() {
        let raw = decode_display("A#1巡目：Red\n\n\r\nB#1B\n", &layout());
        let entries = parse(&raw);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].history, vec![RoundTag::new(1, 'A')]);
        assert_eq!(entries[1].history, vec![RoundTag::new(1, 'B')]);
    }
}
