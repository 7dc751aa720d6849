//! Group text rendering.

use serde::{Deserialize, Serialize};

use crate::groups::{Group, GroupAssignment, GroupMember};

/// What each group block shows besides its members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayFormat {
    /// `A: m1, m2`
    Name,
    /// Label on its own line
    NameBreak,
    /// `A (2): m1, m2`
    NameCount,
    /// Label and count on their own line
    #[default]
    NameCountBreak,
    /// Members only
    None,
}

impl DisplayFormat {
    pub fn shows_label(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn shows_count(&self) -> bool {
        matches!(self, Self::NameCount | Self::NameCountBreak)
    }

    pub fn breaks_after_label(&self) -> bool {
        matches!(self, Self::NameBreak | Self::NameCountBreak)
    }
}

/// Separator between members of one group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberSeparator {
    #[default]
    Newline,
    Tab,
    Comma,
    Custom(String),
}

impl MemberSeparator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Newline => "\n",
            Self::Tab => "\t",
            Self::Comma => ", ",
            Self::Custom(sep) => sep,
        }
    }
}

/// Separator between group blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSeparator {
    None,
    #[default]
    BlankLine,
    Rule,
    Wave,
}

impl GroupSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "\n",
            Self::BlankLine => "\n\n",
            Self::Rule => "\n────────\n",
            Self::Wave => "\n〜〜〜〜〜〜〜\n",
        }
    }
}

/// Rendering options for group text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub format: DisplayFormat,
    pub member_separator: MemberSeparator,
    pub group_separator: GroupSeparator,
}

/// Render an assignment as plain text
pub fn format_groups(assignment: &GroupAssignment, options: &DisplayOptions) -> String {
    assignment
        .groups
        .iter()
        .map(|group| format_block(group, options))
        .collect::<Vec<_>>()
        .join(options.group_separator.as_str())
        .trim()
        .to_string()
}

fn format_block(group: &Group, options: &DisplayOptions) -> String {
    let mut block = String::new();
    let format = options.format;
    if format.shows_label() {
        block.push_str(&group.label);
        if format.shows_count() {
            block.push_str(&format!(" ({})", group.len()));
        }
        block.push_str(if format.breaks_after_label() { ":\n" } else { ": " });
    }
    let members: Vec<String> = group.members.iter().map(member_text).collect();
    block.push_str(&members.join(options.member_separator.as_str()));
    block
}

fn member_text(member: &GroupMember) -> String {
    match &member.role {
        Some(role) => format!("{} ({})", member.name, role),
        None => member.name.clone(),
    }
}
