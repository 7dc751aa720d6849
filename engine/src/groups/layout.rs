//! Group ids, labels and the settings they come from.

use serde::{Deserialize, Serialize};

/// Fewest groups a layout may have
pub const MIN_GROUPS: usize = 1;
/// Most groups a layout may have (one per letter)
pub const MAX_GROUPS: usize = 26;

/// Organizer settings for a group round; persisted with every group round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSettings {
    /// Requested number of groups (ignored when custom labels are set)
    #[serde(default = "default_group_count")]
    pub group_count: usize,
    /// Custom group labels; their count decides the number of groups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_labels: Vec<String>,
    /// Names kept in their previous group where balance allows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed_members: Vec<String>,
    /// Roles cycled through each finished group
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

fn default_group_count() -> usize {
    3
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            group_count: default_group_count(),
            custom_labels: Vec::new(),
            fixed_members: Vec::new(),
            roles: Vec::new(),
        }
    }
}

impl GroupSettings {
    /// Settings with a plain group count
    pub fn with_count(group_count: usize) -> Self {
        Self {
            group_count,
            ..Self::default()
        }
    }

    /// Effective layout for these settings
    pub fn layout(&self) -> GroupLayout {
        GroupLayout::from_settings(self)
    }
}

/// Clamp a requested group count into `[MIN_GROUPS, MAX_GROUPS]`
pub fn clamp_group_count(count: usize) -> usize {
    count.clamp(MIN_GROUPS, MAX_GROUPS)
}

/// Ordered group ids with their display labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLayout {
    ids: Vec<char>,
    labels: Vec<String>,
}

impl GroupLayout {
    /// Plain layout with `count` groups labelled by their letters
    pub fn with_count(count: usize) -> Self {
        let ids = letters(clamp_group_count(count));
        let labels = ids.iter().map(|c| c.to_string()).collect();
        Self { ids, labels }
    }

    /// Layout for organizer settings.
    ///
    /// Non-empty custom labels win over the plain count; blank labels are
    /// skipped and at most [`MAX_GROUPS`] are used.
    pub fn from_settings(settings: &GroupSettings) -> Self {
        let custom: Vec<String> = settings
            .custom_labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .take(MAX_GROUPS)
            .map(str::to_string)
            .collect();

        if custom.is_empty() {
            return Self::with_count(settings.group_count);
        }

        Self {
            ids: letters(custom.len()),
            labels: custom,
        }
    }

    /// Group ids in display order
    pub fn ids(&self) -> &[char] {
        &self.ids
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false: a layout has at least one group
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is one of this layout's groups
    pub fn contains(&self, id: char) -> bool {
        self.ids.contains(&id)
    }

    /// Index of `id` in display order
    pub fn position(&self, id: char) -> Option<usize> {
        self.ids.iter().position(|g| *g == id)
    }

    /// Display label for `id`, falling back to the letter itself
    pub fn label(&self, id: char) -> String {
        self.position(id)
            .and_then(|i| self.labels.get(i).cloned())
            .unwrap_or_else(|| id.to_string())
    }

    /// Group id whose label is exactly `label`
    pub fn id_for_label(&self, label: &str) -> Option<char> {
        let label = label.trim();
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.ids[i])
    }

    /// Smallest and largest group size for `members` members
    pub fn size_hint(&self, members: usize) -> (usize, usize) {
        let groups = self.len().max(1);
        (members / groups, members.div_ceil(groups))
    }
}

fn letters(count: usize) -> Vec<char> {
    (b'A'..=b'Z').take(count).map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_is_clamped() {
        assert_eq!(GroupLayout::with_count(0).len(), 1);
        assert_eq!(GroupLayout::with_count(3).ids(), &['A', 'B', 'C']);
        assert_eq!(GroupLayout::with_count(40).len(), 26);
        assert_eq!(GroupLayout::with_count(26).ids().last(), Some(&'Z'));
    }

    #[test]
    fn test_custom_labels_override_count() {
        let settings = GroupSettings {
            group_count: 5,
            custom_labels: vec!["Red".into(), " ".into(), "Blue".into()],
            ..Default::default()
        };
        let layout = settings.layout();
        assert_eq!(layout.ids(), &['A', 'B']);
        assert_eq!(layout.label('A'), "Red");
        assert_eq!(layout.label('B'), "Blue");
        assert_eq!(layout.id_for_label("Blue"), Some('B'));
        assert_eq!(layout.id_for_label("Green"), None);
    }

    #[test]
    fn test_custom_labels_capped_at_26() {
        let settings = GroupSettings {
            custom_labels: (0..30).map(|i| format!("T{}", i)).collect(),
            ..Default::default()
        };
        assert_eq!(settings.layout().len(), MAX_GROUPS);
    }

    #[test]
    fn test_label_falls_back_to_letter() {
        let layout = GroupLayout::with_count(2);
        assert_eq!(layout.label('A'), "A");
        assert_eq!(layout.label('Q'), "Q");
        assert!(!layout.contains('C'));
    }

    #[test]
    fn test_size_hint() {
        let layout = GroupLayout::with_count(3);
        assert_eq!(layout.size_hint(9), (3, 3));
        assert_eq!(layout.size_hint(10), (3, 4));
        assert_eq!(layout.size_hint(0), (0, 0));
    }

    #[test]
    fn test_settings_serde_defaults() {
        let settings: GroupSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, GroupSettings::default());
        let json = serde_json::to_string(&GroupSettings::with_count(4)).unwrap();
        assert_eq!(json, r#"{"group_count":4}"#);
    }
}
