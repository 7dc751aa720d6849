//! Order, role, hint and export text.

use crate::groups::GroupLayout;
use crate::history::{Category, RoundHistory};
use crate::roles::RoleAssignment;

/// `1. Ann` style numbered list
pub fn format_order(order: &[String]) -> String {
    order
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Ann: Lead` per line; members without a role keep the trailing colon
pub fn format_roles(assignments: &[RoleAssignment]) -> String {
    assignments
        .iter()
        .map(RoleAssignment::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hint for a category with nothing to show
pub const NOT_RUN: &str = "Not run yet";

/// Position of `category`'s cursor, e.g. `Round 2/3`
pub fn round_hint(history: &RoundHistory, category: Category) -> String {
    match history.position_label(category) {
        Some(label) => format!("Round {}", label),
        None => NOT_RUN.to_string(),
    }
}

/// Roster size line
pub fn member_count_text(members: usize) -> String {
    match members {
        0 => "Members: none".to_string(),
        n => format!("Members: {}", n),
    }
}

/// Members-per-group line for the layout
pub fn size_hint_text(layout: &GroupLayout, members: usize) -> String {
    if members == 0 {
        return "Per group: -".to_string();
    }
    match layout.size_hint(members) {
        (min, max) if min == max => format!("Per group: {}", min),
        (min, max) => format!("Per group: {}-{}", min, max),
    }
}

/// Plain-text export of the three views
pub fn export_text(groups: &str, order: &str, roles: &str) -> String {
    format!(
        "Groups:\n{}\n\nOrder:\n{}\n\nRoles:\n{}",
        groups, order, roles
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::OrderRound;

    #[test]
    fn test_order_and_roles_text() {
        assert_eq!(
            format_order(&["Ben".to_string(), "Ann".to_string()]),
            "1. Ben\n2. Ann"
        );
        let roles = vec![
            RoleAssignment::new("Ann", Some("Lead".into())),
            RoleAssignment::new("Ben", None),
        ];
        assert_eq!(format_roles(&roles), "Ann: Lead\nBen: ");
        assert_eq!(format_order(&[]), "");
    }

    #[test]
    fn test_round_hint() {
        let mut history = RoundHistory::new();
        assert_eq!(round_hint(&history, Category::Order), "Not run yet");
        history.record(OrderRound {
            order: vec!["A".into()],
        });
        history.record(OrderRound {
            order: vec!["A".into()],
        });
        history.back(Category::Order);
        assert_eq!(round_hint(&history, Category::Order), "Round 1/2");
    }

    #[test]
    fn test_size_hint_text() {
        let layout = GroupLayout::with_count(3);
        assert_eq!(size_hint_text(&layout, 0), "Per group: -");
        assert_eq!(size_hint_text(&layout, 9), "Per group: 3");
        assert_eq!(size_hint_text(&layout, 10), "Per group: 3-4");
        assert_eq!(member_count_text(0), "Members: none");
        assert_eq!(member_count_text(10), "Members: 10");
    }

    #[test]
    fn test_export_sections() {
        let text = export_text("A: Ann", "1. Ann", "Ann: Lead");
        assert_eq!(
            text,
            "Groups:\nA: Ann\n\nOrder:\n1. Ann\n\nRoles:\nAnn: Lead"
        );
    }
}
