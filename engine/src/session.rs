//! Shuffle session: one event's roster, settings, history and views.
//!
//! The session is the only stateful piece of the engine. It owns the random
//! source, so a seeded session replays the same shuffles, and every
//! mutating call takes `&mut self`.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::codec::{self, MemberEntry};
use crate::cooccurrence::overlap;
use crate::display::{self, DisplayOptions};
use crate::error::ShuffleResult;
use crate::groups::{self, GroupAssignment, GroupOutcome, GroupSettings};
use crate::history::{Category, GroupRound, OrderRound, RoleRound, RoundHistory};
use crate::order::{self, OrderOutcome};
use crate::roles::{self, RoleAssignment};
use crate::sample;
use crate::snapshot::EventSnapshot;

/// Rendered text for each result view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Views {
    pub groups: String,
    pub stats: String,
    pub order: String,
    pub roles: String,
}

/// A single event's shuffle state
#[derive(Debug, Clone)]
pub struct ShuffleSession<R: Rng = StdRng> {
    roster: Vec<MemberEntry>,
    settings: GroupSettings,
    display: DisplayOptions,
    fixed_order: Vec<String>,
    roles: Vec<String>,
    history: RoundHistory,
    views: Views,
    /// Categories whose last shuffle failed and whose view is blank
    failed: HashSet<Category>,
    rng: R,
}

impl ShuffleSession<StdRng> {
    /// Session seeded from the OS
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible session
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for ShuffleSession<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ShuffleSession<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            roster: Vec::new(),
            settings: GroupSettings::default(),
            display: DisplayOptions::default(),
            fixed_order: Vec::new(),
            roles: Vec::new(),
            history: RoundHistory::new(),
            views: Views::default(),
            failed: HashSet::new(),
            rng,
        }
    }

    /// Session continuing a stored event
    pub fn from_snapshot(snapshot: &EventSnapshot, rng: R) -> Self {
        let mut session = Self::with_rng(rng);
        session.load_snapshot(snapshot);
        session
    }

    /// Replace roster and history with a stored event and show the rounds
    /// under its stored cursors. Group settings follow the current group
    /// round.
    pub fn load_snapshot(&mut self, snapshot: &EventSnapshot) {
        let (roster, history) = snapshot.restore();
        self.roster = roster;
        self.history = history;
        if let Some(entry) = self.history.current_groups() {
            self.settings = entry.payload.settings.clone();
        }
        self.views = Views::default();
        for category in Category::ALL {
            self.render(category);
        }
    }

    pub fn snapshot(&self) -> EventSnapshot {
        EventSnapshot::capture(&self.roster, &self.history)
    }

    // --- roster -----------------------------------------------------------

    /// Replace the roster with raw text (`Name#1A#2B` lines)
    pub fn set_roster_text(&mut self, text: &str) {
        self.roster = codec::parse(text);
        debug!(members = self.roster.len(), "Roster replaced");
    }

    /// Replace the roster with human-edited display text, resolving group
    /// labels through the current layout
    pub fn set_display_text(&mut self, text: &str) {
        let raw = codec::decode_display(text, &self.settings.layout());
        self.set_roster_text(&raw);
    }

    pub fn roster_text(&self) -> String {
        codec::encode(&self.roster)
    }

    /// Names only, one per line
    pub fn display_text(&self) -> String {
        codec::names(&self.roster).join("\n")
    }

    pub fn roster(&self) -> &[MemberEntry] {
        &self.roster
    }

    /// Replace the roster with sample names drawn from the session's rng
    pub fn load_sample_roster(&mut self) -> String {
        let text = sample::sample_roster(&mut self.rng);
        self.set_roster_text(&text);
        text
    }

    // --- settings ---------------------------------------------------------

    pub fn settings(&self) -> &GroupSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: GroupSettings) {
        self.settings = settings;
    }

    pub fn display_options(&self) -> &DisplayOptions {
        &self.display
    }

    /// Change display options and re-render the group view
    pub fn set_display_options(&mut self, options: DisplayOptions) {
        self.display = options;
        self.render(Category::Groups);
    }

    pub fn fixed_order(&self) -> &[String] {
        &self.fixed_order
    }

    /// Pin lines for the order engine (`2: Bob`)
    pub fn set_fixed_order(&mut self, lines: Vec<String>) {
        self.fixed_order = lines;
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Roles handed out by [`assign_roles`](Self::assign_roles)
    pub fn set_roles(&mut self, roles: Vec<String>) {
        self.roles = roles;
    }

    // --- shuffles ---------------------------------------------------------

    /// Shuffle the roster into groups and record the round
    pub fn assign_groups(&mut self) -> ShuffleResult<GroupOutcome> {
        let outcome = match groups::assign_groups(&self.roster, &self.settings, &mut self.rng) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(code = e.code(), "Group shuffle failed");
                self.views.groups.clear();
                self.views.stats.clear();
                self.failed.insert(Category::Groups);
                return Err(e);
            }
        };

        self.roster = outcome.entries.clone();
        self.history.record(GroupRound::new(
            outcome.roster_text(),
            self.settings.clone(),
        ));
        self.failed.remove(&Category::Groups);
        self.render_groups(&outcome.assignment);
        Ok(outcome)
    }

    /// Shuffle the roster into an order and record the round
    pub fn assign_order(&mut self) -> ShuffleResult<OrderOutcome> {
        let names = codec::names(&self.roster);
        let outcome = match order::assign_order(&names, &self.fixed_order, &mut self.rng) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(code = e.code(), "Order shuffle failed");
                self.views.order.clear();
                self.failed.insert(Category::Order);
                return Err(e);
            }
        };

        self.history.record(OrderRound {
            order: outcome.order.clone(),
        });
        self.failed.remove(&Category::Order);
        self.views.order = display::format_order(&outcome.order);
        Ok(outcome)
    }

    /// Hand out the configured roles and record the round
    pub fn assign_roles(&mut self) -> ShuffleResult<Vec<RoleAssignment>> {
        let names = codec::names(&self.roster);
        let assignments = match roles::assign_roles(&names, &self.roles, &mut self.rng) {
            Ok(assignments) => assignments,
            Err(e) => {
                warn!(code = e.code(), "Role shuffle failed");
                self.views.roles.clear();
                self.failed.insert(Category::Roles);
                return Err(e);
            }
        };

        self.history.record(RoleRound {
            assignments: assignments.clone(),
        });
        self.failed.remove(&Category::Roles);
        self.views.roles = display::format_roles(&assignments);
        Ok(assignments)
    }

    // --- history ----------------------------------------------------------

    /// Step `category` back one round and show it
    pub fn back(&mut self, category: Category) -> bool {
        let moved = self.history.back(category);
        if moved {
            self.show_current(category);
        }
        moved
    }

    /// Step `category` forward one round and show it
    pub fn forward(&mut self, category: Category) -> bool {
        let moved = self.history.forward(category);
        if moved {
            self.show_current(category);
        }
        moved
    }

    /// Drop all rounds and every tag in the roster
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.roster = codec::strip_history(&self.roster);
        self.views = Views::default();
        self.failed.clear();
        info!(members = self.roster.len(), "Shuffle history cleared");
    }

    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    // --- views ------------------------------------------------------------

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn groups_text(&self) -> &str {
        &self.views.groups
    }

    pub fn stats_text(&self) -> &str {
        &self.views.stats
    }

    pub fn order_text(&self) -> &str {
        &self.views.order
    }

    pub fn roles_text(&self) -> &str {
        &self.views.roles
    }

    /// `Round k/n`, or `Not run yet` while the category's view is blank
    /// after a failed shuffle
    pub fn round_hint(&self, category: Category) -> String {
        if self.failed.contains(&category) {
            return display::NOT_RUN.to_string();
        }
        display::round_hint(&self.history, category)
    }

    pub fn size_hint_text(&self) -> String {
        display::size_hint_text(&self.settings.layout(), self.roster.len())
    }

    pub fn member_count_text(&self) -> String {
        display::member_count_text(self.roster.len())
    }

    pub fn export_text(&self) -> String {
        display::export_text(&self.views.groups, &self.views.order, &self.views.roles)
    }

    /// Load the round under `category`'s cursor. A group round also
    /// becomes the roster the next shuffle continues from.
    fn show_current(&mut self, category: Category) {
        if category == Category::Groups {
            if let Some(entry) = self.history.current_groups() {
                self.roster = entry.payload.entries();
                debug!(round = entry.round, "Roster restored from history");
            }
        }
        self.render(category);
    }

    fn render(&mut self, category: Category) {
        self.failed.remove(&category);
        match category {
            Category::Groups => {
                let assignment = self
                    .history
                    .current_groups()
                    .map(|entry| entry.payload.assignment());
                match assignment {
                    Some(assignment) => self.render_groups(&assignment),
                    None => {
                        self.views.groups.clear();
                        self.views.stats.clear();
                    }
                }
            }
            Category::Order => {
                self.views.order = self
                    .history
                    .current_order()
                    .map(|entry| display::format_order(&entry.payload.order))
                    .unwrap_or_default();
            }
            Category::Roles => {
                self.views.roles = self
                    .history
                    .current_roles()
                    .map(|entry| display::format_roles(&entry.payload.assignments))
                    .unwrap_or_default();
            }
        }
    }

    fn render_groups(&mut self, assignment: &GroupAssignment) {
        self.views.groups = display::format_groups(assignment, &self.display);
        self.views.stats = display::format_stats(assignment, &overlap(&self.roster, true));
    }
}
