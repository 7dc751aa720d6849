//! JSON state file: the event snapshot plus the session's own settings.
//!
//! ```text
//! {
//!   "snapshot": { "data_version": 2, ... },
//!   "settings": { "group_count": 3 },
//!   "display": { "format": "name_count_break" },
//!   "fixed_order": ["1: Alice"],
//!   "roles": ["Host", "Scribe"]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shuffly_engine::{DisplayOptions, EventSnapshot, GroupSettings, ShuffleSession};
use tracing::{debug, info};

use crate::config::ShufflyConfig;

/// Everything persisted between CLI invocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    /// Kept as raw JSON so a bad snapshot degrades to an empty event
    /// instead of failing the whole file
    #[serde(default)]
    pub snapshot: serde_json::Value,
    #[serde(default)]
    pub settings: GroupSettings,
    #[serde(default)]
    pub display: DisplayOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed_order: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl StateFile {
    /// Fresh state using the configured defaults
    pub fn new(config: &ShufflyConfig) -> Self {
        Self {
            snapshot: serde_json::Value::Null,
            settings: config.settings.clone(),
            display: config.display.clone(),
            fixed_order: Vec::new(),
            roles: Vec::new(),
        }
    }

    /// Read the state file at `path`, or start fresh when it does not exist
    pub fn load(path: &Path, config: &ShufflyConfig) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No state file yet, starting fresh");
            return Ok(Self::new(config));
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        let state: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file {}", path.display()))?;
        Ok(state)
    }

    /// Write the state file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize state")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write state file {}", path.display()))?;
        info!(path = %path.display(), "State saved");
        Ok(())
    }

    /// Stored snapshot; unreadable snapshots come back empty
    pub fn event(&self) -> EventSnapshot {
        if self.snapshot.is_null() {
            return EventSnapshot::default();
        }
        EventSnapshot::from_json_or_default(&self.snapshot.to_string())
    }

    /// Session continuing this state
    pub fn into_session<R: Rng>(self, rng: R) -> ShuffleSession<R> {
        let mut session = ShuffleSession::from_snapshot(&self.event(), rng);
        session.set_settings(self.settings);
        session.set_display_options(self.display);
        session.set_fixed_order(self.fixed_order);
        session.set_roles(self.roles);
        session
    }

    /// Capture a session's current state
    pub fn from_session<R: Rng>(session: &ShuffleSession<R>) -> Result<Self> {
        let snapshot =
            serde_json::to_value(session.snapshot()).context("Failed to encode snapshot")?;
        Ok(Self {
            snapshot,
            settings: session.settings().clone(),
            display: session.display_options().clone(),
            fixed_order: session.fixed_order().to_vec(),
            roles: session.roles().to_vec(),
        })
    }
}
