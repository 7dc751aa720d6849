use serde::Deserialize;
use shuffly_engine::{DisplayOptions, GroupSettings};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default state file, relative to the working directory
pub const DEFAULT_STATE_PATH: &str = ".shuffly/state.json";

/// Problems reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Optional overrides read from a TOML config file.
///
/// ```toml
/// state_path = "events/spring.json"
/// seed = 42
/// group_count = 4
/// custom_labels = ["Red", "Blue", "Green", "Gold"]
///
/// [display]
/// format = "name_count"
/// member_separator = "comma"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub state_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub group_count: Option<usize>,
    #[serde(default)]
    pub custom_labels: Vec<String>,
    pub display: Option<DisplayOptions>,
}

/// Top-level CLI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ShufflyConfig {
    /// JSON file holding the event snapshot and session settings
    pub state_path: PathBuf,
    /// Fixed seed for reproducible shuffles (None = OS entropy)
    pub seed: Option<u64>,
    /// Group settings for events that have none stored yet
    pub settings: GroupSettings,
    /// Display options for events that have none stored yet
    pub display: DisplayOptions,
}

impl Default for ShufflyConfig {
    fn default() -> Self {
        Self {
            state_path: std::env::var("SHUFFLY_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH)),
            seed: env_parsed("SHUFFLY_SEED"),
            settings: GroupSettings {
                group_count: env_parsed("SHUFFLY_GROUP_COUNT")
                    .unwrap_or(GroupSettings::default().group_count),
                ..GroupSettings::default()
            },
            display: DisplayOptions::default(),
        }
    }
}

impl ShufflyConfig {
    /// Environment defaults, overlaid by `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = path {
            config.apply_file(FileConfig::from_file(path)?);
        }
        Ok(config)
    }

    /// Overlay values present in a config file.
    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(path) = file.state_path {
            self.state_path = path;
        }
        if file.seed.is_some() {
            self.seed = file.seed;
        }
        if let Some(count) = file.group_count {
            self.settings.group_count = count;
        }
        if !file.custom_labels.is_empty() {
            self.settings.custom_labels = file.custom_labels;
        }
        if let Some(display) = file.display {
            self.display = display;
        }
    }

    /// Overlay command-line flags, which win over everything else.
    pub fn with_overrides(mut self, state_path: Option<PathBuf>, seed: Option<u64>) -> Self {
        if let Some(path) = state_path {
            self.state_path = path;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

fn env_parsed<T: std::str::FromStr>(var: &str) -> Option<T> {
    let value = std::env::var(var).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(var, value = %value, "Ignoring unparseable environment variable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuffly_engine::{DisplayFormat, MemberSeparator};

    #[test]
    fn test_file_overlay() {
        let file = FileConfig::from_toml(
            r#"
            state_path = "events/spring.json"
            seed = 42
            group_count = 4
            custom_labels = ["Red", "Blue"]

            [display]
            format = "name_count"
            member_separator = "comma"
            "#,
        )
        .unwrap();

        let mut config = ShufflyConfig {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            seed: None,
            settings: GroupSettings::default(),
            display: DisplayOptions::default(),
        };
        config.apply_file(file);

        assert_eq!(config.state_path, PathBuf::from("events/spring.json"));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.settings.group_count, 4);
        assert_eq!(config.settings.custom_labels, vec!["Red", "Blue"]);
        assert_eq!(config.display.format, DisplayFormat::NameCount);
        assert_eq!(config.display.member_separator, MemberSeparator::Comma);
    }

    #[test]
    fn test_empty_file_changes_nothing() {
        let before = ShufflyConfig {
            state_path: PathBuf::from("a.json"),
            seed: Some(1),
            settings: GroupSettings::with_count(5),
            display: DisplayOptions::default(),
        };
        let mut after = before.clone();
        after.apply_file(FileConfig::from_toml("").unwrap());
        assert_eq!(after, before);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(FileConfig::from_toml("groups = 3").is_err());
    }

    #[test]
    fn test_flags_win() {
        let config = ShufflyConfig {
            state_path: PathBuf::from("a.json"),
            seed: Some(1),
            settings: GroupSettings::default(),
            display: DisplayOptions::default(),
        }
        .with_overrides(Some(PathBuf::from("b.json")), None);
        assert_eq!(config.state_path, PathBuf::from("b.json"));
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = ShufflyConfig::load(Some(Path::new("/nonexistent/shuffly.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
