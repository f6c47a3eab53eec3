//! TOML-based engine configuration.
//!
//! Holds the tunables of the engine:
//! - Focus timer tick period and suggestion refresh cadence
//! - Session sampler period and the fallback destination
//! - Classifier keyword tables
//!
//! Configuration is read from `~/.config/focusflow/config.toml` when present.
//! Nothing is ever written back.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Upper bound for the timer and sampler periods.
pub const MAX_PERIOD_SECS: u64 = 3600;

/// Focus timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerConfig {
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    /// A coaching refresh is requested every this many ticks.
    #[serde(default = "default_refresh_every_ticks")]
    pub refresh_every_ticks: u64,
}

/// Session monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorConfig {
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
    /// Used when a focus session is opened with a blank destination.
    #[serde(default = "default_destination")]
    pub default_destination: String,
    /// Hand the destination to the system viewer when a session opens.
    #[serde(default = "default_true")]
    pub open_in_viewer: bool,
}

/// One row of the category table. Rows are matched in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Classifier keyword tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifierConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryRule>,
    #[serde(default = "default_distractions")]
    pub distractions: Vec<String>,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/focusflow/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

// Default functions
fn default_tick_secs() -> u64 {
    1
}
fn default_refresh_every_ticks() -> u64 {
    60
}
fn default_poll_secs() -> u64 {
    2
}
fn default_destination() -> String {
    "https://www.google.com".into()
}
fn default_true() -> bool {
    true
}

fn rule(name: &str, keywords: &[&str]) -> CategoryRule {
    CategoryRule {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn default_categories() -> Vec<CategoryRule> {
    vec![
        rule(
            "Productivity",
            &["google", "docs.google", "wikipedia", "notion"],
        ),
        rule("Entertainment", &["youtube", "tiktok", "netflix"]),
        rule("Social Media", &["discord", "twitter", "facebook"]),
    ]
}

fn default_distractions() -> Vec<String> {
    ["youtube", "tiktok", "netflix", "discord"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
            refresh_every_ticks: default_refresh_every_ticks(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_secs: default_poll_secs(),
            default_destination: default_destination(),
            open_in_viewer: true,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            distractions: default_distractions(),
        }
    }
}

/// Returns `~/.config/focusflow[-dev]/` based on FOCUSFLOW_ENV.
///
/// Set FOCUSFLOW_ENV=dev to use the development directory. The directory is
/// not created.
pub fn config_dir() -> PathBuf {
    let base_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    let env = std::env::var("FOCUSFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("focusflow-dev")
    } else {
        base_dir.join("focusflow")
    }
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(content).map_err(ConfigError::from)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|err| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        Self::from_toml_str(&content)
    }

    /// Load from the default location, falling back to defaults when the file
    /// is missing or broken.
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!("ignoring config at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_period("timer.tick_secs", self.timer.tick_secs)?;
        if self.timer.refresh_every_ticks == 0 {
            return Err(invalid(
                "timer.refresh_every_ticks",
                "must be greater than zero",
            ));
        }
        check_period("monitor.poll_secs", self.monitor.poll_secs)?;
        if let Some(rule) = self
            .classifier
            .categories
            .iter()
            .find(|rule| rule.name.trim().is_empty())
        {
            return Err(invalid(
                "classifier.categories",
                format!("category with keywords {:?} has no name", rule.keywords),
            ));
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Render as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| ConfigError::ParseFailed(err.to_string()).into())
    }
}

/// Periods are whole seconds in `1..=MAX_PERIOD_SECS`.
fn check_period(key: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(invalid(key, "must be greater than zero"));
    }
    if secs > MAX_PERIOD_SECS {
        return Err(invalid(
            key,
            format!("must be at most {MAX_PERIOD_SECS} seconds"),
        ));
    }
    Ok(())
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

fn get_json_value_by_path<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }

    let mut current = root;
    for part in key.split('.') {
        current = match current {
            serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            other => other.get(part)?,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = cfg.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.timer.tick_secs, 1);
        assert_eq!(cfg.timer.refresh_every_ticks, 60);
        assert_eq!(cfg.monitor.poll_secs, 2);
        assert_eq!(cfg.monitor.default_destination, "https://www.google.com");
        assert!(cfg.monitor.open_in_viewer);
        let names: Vec<_> = cfg
            .classifier
            .categories
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, ["Productivity", "Entertainment", "Social Media"]);
        assert_eq!(
            cfg.classifier.distractions,
            ["youtube", "tiktok", "netflix", "discord"]
        );
    }

    #[test]
    fn partial_document_fills_defaults() {
        let cfg = Config::from_toml_str("[monitor]\npoll_secs = 5\n").unwrap();
        assert_eq!(cfg.monitor.poll_secs, 5);
        assert_eq!(cfg.timer, TimerConfig::default());
        assert_eq!(cfg.classifier, ClassifierConfig::default());
    }

    #[test]
    fn zero_periods_are_rejected() {
        let err = Config::from_toml_str("[timer]\ntick_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("timer.tick_secs"));

        let err = Config::from_toml_str("[monitor]\npoll_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("monitor.poll_secs"));
    }

    #[test]
    fn oversized_periods_are_rejected() {
        let err = Config::from_toml_str("[timer]\ntick_secs = 9223372036854775807\n").unwrap_err();
        assert!(err.to_string().contains("timer.tick_secs"));

        let err = Config::from_toml_str("[monitor]\npoll_secs = 3601\n").unwrap_err();
        assert!(err.to_string().contains("monitor.poll_secs"));

        let cfg = Config::from_toml_str("[timer]\ntick_secs = 3600\n").unwrap();
        assert_eq!(cfg.timer.tick_secs, MAX_PERIOD_SECS);
    }

    #[test]
    fn unnamed_category_is_rejected() {
        let doc = r#"
            [[classifier.categories]]
            name = " "
            keywords = ["x"]
        "#;
        assert!(Config::from_toml_str(doc).is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::from_toml_str("[timer\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration"));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.tick_secs").as_deref(), Some("1"));
        assert_eq!(
            cfg.get("monitor.default_destination").as_deref(),
            Some("https://www.google.com")
        );
        assert_eq!(
            cfg.get("classifier.categories.1.name").as_deref(),
            Some("Entertainment")
        );
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nrefresh_every_ticks = 30\n").unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.timer.refresh_every_ticks, 30);
    }
}
