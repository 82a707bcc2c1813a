//! # Table Configuration
//!
//! [`TableConfig`] describes everything the [`DiningTable`](crate::lifecycle::DiningTable)
//! needs to start: who sits at the table, how long they think and eat, how patient the
//! acquisition protocol is, and how often the supervisor reports.
//!
//! The defaults reproduce the classic setup: five philosophers, sleeps between one and
//! eight seconds, a retry budget of two and a report every second.
//!
//! Configurations can be loaded from TOML; every field is optional:
//!
//! ```toml
//! names = ["Kant", "Hume", "Locke"]
//! retry_budget = 3
//! report_interval_ms = 500
//! seed = 42
//!
//! [timing.think]
//! min_ms = 100
//! max_ms = 900
//! ```

use crate::error::{ConfigError, TableError};
use crate::philosopher::Timing;
use crate::protocol::DEFAULT_RETRY_BUDGET;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_NAMES: [&str; 5] = ["Socrates", "Plato", "Pythagoras", "Aristotle", "Diogenes"];

/// How the periodic snapshot is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// One name per seat; the number of names is the size of the ring.
    pub names: Vec<String>,
    pub timing: Timing,
    pub retry_budget: u32,
    pub report_interval_ms: u64,
    pub report_format: ReportFormat,
    /// Seeds every philosopher's random source for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            names: DEFAULT_NAMES.iter().map(|n| n.to_string()).collect(),
            timing: Timing::default(),
            retry_budget: DEFAULT_RETRY_BUDGET,
            report_interval_ms: 1000,
            report_format: ReportFormat::default(),
            seed: None,
        }
    }
}

impl TableConfig {
    /// Default configuration with `seats` philosophers named `A0`, `A1`, ...
    pub fn with_seats(seats: usize) -> Self {
        Self {
            names: (0..seats).map(|i| format!("A{i}")).collect(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn seat_count(&self) -> usize {
        self.names.len()
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    /// Checks names, sleep ranges and the report period.
    ///
    /// The size of the ring is checked when the forks are laid out, by
    /// [`ForkSet::new`](crate::model::ForkSet::new).
    pub fn validate(&self) -> Result<(), TableError> {
        if let Some(i) = self.names.iter().position(|n| n.trim().is_empty()) {
            return Err(TableError::InvalidConfig(format!("philosopher {i} has no name")));
        }
        if !self.timing.think.is_valid() {
            return Err(TableError::InvalidConfig(format!(
                "think range is inverted: {:?}",
                self.timing.think
            )));
        }
        if !self.timing.eat.is_valid() {
            return Err(TableError::InvalidConfig(format!(
                "eat range is inverted: {:?}",
                self.timing.eat
            )));
        }
        if self.report_interval_ms == 0 {
            return Err(TableError::InvalidConfig(
                "report interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::philosopher::SleepRange;

    #[test]
    fn test_defaults_are_the_classic_table() {
        let config = TableConfig::default();
        assert_eq!(config.seat_count(), 5);
        assert_eq!(config.names[0], "Socrates");
        assert_eq!(config.retry_budget, 2);
        assert_eq!(config.timing.think, SleepRange::from_secs(1, 8));
        assert_eq!(config.report_interval(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_unusable_settings() {
        let mut unnamed = TableConfig::with_seats(3);
        unnamed.names[1] = "  ".to_string();
        assert!(matches!(unnamed.validate(), Err(TableError::InvalidConfig(_))));

        let mut inverted = TableConfig::default();
        inverted.timing.eat = SleepRange::from_millis(10, 1);
        assert!(inverted.validate().is_err());

        let mut silent = TableConfig::default();
        silent.report_interval_ms = 0;
        assert!(silent.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TableConfig::from_toml_str(
            r#"
            names = ["Kant", "Hume", "Locke"]
            retry_budget = 3
            report_format = "json"
            seed = 42

            [timing.think]
            min_ms = 100
            max_ms = 900
            "#,
        )
        .unwrap();

        assert_eq!(config.seat_count(), 3);
        assert_eq!(config.retry_budget, 3);
        assert_eq!(config.report_format, ReportFormat::Json);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.timing.think, SleepRange::from_millis(100, 900));
        assert_eq!(config.timing.eat, SleepRange::from_secs(1, 8));
        assert_eq!(config.report_interval_ms, 1000);
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let result = TableConfig::from_toml_str("retry_budget = \"lots\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = TableConfig::load("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
