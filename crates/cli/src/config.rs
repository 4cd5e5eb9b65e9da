use std::path::PathBuf;

use ripd_core::templates::DEFAULT_DEADLINE_DAYS;
use thiserror::Error;

/// An environment variable held a value that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{var} must be {expected} (got '{value}')")]
pub struct ConfigError {
    pub var: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Report generator configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory for reports when no output path is given (default: `.`).
    pub output_dir: PathBuf,
    /// Days until the deadline of generated actions (default: `30`).
    pub action_deadline_days: u64,
    /// Fill empty risk matrices and action plans from the templates
    /// (default: `false`).
    pub generate_defaults: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            action_deadline_days: DEFAULT_DEADLINE_DAYS,
            generate_defaults: false,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `RIPD_OUTPUT_DIR`           | `.`     |
    /// | `RIPD_ACTION_DEADLINE_DAYS` | `30`    |
    /// | `RIPD_GENERATE_DEFAULTS`    | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`CliConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let output_dir = lookup("RIPD_OUTPUT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let action_deadline_days = match lookup("RIPD_ACTION_DEADLINE_DAYS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError {
                var: "RIPD_ACTION_DEADLINE_DAYS",
                expected: "a non-negative integer",
                value,
            })?,
            None => defaults.action_deadline_days,
        };

        let generate_defaults = match lookup("RIPD_GENERATE_DEFAULTS") {
            Some(value) => parse_flag(&value).ok_or(ConfigError {
                var: "RIPD_GENERATE_DEFAULTS",
                expected: "true or false",
                value,
            })?,
            None => defaults.generate_defaults,
        };

        Ok(Self {
            output_dir,
            action_deadline_days,
            generate_defaults,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
