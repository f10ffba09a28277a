mod coaching;
mod orchestrator;
mod provider;

pub use coaching::*;
pub use orchestrator::*;
pub use provider::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub coaching: CoachingConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.provider.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "provider.base_url".into(),
                message: "base_url must not be empty".into(),
            });
        }

        if self.provider.model.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "provider.model".into(),
                message: "model must not be empty".into(),
            });
        }

        if self.provider.auth.key.is_some() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "provider.auth.key".into(),
                message: "inline API keys end up in config files; prefer auth.env".into(),
            });
        }

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "provider.temperature".into(),
                message: "temperature outside the usual 0.0..=2.0 range".into(),
            });
        }

        if self.orchestrator.max_turns == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "orchestrator.max_turns".into(),
                message: "max_turns must be at least 1".into(),
            });
        }

        if self.orchestrator.tool_timeout_secs == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "orchestrator.tool_timeout_secs".into(),
                message: "tool_timeout_secs must be greater than 0".into(),
            });
        }

        if self.coaching.timezone.parse::<chrono_tz::Tz>().is_err() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "coaching.timezone".into(),
                message: format!(
                    "unknown IANA timezone \"{}\"; UTC will be used",
                    self.coaching.timezone
                ),
            });
        }

        errors
    }
}
