//! Conversation runtime: the streaming turn loop, cancellation, and
//! config loading.

pub mod cancel;
pub mod events;
pub mod turn;

// Re-exports for convenience.
pub use cancel::{CancelMap, CancelToken};
pub use events::TurnEvent;
pub use turn::{process_response, Orchestrator, TurnInput};

use std::path::Path;

use stride_domain::config::{Config, ConfigSeverity};
use stride_domain::{Error, Result};

/// Load a TOML config file and validate it.
///
/// Warnings are logged and tolerated; error-severity issues fail the load
/// so a misconfigured runtime never starts half-working.
pub fn load_config(path: &Path) -> Result<Config> {
    let raw = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&raw).map_err(|e| Error::Config(e.to_string()))?;

    let mut fatal = Vec::new();
    for issue in config.validate() {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!(%issue, "config issue"),
            ConfigSeverity::Error => fatal.push(issue.to_string()),
        }
    }
    if !fatal.is_empty() {
        return Err(Error::Config(fatal.join("; ")));
    }

    Ok(config)
}
