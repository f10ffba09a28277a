use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Coaching capabilities
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Settings shared by the date-sensitive coaching capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachingConfig {
    /// IANA timezone the user lives in; "today" and "tomorrow" resolve
    /// against this zone. Unknown names fall back to UTC.
    #[serde(default = "d_timezone")]
    pub timezone: String,
}

impl Default for CoachingConfig {
    fn default() -> Self {
        Self {
            timezone: d_timezone(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_timezone() -> String {
    "UTC".into()
}
