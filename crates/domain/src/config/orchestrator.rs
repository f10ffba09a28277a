use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Orchestrator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Turn-loop bounds for the response orchestrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum model completions per user turn. When the bound is hit the
    /// turn stops with a distinct "max turns reached" status instead of
    /// requesting another follow-up.
    #[serde(default = "d_max_turns")]
    pub max_turns: usize,
    /// Per-handler execution budget; a handler exceeding it produces a
    /// failed result, same as any other handler failure.
    #[serde(default = "d_tool_timeout")]
    pub tool_timeout_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_turns: d_max_turns(),
            tool_timeout_secs: d_tool_timeout(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_max_turns() -> usize {
    6
}
fn d_tool_timeout() -> u64 {
    30
}
