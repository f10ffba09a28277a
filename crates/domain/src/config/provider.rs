use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completion provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// OpenAI-compatible streaming completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "d_base_url")]
    pub base_url: String,
    #[serde(default = "d_model")]
    pub model: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default = "d_temperature")]
    pub temperature: f32,
    /// Optional completion cap; None lets the provider decide.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            model: d_model(),
            auth: AuthConfig::default(),
            temperature: d_temperature(),
            max_tokens: None,
        }
    }
}

/// How requests authenticate against the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Header name (e.g. "Authorization", "x-api-key").
    #[serde(default = "d_auth_header")]
    pub header: String,
    /// Header value prefix (e.g. "Bearer ").
    #[serde(default = "d_auth_prefix")]
    pub prefix: String,
    /// Env var containing the key.
    #[serde(default = "d_auth_env")]
    pub env: String,
    /// Direct key (for config-only setups; prefer `env`).
    #[serde(default)]
    pub key: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header: d_auth_header(),
            prefix: d_auth_prefix(),
            env: d_auth_env(),
            key: None,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn d_model() -> String {
    "gpt-4o-mini".into()
}
fn d_temperature() -> f32 {
    0.2
}
fn d_auth_header() -> String {
    "Authorization".into()
}
fn d_auth_prefix() -> String {
    "Bearer ".into()
}
fn d_auth_env() -> String {
    "STRIDE_API_KEY".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_openai() {
        let cfg = ProviderConfig::default();
        assert_eq!(cfg.base_url, "https://api.openai.com/v1");
        assert_eq!(cfg.auth.header, "Authorization");
        assert_eq!(cfg.auth.prefix, "Bearer ");
        assert!(cfg.auth.key.is_none());
        assert!(cfg.max_tokens.is_none());
    }

    #[test]
    fn partial_auth_section_keeps_other_defaults() {
        let cfg: ProviderConfig = serde_json::from_str(
            r#"{ "auth": { "header": "x-api-key", "prefix": "" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.auth.header, "x-api-key");
        assert_eq!(cfg.auth.prefix, "");
        assert_eq!(cfg.auth.env, "STRIDE_API_KEY");
    }
}
