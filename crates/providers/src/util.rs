//! Shared plumbing for provider adapters.

use stride_domain::config::AuthConfig;
use stride_domain::error::Error;

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

/// Resolve the API key for a provider, if one is configured.
///
/// Precedence: inline `key` field (warns), then the configured environment
/// variable. `None` means requests go out unauthenticated, which is what
/// local backends like Ollama expect.
pub(crate) fn resolve_api_key(auth: &AuthConfig) -> Option<String> {
    if let Some(ref key) = auth.key {
        tracing::warn!("API key read from inline config; prefer the env lookup");
        return Some(key.clone());
    }
    match std::env::var(&auth.env) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => {
            tracing::debug!(env = %auth.env, "no API key found, sending unauthenticated");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_key_takes_precedence() {
        let var = "STRIDE_TEST_PRECEDENCE_KEY";
        std::env::set_var(var, "env-loses");
        let auth = AuthConfig {
            key: Some("inline-wins".into()),
            env: var.into(),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).as_deref(), Some("inline-wins"));
        std::env::remove_var(var);
    }

    #[test]
    fn env_var_is_read_when_no_inline_key() {
        let var = "STRIDE_TEST_ENV_KEY_5150";
        std::env::set_var(var, "env-secret");
        let auth = AuthConfig {
            env: var.into(),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).as_deref(), Some("env-secret"));
        std::env::remove_var(var);
    }

    #[test]
    fn missing_key_resolves_to_unauthenticated() {
        let auth = AuthConfig {
            env: "STRIDE_TEST_UNSET_VAR_5150".into(),
            ..Default::default()
        };
        assert!(resolve_api_key(&auth).is_none());
    }
}
