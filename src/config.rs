use serde::{Deserialize, Serialize};

/// Upload limits passed explicitly into the ingestion entry point so they are
/// testable and overridable per deployment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10_000_000,
            allowed_extensions: vec!["csv".to_string(), "xlsx".to_string(), "xls".to_string()],
        }
    }
}

/// Connection settings for the OpenAI-compatible chat-completions endpoint.
#[derive(Clone, Debug)]
pub struct ChatProviderConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
}

impl Default for ChatProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.x.ai/v1".to_string(),
            model: "grok-beta".to_string(),
            api_key: None,
            max_tokens: 200,
        }
    }
}

impl ChatProviderConfig {
    /// Read provider settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_or("PLOTPILOT_CHAT_BASE_URL", defaults.base_url),
            model: env_or("PLOTPILOT_CHAT_MODEL", defaults.model),
            api_key: std::env::var("PLOTPILOT_CHAT_API_KEY").ok(),
            max_tokens: std::env::var("PLOTPILOT_CHAT_MAX_TOKENS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_tokens),
        }
    }
}

/// Application configuration shared through the server state.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub upload: UploadConfig,
    pub chat: ChatProviderConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            upload: UploadConfig::default(),
            chat: ChatProviderConfig::from_env(),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_defaults() {
        let config = UploadConfig::default();
        assert_eq!(config.max_bytes, 10_000_000);
        assert_eq!(config.allowed_extensions, vec!["csv", "xlsx", "xls"]);
    }
}
