//! Endpoint configuration for a chat completion provider.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How to reach one OpenAI-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmProviderConfig {
    /// Name used in logs.
    pub name: String,

    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Per-request timeout in seconds. `None` means 30.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl LlmProviderConfig {
    /// The public OpenAI endpoint keyed by `OPENAI_API_KEY`.
    pub fn openai() -> Self {
        Self::custom("openai", "https://api.openai.com/v1", "OPENAI_API_KEY")
    }

    pub fn custom(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key_env: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key_env: api_key_env.into(),
            headers: HashMap::new(),
            timeout_secs: None,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_defaults() {
        let cfg = LlmProviderConfig::openai();
        assert_eq!(cfg.name, "openai");
        assert_eq!(cfg.base_url, "https://api.openai.com/v1");
        assert_eq!(cfg.api_key_env, "OPENAI_API_KEY");
        assert_eq!(cfg.timeout().as_secs(), 30);
    }

    #[test]
    fn timeout_override() {
        let cfg = LlmProviderConfig::openai().with_timeout_secs(5);
        assert_eq!(cfg.timeout().as_secs(), 5);
    }

    #[test]
    fn deserialize_minimal() {
        let json = r#"{"name": "local", "base_url": "http://localhost:8080/v1", "api_key_env": "LOCAL_KEY"}"#;
        let cfg: LlmProviderConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.headers.is_empty());
        assert!(cfg.timeout_secs.is_none());
    }
}
