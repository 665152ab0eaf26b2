//! OpenAI-compatible chat completion provider.
//!
//! Posts to `{base_url}/chat/completions` with bearer auth and maps HTTP
//! failures onto [`LlmError`] so the retry layer can tell transient errors
//! from permanent ones.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::LlmProviderConfig;
use crate::error::{LlmError, Result};
use crate::provider::ChatProvider;
use crate::types::{ChatRequest, ChatResponse};

/// Fallback wait when a 429 carries no hint.
const DEFAULT_RETRY_AFTER_MS: u64 = 1000;

pub struct OpenAiCompatProvider {
    config: LlmProviderConfig,
    http: reqwest::Client,
    api_key: Option<String>,
}

impl OpenAiCompatProvider {
    /// Provider that reads its key from `config.api_key_env` per request.
    pub fn new(config: LlmProviderConfig) -> Self {
        let http = build_client(&config);
        Self {
            config,
            http,
            api_key: None,
        }
    }

    /// Provider with an explicit key.
    pub fn with_api_key(config: LlmProviderConfig, api_key: String) -> Self {
        let http = build_client(&config);
        Self {
            config,
            http,
            api_key: Some(api_key),
        }
    }

    pub fn config(&self) -> &LlmProviderConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.config.api_key_env)
            .map_err(|_| LlmError::NotConfigured(format!("set {} env var", self.config.api_key_env)))
    }
}

fn build_client(config: &LlmProviderConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let api_key = self.resolve_api_key()?;

        debug!(
            provider = %self.config.name,
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let mut req = self
            .http
            .post(self.completions_url())
            .bearer_auth(api_key)
            .header("Content-Type", "application/json");
        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let response = req.json(request).send().await?;
        let status = response.status().as_u16();

        if !response.status().is_success() {
            let header_ms = retry_after_header_ms(&response);
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                401 | 403 => LlmError::AuthFailed(body),
                404 => LlmError::ModelNotFound(format!("model '{}': {body}", request.model)),
                429 => {
                    let retry_after_ms = header_ms
                        .or_else(|| retry_after_body_ms(&body))
                        .unwrap_or(DEFAULT_RETRY_AFTER_MS);
                    warn!(provider = %self.config.name, retry_after_ms, "rate limited");
                    LlmError::RateLimited { retry_after_ms }
                }
                _ => LlmError::Status { status, body },
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {e}")))?;

        debug!(
            provider = %self.config.name,
            model = %chat.model,
            choices = chat.choices.len(),
            "chat completion received"
        );
        Ok(chat)
    }
}

/// `Retry-After` in (possibly fractional) seconds.
fn retry_after_header_ms(response: &reqwest::Response) -> Option<u64> {
    let raw = response.headers().get("retry-after")?.to_str().ok()?;
    let secs: f64 = raw.trim().parse().ok()?;
    Some((secs * 1000.0).max(0.0) as u64)
}

/// `retry_after_ms` or `retry_after` (seconds) in a JSON error body.
fn retry_after_body_ms(body: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("retry_after_ms")
        .and_then(|v| v.as_u64())
        .or_else(|| {
            value
                .get("retry_after")
                .and_then(|v| v.as_f64())
                .map(|secs| (secs * 1000.0) as u64)
        })
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("name", &self.config.name)
            .field("base_url", &self.config.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}
