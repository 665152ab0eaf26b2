//! Chat completion client for intune's reply generation.
//!
//! - [`ChatProvider`] is the single-call completion interface
//! - [`OpenAiCompatProvider`] implements it over any OpenAI-compatible API
//! - [`RetryPolicy`] wraps a provider with backoff on transient failures
//! - [`LlmProviderConfig`] describes the endpoint and credentials
//!
//! ```rust,ignore
//! use intune_llm::{ChatMessage, ChatProvider, ChatRequest, LlmProviderConfig, OpenAiCompatProvider};
//!
//! let provider = OpenAiCompatProvider::new(LlmProviderConfig::openai());
//! let request = ChatRequest::new("gpt-4o", vec![ChatMessage::user("안녕하세요")]);
//! let reply = provider.complete(&request).await?.first_text();
//! ```

pub mod config;
pub mod error;
pub mod openai_compat;
pub mod provider;
pub mod retry;
pub mod types;

pub use config::LlmProviderConfig;
pub use error::{LlmError, Result};
pub use openai_compat::OpenAiCompatProvider;
pub use provider::ChatProvider;
pub use retry::{RetryConfig, RetryPolicy};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Usage};
