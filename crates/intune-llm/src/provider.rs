//! The [`ChatProvider`] trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatRequest, ChatResponse};

/// Something that can answer a chat completion request.
///
/// Implemented by [`OpenAiCompatProvider`](crate::OpenAiCompatProvider) and
/// by [`RetryPolicy`](crate::RetryPolicy), which wraps another provider.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Execute one completion request.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse>;
}
