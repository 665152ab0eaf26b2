//! Mock HTTP server tests for `OpenAiCompatProvider::complete()` and the
//! retry wrapper.
//!
//! Coverage:
//! - Successful completion
//! - 401, 404 and 429 mapping
//! - 5xx mapping and retry until success
//! - Malformed JSON body
//! - Custom headers forwarded

use std::time::Duration;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use intune_llm::{
    ChatMessage, ChatProvider, ChatRequest, LlmError, LlmProviderConfig, OpenAiCompatProvider,
    RetryConfig, RetryPolicy,
};

fn provider(server: &MockServer) -> OpenAiCompatProvider {
    let config = LlmProviderConfig::custom("mock", server.uri(), "MOCK_UNUSED_KEY");
    OpenAiCompatProvider::with_api_key(config, "sk-mock".into())
}

fn request() -> ChatRequest {
    ChatRequest::new(
        "gpt-4o",
        vec![
            ChatMessage::system("You are a compassionate assistant."),
            ChatMessage::user("요즘 잠을 못 자요"),
        ],
    )
    .with_max_tokens(500)
    .with_temperature(0.7)
}

fn completion(text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 20, "completion_tokens": 12, "total_tokens": 32 }
    })
}

#[tokio::test]
async fn complete_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-mock"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o",
            "max_tokens": 500
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("많이 지치셨겠어요.")))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server).complete(&request()).await.unwrap();
    assert_eq!(response.first_text(), Some("많이 지치셨겠어요."));
    assert_eq!(response.usage.unwrap().total_tokens, 32);
}

#[tokio::test]
async fn unauthorized_maps_to_auth_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(err, LlmError::AuthFailed(ref b) if b == "invalid api key"));
}

#[tokio::test]
async fn not_found_maps_to_model_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such model"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(err, LlmError::ModelNotFound(ref m) if m.contains("gpt-4o")));
}

#[tokio::test]
async fn rate_limit_reads_retry_after_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "2"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(err, LlmError::RateLimited { retry_after_ms: 2000 }));
}

#[tokio::test]
async fn rate_limit_reads_body_hint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(serde_json::json!({ "retry_after_ms": 750 })),
        )
        .mount(&server)
        .await;

    let err = provider(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(err, LlmError::RateLimited { retry_after_ms: 750 }));
}

#[tokio::test]
async fn server_error_is_transient_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Status { status: 500, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse(_)));
}

#[tokio::test]
async fn custom_headers_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("x-request-source", "intune"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("네.")))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = LlmProviderConfig::custom("mock", server.uri(), "UNUSED");
    config
        .headers
        .insert("x-request-source".into(), "intune".into());
    let provider = OpenAiCompatProvider::with_api_key(config, "k".into());
    assert!(provider.complete(&request()).await.is_ok());
}

#[tokio::test]
async fn retry_recovers_from_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("다시 시도했어요.")))
        .expect(1)
        .mount(&server)
        .await;

    let policy = RetryPolicy::new(
        provider(&server),
        RetryConfig {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            jitter_fraction: 0.0,
        },
    );
    let response = policy.complete(&request()).await.unwrap();
    assert_eq!(response.first_text(), Some("다시 시도했어요."));
}
