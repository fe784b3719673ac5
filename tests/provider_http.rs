//! Provider tests against a local mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use resume_match_pipeline::domain::llm::{GenerationRequest, LlmProvider};
use resume_match_pipeline::infrastructure::llm::{
    GeminiProvider, HttpClient, OpenAiProvider, ResilientLlmClient, RetryConfig,
};
use resume_match_pipeline::PipelineError;

fn gemini_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
}

fn openai_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn gemini_generate_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"parts": [{"text": "optimize this"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("suggestions")))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        GeminiProvider::with_base_url(HttpClient::new(), "test-key", "gemini-1.5-flash", server.uri());

    let response = provider
        .generate(&GenerationRequest::new("optimize this"))
        .await
        .unwrap();

    assert_eq!(response.text, "suggestions");
    assert_eq!(response.model, "gemini-1.5-flash");
}

#[tokio::test]
async fn openai_generate_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_body("rewritten")))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        OpenAiProvider::with_base_url(HttpClient::new(), "test-key", "gpt-4o-mini", server.uri());

    let response = provider
        .generate(&GenerationRequest::new("optimize this"))
        .await
        .unwrap();

    assert_eq!(response.text, "rewritten");
}

#[tokio::test]
async fn rate_limit_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let provider =
        GeminiProvider::with_base_url(HttpClient::new(), "test-key", "gemini-1.5-flash", server.uri());

    let err = provider
        .generate(&GenerationRequest::new("p"))
        .await
        .unwrap_err();

    assert!(err.is_retryable());
}

#[tokio::test]
async fn bad_request_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad prompt"))
        .mount(&server)
        .await;

    let provider =
        GeminiProvider::with_base_url(HttpClient::new(), "test-key", "gemini-1.5-flash", server.uri());

    let err = provider
        .generate(&GenerationRequest::new("p"))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Fatal { .. }));
}

#[tokio::test]
async fn resilient_client_recovers_from_server_errors() {
    let server = MockServer::start().await;

    // Two failures, then success. Mounted mocks are tried in order once
    // earlier ones exhaust their budget.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(GeminiProvider::with_base_url(
        HttpClient::new(),
        "test-key",
        "gemini-1.5-flash",
        server.uri(),
    ));
    let client = ResilientLlmClient::new(
        provider,
        RetryConfig::new(3)
            .with_backoff_factor(0.0)
            .with_request_timeout(Duration::from_secs(5)),
    );

    let response = client.generate(&GenerationRequest::new("p")).await.unwrap();
    assert_eq!(response.text, "recovered");
}

#[tokio::test]
async fn resilient_client_exhausts_retries_on_persistent_outage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .expect(4)
        .mount(&server)
        .await;

    let provider = Arc::new(GeminiProvider::with_base_url(
        HttpClient::new(),
        "test-key",
        "gemini-1.5-flash",
        server.uri(),
    ));
    let client = ResilientLlmClient::new(
        provider,
        RetryConfig::new(3)
            .with_backoff_factor(0.0)
            .with_request_timeout(Duration::from_secs(5)),
    );

    let err = client
        .generate(&GenerationRequest::new("p"))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}
