//! Integration tests for the Gemini client against a mocked HTTP server.

use std::time::Duration;

use pushcode::config::GeminiConfig;
use pushcode::error::GenerationError;
use pushcode::llm::{GeminiClient, TextGenerator};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-1.5-flash";
const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

/// Helper to create a client pointing to a mock server.
fn mock_client(server: &MockServer, timeout: Duration) -> GeminiClient {
    let config = GeminiConfig {
        api_key: "test-key".to_string(),
        model: MODEL.to_string(),
        base_url: server.uri(),
        timeout,
    };
    GeminiClient::new(config).expect("Failed to build client")
}

fn text_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_generate_returns_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "describe +add(x,y)" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("feat: add adder")))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server, Duration::from_secs(5));
    let text = client.generate("describe +add(x,y)").await.unwrap();

    assert_eq!(text, "feat: add adder");
}

#[tokio::test]
async fn test_generate_joins_multiple_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "feat: add adder\n\n" }, { "text": "Handles overflow." }] }
            }]
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server, Duration::from_secs(5));
    let text = client.generate("prompt").await.unwrap();

    assert_eq!(text, "feat: add adder\n\nHandles overflow.");
}

#[tokio::test]
async fn test_http_error_uses_service_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server, Duration::from_secs(5));
    let err = client.generate("prompt").await.unwrap_err();

    match err {
        GenerationError::HttpError { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("API key not valid"));
            assert!(message.contains("INVALID_ARGUMENT"));
        }
        other => panic!("Expected HttpError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_with_plain_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = mock_client(&server, Duration::from_secs(5));
    let err = client.generate("prompt").await.unwrap_err();

    assert!(matches!(
        err,
        GenerationError::HttpError { status: 503, ref message } if message == "upstream unavailable"
    ));
}

#[tokio::test]
async fn test_blocked_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server, Duration::from_secs(5));
    let err = client.generate("prompt").await.unwrap_err();

    assert!(matches!(err, GenerationError::Blocked(reason) if reason == "SAFETY"));
}

#[tokio::test]
async fn test_empty_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("   ")))
        .mount(&server)
        .await;

    let client = mock_client(&server, Duration::from_secs(5));
    let err = client.generate("prompt").await.unwrap_err();

    assert!(matches!(err, GenerationError::EmptyResponse));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = mock_client(&server, Duration::from_secs(5));
    let err = client.generate("prompt").await.unwrap_err();

    assert!(matches!(err, GenerationError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_response("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = mock_client(&server, Duration::from_millis(200));
    let err = client.generate("prompt").await.unwrap_err();

    assert!(matches!(err, GenerationError::Timeout(_)));
}
