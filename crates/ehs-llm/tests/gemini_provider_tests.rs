//! Integration tests for GeminiProvider against a scripted HTTP endpoint

use ehs_llm::{GeminiProvider, GenerationProvider, GenerationRequest, MediaPart, ModelInvocationError};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/gemini-test:generateContent";

fn provider_for(server: &MockServer) -> GeminiProvider {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build HTTP client");

    GeminiProvider::new("test-key")
        .with_base_url(server.uri())
        .with_model("gemini-test")
        .with_http_client(client)
}

fn candidate(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_structured_output_is_parsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate(r#"{"analysis": "Forklift near pedestrian"}"#)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = GenerationRequest::text("Analyze the video.")
        .with_media(MediaPart::new("data:video/mp4;base64,AAAAIGZ0eXA="))
        .with_output_schema(json!({"type": "OBJECT"}));

    let response = provider_for(&mock_server)
        .generate(request)
        .await
        .expect("generate");

    assert_eq!(
        response.output,
        Some(json!({"analysis": "Forklift near pedestrian"}))
    );
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));

    let received = mock_server.received_requests().await.expect("recorded requests");
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).expect("json body");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Analyze the video.");
    assert_eq!(
        body["contents"][0]["parts"][1]["inlineData"]["mimeType"],
        "video/mp4"
    );
    assert_eq!(
        body["generationConfig"]["responseMimeType"],
        "application/json"
    );
}

#[tokio::test]
async fn test_plain_text_request_leaves_output_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("A worker lifts a box.")))
        .mount(&mock_server)
        .await;

    let response = provider_for(&mock_server)
        .generate(GenerationRequest::text("Summarize."))
        .await
        .expect("generate");

    assert_eq!(response.text.as_deref(), Some("A worker lifts a box."));
    assert!(response.output.is_none());
}

#[tokio::test]
async fn test_unparseable_structured_output_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("I cannot help with that.")))
        .mount(&mock_server)
        .await;

    let response = provider_for(&mock_server)
        .generate(GenerationRequest::text("Analyze.").with_output_schema(json!({"type": "OBJECT"})))
        .await
        .expect("generate");

    assert_eq!(response.text.as_deref(), Some("I cannot help with that."));
    assert!(response.output.is_none());
}

#[tokio::test]
async fn test_auth_failure_maps_to_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&mock_server)
        .await;

    let result = provider_for(&mock_server)
        .generate(GenerationRequest::text("hello"))
        .await;

    match result {
        Err(ModelInvocationError::Auth(message)) => assert!(message.contains("API key not valid")),
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = provider_for(&mock_server)
        .generate(GenerationRequest::text("hello"))
        .await;

    assert!(matches!(result, Err(ModelInvocationError::Api(_))));
}

#[tokio::test]
async fn test_malformed_media_fails_before_sending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("{}")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = provider_for(&mock_server)
        .generate(GenerationRequest::text("hello").with_media(MediaPart::new("video.mp4")))
        .await;

    assert!(matches!(result, Err(ModelInvocationError::Protocol(_))));
}

#[tokio::test]
async fn test_transport_error_does_not_leak_api_key() {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build HTTP client");
    // Nothing listens on port 1, so the request fails before any response.
    let provider = GeminiProvider::new("SECRET-KEY-123")
        .with_base_url("http://127.0.0.1:1")
        .with_model("gemini-test")
        .with_http_client(client);

    let error = provider
        .generate(GenerationRequest::text("Analyze the video."))
        .await
        .unwrap_err();

    assert!(matches!(error, ModelInvocationError::Http(_)));
    let rendered = format!("{}: {}", "Failed to analyze video.", error);
    assert!(!rendered.contains("SECRET-KEY-123"), "{rendered}");
    assert!(!format!("{error:?}").contains("SECRET-KEY-123"));
}

#[tokio::test]
async fn test_api_key_is_sent_in_header_not_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    provider_for(&mock_server)
        .generate(GenerationRequest::text("ping"))
        .await
        .expect("generate");

    let requests = mock_server.received_requests().await.expect("recorded requests");
    assert_eq!(requests[0].url.query(), None);
}
