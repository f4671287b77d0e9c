//! Gemini driver against a mock HTTP server.

use grounded_qa::drivers::GeminiDriver;
use grounded_qa::{Error, ProviderErrorKind, QaClient};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const GENERATE_PATH: &str = "/models/gemini-2.0-flash:generateContent";

fn client_for(base_url: &str) -> QaClient {
    let driver = GeminiDriver::new(Some("test-key".to_string()), base_url, Duration::from_secs(5))
        .expect("driver should build");
    QaClient::builder()
        .driver(Arc::new(driver))
        .build()
        .expect("client should build")
}

fn candidate_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_successful_generate_content() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "maxOutputTokens": 2048
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body(r#"{"answers":["The grace period is thirty days."]}"#))
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let answers = client
        .answer("Grace period is thirty days.", &["What is the grace period?"])
        .await
        .unwrap();
    assert_eq!(answers, vec!["The grace period is thirty days."]);

    // Served from cache; the mock must still have been hit exactly once.
    client
        .answer("Grace period is thirty days.", &["What is the grace period?"])
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_resource_exhausted_is_quota() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", GENERATE_PATH)
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "error": {
                    "code": 429,
                    "message": "You exceeded your current quota.",
                    "status": "RESOURCE_EXHAUSTED"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server.url());
    let err = client.answer("Doc.", &["Q?"]).await.unwrap_err();
    assert_eq!(err.provider_kind(), Some(ProviderErrorKind::QuotaExhausted));
    match err {
        Error::Provider { status, message, .. } => {
            assert_eq!(status, Some(429));
            assert!(message.contains("quota"));
        }
        other => panic!("expected provider error, got {:?}", other),
    }
    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_bare_429_is_rate_limited() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", GENERATE_PATH)
        .with_status(429)
        .with_body("Too Many Requests")
        .create_async()
        .await;

    let err = client_for(&server.url())
        .answer("Doc.", &["Q?"])
        .await
        .unwrap_err();
    assert_eq!(err.provider_kind(), Some(ProviderErrorKind::RateLimited));
}

#[tokio::test]
async fn test_invalid_key_is_authentication() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", GENERATE_PATH)
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT",
                    "details": [{ "reason": "API_KEY_INVALID" }]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let err = client_for(&server.url())
        .answer("Doc.", &["Q?"])
        .await
        .unwrap_err();
    assert_eq!(err.provider_kind(), Some(ProviderErrorKind::Authentication));
}

#[tokio::test]
async fn test_unauthorized_status_is_authentication() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", GENERATE_PATH)
        .with_status(401)
        .with_body("")
        .create_async()
        .await;

    let err = client_for(&server.url())
        .answer("Doc.", &["Q?"])
        .await
        .unwrap_err();
    assert_eq!(err.provider_kind(), Some(ProviderErrorKind::Authentication));
}

#[tokio::test]
async fn test_server_error_is_other() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", GENERATE_PATH)
        .with_status(503)
        .with_body(r#"{"error":{"code":503,"message":"overloaded","status":"UNAVAILABLE"}}"#)
        .create_async()
        .await;

    let err = client_for(&server.url())
        .answer("Doc.", &["Q?"])
        .await
        .unwrap_err();
    assert_eq!(err.provider_kind(), Some(ProviderErrorKind::Other));
}

#[tokio::test]
async fn test_non_json_candidate_text_is_malformed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body("The grace period is thirty days."))
        .create_async()
        .await;

    let client = client_for(&server.url());
    let err = client.answer("Doc.", &["Q?"]).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }), "got {:?}", err);
    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_missing_key_is_not_configured() {
    let driver = GeminiDriver::new(None, "http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let err = QaClient::builder()
        .driver(Arc::new(driver))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::NotConfigured { .. }));
}
