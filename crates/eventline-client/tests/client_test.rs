use std::sync::Arc;

use mockito::Matcher;
use reqwest::StatusCode;
use serde_json::json;

use eventline_client::{
    PrintEventsProcessor, ShutdownFlag, StreamConfig, StreamingClient, StreamingError,
    Subscription,
};

const API_KEY: &str = "key-123";

fn test_client(base_url: &str) -> StreamingClient {
    StreamingClient::builder()
        .config(StreamConfig::new(base_url))
        .processor(Arc::new(PrintEventsProcessor))
        .monitor(Arc::new(ShutdownFlag::new()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_create_subscription_returns_canonical_representation() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/v1/subscriptions")
        .match_header("apikey", API_KEY)
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "event_types": ["orders.placed"],
            "consumer_group": "billing"
        })))
        .with_status(201)
        .with_body(
            json!({
                "id": "sub-42",
                "event_types": ["orders.placed"],
                "consumer_group": "billing"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = test_client(&server.url());
    let definition = Subscription::new(vec!["orders.placed"]).with_consumer_group("billing");

    let created = client
        .create_subscription(&definition, API_KEY)
        .await
        .unwrap();

    assert_eq!(created.id.as_deref(), Some("sub-42"));
    assert_eq!(created.event_types, vec!["orders.placed"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_subscription_rejection_carries_raw_body() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/v1/subscriptions")
        .with_status(422)
        .with_body(r#"{"detail": "unknown event type"}"#)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let definition = Subscription::new(vec!["no.such.type"]);

    let err = client
        .create_subscription(&definition, API_KEY)
        .await
        .unwrap_err();

    match err {
        StreamingError::SubscriptionRejected { status, body } => {
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert!(body.contains("unknown event type"));
        }
        other => panic!("Expected SubscriptionRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_subscription_passes_response_through_raw() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("DELETE", "/api/v1/subscriptions/sub-42")
        .match_header("apikey", API_KEY)
        .with_status(404)
        .with_body(r#"{"detail": "subscription not found"}"#)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let response = client.delete_subscription("sub-42", API_KEY).await.unwrap();

    // No interpretation: status and body come back untouched.
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("subscription not found"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_subscription_success() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("DELETE", "/api/v1/subscriptions/sub-42")
        .with_status(204)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let response = client.delete_subscription("sub-42", API_KEY).await.unwrap();

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());
}

#[test]
fn test_builder_missing_config() {
    let result = StreamingClient::builder()
        .processor(Arc::new(PrintEventsProcessor))
        .monitor(Arc::new(ShutdownFlag::new()))
        .build();

    assert!(result.is_err());
    let err_msg = result.err().unwrap().to_string();
    assert!(err_msg.contains("config"));
}

#[test]
fn test_builder_missing_processor() {
    let result = StreamingClient::builder()
        .config(StreamConfig::new("http://localhost:8080"))
        .monitor(Arc::new(ShutdownFlag::new()))
        .build();

    assert!(result.is_err());
    let err_msg = result.err().unwrap().to_string();
    assert!(err_msg.contains("processor"));
}

#[test]
fn test_builder_missing_monitor() {
    let result = StreamingClient::builder()
        .config(StreamConfig::new("http://localhost:8080"))
        .processor(Arc::new(PrintEventsProcessor))
        .build();

    assert!(result.is_err());
    let err_msg = result.err().unwrap().to_string();
    assert!(err_msg.contains("monitor"));
}
