use std::time::Duration;

use assert_matches::assert_matches;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_backend::{BackendClient, BackendError};
use shared_config::AppConfig;

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

fn client_for(server: &MockServer) -> BackendClient {
    let mut config = AppConfig::with_backend_url(server.uri());
    config.retry_backoff_ms = 1;
    config.request_timeout_secs = 2;
    BackendClient::new(&config)
}

#[tokio::test]
async fn test_get_retries_once_after_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctor-schedule"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/doctor-schedule"))
        .and(query_param("doctorId", "doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let created: Created = client
        .get_json("/doctor-schedule", &[("doctorId", "doc-1")])
        .await
        .expect("second attempt should succeed");

    assert_eq!(created.id, "ok");
}

#[tokio::test]
async fn test_get_gives_up_after_second_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctor-schedule"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.get_json::<Created>("/doctor-schedule", &[]).await;

    assert_matches!(
        result,
        Err(BackendError::Status { status, ref message })
            if status == StatusCode::INTERNAL_SERVER_ERROR && message == "db down"
    );
}

#[tokio::test]
async fn test_get_retries_once_after_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctor-schedule"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "late"}))
                .set_delay(Duration::from_millis(1500)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = AppConfig::with_backend_url(mock_server.uri());
    config.retry_backoff_ms = 1;
    config.request_timeout_secs = 1;
    let client = BackendClient::new(&config);

    let result = client.get_json::<Created>("/doctor-schedule", &[]).await;

    assert_matches!(result, Err(BackendError::Timeout { ref url }) if url.ends_with("/doctor-schedule"));
}

#[tokio::test]
async fn test_get_does_not_retry_client_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctor-schedule"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.get_json::<Created>("/doctor-schedule", &[]).await;

    assert_matches!(result, Err(BackendError::Status { status, .. }) if status == StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_is_never_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/appointment"))
        .and(body_json(json!({"doctorId": "doc-1"})))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .post_json::<Created, _>("/appointment", Some(&json!({"doctorId": "doc-1"})))
        .await;

    assert_matches!(result, Err(BackendError::Status { status, .. }) if status == StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_post_unwraps_data_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/appointment"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "message": "Appointment created",
            "data": {"id": "appt-9"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let created: Created = client
        .post_json("/appointment", Some(&json!({})))
        .await
        .expect("post should succeed");

    assert_eq!(created.id, "appt-9");
}

#[tokio::test]
async fn test_undecodable_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctor-schedule"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.get_json::<Created>("/doctor-schedule", &[]).await;

    assert_matches!(result, Err(BackendError::Decode(_)));
}

#[tokio::test]
async fn test_unconfigured_client_fails_fast() {
    let client = BackendClient::new(&AppConfig::default());
    let result = client.get_json::<Created>("/doctor-schedule", &[]).await;

    assert_matches!(result, Err(BackendError::NotConfigured));
}
