//! Gateway and log source against a mock HTTP server.

use securelog_client::{
    ApiClient, CryptoGateway, HttpLogSource, LogSource, LogView, RequestOutcome,
};
use securelog_integration_tests::{init_test_tracing, test_config};
use securelog_test_utils::fixtures::{
    count_body, data_body, decrypted_data_body, detail_error_body, encrypted_data_body,
    error_field_body, legacy_log_list_body, log_list_body, sample_entries, validation_error_body,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(&test_config(&server.uri()).unwrap()).unwrap()
}

async fn respond(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_encrypt_sends_key_and_data() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/encrypt"))
        .and(body_json(json!({ "key": "k1", "data": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(data_body("cipher")))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = CryptoGateway::new(api(&server)).encrypt("k1", "hello").await;

    assert_eq!(outcome, RequestOutcome::success("cipher"));
}

#[tokio::test]
async fn test_detail_error_becomes_failure() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/api/v1/encrypt",
        ResponseTemplate::new(400).set_body_json(detail_error_body("bad key")),
    )
    .await;

    let outcome = CryptoGateway::new(api(&server)).encrypt("k", "d").await;

    assert_eq!(outcome, RequestOutcome::failure("bad key"));
}

#[tokio::test]
async fn test_legacy_encrypted_data_is_success() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/api/v1/encrypt",
        ResponseTemplate::new(200).set_body_json(encrypted_data_body("abc")),
    )
    .await;

    let outcome = CryptoGateway::new(api(&server)).encrypt("k", "d").await;

    assert_eq!(outcome, RequestOutcome::success("abc"));
}

#[tokio::test]
async fn test_legacy_decrypted_data_is_success() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/api/v1/decrypt",
        ResponseTemplate::new(200).set_body_json(decrypted_data_body("plain")),
    )
    .await;

    let outcome = CryptoGateway::new(api(&server)).decrypt("k", "c").await;

    assert_eq!(outcome, RequestOutcome::success("plain"));
}

#[tokio::test]
async fn test_error_field_and_validation_list() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/api/v1/encrypt",
        ResponseTemplate::new(500).set_body_json(error_field_body("Encryption failed")),
    )
    .await;
    respond(
        &server,
        "/api/v1/decrypt",
        ResponseTemplate::new(422).set_body_json(validation_error_body()),
    )
    .await;
    let gateway = CryptoGateway::new(api(&server));

    assert_eq!(
        gateway.encrypt("k", "d").await,
        RequestOutcome::failure("Encryption failed")
    );
    assert_eq!(
        gateway.decrypt("k", "d").await,
        RequestOutcome::failure("field required")
    );
}

#[tokio::test]
async fn test_plain_text_and_empty_error_bodies() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/api/v1/encrypt",
        ResponseTemplate::new(502).set_body_string("upstream connect error"),
    )
    .await;
    respond(&server, "/api/v1/decrypt", ResponseTemplate::new(503)).await;
    let gateway = CryptoGateway::new(api(&server));

    assert_eq!(
        gateway.encrypt("k", "d").await,
        RequestOutcome::failure("upstream connect error")
    );
    assert_eq!(
        gateway.decrypt("k", "d").await,
        RequestOutcome::failure("Server error: 503 Service Unavailable")
    );
}

#[tokio::test]
async fn test_unrecognized_success_body_is_failure() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/api/v1/encrypt",
        ResponseTemplate::new(200).set_body_json(json!({ "result": "x" })),
    )
    .await;

    let outcome = CryptoGateway::new(api(&server)).encrypt("k", "d").await;

    let RequestOutcome::Failure { message } = outcome else {
        panic!("expected failure");
    };
    assert!(message.starts_with("Unexpected response:"));
}

#[tokio::test]
async fn test_empty_fields_never_reach_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(data_body("x")))
        .expect(0)
        .mount(&server)
        .await;
    let gateway = CryptoGateway::new(api(&server));

    assert_eq!(
        gateway.encrypt("", "d").await,
        RequestOutcome::failure("Key and data are required")
    );
    assert_eq!(
        gateway.decrypt("k", "").await,
        RequestOutcome::failure("Key and data are required")
    );
}

#[tokio::test]
async fn test_unreachable_service_is_generic_failure() {
    let server = MockServer::start().await;
    let config = test_config(&server.uri()).unwrap();
    drop(server);

    let outcome = CryptoGateway::new(ApiClient::new(&config).unwrap())
        .encrypt("k", "d")
        .await;

    let RequestOutcome::Failure { message } = outcome else {
        panic!("expected failure");
    };
    assert!(!message.contains("127.0.0.1"));
}

#[tokio::test]
async fn test_log_source_passes_size_and_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/logs"))
        .and(query_param("size", "25"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(legacy_log_list_body(3)))
        .expect(1)
        .mount(&server)
        .await;

    let entries = HttpLogSource::new(api(&server)).fetch_logs(25, 50).await.unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2].id.as_str(), "2");
    assert_eq!(entries[0].ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_log_source_surfaces_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/logs"))
        .respond_with(ResponseTemplate::new(500).set_body_json(detail_error_body("db down")))
        .mount(&server)
        .await;

    let err = HttpLogSource::new(api(&server)).fetch_logs(25, 0).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "db down");
}

#[tokio::test]
async fn test_count_requires_numeric_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/logs/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": "17" })))
        .mount(&server)
        .await;

    assert!(HttpLogSource::new(api(&server)).count_logs().await.is_err());
}

#[tokio::test]
async fn test_count_endpoint_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/logs/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(count_body(17)))
        .mount(&server)
        .await;

    assert_eq!(HttpLogSource::new(api(&server)).count_logs().await.unwrap(), 17);
}

#[tokio::test]
async fn test_view_scans_when_count_endpoint_missing() {
    let server = MockServer::start().await;
    let entries = sample_entries(53);
    Mock::given(method("GET"))
        .and(path("/api/v1/logs/count"))
        .respond_with(ResponseTemplate::new(404).set_body_json(detail_error_body("Not Found")))
        .mount(&server)
        .await;
    for (offset, page) in [(0, &entries[0..25]), (25, &entries[25..50]), (50, &entries[50..])] {
        Mock::given(method("GET"))
            .and(path("/api/v1/logs"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(log_list_body(page)))
            .mount(&server)
            .await;
    }

    let config = test_config(&server.uri()).unwrap();
    let source = Arc::new(HttpLogSource::new(ApiClient::new(&config).unwrap()));
    let view = LogView::new(source, &config);
    view.refresh().await.unwrap();

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.total.value, Some(53));
    assert_eq!(snapshot.page.entries, entries[0..25].to_vec());
    assert_eq!(snapshot.banner, None);
}
