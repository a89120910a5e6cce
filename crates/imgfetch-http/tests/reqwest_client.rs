//! Tests for the reqwest adapter against a local mock server.

use std::time::Duration;

use futures_util::StreamExt;
use imgfetch_core::{HttpClientPort, HttpPortError};
use imgfetch_http::{HttpClientConfig, ReqwestHttpClient};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> ReqwestHttpClient {
    ReqwestHttpClient::new(&HttpClientConfig::new().with_user_agent("imgfetch-test"))
        .expect("client should build")
}

fn url_for(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{p}", server.uri())).expect("valid mock url")
}

#[tokio::test]
async fn head_reports_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/img"))
        .and(header("user-agent", "imgfetch-test"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = client()
        .head_metadata(&url_for(&server, "/img"))
        .await
        .expect("HEAD should succeed");

    assert_eq!(metadata.content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn head_without_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/bare"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let metadata = client()
        .head_metadata(&url_for(&server, "/bare"))
        .await
        .expect("HEAD should succeed");

    assert_eq!(metadata.content_type, None);
}

#[tokio::test]
async fn head_error_status_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = url_for(&server, "/missing");
    let err = client().head_metadata(&url).await.unwrap_err();

    assert_eq!(
        err,
        HttpPortError::Status {
            status: 404,
            url: url.to_string(),
        }
    );
}

#[tokio::test]
async fn stream_body_yields_full_body() {
    let server = MockServer::start().await;
    let body = vec![7u8; 64 * 1024];
    Mock::given(method("GET"))
        .and(path("/big.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let mut stream = client()
        .stream_body(&url_for(&server, "/big.jpg"))
        .await
        .expect("GET should succeed");

    let mut received = Vec::new();
    while let Some(chunk) = stream.next().await {
        received.extend_from_slice(&chunk.expect("chunk"));
    }
    assert_eq!(received, body);
}

#[tokio::test]
async fn stream_body_error_status_fails_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client().stream_body(&url_for(&server, "/gone.png")).await;

    assert!(matches!(result, Err(HttpPortError::Status { status: 500, .. })));
}

#[tokio::test]
async fn timeout_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = ReqwestHttpClient::new(
        &HttpClientConfig::new().with_timeout(Duration::from_millis(50)),
    )
    .expect("client should build");
    let err = client
        .head_metadata(&url_for(&server, "/slow"))
        .await
        .unwrap_err();

    assert!(matches!(err, HttpPortError::Network { .. }));
}
