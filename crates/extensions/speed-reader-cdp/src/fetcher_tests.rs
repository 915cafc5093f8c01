use super::*;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpDirectiveFetcher {
    HttpDirectiveFetcher::new(&FetchConfig {
        timeout_seconds: 2,
        user_agent: "AgentRank-Test/1.0".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .and(header("user-agent", "AgentRank-Test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /\n"))
        .mount(&server)
        .await;

    let body = fetcher()
        .fetch_optional(&format!("{}/robots.txt", server.uri()))
        .await;
    assert_eq!(body.as_deref(), Some("User-agent: *\nAllow: /\n"));
}

#[tokio::test]
async fn test_fetch_not_found_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ai.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let body = fetcher()
        .fetch_optional(&format!("{}/ai.txt", server.uri()))
        .await;
    assert!(body.is_none());
}

#[tokio::test]
async fn test_fetch_server_error_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(fetcher().fetch_optional(&server.uri()).await.is_none());
}

#[tokio::test]
async fn test_fetch_non_utf8_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0x00, 0xc3]))
        .mount(&server)
        .await;

    assert!(fetcher().fetch_optional(&server.uri()).await.is_none());
}

#[tokio::test]
async fn test_fetch_connection_refused_is_absent() {
    assert!(fetcher()
        .fetch_optional("http://127.0.0.1:1/robots.txt")
        .await
        .is_none());
}
