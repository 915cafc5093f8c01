use super::*;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn request() -> VisualResolutionRequest {
    VisualResolutionRequest {
        url: "https://example.com/signup".to_string(),
        action_description: "Find the sign-up button and click it.".to_string(),
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_health_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "workers": 2})))
        .mount(&server)
        .await;

    assert!(HttpVisualResolver::local(server.uri()).is_available().await);
}

#[tokio::test]
async fn test_health_degraded_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "starting"})))
        .mount(&server)
        .await;

    assert!(!HttpVisualResolver::local(server.uri()).is_available().await);
}

#[tokio::test]
async fn test_health_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    assert!(!HttpVisualResolver::local(server.uri()).is_available().await);
}

#[tokio::test]
async fn test_health_unreachable() {
    let resolver = HttpVisualResolver::local("http://127.0.0.1:1")
        .with_health_timeout(Duration::from_millis(500));
    assert!(!resolver.is_available().await);
}

#[tokio::test]
async fn test_resolve_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task"))
        .and(body_json(json!({
            "task": "Find the sign-up button and click it.",
            "url": "https://example.com/signup",
            "record_video": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "output": "Clicked the Sign up button",
            "steps": 4,
            "transcript": ["looked", "clicked"],
            "videoUrl": "http://127.0.0.1:8000/videos/abc.webm",
            "scanId": "abc",
            "elementFound": true,
            "confidence": 0.9,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = HttpVisualResolver::local(server.uri()).with_record_video(false);
    let resolution = resolver.resolve(&request()).await.unwrap();
    assert!(resolution.success);
    assert!(resolution.element_found);
    assert_eq!(resolution.steps, 4);
    assert_eq!(resolution.action_taken.as_deref(), Some("Clicked the Sign up button"));
    assert_eq!(resolution.scan_id.as_deref(), Some("abc"));
    assert_eq!(
        resolution.recording_url.as_deref(),
        Some("http://127.0.0.1:8000/videos/abc.webm")
    );
    assert_eq!(resolution.transcript.len(), 2);
}

#[tokio::test]
async fn test_resolve_element_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "steps": 7,
            "transcript": [],
            "scanId": "def",
            "elementFound": false,
        })))
        .mount(&server)
        .await;

    let resolution = HttpVisualResolver::local(server.uri())
        .resolve(&request())
        .await
        .unwrap();
    assert!(resolution.success);
    assert!(!resolution.element_found);
}

#[tokio::test]
async fn test_resolve_reported_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "steps": 2,
            "transcript": [],
            "scanId": "ghi",
            "error": "Browser crashed while loading the page",
        })))
        .mount(&server)
        .await;

    let err = HttpVisualResolver::local(server.uri())
        .resolve(&request())
        .await
        .unwrap_err();
    match err {
        VisualResolutionError::Failed(reason) => {
            assert_eq!(reason, "Browser crashed while loading the page")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_resolve_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too many concurrent tasks"))
        .mount(&server)
        .await;

    let err = HttpVisualResolver::local(server.uri())
        .resolve(&request())
        .await
        .unwrap_err();
    match err {
        VisualResolutionError::Rejected { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("concurrent"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_resolve_invalid_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = HttpVisualResolver::local(server.uri())
        .resolve(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, VisualResolutionError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_resolve_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut req = request();
    req.timeout = Duration::from_millis(200);
    let err = HttpVisualResolver::local(server.uri())
        .resolve(&req)
        .await
        .unwrap_err();
    assert!(matches!(err, VisualResolutionError::Timeout(d) if d == Duration::from_millis(200)));
}

#[tokio::test]
async fn test_resolve_transport_error() {
    let err = HttpVisualResolver::local("http://127.0.0.1:1")
        .resolve(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, VisualResolutionError::Transport(_)));
}

#[tokio::test]
async fn test_remote_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "elementFound": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolution = HttpVisualResolver::remote(server.uri(), "secret-token")
        .resolve(&request())
        .await
        .unwrap();
    assert!(resolution.element_found);
}

#[tokio::test]
async fn test_local_sends_no_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(|req: &Request| {
            if req.headers.contains_key("authorization") {
                ResponseTemplate::new(401)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({"status": "ok"}))
            }
        })
        .mount(&server)
        .await;

    assert!(HttpVisualResolver::local(server.uri()).is_available().await);
}

#[test]
fn test_from_config_modes() {
    let mut config = Tier2Config::default();
    assert!(HttpVisualResolver::from_config(&config).is_none());

    config.mode = Tier2Mode::Local;
    config.endpoint = "http://localhost:9000/".to_string();
    let resolver = HttpVisualResolver::from_config(&config).unwrap();
    assert_eq!(resolver.id(), "visual-local");
    assert_eq!(resolver.endpoint(), "http://localhost:9000");
    assert!(resolver.api_key.is_none());

    config.mode = Tier2Mode::Remote;
    config.api_key = Some("k".to_string());
    let resolver = HttpVisualResolver::from_config(&config).unwrap();
    assert_eq!(resolver.id(), "visual-remote");
    assert_eq!(resolver.api_key.as_deref(), Some("k"));
}

#[test]
fn test_missing_element_found_follows_success() {
    let task: TaskResponse = serde_json::from_value(json!({"success": true})).unwrap();
    let resolution = task.into_resolution();
    assert!(resolution.element_found);
    assert_eq!(resolution.steps, 0);
}
