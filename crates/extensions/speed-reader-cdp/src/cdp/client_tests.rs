use super::*;

#[test]
fn test_required_str() {
    let value = json!({"sessionId": "S1", "count": 3});
    assert_eq!(required_str(&value, "sessionId").unwrap(), "S1");
    assert!(matches!(
        required_str(&value, "count"),
        Err(CdpError::InvalidResponse(_))
    ));
    assert!(required_str(&value, "targetId").is_err());
}

#[tokio::test]
async fn test_dispatch_routes_result_by_id() {
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (tx, rx) = oneshot::channel();
    pending.lock().insert(4, tx);

    let resp: CdpResponse =
        serde_json::from_str(r#"{"id": 4, "result": {"frameId": "F"}}"#).unwrap();
    CdpClient::dispatch(resp, &pending);

    let value = rx.await.unwrap().unwrap();
    assert_eq!(value["frameId"], "F");
    assert!(pending.lock().is_empty());
}

#[tokio::test]
async fn test_dispatch_routes_protocol_error() {
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (tx, rx) = oneshot::channel();
    pending.lock().insert(9, tx);

    let resp: CdpResponse = serde_json::from_str(
        r#"{"id": 9, "error": {"code": -32000, "message": "Target closed"}}"#,
    )
    .unwrap();
    CdpClient::dispatch(resp, &pending);

    match rx.await.unwrap() {
        Err(CdpError::Protocol { code, message }) => {
            assert_eq!(code, -32000);
            assert_eq!(message, "Target closed");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_dispatch_ignores_events_and_unknown_ids() {
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (tx, _rx) = oneshot::channel();
    pending.lock().insert(1, tx);

    let event: CdpResponse =
        serde_json::from_str(r#"{"method": "Page.loadEventFired", "params": {}}"#).unwrap();
    CdpClient::dispatch(event, &pending);
    let unknown: CdpResponse = serde_json::from_str(r#"{"id": 2, "result": {}}"#).unwrap();
    CdpClient::dispatch(unknown, &pending);

    assert_eq!(pending.lock().len(), 1);
}

#[tokio::test]
async fn test_connect_fails_without_chrome() {
    let err = CdpClient::connect("http://127.0.0.1:1", Duration::from_secs(1))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, CdpError::ChromeNotAvailable(_)));
}

type Reply = fn(&str) -> Result<Value, (i64, &'static str)>;

/// A DevTools endpoint that answers each command with `reply` and records
/// the method names it received.
async fn fake_devtools(reply: Reply) -> (wiremock::MockServer, Arc<Mutex<Vec<String>>>) {
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ws_url = format!("ws://{}/devtools/browser/test", listener.local_addr().unwrap());
    let received = Arc::new(Mutex::new(Vec::new()));

    let log = received.clone();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(Message::Text(text))) = ws.next().await {
            let request: Value = serde_json::from_str(&text).unwrap();
            let name = request["method"].as_str().unwrap_or_default().to_string();
            log.lock().push(name.clone());
            let body = match reply(&name) {
                Ok(result) => json!({"id": request["id"], "result": result}),
                Err((code, message)) => {
                    json!({"id": request["id"], "error": {"code": code, "message": message}})
                }
            };
            if ws.send(Message::text(body.to_string())).await.is_err() {
                break;
            }
        }
    });

    let http = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Browser": "HeadlessChrome/126.0.0.0",
            "Protocol-Version": "1.3",
            "User-Agent": "Mozilla/5.0",
            "webSocketDebuggerUrl": ws_url,
        })))
        .mount(&http)
        .await;

    (http, received)
}

fn page_replies(name: &str) -> Result<Value, (i64, &'static str)> {
    match name {
        "Target.createBrowserContext" => Ok(json!({"browserContextId": "C1"})),
        "Target.createTarget" => Ok(json!({"targetId": "T1"})),
        "Target.attachToTarget" => Ok(json!({"sessionId": "S1"})),
        _ => Ok(json!({})),
    }
}

#[tokio::test]
async fn test_isolated_page_lifecycle() {
    let (http, received) = fake_devtools(page_replies).await;
    let client = CdpClient::connect(&http.uri(), Duration::from_secs(2))
        .await
        .unwrap();

    let page = client.new_isolated_page().await.unwrap();
    assert_eq!(page.target_id(), "T1");
    assert_eq!(page.session_id(), "S1");
    assert_eq!(page.browser_context_id(), "C1");
    client.close_page(&page).await.unwrap();

    let received = received.lock().clone();
    assert_eq!(
        received,
        [
            "Target.createBrowserContext",
            "Target.createTarget",
            "Target.attachToTarget",
            "Page.enable",
            "Runtime.enable",
            "Target.closeTarget",
            "Target.disposeBrowserContext",
        ]
    );
}

#[tokio::test]
async fn test_close_page_disposes_context_when_target_is_gone() {
    let (http, received) = fake_devtools(|name| match name {
        "Target.closeTarget" => Err((-32000, "No target with given id")),
        _ => Ok(json!({})),
    })
    .await;
    let client = CdpClient::connect(&http.uri(), Duration::from_secs(2))
        .await
        .unwrap();
    let page = PageSession::new(
        "T9".to_string(),
        "S9".to_string(),
        "C9".to_string(),
        client.transport.clone(),
    );

    let err = client.close_page(&page).await.unwrap_err();
    assert!(matches!(err, CdpError::Protocol { code: -32000, .. }));
    assert_eq!(
        received.lock().last().map(String::as_str),
        Some("Target.disposeBrowserContext")
    );
}

#[tokio::test]
async fn test_failed_attach_disposes_new_context() {
    let (http, received) = fake_devtools(|name| match name {
        "Target.attachToTarget" => Err((-32000, "Target crashed")),
        other => page_replies(other),
    })
    .await;
    let client = CdpClient::connect(&http.uri(), Duration::from_secs(2))
        .await
        .unwrap();

    let err = client.new_isolated_page().await.err().unwrap();
    assert!(matches!(err, CdpError::Protocol { .. }));

    let received = received.lock().clone();
    assert_eq!(received.last().map(String::as_str), Some("Target.disposeBrowserContext"));
    assert!(!received.iter().any(|m| m == "Page.enable"));
}
