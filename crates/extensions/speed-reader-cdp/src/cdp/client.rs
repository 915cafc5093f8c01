//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::page::PageSession;
use super::protocol::{BrowserVersion, CdpRequest, CdpResponse};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, CdpError>>>>>;

/// Request/response plumbing shared by the client and its page sessions.
pub(crate) struct Transport {
    ws_tx: tokio::sync::Mutex<WsSink>,
    request_id: AtomicU64,
    pending: PendingMap,
    closed: Arc<AtomicBool>,
    call_timeout: Duration,
}

impl Transport {
    /// Send a command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CdpError::SessionClosed);
        }

        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(self.call_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout {
                    operation: method.to_string(),
                    after: self.call_timeout,
                })
            }
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Browser-level CDP connection.
///
/// One client is shared by all sessions; each session gets its own browser
/// context and page target.
pub struct CdpClient {
    browser_ws_url: String,
    transport: Arc<Transport>,
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given endpoint (e.g. "http://localhost:9222").
    pub async fn connect(endpoint: &str, call_timeout: Duration) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/');
        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let version: BrowserVersion = reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?;

        debug!("Connected to browser: {}", version.browser);

        let browser_ws_url = version.web_socket_debugger_url;
        let (ws_stream, _) = tokio_tungstenite::connect_async(browser_ws_url.as_str())
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let closed = Arc::new(AtomicBool::new(false));

        let recv_task = {
            let pending = pending.clone();
            let closed = closed.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending, closed).await;
            })
        };

        let transport = Arc::new(Transport {
            ws_tx: tokio::sync::Mutex::new(ws_sink),
            request_id: AtomicU64::new(1),
            pending,
            closed,
            call_timeout,
        });

        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            browser_ws_url,
            transport,
            recv_task,
        })
    }

    /// WebSocket receive loop. Fails every pending request when the socket ends.
    async fn receive_loop(mut ws_source: WsSource, pending: PendingMap, closed: Arc<AtomicBool>) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(resp) => Self::dispatch(resp, &pending),
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        closed.store(true, Ordering::SeqCst);
        for (_, tx) in pending.lock().drain() {
            let _ = tx.send(Err(CdpError::SessionClosed));
        }
    }

    /// Route a response to its waiting caller. Events are not consumed.
    fn dispatch(resp: CdpResponse, pending: &PendingMap) {
        let Some(id) = resp.id else {
            return;
        };
        let Some(tx) = pending.lock().remove(&id) else {
            return;
        };
        let result = match resp.error {
            Some(error) => Err(CdpError::Protocol {
                code: error.code,
                message: error.message,
            }),
            None => Ok(resp.result.unwrap_or(Value::Null)),
        };
        let _ = tx.send(result);
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.call(method, params, None).await
    }

    /// Get browser WebSocket URL.
    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    /// Whether the WebSocket has gone away.
    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    /// Open a blank page in a fresh browser context, so cookies and storage
    /// are never shared between sessions.
    ///
    /// The context is disposed again if any later step fails.
    pub async fn new_isolated_page(&self) -> Result<PageSession, CdpError> {
        let context = self
            .call("Target.createBrowserContext", Some(json!({"disposeOnDetach": true})))
            .await?;
        let browser_context_id = required_str(&context, "browserContextId")?;

        match self.open_page_in(&browser_context_id).await {
            Ok(page) => Ok(page),
            Err(e) => {
                if let Err(dispose) = self.dispose_context(&browser_context_id).await {
                    warn!("Failed to dispose context {}: {}", browser_context_id, dispose);
                }
                Err(e)
            }
        }
    }

    async fn open_page_in(&self, browser_context_id: &str) -> Result<PageSession, CdpError> {
        let target = self
            .call(
                "Target.createTarget",
                Some(json!({
                    "url": "about:blank",
                    "browserContextId": browser_context_id,
                })),
            )
            .await?;
        let target_id = required_str(&target, "targetId")?;

        let attached = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;
        let session_id = required_str(&attached, "sessionId")?;

        debug!("Created isolated page {} in context {}", target_id, browser_context_id);

        let page = PageSession::new(
            target_id,
            session_id,
            browser_context_id.to_string(),
            self.transport.clone(),
        );
        page.enable_domains().await?;
        Ok(page)
    }

    /// Close a page and dispose of its browser context.
    ///
    /// Disposal is attempted even when closing the target fails; the first
    /// error is returned.
    pub async fn close_page(&self, page: &PageSession) -> Result<(), CdpError> {
        let closed = self
            .call(
                "Target.closeTarget",
                Some(json!({"targetId": page.target_id()})),
            )
            .await;
        let disposed = self.dispose_context(page.browser_context_id()).await;
        closed.and(disposed)
    }

    async fn dispose_context(&self, browser_context_id: &str) -> Result<(), CdpError> {
        self.call(
            "Target.disposeBrowserContext",
            Some(json!({"browserContextId": browser_context_id})),
        )
        .await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}

fn required_str(value: &Value, field: &str) -> Result<String, CdpError> {
    value[field]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| CdpError::InvalidResponse(format!("Missing {}", field)))
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
