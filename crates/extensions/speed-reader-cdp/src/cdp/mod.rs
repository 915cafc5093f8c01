//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to Chrome/Chromium via WebSocket and speaks the CDP JSON-RPC
//! protocol. Chrome must be listening with `--remote-debugging-port`.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222", Duration::from_secs(30)).await?;
//! let page = client.new_isolated_page().await?;
//! page.navigate("https://example.com", Duration::from_secs(20)).await?;
//! ```

mod client;
mod error;
mod page;
mod protocol;

pub use client::CdpClient;
pub use error::CdpError;
pub use page::PageSession;
pub use protocol::*;
