//! Chrome DevTools Protocol backend for the AgentRank Speed Reader.
//!
//! Provides [`CdpCapability`], which opens one isolated browser context
//! per audit, plus the HTTP fetcher used for directive files.

pub mod capability;
pub mod cdp;
pub mod chrome;
pub mod fetcher;
pub mod probe;

pub use capability::{CdpCapability, CdpSession};
pub use cdp::{CdpClient, CdpError, PageSession};
pub use chrome::{ChromeLauncher, ChromeSettings};
pub use fetcher::HttpDirectiveFetcher;
pub use probe::{ProbeResult, probe_expression};
