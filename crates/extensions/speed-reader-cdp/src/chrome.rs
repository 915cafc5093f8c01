//! Chrome discovery and launch.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{info, warn};

use agentrank_config::BrowserConfig;

use crate::cdp::CdpError;

const STARTUP_POLL_INTERVAL: Duration = Duration::from_millis(200);
const STARTUP_ATTEMPTS: u32 = 30;

/// Launch settings derived from `[browser]`.
#[derive(Debug, Clone)]
pub struct ChromeSettings {
    pub debug_port: u16,
    pub headless: bool,
    pub profile_dir: PathBuf,
    /// Launch Chrome when nothing listens on the debug port.
    pub launch: bool,
}

impl ChromeSettings {
    pub fn from_config(config: &BrowserConfig) -> Self {
        Self {
            debug_port: config.debug_port,
            headless: config.headless,
            profile_dir: config.profile_path(),
            launch: config.launch,
        }
    }

    /// CDP HTTP endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }
}

/// Makes sure a debuggable Chrome is listening, launching one if allowed.
///
/// A Chrome started here is killed when the launcher is dropped.
pub struct ChromeLauncher {
    settings: ChromeSettings,
    child: Mutex<Option<Child>>,
}

impl ChromeLauncher {
    pub fn new(settings: ChromeSettings) -> Self {
        Self {
            settings,
            child: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &ChromeSettings {
        &self.settings
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            let paths = [
                "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
                "/Applications/Chromium.app/Contents/MacOS/Chromium",
                "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
            ];
            for path in &paths {
                let p = PathBuf::from(path);
                if p.exists() {
                    return Some(p);
                }
            }
        }

        #[cfg(target_os = "linux")]
        {
            let paths = [
                "/usr/bin/google-chrome",
                "/usr/bin/google-chrome-stable",
                "/usr/bin/chromium",
                "/usr/bin/chromium-browser",
                "/snap/bin/chromium",
            ];
            for path in &paths {
                let p = PathBuf::from(path);
                if p.exists() {
                    return Some(p);
                }
            }
        }

        #[cfg(target_os = "windows")]
        {
            let paths = [
                r"C:\Program Files\Google\Chrome\Application\chrome.exe",
                r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            ];
            for path in &paths {
                let p = PathBuf::from(path);
                if p.exists() {
                    return Some(p);
                }
            }
        }

        None
    }

    /// Check if Chrome is answering on the debug port.
    pub async fn is_running(&self) -> bool {
        reqwest::get(format!("{}/json/version", self.settings.endpoint()))
            .await
            .is_ok_and(|r| r.status().is_success())
    }

    /// Return once Chrome is reachable, launching it if needed and allowed.
    pub async fn ensure_running(&self) -> Result<(), CdpError> {
        if self.is_running().await {
            return Ok(());
        }
        if !self.settings.launch {
            return Err(CdpError::ChromeNotAvailable(self.settings.endpoint()));
        }

        let mut child = self.child.lock().await;
        // Another session may have launched it while we waited for the lock.
        if child.is_some() && self.is_running().await {
            return Ok(());
        }

        info!(
            "Chrome not running on port {}, launching...",
            self.settings.debug_port
        );
        *child = Some(self.launch()?);

        for _ in 0..STARTUP_ATTEMPTS {
            tokio::time::sleep(STARTUP_POLL_INTERVAL).await;
            if self.is_running().await {
                return Ok(());
            }
        }

        Err(CdpError::LaunchFailed(
            "Chrome failed to start within timeout".to_string(),
        ))
    }

    fn launch(&self) -> Result<Child, CdpError> {
        let chrome_path = Self::find_chrome().ok_or(CdpError::ChromeNotFound)?;
        let profile_dir = &self.settings.profile_dir;

        if let Err(e) = std::fs::create_dir_all(profile_dir) {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let mut cmd = Command::new(&chrome_path);
        cmd.args(Self::launch_args(&self.settings))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| CdpError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }

    fn launch_args(settings: &ChromeSettings) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", settings.debug_port),
            format!("--user-data-dir={}", settings.profile_dir.display()),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
            "--metrics-recording-only".to_string(),
        ];
        if settings.headless {
            args.push("--headless=new".to_string());
        }
        args
    }

    /// Kill Chrome if this launcher started it.
    pub async fn shutdown(&self) {
        if let Some(mut child) = self.child.lock().await.take() {
            info!("Shutting down Chrome...");
            let _ = child.kill().await;
        }
    }
}
