//! Wire types of the visual resolver service.

use serde::{Deserialize, Serialize};

use agentrank_protocols::VisualResolution;

/// `POST /task` body.
#[derive(Debug, Serialize)]
pub struct TaskRequest<'a> {
    pub task: &'a str,
    pub url: &'a str,
    pub record_video: bool,
}

/// `POST /task` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub success: bool,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub steps: u32,
    #[serde(default)]
    pub transcript: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub scan_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub element_found: Option<bool>,
    #[serde(default)]
    pub action_taken: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl TaskResponse {
    /// Convert a successful response. A missing `elementFound` follows `success`.
    pub fn into_resolution(self) -> VisualResolution {
        VisualResolution {
            success: self.success,
            element_found: self.element_found.unwrap_or(self.success),
            action_taken: self.action_taken.or(self.output),
            steps: self.steps,
            transcript: self.transcript,
            recording_url: self.video_url,
            scan_id: self.scan_id,
            confidence: self.confidence,
        }
    }
}

/// `GET /health` response.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
