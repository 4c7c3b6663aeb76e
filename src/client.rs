//! HTTP client for the telemetry analysis service.
//!
//! The service answers `GET {endpoint}/analyze` with a JSON envelope:
//! `{"status": "success", "data": {...}, "ai_insights": [...]}` on success or
//! `{"status": "error", "message": "..."}` when the session could not be loaded.
//! Requests run on a background worker thread so the UI never blocks.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use serde::Deserialize;
use strum::{AsRefStr, Display};
use thiserror::Error;

use crate::state::RequestId;
use crate::telemetry::AnalysisPayload;

/// User agent for API requests
const USER_AGENT: &str = concat!("ApexTrace/", env!("CARGO_PKG_VERSION"));

/// Default address of a locally running analysis service
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Banner shown when the service cannot be reached at all
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect. Is the analysis service running?";

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when requesting an analysis
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout
    #[error("Network error: {0}")]
    Transport(String),

    /// The service answered but reported a failure
    #[error("Service error: {0}")]
    Service(String),

    /// The response body could not be understood
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Text for the persistent error banner
    pub fn banner_message(&self) -> String {
        match self {
            FetchError::Transport(_) => CONNECT_FAILED_MESSAGE.to_string(),
            FetchError::Service(message) => message.clone(),
            FetchError::Malformed(detail) => format!("Unexpected response from service: {}", detail),
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// Session type analysed by the service. Only qualifying is supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr)]
pub enum Session {
    #[default]
    Qualifying,
}

/// Query sent to the analysis service
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisRequest {
    pub year: String,
    pub race: String,
    pub session: Session,
    /// Comma-separated driver codes as typed by the user
    pub drivers: String,
}

impl AnalysisRequest {
    pub fn new(year: impl Into<String>, race: impl Into<String>, drivers: impl Into<String>) -> Self {
        Self {
            year: year.into().trim().to_string(),
            race: race.into().trim().to_string(),
            session: Session::Qualifying,
            drivers: drivers.into().trim().to_string(),
        }
    }

    /// Query string parameters in the order the service documents them
    pub fn query_pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("year", self.year.as_str()),
            ("race", self.race.as_str()),
            ("session", self.session.as_ref()),
            ("drivers", self.drivers.as_str()),
        ]
    }
}

/// Full URL of the analyze endpoint
pub fn analyze_url(endpoint: &str) -> String {
    format!("{}/analyze", endpoint.trim_end_matches('/'))
}

// ============================================================================
// Response decoding
// ============================================================================

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    ai_insights: Option<Vec<String>>,
}

/// Decode a response body into an analysis payload.
///
/// Top-level `ai_insights` are merged into the payload.
pub fn decode_response(body: &str) -> Result<AnalysisPayload, FetchError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    match envelope.status.as_str() {
        "error" => Err(FetchError::Service(
            envelope
                .message
                .unwrap_or_else(|| "The analysis service reported an error".to_string()),
        )),
        "success" | "ok" => {
            let data = envelope
                .data
                .ok_or_else(|| FetchError::Malformed("missing data".to_string()))?;
            let mut payload: AnalysisPayload =
                serde_json::from_value(data).map_err(|e| FetchError::Malformed(e.to_string()))?;
            if let Some(insights) = envelope.ai_insights {
                payload.ai_insights = insights;
            }
            Ok(payload)
        }
        other => Err(FetchError::Malformed(format!("unknown status '{}'", other))),
    }
}

/// Request an analysis from the service (blocking)
pub fn fetch_analysis(endpoint: &str, request: &AnalysisRequest) -> Result<AnalysisPayload, FetchError> {
    let url = analyze_url(endpoint);

    let response = ureq::get(&url)
        .header("User-Agent", USER_AGENT)
        .query_pairs(request.query_pairs())
        .call()
        .map_err(|e| match e {
            ureq::Error::StatusCode(status) => FetchError::Service(format!("HTTP {}", status)),
            _ => FetchError::Transport(e.to_string()),
        })?;

    let body = response
        .into_body()
        .read_to_string()
        .map_err(|e| FetchError::Transport(format!("Failed to read response: {}", e)))?;

    decode_response(&body)
}

// ============================================================================
// Background Request Handler
// ============================================================================

/// Message to send to the fetch worker thread
pub struct FetchJob {
    pub id: RequestId,
    pub endpoint: String,
    pub request: AnalysisRequest,
}

/// Reply from the fetch worker thread, tagged with the job's id
pub struct FetchReply {
    pub id: RequestId,
    pub result: Result<AnalysisPayload, FetchError>,
}

/// Spawn a background thread for analysis requests
pub fn spawn_fetch_worker() -> (Sender<FetchJob>, Receiver<FetchReply>) {
    let (job_tx, job_rx) = channel::<FetchJob>();
    let (reply_tx, reply_rx) = channel::<FetchReply>();

    thread::spawn(move || {
        while let Ok(job) = job_rx.recv() {
            tracing::info!(
                "Requesting analysis {:?}: {} {} [{}]",
                job.id,
                job.request.year,
                job.request.race,
                job.request.drivers
            );
            let result = fetch_analysis(&job.endpoint, &job.request);
            if let Err(e) = &result {
                tracing::warn!("Analysis request {:?} failed: {}", job.id, e);
            }

            if reply_tx.send(FetchReply { id: job.id, result }).is_err() {
                break; // Main thread dropped the receiver
            }
        }
    });

    (job_tx, reply_rx)
}
