//! Core application state types and constants.
//!
//! This module contains the colour palettes, the loaded analysis, and the
//! fetch lifecycle state machine that the panel composer owns.

use thiserror::Error;

use crate::client::{AnalysisRequest, FetchError};
use crate::telemetry::{ActiveDriverSet, AnalysisPayload, SessionContext, TelemetryBundle};

// ============================================================================
// Constants
// ============================================================================

/// Maximum points to render per line (for performance via LTTB downsampling)
pub const MAX_CHART_POINTS: usize = 2000;

/// Line colours for drivers, indexed by position in the active driver set
pub const DRIVER_COLORS: &[[u8; 3]] = &[
    [54, 162, 235],  // Blue
    [255, 99, 132],  // Pink
    [0, 255, 157],   // Mint
    [255, 159, 64],  // Orange
    [153, 102, 255], // Violet
    [255, 205, 86],  // Yellow
];

/// Colorblind-friendly palette (based on Wong's optimized palette)
/// Designed to be distinguishable for deuteranopia, protanopia, and tritanopia
pub const COLORBLIND_COLORS: &[[u8; 3]] = &[
    [0, 114, 178],   // Blue
    [230, 159, 0],   // Orange
    [0, 158, 115],   // Bluish green
    [204, 121, 167], // Reddish purple
    [86, 180, 233],  // Sky blue
    [213, 94, 0],    // Vermillion
];

/// Accent colour (buttons, zoom selection, banner edge)
pub const ACCENT_COLOR: [u8; 3] = [225, 6, 0];

/// Session-best sector times and the pole tag
pub const SESSION_BEST_COLOR: [u8; 3] = [208, 66, 255];

/// Sector times that are not the session best
pub const STANDARD_SECTOR_COLOR: [u8; 3] = [136, 136, 136];

/// Gap-to-pole label for everyone but the pole sitter
pub const GAP_COLOR: [u8; 3] = [255, 238, 0];

pub const SOFT_COLOR: [u8; 3] = [255, 59, 48];
pub const MEDIUM_COLOR: [u8; 3] = [255, 204, 0];
/// Hard compound, also used for any compound without its own colour
pub const HARD_COLOR: [u8; 3] = [208, 208, 208];

// ============================================================================
// Loaded analysis
// ============================================================================

/// Everything one successful analysis request produced
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Analysis {
    pub bundle: TelemetryBundle,
    pub session: SessionContext,
    pub active: ActiveDriverSet,
}

impl Analysis {
    pub fn new(payload: AnalysisPayload, active: ActiveDriverSet) -> Self {
        let (bundle, session) = payload.into_parts();
        Self {
            bundle,
            session,
            active,
        }
    }
}

/// Identifier handed out for each fetch so late replies can be recognised
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Errors raised by fetch lifecycle transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposerError {
    /// A request is already in flight; re-submission is rejected, not queued
    #[error("An analysis request is already in progress")]
    FetchInFlight,

    /// A reply arrived for a request that is no longer pending
    #[error("Discarded stale response for request {got:?} (pending: {pending:?})")]
    StaleResponse {
        got: RequestId,
        pending: Option<RequestId>,
    },
}

/// A fetch that has been started and not yet answered
#[derive(Clone, Debug, PartialEq)]
pub struct PendingFetch {
    pub id: RequestId,
    pub request: AnalysisRequest,
}

/// Fetch lifecycle: the displayed analysis, the in-flight request, and the banner.
///
/// Only [`fetch_start`](Self::fetch_start), [`fetch_success`](Self::fetch_success)
/// and [`fetch_error`](Self::fetch_error) change it.
#[derive(Clone, Debug, Default)]
pub struct AnalysisState {
    analysis: Option<Analysis>,
    pending: Option<PendingFetch>,
    error: Option<String>,
}

impl AnalysisState {
    /// Begin a fetch. The previous analysis stays visible while loading.
    pub fn fetch_start(&mut self, id: RequestId, request: AnalysisRequest) -> Result<(), ComposerError> {
        if self.pending.is_some() {
            return Err(ComposerError::FetchInFlight);
        }
        self.pending = Some(PendingFetch { id, request });
        Ok(())
    }

    /// Replace the analysis with a successful reply and clear the banner
    pub fn fetch_success(
        &mut self,
        id: RequestId,
        payload: AnalysisPayload,
    ) -> Result<&Analysis, ComposerError> {
        let pending = self.take_pending(id)?;
        let active = ActiveDriverSet::parse(&pending.request.drivers);
        self.error = None;
        Ok(self.analysis.insert(Analysis::new(payload, active)))
    }

    /// Clear the analysis and show the error banner
    pub fn fetch_error(&mut self, id: RequestId, error: &FetchError) -> Result<(), ComposerError> {
        self.take_pending(id)?;
        self.analysis = None;
        self.error = Some(error.banner_message());
        Ok(())
    }

    fn take_pending(&mut self, id: RequestId) -> Result<PendingFetch, ComposerError> {
        match self.pending.take() {
            Some(pending) if pending.id == id => Ok(pending),
            other => {
                let pending_id = other.as_ref().map(|p| p.id);
                self.pending = other;
                Err(ComposerError::StaleResponse {
                    got: id,
                    pending: pending_id,
                })
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingFetch> {
        self.pending.as_ref()
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    /// Banner text, persistent until the next success or error
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

// ============================================================================
// Toasts
// ============================================================================

/// Type of toast notification (determines color)
#[derive(Clone, Copy, Default)]
pub enum ToastType {
    /// Informational message (blue)
    #[default]
    Info,
    /// Success message (green)
    Success,
    /// Warning message (amber)
    Warning,
}

impl ToastType {
    /// Get the background color for this toast type
    pub fn color(&self) -> [u8; 3] {
        match self {
            ToastType::Info => [71, 108, 155],    // Blue
            ToastType::Success => [113, 120, 78], // Olive green
            ToastType::Warning => [253, 193, 73], // Amber
        }
    }

    /// Get the text color for this toast type
    pub fn text_color(&self) -> [u8; 3] {
        match self {
            ToastType::Warning => [30, 30, 30], // Dark text for amber background
            _ => [255, 255, 255],
        }
    }
}
