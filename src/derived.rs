//! Derived lap metrics for the timing board.
//!
//! Gap to pole, sector classification against the session best, tyre colours,
//! lap time formatting, and per-driver colour assignment.

use std::fmt;

use crate::state::{
    Analysis, COLORBLIND_COLORS, DRIVER_COLORS, GAP_COLOR, HARD_COLOR, MEDIUM_COLOR,
    SESSION_BEST_COLOR, SOFT_COLOR, STANDARD_SECTOR_COLOR,
};
use crate::telemetry::{DriverCode, TyreCompound, SECTOR_COUNT};

/// Slack allowed when comparing a sector against the session best, absorbing
/// rounding in the service's millisecond timings
pub const SECTOR_BEST_TOLERANCE: f64 = 0.001;

/// Placeholder for a missing time
pub const NO_TIME: &str = "-";

// ============================================================================
// Gap to pole
// ============================================================================

/// Time gap between a lap and the pole lap
pub fn lap_delta(lap_time: f64, pole_lap_time: f64) -> f64 {
    lap_time - pole_lap_time
}

/// How a driver's gap to pole is shown on the board
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeltaLabel {
    /// The pole reference lap itself (delta exactly zero)
    Pole,
    /// Seconds behind (or, for inconsistent data, ahead of) pole
    Gap(f64),
    /// No lap time was reported
    NoTime,
}

impl DeltaLabel {
    pub fn new(lap_time: f64, pole_lap_time: f64) -> Self {
        let delta = lap_delta(lap_time, pole_lap_time);
        if delta == 0.0 {
            DeltaLabel::Pole
        } else {
            DeltaLabel::Gap(delta)
        }
    }

    pub fn color(&self) -> [u8; 3] {
        match self {
            DeltaLabel::Pole => SESSION_BEST_COLOR,
            DeltaLabel::Gap(_) => GAP_COLOR,
            DeltaLabel::NoTime => STANDARD_SECTOR_COLOR,
        }
    }
}

impl fmt::Display for DeltaLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaLabel::Pole => f.write_str("POLE"),
            DeltaLabel::NoTime => f.write_str(NO_TIME),
            DeltaLabel::Gap(delta) if *delta < 0.0 => write!(f, "{:.3}", delta),
            DeltaLabel::Gap(delta) => write!(f, "+{:.3}", delta),
        }
    }
}

// ============================================================================
// Sectors
// ============================================================================

/// Sector time class. There is deliberately no personal-best tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectorClass {
    SessionBest,
    Standard,
}

impl SectorClass {
    pub fn color(&self) -> [u8; 3] {
        match self {
            SectorClass::SessionBest => SESSION_BEST_COLOR,
            SectorClass::Standard => STANDARD_SECTOR_COLOR,
        }
    }
}

/// Classify a sector time against the session best (boundary inclusive)
pub fn classify_sector(value: f64, session_best: f64) -> SectorClass {
    if value <= session_best + SECTOR_BEST_TOLERANCE {
        SectorClass::SessionBest
    } else {
        SectorClass::Standard
    }
}

// ============================================================================
// Tyres and colours
// ============================================================================

/// Badge colour for a tyre compound. Unknown or missing compounds use the hard colour.
pub fn tyre_color(compound: Option<&TyreCompound>) -> [u8; 3] {
    match compound {
        Some(TyreCompound::Soft) => SOFT_COLOR,
        Some(TyreCompound::Medium) => MEDIUM_COLOR,
        _ => HARD_COLOR,
    }
}

/// Line colour for the driver at `slot` in the active set
pub fn driver_color(slot: usize, color_blind_mode: bool) -> [u8; 3] {
    let palette = if color_blind_mode {
        COLORBLIND_COLORS
    } else {
        DRIVER_COLORS
    };
    palette[slot % palette.len()]
}

// ============================================================================
// Time formatting
// ============================================================================

/// Format a lap or sector time as `M:SS.mmm`.
///
/// Missing, zero, or non-finite input formats as `-`.
pub fn format_time(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds.filter(|s| *s != 0.0 && s.is_finite()) else {
        return NO_TIME.to_string();
    };

    let sign = if seconds < 0.0 { "-" } else { "" };
    let total_ms = (seconds.abs() * 1000.0).round() as u64;
    let minutes = total_ms / 60_000;
    let secs = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;

    format!("{}{}:{:02}.{:03}", sign, minutes, secs, millis)
}

// ============================================================================
// Timing board
// ============================================================================

/// One row of the lap & tyres board
#[derive(Clone, Debug, PartialEq)]
pub struct DriverSummary {
    pub driver: DriverCode,
    /// Position in the active driver set
    pub slot: usize,
    pub lap_time: String,
    pub delta: DeltaLabel,
    pub tyre_initial: String,
    pub tyre_color: [u8; 3],
    pub tyre_age: u32,
    pub sectors: [(f64, SectorClass); SECTOR_COUNT],
}

/// Build board rows for the active drivers present in the bundle, in set order
pub fn summarize(analysis: &Analysis) -> Vec<DriverSummary> {
    let session = &analysis.session;
    analysis
        .active
        .present_in(&analysis.bundle)
        .map(|(slot, code, record)| {
            let compound = record.tyre_info.compound.as_ref();
            DriverSummary {
                driver: code.clone(),
                slot,
                lap_time: format_time(record.lap_time),
                delta: record
                    .lap_time
                    .map_or(DeltaLabel::NoTime, |t| DeltaLabel::new(t, session.pole_lap_time)),
                tyre_initial: compound
                    .map(TyreCompound::initial)
                    .unwrap_or_else(|| NO_TIME.to_string()),
                tyre_color: tyre_color(compound),
                tyre_age: record.tyre_info.age,
                sectors: std::array::from_fn(|i| {
                    let value = record.sectors[i];
                    (
                        value,
                        classify_sector(value, session.session_best_sectors[i]),
                    )
                }),
            }
        })
        .collect()
}
