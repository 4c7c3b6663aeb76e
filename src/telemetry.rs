//! Telemetry data model for a single qualifying analysis.
//!
//! A [`TelemetryBundle`] maps driver codes to their fastest-lap record. Every
//! per-driver metric sequence is sampled at the same increasing `distance`
//! values, so index `i` of any metric lines up with `distance[i]`.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Number of timed sectors in a lap
pub const SECTOR_COUNT: usize = 3;

// ============================================================================
// Metrics
// ============================================================================

/// A telemetry channel carried in each driver's trace.
///
/// The string form matches the keys used by the analysis service payload.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Distance travelled along the lap in metres (the shared x-axis)
    Distance,
    /// Speed in km/h
    Speed,
    /// Throttle application in percent
    Throttle,
    /// Brake application in percent
    Brake,
    /// Engine speed
    Rpm,
    /// Selected gear (interpolated, so may be fractional between shifts)
    Gear,
    /// Longitudinal acceleration in g
    LongG,
    /// Time gap to the pole lap at the same distance, in seconds
    DeltaToPole,
    /// Elapsed lap time in seconds
    Time,
}

impl Metric {
    /// Key of this metric in the telemetry mapping
    pub fn key(&self) -> &'static str {
        self.into()
    }

    /// Display unit for tooltips
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Distance => "m",
            Metric::Speed => "km/h",
            Metric::Throttle | Metric::Brake => "%",
            Metric::Rpm => "rpm",
            Metric::Gear => "",
            Metric::LongG => "g",
            Metric::DeltaToPole | Metric::Time => "s",
        }
    }
}

// ============================================================================
// Drivers
// ============================================================================

/// Uppercase driver code such as `VER` or `LEC`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverCode(String);

impl DriverCode {
    /// Normalize raw user input into a driver code.
    ///
    /// Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim().to_uppercase();
        if code.is_empty() {
            None
        } else {
            Some(Self(code))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DriverCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tyre compound fitted for the lap
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TyreCompound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    /// Any compound name the viewer does not know about
    Other(String),
}

impl TyreCompound {
    pub fn name(&self) -> &str {
        match self {
            TyreCompound::Soft => "SOFT",
            TyreCompound::Medium => "MEDIUM",
            TyreCompound::Hard => "HARD",
            TyreCompound::Intermediate => "INTERMEDIATE",
            TyreCompound::Wet => "WET",
            TyreCompound::Other(name) => name,
        }
    }

    /// Single-letter badge shown on the timing board
    pub fn initial(&self) -> String {
        self.name().chars().next().map(String::from).unwrap_or_default()
    }
}

impl From<String> for TyreCompound {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "SOFT" => TyreCompound::Soft,
            "MEDIUM" => TyreCompound::Medium,
            "HARD" => TyreCompound::Hard,
            "INTERMEDIATE" => TyreCompound::Intermediate,
            "WET" => TyreCompound::Wet,
            _ => TyreCompound::Other(value),
        }
    }
}

impl From<TyreCompound> for String {
    fn from(value: TyreCompound) -> Self {
        value.name().to_string()
    }
}

/// Tyre fitted for the lap and how many laps it had done
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TyreInfo {
    #[serde(default)]
    pub compound: Option<TyreCompound>,
    #[serde(default)]
    pub age: u32,
}

/// One driver's fastest lap: timings, tyre, and the distance-aligned trace
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverRecord {
    /// Lap time in seconds; null when the service has no timed lap
    #[serde(default)]
    pub lap_time: Option<f64>,
    /// Sector times in seconds, aligned with the session-best sectors
    pub sectors: [f64; SECTOR_COUNT],
    #[serde(default)]
    pub tyre_info: TyreInfo,
    /// Metric key -> samples, one per distance sample
    #[serde(default)]
    pub telemetry: BTreeMap<String, Vec<f64>>,
}

impl DriverRecord {
    /// Samples for a metric, if the trace carries it
    pub fn metric(&self, metric: Metric) -> Option<&[f64]> {
        self.telemetry.get(metric.key()).map(Vec::as_slice)
    }

    /// The distance samples every other metric is aligned to
    pub fn distance(&self) -> Option<&[f64]> {
        self.metric(Metric::Distance)
    }

    /// Total lap distance (last distance sample)
    pub fn total_distance(&self) -> Option<f64> {
        self.distance().and_then(|d| d.last().copied())
    }

    /// Check the distance axis never goes backwards
    pub fn distance_is_monotonic(&self) -> bool {
        self.distance()
            .map(|d| d.windows(2).all(|w| w[1] >= w[0]))
            .unwrap_or(true)
    }

    /// Metrics whose sample count differs from the distance trace
    pub fn misaligned_metrics(&self) -> Vec<&str> {
        let Some(expected) = self.distance().map(<[f64]>::len) else {
            return Vec::new();
        };
        self.telemetry
            .iter()
            .filter(|(_, samples)| samples.len() != expected)
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

// ============================================================================
// Bundle and session
// ============================================================================

/// Driver code -> fastest lap record, as returned by one analysis request
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelemetryBundle {
    drivers: BTreeMap<DriverCode, DriverRecord>,
}

impl TelemetryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: DriverCode, record: DriverRecord) -> Option<DriverRecord> {
        self.drivers.insert(code, record)
    }

    pub fn get(&self, code: &str) -> Option<&DriverRecord> {
        self.drivers.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.drivers.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl FromIterator<(DriverCode, DriverRecord)> for TelemetryBundle {
    fn from_iter<T: IntoIterator<Item = (DriverCode, DriverRecord)>>(iter: T) -> Self {
        Self {
            drivers: iter.into_iter().collect(),
        }
    }
}

/// Session-average weather
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weather {
    pub track_temp: f64,
    pub air_temp: f64,
    pub humidity: f64,
    pub rain: bool,
}

/// Session-wide context shared by every driver in the bundle
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionContext {
    pub pole_lap_time: f64,
    pub session_best_sectors: [f64; SECTOR_COUNT],
    pub weather: Weather,
    pub ai_insights: Vec<String>,
}

/// The `data` object of a successful analysis response
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AnalysisPayload {
    pub drivers: TelemetryBundle,
    pub session_best_sectors: [f64; SECTOR_COUNT],
    pub pole_lap_time: f64,
    #[serde(default)]
    pub weather: Weather,
    /// Filled from the top level of the response envelope
    #[serde(default)]
    pub ai_insights: Vec<String>,
}

impl AnalysisPayload {
    /// Split into the per-driver bundle and the session context
    pub fn into_parts(self) -> (TelemetryBundle, SessionContext) {
        let session = SessionContext {
            pole_lap_time: self.pole_lap_time,
            session_best_sectors: self.session_best_sectors,
            weather: self.weather,
            ai_insights: self.ai_insights,
        };
        (self.drivers, session)
    }
}

// ============================================================================
// Active driver set
// ============================================================================

/// Ordered, de-duplicated driver codes selected for rendering.
///
/// Position in the set drives colour assignment and draw order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveDriverSet {
    codes: Vec<DriverCode>,
}

impl ActiveDriverSet {
    /// Parse comma-separated user input such as `"ver, lec,HAM"`.
    ///
    /// Blank entries are skipped and repeated codes keep their first position.
    pub fn parse(input: &str) -> Self {
        let mut codes: Vec<DriverCode> = Vec::new();
        for code in input.split(',').filter_map(DriverCode::parse) {
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        Self { codes }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DriverCode> {
        self.codes.iter()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Active drivers present in the bundle, with their position in the set
    pub fn present_in<'a>(
        &'a self,
        bundle: &'a TelemetryBundle,
    ) -> impl Iterator<Item = (usize, &'a DriverCode, &'a DriverRecord)> + 'a {
        self.codes
            .iter()
            .enumerate()
            .filter_map(move |(slot, code)| bundle.get(code.as_str()).map(|r| (slot, code, r)))
    }

    /// Active drivers the bundle has no record for
    pub fn missing_from(&self, bundle: &TelemetryBundle) -> Vec<&DriverCode> {
        self.codes
            .iter()
            .filter(|code| !bundle.contains(code.as_str()))
            .collect()
    }
}

impl FromIterator<DriverCode> for ActiveDriverSet {
    fn from_iter<T: IntoIterator<Item = DriverCode>>(iter: T) -> Self {
        let mut codes: Vec<DriverCode> = Vec::new();
        for code in iter {
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        Self { codes }
    }
}
