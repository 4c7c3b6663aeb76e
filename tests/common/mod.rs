//! Common test utilities shared across all test modules
//!
//! This module builds synthetic qualifying laps, bundles and service
//! responses so tests never depend on a running analysis service.

#![allow(dead_code)]

use apextrace::client::{AnalysisRequest, FetchReply};
use apextrace::panels::PanelComposer;
use apextrace::telemetry::{
    AnalysisPayload, DriverCode, DriverRecord, TelemetryBundle, TyreCompound, TyreInfo, Weather,
};

/// Lap length of the synthetic circuit in metres
pub const LAP_LENGTH: f64 = 5000.0;

/// Distance between samples in metres
pub const SAMPLE_STEP: f64 = 10.0;

pub const POLE_LAP: f64 = 90.123;
pub const SECOND_LAP: f64 = 90.456;
pub const SESSION_BEST_SECTORS: [f64; 3] = [29.9, 30.1, 30.123];

pub fn code(raw: &str) -> DriverCode {
    DriverCode::parse(raw).unwrap_or_else(|| panic!("invalid driver code '{}'", raw))
}

/// Distance samples from 0 to `LAP_LENGTH` shifted by `offset` metres
pub fn distance_trace(offset: f64) -> Vec<f64> {
    let samples = (LAP_LENGTH / SAMPLE_STEP) as usize + 1;
    (0..samples)
        .map(|i| (i as f64 * SAMPLE_STEP + offset).min(LAP_LENGTH))
        .collect()
}

/// A full synthetic lap with every metric aligned to the distance trace
pub fn lap_record(
    lap_time: f64,
    sectors: [f64; 3],
    compound: Option<TyreCompound>,
    offset: f64,
    gap_per_metre: f64,
) -> DriverRecord {
    let distance = distance_trace(offset);
    let speed: Vec<f64> = distance
        .iter()
        .map(|d| 200.0 + 100.0 * (d / 400.0).sin())
        .collect();
    let throttle: Vec<f64> = speed.iter().map(|s| ((s - 100.0) / 2.0).clamp(0.0, 100.0)).collect();
    let brake: Vec<f64> = throttle.iter().map(|t| if *t < 60.0 { 100.0 - t } else { 0.0 }).collect();
    let rpm: Vec<f64> = speed.iter().map(|s| 8000.0 + s * 15.0).collect();
    let gear: Vec<f64> = speed.iter().map(|s| (s / 45.0).floor().clamp(1.0, 8.0)).collect();
    let long_g: Vec<f64> = throttle.iter().map(|t| (t - 50.0) / 40.0).collect();
    let delta: Vec<f64> = distance.iter().map(|d| d * gap_per_metre).collect();

    let mut record = DriverRecord {
        lap_time: Some(lap_time),
        sectors,
        tyre_info: TyreInfo { compound, age: 2 },
        ..Default::default()
    };
    for (key, values) in [
        ("distance", distance),
        ("speed", speed),
        ("throttle", throttle),
        ("brake", brake),
        ("rpm", rpm),
        ("gear", gear),
        ("long_g", long_g),
        ("delta_to_pole", delta),
    ] {
        record.telemetry.insert(key.to_string(), values);
    }
    record
}

/// VER on pole, LEC a third of a second behind
pub fn two_driver_bundle() -> TelemetryBundle {
    [
        (
            code("VER"),
            lap_record(POLE_LAP, [29.9, 30.1, 30.123], Some(TyreCompound::Soft), 0.0, 0.0),
        ),
        (
            code("LEC"),
            lap_record(
                SECOND_LAP,
                [30.0, 30.2, 30.256],
                Some(TyreCompound::Medium),
                0.4,
                (SECOND_LAP - POLE_LAP) / LAP_LENGTH,
            ),
        ),
    ]
    .into_iter()
    .collect()
}

pub fn two_driver_payload() -> AnalysisPayload {
    AnalysisPayload {
        drivers: two_driver_bundle(),
        session_best_sectors: SESSION_BEST_SECTORS,
        pole_lap_time: POLE_LAP,
        weather: Weather {
            track_temp: 33.2,
            air_temp: 25.4,
            humidity: 41.0,
            rain: false,
        },
        ai_insights: vec!["VER gains 0.1s braking into turn 1".to_string()],
    }
}

/// Composer with a completed fetch for `drivers`
pub fn loaded_composer(drivers: &str, payload: AnalysisPayload) -> PanelComposer {
    let mut composer = PanelComposer::new();
    let id = composer
        .begin_fetch(AnalysisRequest::new("2023", "Bahrain", drivers))
        .expect("no fetch in flight");
    composer
        .complete_fetch(FetchReply {
            id,
            result: Ok(payload),
        })
        .expect("reply matches pending request");
    composer
}

/// Service response envelope as the analysis service sends it
pub fn success_response_json() -> String {
    serde_json::json!({
        "status": "success",
        "data": {
            "drivers": {
                "VER": {
                    "lap_time": POLE_LAP,
                    "sectors": [29.9, 30.1, 30.123],
                    "tyre_info": {"compound": "SOFT", "age": 2},
                    "telemetry": {
                        "distance": [0.0, 2500.0, 5000.0],
                        "speed": [280.0, 120.0, 300.0],
                        "delta_to_pole": [0.0, 0.0, 0.0]
                    }
                },
                "LEC": {
                    "lap_time": SECOND_LAP,
                    "sectors": [30.0, 30.2, 30.256],
                    "tyre_info": {"compound": "MEDIUM", "age": 5},
                    "telemetry": {
                        "distance": [0.0, 2499.6, 5000.2],
                        "speed": [279.0, 119.0, 301.0],
                        "delta_to_pole": [0.0, 0.12, 0.333]
                    }
                }
            },
            "session_best_sectors": SESSION_BEST_SECTORS,
            "pole_lap_time": POLE_LAP,
            "weather": {"track_temp": 33.2, "air_temp": 25.4, "humidity": 41.0, "rain": true}
        },
        "ai_insights": ["LEC loses most time in sector 3"]
    })
    .to_string()
}
