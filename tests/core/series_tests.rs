//! Tests for series building
//!
//! Tests cover:
//! - Each driver plotted against its own distance samples
//! - Missing drivers and metrics
//! - Reference driver selection and axis labels
//! - Display downsampling

use apextrace::series::{axis_labels, build_series, downsample_lttb, ReferencePolicy};
use apextrace::telemetry::{ActiveDriverSet, Metric};

use crate::common::{code, two_driver_bundle};

// ============================================
// Series Builder Tests
// ============================================

#[test]
fn test_series_length_matches_distance() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("VER, LEC");

    for metric in [Metric::Speed, Metric::Throttle, Metric::DeltaToPole] {
        for series in build_series(&bundle, &active, metric) {
            let record = bundle.get(series.driver.as_str()).unwrap();
            let distance = record.distance().unwrap();
            assert_eq!(series.points.len(), distance.len());
            let xs: Vec<f64> = series.points.iter().map(|p| p[0]).collect();
            assert_eq!(xs, distance);
        }
    }
}

#[test]
fn test_other_driver_keeps_unrounded_distance() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("VER, LEC");
    let speed = build_series(&bundle, &active, Metric::Speed);

    // LEC's trace is offset by 0.4 m and does not land on VER's labels
    assert!((speed[1].points[1][0] - 10.4).abs() < 1e-9);
    assert_eq!(speed[0].points[1][0], 10.0);
}

#[test]
fn test_order_follows_active_set() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("lec,ver");
    let series = build_series(&bundle, &active, Metric::Speed);
    assert_eq!(series[0].driver.as_str(), "LEC");
    assert_eq!(series[0].slot, 0);
    assert_eq!(series[1].driver.as_str(), "VER");
}

#[test]
fn test_absent_driver_has_empty_series() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("VER, HAM, LEC");
    let series = build_series(&bundle, &active, Metric::Speed);

    assert_eq!(series.len(), 3);
    assert!(series[1].is_empty());
    assert_eq!(series[2].slot, 2);
    assert!(!series[2].is_empty());
}

// ============================================
// Reference Driver Tests
// ============================================

#[test]
fn test_reference_defaults_to_first_active() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("LEC, VER");
    let (reference, record) = ReferencePolicy::default().resolve(&active, &bundle).unwrap();
    assert_eq!(reference.as_str(), "LEC");

    let labels = axis_labels(record.distance().unwrap());
    assert_eq!(labels[1], 10);
    assert_eq!(*labels.last().unwrap(), 5000);
}

#[test]
fn test_reference_none_without_present_drivers() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("HAM");
    assert!(ReferencePolicy::default().resolve(&active, &bundle).is_none());
    assert!(ReferencePolicy::Driver(code("VER"))
        .resolve(&active, &bundle)
        .is_none());
}

// ============================================
// Downsampling Tests
// ============================================

#[test]
fn test_downsample_limits_point_count() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("VER");
    let series = build_series(&bundle, &active, Metric::Speed);
    let reduced = downsample_lttb(&series[0].points, 100);

    assert_eq!(reduced.len(), 100);
    assert!(reduced.windows(2).all(|w| w[1][0] >= w[0][0]));
}
