//! Tests for sector boundary overlays
//!
//! Tests cover:
//! - Boundaries at fixed fractions of the reference lap
//! - Clipping of boundaries outside the visible range
//! - Overlays following the live viewport transform

use apextrace::overlay::{OverlayContext, PlotFrame, PrePaintExtension, SectorOverlay};
use apextrace::series::ReferencePolicy;
use apextrace::telemetry::ActiveDriverSet;
use apextrace::viewport::{AxisRange, PanelViewport, ViewBounds};

use crate::common::{code, two_driver_bundle, LAP_LENGTH};

fn frame() -> PlotFrame {
    PlotFrame {
        left: 50.0,
        right: 850.0,
        top: 10.0,
        bottom: 190.0,
    }
}

fn full_lap() -> PanelViewport {
    PanelViewport::new(ViewBounds {
        x: AxisRange::new(0.0, LAP_LENGTH),
        y: AxisRange::new(0.0, 350.0),
    })
}

#[test]
fn test_boundaries_at_third_and_two_thirds() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("VER, LEC");
    let ctx = OverlayContext {
        bundle: Some(&bundle),
        active: &active,
        reference: &ReferencePolicy::default(),
    };

    let marks = SectorOverlay::new().pre_paint(&ctx, &full_lap().transform(frame()));
    let values: Vec<f64> = marks.iter().map(|m| m.value).collect();
    assert_eq!(marks.len(), 2);
    assert!((values[0] - 0.33 * LAP_LENGTH).abs() < 1e-9);
    assert!((values[1] - 0.66 * LAP_LENGTH).abs() < 1e-9);
    assert_eq!(marks[0].label, "S1");
    assert_eq!(marks[1].label, "S2");
}

#[test]
fn test_zoom_past_first_boundary_omits_it() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("VER, LEC");
    let ctx = OverlayContext {
        bundle: Some(&bundle),
        active: &active,
        reference: &ReferencePolicy::default(),
    };

    let mut viewport = full_lap();
    viewport.begin_zoom(2000.0);
    viewport.drag_to(4000.0);
    assert!(viewport.release());

    let marks = SectorOverlay::new().pre_paint(&ctx, &viewport.transform(frame()));
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].label, "S2");
    assert!(frame().contains_x(marks[0].pixel_x));
}

#[test]
fn test_marks_follow_pan() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("VER");
    let ctx = OverlayContext {
        bundle: Some(&bundle),
        active: &active,
        reference: &ReferencePolicy::default(),
    };
    let overlay = SectorOverlay::new();

    let mut viewport = full_lap();
    let before = overlay.pre_paint(&ctx, &viewport.transform(frame()));

    viewport.begin_pan();
    viewport.pan_by_pixels(80.0, frame().width());
    viewport.release();
    let after = overlay.pre_paint(&ctx, &viewport.transform(frame()));

    assert_eq!(before.len(), after.len());
    // Content moves with the pointer
    assert!((after[0].pixel_x - before[0].pixel_x - 80.0).abs() < 0.01);
    assert_eq!(after[0].top, frame().top);
    assert_eq!(after[0].bottom, frame().bottom);
}

#[test]
fn test_absent_first_driver_falls_through() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("HAM, LEC");
    let ctx = OverlayContext {
        bundle: Some(&bundle),
        active: &active,
        reference: &ReferencePolicy::Driver(code("HAM")),
    };
    let marks = SectorOverlay::new().pre_paint(&ctx, &full_lap().transform(frame()));
    assert_eq!(marks.len(), 2);
}

#[test]
fn test_nothing_drawn_without_data() {
    let active = ActiveDriverSet::default();
    let ctx = OverlayContext {
        bundle: None,
        active: &active,
        reference: &ReferencePolicy::default(),
    };
    assert!(SectorOverlay::new()
        .pre_paint(&ctx, &full_lap().transform(frame()))
        .is_empty());
}

#[test]
fn test_default_reference_skips_absent_first_driver() {
    let bundle = two_driver_bundle();
    let active = ActiveDriverSet::parse("HAM, LEC");
    let ctx = OverlayContext {
        bundle: Some(&bundle),
        active: &active,
        reference: &ReferencePolicy::FirstActive,
    };
    let marks = SectorOverlay::new().pre_paint(&ctx, &full_lap().transform(frame()));
    let labels: Vec<&str> = marks.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["S1", "S2"]);
}
