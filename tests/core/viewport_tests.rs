//! Tests for per-panel viewports
//!
//! Tests cover:
//! - Zoom and pan sequences followed by reset
//! - Reset idempotence
//! - Reset-all equivalence with individual resets in any order

use apextrace::viewport::{AxisRange, PanelViewport, ResetHandle, ViewBounds, ViewportRegistry};

fn home(width: f64) -> ViewBounds {
    ViewBounds {
        x: AxisRange::new(0.0, width),
        y: AxisRange::new(-1.0, 1.0),
    }
}

/// A fixed pseudo-random sequence of zooms and pans
fn scramble(viewport: &mut PanelViewport, seed: u64) {
    let mut state = seed;
    for _ in 0..12 {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let a = (state >> 33) as f64 % 4000.0;
        let b = (state >> 17) as f64 % 4000.0;
        if state % 3 == 0 {
            viewport.begin_pan();
            viewport.pan_by_pixels((a - 2000.0) as f32 / 10.0, 800.0);
            viewport.release();
        } else {
            viewport.begin_zoom(a);
            viewport.drag_to(b);
            viewport.release();
        }
    }
}

#[test]
fn test_reset_after_arbitrary_sequence_restores_home() {
    for seed in 1..20 {
        let mut viewport = PanelViewport::new(home(5000.0));
        scramble(&mut viewport, seed);
        viewport.reset();
        assert_eq!(viewport.visible(), home(5000.0));
        assert!(!viewport.is_zoomed());
    }
}

#[test]
fn test_reset_twice_is_noop() {
    let mut viewport = PanelViewport::new(home(5000.0));
    scramble(&mut viewport, 7);
    ResetHandle::reset(&mut viewport);
    let once = viewport.clone();
    ResetHandle::reset(&mut viewport);
    assert_eq!(viewport, once);
}

#[test]
fn test_reset_all_matches_individual_resets() {
    let build = || {
        let mut registry: ViewportRegistry<usize> = ViewportRegistry::new();
        for id in 0..6 {
            let mut viewport = PanelViewport::new(home(1000.0 * (id + 1) as f64));
            scramble(&mut viewport, id as u64 + 3);
            registry.register(id, viewport);
        }
        registry
    };

    let mut all = build();
    all.reset_all();

    let mut forward = build();
    for id in 0..6 {
        forward.reset(id);
    }

    let mut backward = build();
    for id in (0..6).rev() {
        backward.reset(id);
    }

    for id in 0..6 {
        assert_eq!(all.get(id), forward.get(id));
        assert_eq!(all.get(id), backward.get(id));
        assert_eq!(all.get(id).unwrap().visible(), home(1000.0 * (id + 1) as f64));
    }
}

#[test]
fn test_panels_are_independent() {
    let mut registry: ViewportRegistry<&'static str> = ViewportRegistry::new();
    registry.register("speed", PanelViewport::new(home(5000.0)));
    registry.register("brake", PanelViewport::new(home(5000.0)));

    let speed = registry.get_mut("speed").unwrap();
    speed.begin_zoom(1000.0);
    speed.drag_to(2000.0);
    speed.release();

    assert!(registry.get("speed").unwrap().is_zoomed());
    assert!(!registry.get("brake").unwrap().is_zoomed());
}

#[test]
fn test_set_home_discards_zoom() {
    let mut viewport = PanelViewport::new(home(5000.0));
    scramble(&mut viewport, 11);
    viewport.set_home(home(4200.0));
    assert_eq!(viewport.visible(), home(4200.0));
}
