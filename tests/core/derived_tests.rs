//! Tests for derived lap metrics
//!
//! Tests cover:
//! - Gap to pole labels
//! - Sector classification at the tolerance boundary
//! - Time formatting
//! - Timing board rows and colour assignment

use apextrace::derived::{
    classify_sector, format_time, summarize, DeltaLabel, SectorClass, SECTOR_BEST_TOLERANCE,
};
use apextrace::state::{Analysis, DRIVER_COLORS, HARD_COLOR, MEDIUM_COLOR, SOFT_COLOR};
use apextrace::telemetry::{ActiveDriverSet, TyreCompound};

use crate::common::{lap_record, two_driver_payload, POLE_LAP, SECOND_LAP};

fn analysis(drivers: &str) -> Analysis {
    Analysis::new(two_driver_payload(), ActiveDriverSet::parse(drivers))
}

// ============================================
// Gap To Pole Tests
// ============================================

#[test]
fn test_pole_and_gap_scenario() {
    let rows = summarize(&analysis("VER, LEC"));
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].driver.as_str(), "VER");
    assert_eq!(rows[0].delta, DeltaLabel::Pole);
    assert_eq!(rows[0].delta.to_string(), "POLE");

    assert_eq!(rows[1].driver.as_str(), "LEC");
    assert_eq!(rows[1].delta.to_string(), "+0.333");
}

#[test]
fn test_gap_formats_three_decimals() {
    for gap in [0.001, 0.05, 1.2345, 12.0] {
        let label = DeltaLabel::new(POLE_LAP + gap, POLE_LAP);
        assert_eq!(label.to_string(), format!("+{:.3}", POLE_LAP + gap - POLE_LAP));
    }
}

// ============================================
// Sector Tests
// ============================================

#[test]
fn test_sector_tolerance_boundary() {
    let best = 30.1;
    assert_eq!(classify_sector(best, best), SectorClass::SessionBest);
    assert_eq!(
        classify_sector(best + SECTOR_BEST_TOLERANCE, best),
        SectorClass::SessionBest
    );
    assert_eq!(classify_sector(best + 0.0011, best), SectorClass::Standard);
}

#[test]
fn test_board_sector_classes() {
    let rows = summarize(&analysis("VER, LEC"));
    assert!(rows[0]
        .sectors
        .iter()
        .all(|(_, class)| *class == SectorClass::SessionBest));
    assert_eq!(rows[1].sectors[0].1, SectorClass::Standard);
    assert_eq!(rows[1].sectors[0].0, 30.0);
}

// ============================================
// Time Formatting Tests
// ============================================

#[test]
fn test_format_lap_times() {
    assert_eq!(format_time(Some(71.256)), "1:11.256");
    assert_eq!(format_time(Some(SECOND_LAP)), "1:30.456");
    assert_eq!(format_time(Some(125.0)), "2:05.000");
    assert_eq!(format_time(Some(0.0)), "-");
    assert_eq!(format_time(None), "-");
}

// ============================================
// Board Tests
// ============================================

#[test]
fn test_board_omits_absent_driver() {
    let rows = summarize(&analysis("VER, HAM, LEC"));
    let codes: Vec<&str> = rows.iter().map(|r| r.driver.as_str()).collect();
    assert_eq!(codes, vec!["VER", "LEC"]);
    // Slots keep their position in the active set
    assert_eq!(rows[1].slot, 2);
}

#[test]
fn test_board_colours() {
    let rows = summarize(&analysis("VER, LEC"));
    assert_eq!(rows[0].tyre_color, SOFT_COLOR);
    assert_eq!(rows[0].tyre_initial, "S");
    assert_eq!(rows[1].tyre_color, MEDIUM_COLOR);
    assert_eq!(
        apextrace::derived::driver_color(rows[0].slot, false),
        DRIVER_COLORS[0]
    );
    assert_eq!(
        apextrace::derived::driver_color(rows[1].slot, false),
        DRIVER_COLORS[1]
    );
}

#[test]
fn test_unknown_compound_uses_hard_colour() {
    let mut payload = two_driver_payload();
    payload.drivers.insert(
        crate::common::code("HAM"),
        lap_record(
            91.0,
            [30.0, 30.5, 30.5],
            Some(TyreCompound::Other("HYPERSOFT".to_string())),
            0.0,
            0.0,
        ),
    );
    let rows = summarize(&Analysis::new(payload, ActiveDriverSet::parse("HAM")));
    assert_eq!(rows[0].tyre_color, HARD_COLOR);
    assert_eq!(rows[0].tyre_initial, "H");
}

#[test]
fn test_untimed_driver_shows_placeholders() {
    let mut payload = two_driver_payload();
    let mut untimed = lap_record(0.0, [30.0, 30.5, 30.5], Some(TyreCompound::Hard), 0.0, 0.0);
    untimed.lap_time = None;
    payload.drivers.insert(crate::common::code("HAM"), untimed);

    let rows = summarize(&Analysis::new(payload, ActiveDriverSet::parse("VER, HAM")));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].lap_time, "-");
    assert_eq!(rows[1].delta, DeltaLabel::NoTime);
    assert_eq!(rows[1].delta.to_string(), "-");
    assert_eq!(rows[0].delta, DeltaLabel::Pole);
}
