//! Core module tests for the telemetry engine
//!
//! Tests for:
//! - Series building and the reference driver
//! - Gap to pole, sector classes and time formatting
//! - Sector boundary overlays under zoom and pan
//! - Viewport reset behaviour
//! - Panel composer fetch lifecycle
//! - Service response decoding
//! - Settings persistence

pub mod derived_tests;
pub mod overlay_tests;
pub mod series_tests;
pub mod settings_tests;
pub mod viewport_tests;
