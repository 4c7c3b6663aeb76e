//! ApexTrace - Linked multi-channel qualifying telemetry viewer
//!
//! This library provides the telemetry model, series building, derived lap
//! metrics, sector overlays and per-panel viewports, plus the egui user
//! interface that hosts them.
//!
//! ## Module Structure
//!
//! - [`telemetry`] - Bundle, driver record, session context and active driver set
//! - [`series`] - Per-driver (distance, value) series, reference driver, LTTB
//! - [`derived`] - Gap to pole, sector classes, tyre colours, time formatting
//! - [`overlay`] - Pre-paint extension point and sector boundary markers
//! - [`viewport`] - Per-panel zoom/pan state machine and reset registry
//! - [`panels`] - The six fixed panels and the composer that owns them
//! - [`state`] - Fetch lifecycle state, palettes and constants
//! - [`client`] - Analysis service client and background worker
//! - [`settings`] - User settings persistence
//! - [`app`] - Main application state and eframe::App implementation
//! - [`ui`] - User interface components
//!   - `controls` - Header, request form and error banner
//!   - `chart` - Panel rendering and pointer interaction
//!   - `board` - Lap & tyres, weather and insights
//!   - `toast` - Toast notification system

pub mod app;
pub mod client;
pub mod derived;
pub mod overlay;
pub mod panels;
pub mod series;
pub mod settings;
pub mod state;
pub mod telemetry;
pub mod ui;
pub mod viewport;
