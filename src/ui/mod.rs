//! UI rendering modules for the ApexTrace application.
//!
//! Each submodule adds rendering methods to [`crate::app::ApexTraceApp`]:
//!
//! - `controls` - Header, request form and error banner
//! - `chart` - The six telemetry panels with zoom, pan and hover
//! - `board` - Lap & tyres board, weather and AI insights
//! - `toast` - Toast notification system

pub mod board;
pub mod chart;
pub mod controls;
pub mod toast;

use eframe::egui;

/// Convert a palette entry to an egui colour
pub fn rgb(color: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(color[0], color[1], color[2])
}

/// Convert a palette entry with alpha to an egui colour
pub fn rgba(color: [u8; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color[0], color[1], color[2], color[3])
}

/// Muted text used for secondary labels
pub const MUTED_TEXT: egui::Color32 = egui::Color32::from_rgb(136, 136, 136);

/// Background of cards on the board and around panels
pub const CARD_FILL: egui::Color32 = egui::Color32::from_rgb(21, 21, 30);
