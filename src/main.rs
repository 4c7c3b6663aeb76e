//! ApexTrace - Qualifying lap telemetry comparison
//!
//! ApexTrace is a desktop application that requests fastest-lap telemetry for a
//! set of drivers from an analysis service and shows it as six linked panels
//! with sector markers, a timing board, weather and engineering insights.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use apextrace::app::ApexTraceApp;

/// Set the macOS application name for the dock
#[cfg(target_os = "macos")]
fn set_macos_app_name() {
    use objc2::{class, msg_send};
    use objc2_foundation::NSString;

    unsafe {
        let app_name = NSString::from_str("ApexTrace");
        let process_info_class = class!(NSProcessInfo);
        let process_info: *mut objc2::runtime::AnyObject =
            msg_send![process_info_class, processInfo];
        let _: () = msg_send![process_info, setProcessName: &*app_name];
    }
}

#[cfg(not(target_os = "macos"))]
fn set_macos_app_name() {}

/// Window sized for six stacked panels plus the timing board
fn native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1600.0, 1000.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("ApexTrace - Qualifying Telemetry")
            .with_app_id("ApexTrace"),
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();
    set_macos_app_name();

    eframe::run_native(
        "ApexTrace",
        native_options(),
        Box::new(|cc| Ok(Box::new(ApexTraceApp::new(cc)))),
    )
}
