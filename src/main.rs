//! ChillRate - Coach dashboard for team-wellness monitoring
//!
//! Coaches sign in, manage their teams and follow each member's relaxation
//! level over time on an interactive, auto-refreshing chart.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use chillrate::app::ChillRateApp;

/// Set the macOS application name for the dock
#[cfg(target_os = "macos")]
fn set_macos_app_name() {
    use objc2::{class, msg_send};
    use objc2_foundation::NSString;

    unsafe {
        let app_name = NSString::from_str("ChillRate");
        let process_info_class = class!(NSProcessInfo);
        let process_info: *mut objc2::runtime::AnyObject =
            msg_send![process_info_class, processInfo];
        let _: () = msg_send![process_info, setProcessName: &*app_name];
    }
}

#[cfg(not(target_os = "macos"))]
fn set_macos_app_name() {}

fn main() -> eframe::Result<()> {
    set_macos_app_name();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 640.0])
            .with_title("ChillRate - Coach Dashboard")
            .with_app_id("ChillRate"),
        ..Default::default()
    };

    eframe::run_native(
        "ChillRate",
        native_options,
        Box::new(|cc| Ok(Box::new(ChillRateApp::new(cc)))),
    )
}
