//! Tipboard - Restaurant Tips Dashboard
//!
//! Loads the tips dataset, attaches synthetic order timestamps, and displays
//! date-windowed interactive charts.

mod charts;
mod data;
mod gui;

use eframe::egui;
use gui::TipboardApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Tipboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Tipboard",
        options,
        Box::new(|cc| Ok(Box::new(TipboardApp::new(cc)))),
    )
}
