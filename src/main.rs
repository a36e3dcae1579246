use std::path::PathBuf;

use cinelens::app::CineLensApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional dataset path on the command line.
    let initial_file: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CineLens – IMDb Film Trends",
        options,
        Box::new(move |_cc| Ok(Box::new(CineLensApp::new(initial_file)))),
    )
}
