use std::path::PathBuf;
use std::time::Instant;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CineLensApp {
    pub state: AppState,
}

impl CineLensApp {
    /// Build the app, optionally loading a dataset given on the command line.
    pub fn new(initial_file: Option<PathBuf>) -> Self {
        let mut state = AppState::default();
        if let Some(path) = initial_file {
            match crate::data::loader::load_file(&path) {
                Ok(dataset) => {
                    log::info!(
                        "loaded {} films ({} genre rows) from {}",
                        dataset.len(),
                        dataset.exploded.len(),
                        path.display()
                    );
                    state.set_dataset(dataset);
                }
                Err(e) => {
                    log::error!("failed to load {}: {e:#}", path.display());
                    state.status_message = Some(format!("Error: {e}"));
                }
            }
        }
        Self { state }
    }
}

impl eframe::App for CineLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Drive the decade race: advance between frames, schedule the
        // next repaint instead of sleeping inside the frame. ----
        let n_decades = self.state.decades.len();
        if let Some(delay) = self.state.race.poll(n_decades, Instant::now()) {
            ctx.request_repaint_after(delay);
        }

        // ---- Top panel: menu bar + KPI strip ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart stack ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::central_panel(ui, &mut self.state);
        });
    }
}
