use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the widgets.
    let (data_min, data_max) = (dataset.year_min, dataset.year_max);
    let rating_floor = dataset.rating_min;
    let genres: Vec<String> = dataset.genres.iter().cloned().collect();

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year range ----
            ui.strong("Release years");
            let (mut lo, mut hi) = state.filters.year_range;
            ui.horizontal(|ui: &mut Ui| {
                changed |= ui
                    .add(egui::DragValue::new(&mut lo).range(data_min..=data_max))
                    .changed();
                ui.label("to");
                changed |= ui
                    .add(egui::DragValue::new(&mut hi).range(data_min..=data_max))
                    .changed();
            });
            if hi < lo {
                hi = lo;
            }
            state.filters.year_range = (lo, hi);
            ui.separator();

            // ---- Minimum rating ----
            ui.strong("Minimum rating");
            changed |= ui
                .add(
                    egui::Slider::new(&mut state.filters.min_rating, rating_floor..=10.0)
                        .step_by(0.1)
                        .fixed_decimals(1),
                )
                .changed();
            ui.label(
                RichText::new("Films without a rating always pass.")
                    .small()
                    .weak(),
            );
            ui.separator();

            // ---- Genres ----
            let n_selected = state.filters.genres.len();
            let header = if n_selected == 0 {
                format!("Genres  (all {})", genres.len())
            } else {
                format!("Genres  ({n_selected}/{})", genres.len())
            };
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Show all").clicked() {
                        state.clear_genres();
                    }
                    if state.filters.genres.is_empty() {
                        ui.label(
                            RichText::new("No restriction – every genre shown.")
                                .small()
                                .weak(),
                        );
                    }
                    for genre in &genres {
                        let mut selected = state.filters.genres.contains(genre);
                        if ui.checkbox(&mut selected, genre.as_str()).changed() {
                            state.toggle_genre(genre);
                        }
                    }
                });
            ui.separator();

            // ---- Race speed ----
            ui.strong("Race speed");
            ui.add(
                egui::Slider::new(&mut state.race.speed, 0.5..=2.0)
                    .step_by(0.1)
                    .suffix("×"),
            );
        });

    if changed {
        state.refilter();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / KPI strip.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let kpis = aggregate::kpis(ds, &state.visible_rows);
            ui.label(format!("{} films", kpis.total_films));
            if let Some(r) = kpis.mean_rating {
                ui.label(format!("avg rating {r:.1}"));
            }
            if let Some(d) = kpis.mean_duration {
                ui.label(format!("avg {d:.0} min"));
            }
            if let Some((lo, hi)) = kpis.year_span {
                ui.label(format!("{lo}–{hi}"));
            }
            if let Some(name) = &kpis.top_director {
                ui.label(format!("most credited: {name}"));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open film data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "loaded {} films, {} genre rows, {} genres",
                    dataset.len(),
                    dataset.exploded.len(),
                    dataset.genres.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
