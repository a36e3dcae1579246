use std::collections::BTreeMap;

use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::GenreColors;
use crate::data::aggregate::{self, TOP_GENRES};
use crate::data::model::FilmDataset;
use crate::state::{AppState, DecadeRace};

// ---------------------------------------------------------------------------
// Central panel – the chart stack
// ---------------------------------------------------------------------------

/// Render every chart over the current filtered view.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        dataset,
        visible_rows,
        decades,
        race,
        ..
    } = state;

    let Some(ds) = dataset.as_ref() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a film file to explore trends  (File → Open…)");
        });
        return;
    };

    if visible_rows.is_empty() {
        // Informational empty state, not an error.
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No films match the current filters. Loosen them to see the charts.");
        });
        return;
    }

    let colors = GenreColors::new(&ds.genres);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Genre ranking evolution");
            ranking_evolution(ui, ds, visible_rows, &colors);
            ui.separator();

            ui.heading("Films produced per year");
            production_bars(ui, ds, visible_rows, &colors);
            ui.separator();

            ui.heading("Most popular genres");
            top_genres_chart(ui, ds, visible_rows, &colors);
            ui.separator();

            ui.heading("Rating distribution by genre");
            rating_density(ui, ds, visible_rows, &colors);
            ui.separator();

            ui.heading("Directors: rating vs. genre diversity");
            directors_bubble(ui, ds, visible_rows);
            ui.separator();

            ui.heading("Genre dominance by decade");
            decade_race(ui, ds, visible_rows, decades, race, &colors);
        });
}

// Charts live in a scrollable column, so pan/zoom gestures stay off.
macro_rules! static_plot {
    ($id:literal) => {
        Plot::new($id)
            .height(300.0)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_boxed_zoom(false)
    };
}

// ---------------------------------------------------------------------------
// Ranking evolution – dense rank per decade, one line per genre
// ---------------------------------------------------------------------------

fn ranking_evolution(ui: &mut Ui, ds: &FilmDataset, rows: &[usize], colors: &GenreColors) {
    let stats = aggregate::decade_genre_stats(ds, rows);

    // Keep the chart readable: only the biggest genres overall.
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for s in &stats {
        *totals.entry(s.genre.as_str()).or_insert(0) += s.count;
    }
    let mut ranked: Vec<(&str, usize)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let keep: Vec<String> = ranked.iter().take(7).map(|(g, _)| g.to_string()).collect();

    let mut per_genre: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for s in &stats {
        if keep.iter().any(|g| g == &s.genre) {
            per_genre
                .entry(s.genre.as_str())
                .or_default()
                // Negate the rank so rank 1 sits on top of the chart.
                .push([f64::from(s.decade), -f64::from(s.rank)]);
        }
    }

    static_plot!("ranking_evolution")
        .legend(Legend::default())
        .x_axis_label("Decade")
        .y_axis_label("Rank")
        .x_axis_formatter(|mark, _range| {
            if mark.value.rem_euclid(10.0) == 0.0 {
                format!("{:.0}s", mark.value)
            } else {
                String::new()
            }
        })
        .y_axis_formatter(|mark, _range| {
            let rank = -mark.value;
            if rank.fract() == 0.0 && rank >= 1.0 {
                format!("#{rank:.0}")
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            for (genre, points) in per_genre {
                plot_ui.line(
                    Line::new(PlotPoints::from(points))
                        .name(genre)
                        .color(colors.color_for(genre))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Production per year – stacked bars
// ---------------------------------------------------------------------------

fn production_bars(ui: &mut Ui, ds: &FilmDataset, rows: &[usize], colors: &GenreColors) {
    let counts = aggregate::films_per_year_genre(ds, rows);

    let mut per_genre: BTreeMap<String, Vec<Bar>> = BTreeMap::new();
    for ((year, genre), count) in counts {
        per_genre
            .entry(genre)
            .or_default()
            .push(Bar::new(f64::from(year), count as f64).width(0.8));
    }

    static_plot!("production_bars")
        .legend(Legend::default())
        .x_axis_label("Release year")
        .y_axis_label("Films")
        .show(ui, |plot_ui| {
            let mut drawn: Vec<BarChart> = Vec::new();
            for (genre, bars) in per_genre {
                let refs: Vec<&BarChart> = drawn.iter().collect();
                let chart = BarChart::new(bars)
                    .name(&genre)
                    .color(colors.color_for(&genre))
                    .stack_on(&refs);
                drawn.push(chart);
            }
            for chart in drawn {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Top genres – horizontal bars, instance counts
// ---------------------------------------------------------------------------

fn top_genres_chart(ui: &mut Ui, ds: &FilmDataset, rows: &[usize], colors: &GenreColors) {
    let ranked = aggregate::top_genres(ds, rows, TOP_GENRES);
    let names: Vec<String> = ranked.iter().rev().map(|(g, _)| g.clone()).collect();

    static_plot!("top_genres")
        .x_axis_label("Genre instances")
        .y_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < names.len() {
                names[i as usize].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            // Biggest genre on top.
            let n = ranked.len();
            for (i, (genre, count)) in ranked.iter().enumerate() {
                let bar = Bar::new((n - 1 - i) as f64, *count as f64).width(0.7);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .horizontal()
                        .color(colors.color_for(genre)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Rating density – Gaussian KDE per genre
// ---------------------------------------------------------------------------

fn rating_density(ui: &mut Ui, ds: &FilmDataset, rows: &[usize], colors: &GenreColors) {
    let dists = aggregate::rating_distributions(ds, rows);
    if dists.is_empty() {
        ui.label("Not enough rated films per genre for a density estimate.");
        return;
    }

    static_plot!("rating_density")
        .legend(Legend::default())
        .x_axis_label("IMDb rating")
        .y_axis_label("Density")
        .show(ui, |plot_ui| {
            for (genre, samples) in &dists {
                let curve = aggregate::kde_curve(samples, 200);
                plot_ui.line(
                    Line::new(PlotPoints::from(curve))
                        .name(genre)
                        .color(colors.color_for(genre))
                        .width(1.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Directors – bubble chart
// ---------------------------------------------------------------------------

fn directors_bubble(ui: &mut Ui, ds: &FilmDataset, rows: &[usize]) {
    let stats = aggregate::director_stats(ds, rows);
    if stats.is_empty() {
        ui.label(format!(
            "No director with at least {} films in the current view.",
            aggregate::MIN_DIRECTOR_FILMS
        ));
        return;
    }
    let max_films = stats.iter().map(|s| s.films).max().unwrap_or(1);

    static_plot!("directors_bubble")
        .x_axis_label("Average rating")
        .y_axis_label("Distinct genres")
        .show(ui, |plot_ui| {
            for stat in &stats {
                let Some(rating) = stat.mean_rating else {
                    continue;
                };
                let t = stat.films as f32 / max_films as f32;
                let point = [rating, stat.genres as f64];
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![point]))
                        .name(format!("{} ({} films)", stat.director, stat.films))
                        .color(heat_color(t))
                        .filled(true)
                        .radius(4.0 + 10.0 * t),
                );
                let last_name = stat.director.split_whitespace().last().unwrap_or("");
                plot_ui.text(Text::new(
                    PlotPoint::new(rating, stat.genres as f64 + 0.25),
                    RichText::new(last_name).small(),
                ));
            }
        });
}

/// Yellow-to-deep-orange ramp for the bubble sizes' companion colour.
fn heat_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t) as u8;
    Color32::from_rgb(lerp(0xFF, 0xBF), lerp(0xD5, 0x36), lerp(0x4F, 0x0C))
}

// ---------------------------------------------------------------------------
// Decade bar race
// ---------------------------------------------------------------------------

fn decade_race(
    ui: &mut Ui,
    ds: &FilmDataset,
    rows: &[usize],
    decades: &[i32],
    race: &mut DecadeRace,
    colors: &GenreColors,
) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("▶ Play").clicked() {
            race.play(decades.len());
        }
        if ui.button("⏸ Pause").clicked() {
            race.pause();
        }
        if ui.button("↺ Reset").clicked() {
            race.reset();
        }
        if let Some(idx) = race.display_index(decades.len()) {
            ui.label(format!(
                "{}s  (frame {} of {})",
                decades[idx],
                idx + 1,
                decades.len()
            ));
        }
    });

    let Some(idx) = race.display_index(decades.len()) else {
        ui.label("No decades in the current view.");
        return;
    };
    let decade = decades[idx];
    let ranked = aggregate::decade_top_counts(ds, rows, decade, TOP_GENRES);
    let names: Vec<String> = ranked.iter().rev().map(|(g, _)| g.clone()).collect();

    static_plot!("decade_race")
        .x_axis_label("Films")
        .y_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < names.len() {
                names[i as usize].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            let n = ranked.len();
            for (i, (genre, count)) in ranked.iter().enumerate() {
                let bar = Bar::new((n - 1 - i) as f64, *count as f64).width(0.7);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .horizontal()
                        .color(colors.color_for(genre)),
                );
            }
        });
}
