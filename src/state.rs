use std::time::{Duration, Instant};

use crate::data::aggregate;
use crate::data::filter::{filtered_rows, init_filter_state, FilterState};
use crate::data::model::FilmDataset;

// ---------------------------------------------------------------------------
// Decade bar-race state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    Stopped,
    Playing,
}

/// Cooperative animation state for the decade bar race.
///
/// The cursor indexes the sorted distinct decades of the filtered view.
/// Nothing here blocks: each egui frame calls [`DecadeRace::poll`], which
/// advances the cursor once the tick interval has elapsed and reports how
/// long until the next tick so the caller can schedule a repaint. Pause and
/// Reset therefore take effect between ticks, never mid-delay.
#[derive(Debug, Clone)]
pub struct DecadeRace {
    pub phase: RacePhase,
    pub cursor: usize,
    /// Speed multiplier; the tick delay is inversely proportional to it.
    pub speed: f32,
    last_tick: Option<Instant>,
}

impl Default for DecadeRace {
    fn default() -> Self {
        DecadeRace {
            phase: RacePhase::Stopped,
            cursor: 0,
            speed: 1.0,
            last_tick: None,
        }
    }
}

impl DecadeRace {
    pub fn is_playing(&self) -> bool {
        self.phase == RacePhase::Playing
    }

    /// Play event: Stopped → Playing. Restarts from the top after a
    /// completed run.
    pub fn play(&mut self, n_decades: usize) {
        if self.cursor >= n_decades {
            self.cursor = 0;
        }
        self.phase = RacePhase::Playing;
        self.last_tick = None;
    }

    /// Pause event: Playing → Stopped, cursor kept.
    pub fn pause(&mut self) {
        self.phase = RacePhase::Stopped;
        self.last_tick = None;
    }

    /// Reset event: any → Stopped, cursor → 0.
    pub fn reset(&mut self) {
        self.phase = RacePhase::Stopped;
        self.cursor = 0;
        self.last_tick = None;
    }

    /// Delay between frames, inversely proportional to the speed multiplier.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.speed.max(0.1))
    }

    /// Which decade index to render right now, clamped to the last frame.
    pub fn display_index(&self, n_decades: usize) -> Option<usize> {
        (n_decades > 0).then(|| self.cursor.min(n_decades - 1))
    }

    /// Advance one frame; running past the last decade auto-stops.
    fn advance(&mut self, n_decades: usize) {
        self.cursor += 1;
        if self.cursor >= n_decades {
            self.phase = RacePhase::Stopped;
        }
    }

    /// Per-frame driver. Returns how long until the next tick while playing
    /// (the caller schedules a repaint), `None` once stopped.
    pub fn poll(&mut self, n_decades: usize, now: Instant) -> Option<Duration> {
        if !self.is_playing() {
            return None;
        }
        if n_decades == 0 {
            self.reset();
            return None;
        }
        let interval = self.tick_interval();
        match self.last_tick {
            None => {
                // First frame of a run: render the current decade, then tick.
                self.last_tick = Some(now);
                Some(interval)
            }
            Some(t) => {
                let elapsed = now.duration_since(t);
                if elapsed < interval {
                    return Some(interval - elapsed);
                }
                self.last_tick = Some(now);
                self.advance(n_decades);
                self.is_playing().then_some(interval)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Per-session UI state, independent of rendering. Each session owns one of
/// these; the loaded tables are immutable and filtering only recomputes the
/// cached row indices.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<FilmDataset>,

    /// Current filter selections.
    pub filters: FilterState,

    /// Exploded-row indices passing the current filters (cached).
    pub visible_rows: Vec<usize>,

    /// Sorted distinct decades of the filtered view (race frames, cached).
    pub decades: Vec<i32>,

    /// Bar-race animation state.
    pub race: DecadeRace,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterState::default(),
            visible_rows: Vec::new(),
            decades: Vec::new(),
            race: DecadeRace::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and initialise filters.
    pub fn set_dataset(&mut self, dataset: FilmDataset) {
        self.filters = init_filter_state(&dataset);
        self.visible_rows = (0..dataset.exploded.len()).collect();
        self.decades = aggregate::decades(&dataset, &self.visible_rows);
        self.race.reset();
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Recompute the cached row indices and decade frames after a filter
    /// change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_rows = filtered_rows(ds, &self.filters);
            self.decades = aggregate::decades(ds, &self.visible_rows);
            if self.race.cursor >= self.decades.len() {
                self.race.reset();
            }
        }
    }

    /// Toggle one genre in the filter set. An empty set shows every genre.
    pub fn toggle_genre(&mut self, genre: &str) {
        if !self.filters.genres.remove(genre) {
            self.filters.genres.insert(genre.to_string());
        }
        self.refilter();
    }

    /// Drop the genre restriction entirely.
    pub fn clear_genres(&mut self) {
        self.filters.genres.clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_pause_reset_transitions() {
        let mut race = DecadeRace::default();
        assert_eq!(race.phase, RacePhase::Stopped);

        race.play(5);
        assert!(race.is_playing());

        race.pause();
        assert_eq!(race.phase, RacePhase::Stopped);

        race.cursor = 3;
        race.reset();
        assert_eq!(race.phase, RacePhase::Stopped);
        assert_eq!(race.cursor, 0);
    }

    #[test]
    fn tick_delay_is_inversely_proportional_to_speed() {
        let mut race = DecadeRace::default();
        race.speed = 2.0;
        assert_eq!(race.tick_interval(), Duration::from_millis(500));
        race.speed = 0.5;
        assert_eq!(race.tick_interval(), Duration::from_secs(2));
    }

    #[test]
    fn poll_advances_after_the_interval_and_auto_stops_at_the_end() {
        let mut race = DecadeRace::default();
        race.play(2);

        let t0 = Instant::now();
        // First poll renders frame 0 and schedules the first tick.
        assert!(race.poll(2, t0).is_some());
        assert_eq!(race.cursor, 0);

        // Before the interval: still on frame 0.
        assert!(race.poll(2, t0 + Duration::from_millis(100)).is_some());
        assert_eq!(race.cursor, 0);

        // Interval elapsed: advance to frame 1, still playing.
        assert!(race.poll(2, t0 + Duration::from_secs(1)).is_some());
        assert_eq!(race.cursor, 1);
        assert!(race.is_playing());

        // Next tick runs past the last decade: auto-stop.
        assert!(race.poll(2, t0 + Duration::from_secs(2)).is_none());
        assert!(!race.is_playing());
        assert_eq!(race.display_index(2), Some(1));
    }

    #[test]
    fn replay_after_completion_restarts_from_the_top() {
        let mut race = DecadeRace::default();
        race.cursor = 4;
        race.play(4);
        assert_eq!(race.cursor, 0);
        assert!(race.is_playing());
    }

    #[test]
    fn poll_with_no_decades_resets() {
        let mut race = DecadeRace::default();
        race.play(0);
        assert!(race.poll(0, Instant::now()).is_none());
        assert!(!race.is_playing());
        assert_eq!(race.display_index(0), None);
    }
}
