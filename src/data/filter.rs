use std::collections::BTreeSet;

use super::model::FilmDataset;

// ---------------------------------------------------------------------------
// Filter predicate over the exploded view
// ---------------------------------------------------------------------------

/// Per-session filter selections.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Inclusive release-year bounds.
    pub year_range: (i32, i32),
    /// Selected genres. An EMPTY set means "no genre restriction", not
    /// "exclude everything" – the default UI state relies on this.
    pub genres: BTreeSet<String>,
    /// Minimum rating; films without a rating pass.
    pub min_rating: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            year_range: (0, 0),
            genres: BTreeSet::new(),
            min_rating: 0.0,
        }
    }
}

/// Initialise a [`FilterState`] that keeps the whole dataset: full year
/// range, no genre restriction, the global minimum rating as floor.
pub fn init_filter_state(dataset: &FilmDataset) -> FilterState {
    FilterState {
        year_range: (dataset.year_min, dataset.year_max),
        genres: BTreeSet::new(),
        min_rating: dataset.rating_min,
    }
}

/// Return indices into `dataset.exploded` of rows passing all filters.
///
/// A row passes when its film's year falls within the inclusive bounds, its
/// genre is selected (or nothing is selected), and its film's rating – when
/// present – is at least `min_rating`. Pure: never mutates the tables.
pub fn filtered_rows(dataset: &FilmDataset, filters: &FilterState) -> Vec<usize> {
    let (lo, hi) = filters.year_range;
    dataset
        .exploded
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let film = dataset.film_of(row);
            if film.release_year < lo || film.release_year > hi {
                return false;
            }
            if !filters.genres.is_empty() && !filters.genres.contains(&row.genre) {
                return false;
            }
            match film.rating {
                Some(r) => r >= filters.min_rating,
                None => true,
            }
        })
        .map(|(i, _)| i)
        .collect()
}
