use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FilmRecord – one row of the base table
// ---------------------------------------------------------------------------

/// A single film (one row of the source table) after normalization.
///
/// `duration_min` and `rating` are `None` when the source value could not be
/// parsed; the record itself is kept so that non-duration / non-rating charts
/// can still use it. Only the release year is mandatory: rows without a
/// parseable year never make it into a [`FilmDataset`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmRecord {
    pub title: String,
    pub director: String,
    pub stars: String,
    pub release_year: i32,
    /// Duration string as found in the file, e.g. "142 min" or "2h 22m".
    pub duration_raw: String,
    /// Parsed minute count, absent when `duration_raw` is unparseable.
    pub duration_min: Option<u32>,
    /// Raw comma-separated genre list, e.g. "Drama, Action".
    pub category: String,
    /// IMDb rating in 0.0–10.0, absent when unparseable.
    pub rating: Option<f64>,
}

impl FilmRecord {
    /// Decade bucket: floor(year / 10) * 10, e.g. 1994 → 1990.
    pub fn decade(&self) -> i32 {
        (self.release_year / 10) * 10
    }

    /// Decade label, e.g. 1994 → "1990s".
    pub fn decade_label(&self) -> String {
        format!("{}s", self.decade())
    }

    /// Distinct trimmed non-empty genre tokens, in first-seen order.
    /// An empty or all-whitespace category yields `["Unknown"]`.
    pub fn genre_tokens(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut tokens = Vec::new();
        for tok in self.category.split(',') {
            let tok = tok.trim();
            if !tok.is_empty() && seen.insert(tok.to_string()) {
                tokens.push(tok.to_string());
            }
        }
        if tokens.is_empty() {
            tokens.push(UNKNOWN_GENRE.to_string());
        }
        tokens
    }
}

/// Genre tag used for films whose category field is missing or empty.
pub const UNKNOWN_GENRE: &str = "Unknown";

// ---------------------------------------------------------------------------
// GenreRow – one row of the exploded table
// ---------------------------------------------------------------------------

/// One (film, genre) pair of the exploded view. Carries an index into
/// [`FilmDataset::films`] instead of copying the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreRow {
    pub film: usize,
    pub genre: String,
}

// ---------------------------------------------------------------------------
// FilmDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Base table plus its exploded-by-genre view, immutable after load.
///
/// The exploded table has one row per (film, genre) pair, so its row count
/// counts genre-instances. Aggregates that want a film count must count
/// distinct titles instead of rows.
#[derive(Debug, Clone)]
pub struct FilmDataset {
    /// All films (base-table rows).
    pub films: Vec<FilmRecord>,
    /// Exploded view: one row per (film, genre) pair.
    pub exploded: Vec<GenreRow>,
    /// Sorted set of distinct genres in the exploded view.
    pub genres: BTreeSet<String>,
    /// Inclusive year range present in the data.
    pub year_min: i32,
    pub year_max: i32,
    /// Lowest rating among rated films; default filter floor.
    pub rating_min: f64,
}

impl FilmDataset {
    /// Build the exploded view and indices from the loaded films.
    pub fn from_films(films: Vec<FilmRecord>) -> Self {
        let mut exploded = Vec::new();
        let mut genres = BTreeSet::new();
        let mut year_min = i32::MAX;
        let mut year_max = i32::MIN;
        let mut rating_min = f64::INFINITY;

        for (idx, film) in films.iter().enumerate() {
            year_min = year_min.min(film.release_year);
            year_max = year_max.max(film.release_year);
            if let Some(r) = film.rating {
                rating_min = rating_min.min(r);
            }
            for genre in film.genre_tokens() {
                genres.insert(genre.clone());
                exploded.push(GenreRow { film: idx, genre });
            }
        }

        if !rating_min.is_finite() {
            rating_min = 0.0;
        }

        FilmDataset {
            films,
            exploded,
            genres,
            year_min,
            year_max,
            rating_min,
        }
    }

    /// Number of films in the base table.
    pub fn len(&self) -> usize {
        self.films.len()
    }

    /// Whether the base table is empty.
    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    /// The film record behind an exploded row.
    pub fn film_of(&self, row: &GenreRow) -> &FilmRecord {
        &self.films[row.film]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film(title: &str, year: i32, category: &str) -> FilmRecord {
        FilmRecord {
            title: title.to_string(),
            director: String::new(),
            stars: String::new(),
            release_year: year,
            duration_raw: String::new(),
            duration_min: None,
            category: category.to_string(),
            rating: None,
        }
    }

    #[test]
    fn decade_bucketing() {
        let f = film("x", 1994, "");
        assert_eq!(f.decade(), 1990);
        assert_eq!(f.decade_label(), "1990s");
        assert_eq!(film("y", 2000, "").decade_label(), "2000s");
    }

    #[test]
    fn genre_tokens_trim_dedupe_and_drop_empties() {
        let f = film("x", 2000, " Drama , Action,Drama, ,");
        assert_eq!(f.genre_tokens(), vec!["Drama", "Action"]);
    }

    #[test]
    fn empty_category_becomes_unknown() {
        assert_eq!(film("x", 2000, "").genre_tokens(), vec![UNKNOWN_GENRE]);
        assert_eq!(film("x", 2000, " , ").genre_tokens(), vec![UNKNOWN_GENRE]);
    }

    #[test]
    fn exploded_row_count_is_sum_of_distinct_tokens() {
        let films = vec![
            film("a", 2001, "Drama, Action"),
            film("b", 2002, "Drama"),
            film("c", 2003, ""),
        ];
        let ds = FilmDataset::from_films(films);
        assert_eq!(ds.exploded.len(), 2 + 1 + 1);
        assert_eq!(ds.year_min, 2001);
        assert_eq!(ds.year_max, 2003);
        assert!(ds.genres.contains(UNKNOWN_GENRE));
    }
}
