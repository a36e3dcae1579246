use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{FilmDataset, FilmRecord};

// ---------------------------------------------------------------------------
// Header normalization
// ---------------------------------------------------------------------------

// Source files come in at least two header conventions; both map onto one
// canonical schema. First alias wins.
const TITLE_ALIASES: &[&str] = &["Title", "Name"];
const DIRECTOR_ALIASES: &[&str] = &["Director", "Directors"];
const STARS_ALIASES: &[&str] = &["Stars", "Actors"];
const YEAR_ALIASES: &[&str] = &["ReleaseYear", "Year"];
const DURATION_ALIASES: &[&str] = &["Duration", "Runtime"];
const CATEGORY_ALIASES: &[&str] = &["Category", "Genres"];
const RATING_ALIASES: &[&str] = &["IMDb-Rating", "Rating"];

/// Resolved column indices for one CSV header row.
/// Title and year are required; everything else degrades to an empty field.
struct ColumnMap {
    title: usize,
    year: usize,
    director: Option<usize>,
    stars: Option<usize>,
    duration: Option<usize>,
    category: Option<usize>,
    rating: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> Result<Self, DataError> {
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|a| headers.iter().position(|h| h == a))
        };
        Ok(ColumnMap {
            title: find(TITLE_ALIASES).ok_or(DataError::MissingColumn("Title"))?,
            year: find(YEAR_ALIASES).ok_or(DataError::MissingColumn("ReleaseYear"))?,
            director: find(DIRECTOR_ALIASES),
            stars: find(STARS_ALIASES),
            duration: find(DURATION_ALIASES),
            category: find(CATEGORY_ALIASES),
            rating: find(RATING_ALIASES),
        })
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a film dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row in either accepted naming convention
/// * `.json` – records orient: `[{ "Title": ..., "ReleaseYear": ..., ... }]`
pub fn load_file(path: &Path) -> Result<FilmDataset, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => Err(DataError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parse a release year. Accepts plain integers and float-formatted values
/// ("2015.0"); anything else is a missing year and the row is dropped.
fn parse_year(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(f as i32),
        _ => None,
    }
}

/// Parse a duration string into whole minutes.
///
/// Accepted forms: `"142 min"`, `"2h 22m"`, `"2h"`, plain `"142"`.
/// Unparseable values become `None`; the record is kept and duration-based
/// aggregates skip it. Idempotent on already-clean integer values.
pub fn parse_duration(raw: &str) -> Option<u32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(stripped) = s.strip_suffix("min") {
        return stripped.trim().parse().ok();
    }
    if let Some((hours, rest)) = s.split_once(['h', 'H']) {
        let hours: u32 = hours.trim().parse().ok()?;
        let rest = rest.trim();
        let minutes: u32 = if rest.is_empty() {
            0
        } else {
            rest.trim_end_matches(['m', 'M']).trim().parse().ok()?
        };
        return Some(hours * 60 + minutes);
    }
    s.parse().ok()
}

fn parse_rating(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

/// Assemble a record from already-normalized field strings. Returns `None`
/// when the year is unparseable (the row is dropped from both tables).
fn build_record(
    title: String,
    director: String,
    stars: String,
    year: &str,
    duration: String,
    category: String,
    rating: &str,
) -> Option<FilmRecord> {
    let release_year = parse_year(year)?;
    let duration_min = parse_duration(&duration);
    if duration_min.is_none() && !duration.trim().is_empty() {
        log::debug!("unparseable duration '{duration}' for '{title}', field left absent");
    }
    let rating = parse_rating(rating);
    Some(FilmRecord {
        title,
        director,
        stars,
        release_year,
        duration_raw: duration,
        duration_min,
        category,
        rating,
    })
}

fn finish(films: Vec<FilmRecord>, dropped: usize) -> Result<FilmDataset, DataError> {
    if dropped > 0 {
        log::info!("dropped {dropped} rows without a parseable release year");
    }
    if films.is_empty() {
        return Err(DataError::NoValidYears);
    }
    Ok(FilmDataset::from_films(films))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<FilmDataset, DataError> {
    let file = File::open(path).map_err(|e| DataError::Unavailable {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_csv(csv::Reader::from_reader(file))
}

fn parse_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<FilmDataset, DataError> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")
        .map_err(DataError::Malformed)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let cols = ColumnMap::resolve(&headers)?;

    let mut films = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result
            .with_context(|| format!("CSV row {row_no}"))
            .map_err(DataError::Malformed)?;

        let get = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i)).unwrap_or("").to_string()
        };

        match build_record(
            get(Some(cols.title)),
            get(cols.director),
            get(cols.stars),
            record.get(cols.year).unwrap_or(""),
            get(cols.duration),
            get(cols.category),
            &get(cols.rating),
        ) {
            Some(film) => films.push(film),
            None => dropped += 1,
        }
    }

    finish(films, dropped)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')`), with
/// the same header aliases as the CSV loader.
fn load_json(path: &Path) -> Result<FilmDataset, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::Unavailable {
        path: path.to_path_buf(),
        source: e,
    })?;
    let root: JsonValue = serde_json::from_str(&text)
        .context("parsing JSON")
        .map_err(DataError::Malformed)?;

    let records = root
        .as_array()
        .context("expected top-level JSON array")
        .map_err(DataError::Malformed)?;

    let mut films = Vec::new();
    let mut dropped = 0usize;

    for rec in records {
        let Some(obj) = rec.as_object() else {
            dropped += 1;
            continue;
        };
        let field = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|a| obj.get(*a))
                .map(json_to_text)
                .unwrap_or_default()
        };

        match build_record(
            field(TITLE_ALIASES),
            field(DIRECTOR_ALIASES),
            field(STARS_ALIASES),
            &field(YEAR_ALIASES),
            field(DURATION_ALIASES),
            field(CATEGORY_ALIASES),
            &field(RATING_ALIASES),
        ) {
            Some(film) => films.push(film),
            None => dropped += 1,
        }
    }

    finish(films, dropped)
}

/// Flatten a JSON scalar to the text form the field parsers accept.
fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
