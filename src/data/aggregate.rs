//! Aggregates over the filtered exploded view.
//!
//! Each function is a pure, one-pass group-and-summarize over
//! `(dataset, row indices)`; none of them share state. The one invariant
//! they all respect: exploded row counts count genre-instances, so anything
//! presented as a film count goes through distinct titles instead.

use std::collections::{BTreeMap, BTreeSet};

use super::model::FilmDataset;

/// Directors need at least this many distinct titles to appear.
pub const MIN_DIRECTOR_FILMS: usize = 3;
/// How many directors the bubble chart keeps.
pub const TOP_DIRECTORS: usize = 15;
/// How many genres the popularity chart keeps.
pub const TOP_GENRES: usize = 10;

// ---------------------------------------------------------------------------
// KPI strip
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Kpis {
    /// Distinct titles, not exploded rows.
    pub total_films: usize,
    pub mean_rating: Option<f64>,
    /// Mean over distinct films with a parsed duration.
    pub mean_duration: Option<f64>,
    /// Director with the most distinct titles.
    pub top_director: Option<String>,
    pub year_span: Option<(i32, i32)>,
}

pub fn kpis(dataset: &FilmDataset, rows: &[usize]) -> Kpis {
    let mut titles = BTreeSet::new();
    let mut films_seen = BTreeSet::new();
    let mut rating_sum = 0.0;
    let mut rating_n = 0usize;
    let mut duration_sum = 0u64;
    let mut duration_n = 0usize;
    let mut director_titles: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut year_lo = i32::MAX;
    let mut year_hi = i32::MIN;

    for &i in rows {
        let row = &dataset.exploded[i];
        let film = dataset.film_of(row);
        titles.insert(film.title.as_str());
        year_lo = year_lo.min(film.release_year);
        year_hi = year_hi.max(film.release_year);

        if let Some(r) = film.rating {
            rating_sum += r;
            rating_n += 1;
        }

        // Duration and director KPIs count each film once, however many
        // genre rows it spans.
        if films_seen.insert(row.film) {
            if let Some(d) = film.duration_min {
                duration_sum += u64::from(d);
                duration_n += 1;
            }
            if !film.director.is_empty() {
                director_titles
                    .entry(film.director.as_str())
                    .or_default()
                    .insert(film.title.as_str());
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (name, credited) in &director_titles {
        let n = credited.len();
        let better = match best {
            None => true,
            Some((best_name, best_n)) => n > best_n || (n == best_n && *name < best_name),
        };
        if better {
            best = Some((*name, n));
        }
    }
    let top_director = best.map(|(name, _)| name.to_string());

    Kpis {
        total_films: titles.len(),
        mean_rating: (rating_n > 0).then(|| rating_sum / rating_n as f64),
        mean_duration: (duration_n > 0).then(|| duration_sum as f64 / duration_n as f64),
        top_director,
        year_span: (!rows.is_empty()).then_some((year_lo, year_hi)),
    }
}

/// Distinct-title count of a filtered view. Always ≤ the view's row count,
/// with equality iff every surviving film has exactly one genre.
pub fn distinct_titles(dataset: &FilmDataset, rows: &[usize]) -> usize {
    rows.iter()
        .map(|&i| dataset.film_of(&dataset.exploded[i]).title.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

// ---------------------------------------------------------------------------
// Per-decade per-genre counts, mean rating, dense rank
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DecadeGenreStat {
    pub decade: i32,
    pub genre: String,
    pub count: usize,
    pub mean_rating: Option<f64>,
    /// Dense rank within the decade, descending by count: ties share a rank
    /// and the next distinct count takes the next integer.
    pub rank: u32,
}

pub fn decade_genre_stats(dataset: &FilmDataset, rows: &[usize]) -> Vec<DecadeGenreStat> {
    let mut groups: BTreeMap<(i32, &str), (usize, f64, usize)> = BTreeMap::new();
    for &i in rows {
        let row = &dataset.exploded[i];
        let film = dataset.film_of(row);
        let entry = groups
            .entry((film.decade(), row.genre.as_str()))
            .or_insert((0, 0.0, 0));
        entry.0 += 1;
        if let Some(r) = film.rating {
            entry.1 += r;
            entry.2 += 1;
        }
    }

    // Rank per decade: sort by count descending (genre name breaks ties for
    // determinism), then assign dense ranks.
    let mut per_decade: BTreeMap<i32, Vec<DecadeGenreStat>> = BTreeMap::new();
    for ((decade, genre), (count, sum, n)) in groups {
        per_decade.entry(decade).or_default().push(DecadeGenreStat {
            decade,
            genre: genre.to_string(),
            count,
            mean_rating: (n > 0).then(|| sum / n as f64),
            rank: 0,
        });
    }

    let mut out = Vec::new();
    for (_, mut stats) in per_decade {
        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genre.cmp(&b.genre)));
        let mut rank = 0u32;
        let mut prev_count = usize::MAX;
        for stat in &mut stats {
            if stat.count != prev_count {
                rank += 1;
                prev_count = stat.count;
            }
            stat.rank = rank;
        }
        out.extend(stats);
    }
    out
}

// ---------------------------------------------------------------------------
// Per-year per-genre counts (stacked production bars)
// ---------------------------------------------------------------------------

pub fn films_per_year_genre(
    dataset: &FilmDataset,
    rows: &[usize],
) -> BTreeMap<(i32, String), usize> {
    let mut counts = BTreeMap::new();
    for &i in rows {
        let row = &dataset.exploded[i];
        let year = dataset.film_of(row).release_year;
        *counts.entry((year, row.genre.clone())).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Top genres by instance count
// ---------------------------------------------------------------------------

pub fn top_genres(dataset: &FilmDataset, rows: &[usize], n: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for &i in rows {
        *counts.entry(dataset.exploded[i].genre.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(g, c)| (g.to_string(), c))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Director aggregates (bubble chart)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DirectorStat {
    pub director: String,
    /// Distinct titles, never genre-instance rows.
    pub films: usize,
    /// Mean rating over distinct films with a rating.
    pub mean_rating: Option<f64>,
    pub genres: usize,
}

pub fn director_stats(dataset: &FilmDataset, rows: &[usize]) -> Vec<DirectorStat> {
    struct Acc<'a> {
        titles: BTreeSet<&'a str>,
        genres: BTreeSet<&'a str>,
        // per-title rating so multi-genre films are not double counted
        ratings: BTreeMap<&'a str, Option<f64>>,
    }

    let mut per_director: BTreeMap<&str, Acc> = BTreeMap::new();
    for &i in rows {
        let row = &dataset.exploded[i];
        let film = dataset.film_of(row);
        if film.director.is_empty() {
            continue;
        }
        let acc = per_director
            .entry(film.director.as_str())
            .or_insert_with(|| Acc {
                titles: BTreeSet::new(),
                genres: BTreeSet::new(),
                ratings: BTreeMap::new(),
            });
        acc.titles.insert(film.title.as_str());
        acc.genres.insert(row.genre.as_str());
        acc.ratings.entry(film.title.as_str()).or_insert(film.rating);
    }

    let mut stats: Vec<DirectorStat> = per_director
        .into_iter()
        .filter(|(_, acc)| acc.titles.len() >= MIN_DIRECTOR_FILMS)
        .map(|(director, acc)| {
            let rated: Vec<f64> = acc.ratings.values().flatten().copied().collect();
            DirectorStat {
                director: director.to_string(),
                films: acc.titles.len(),
                mean_rating: (!rated.is_empty())
                    .then(|| rated.iter().sum::<f64>() / rated.len() as f64),
                genres: acc.genres.len(),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.films.cmp(&a.films).then_with(|| a.director.cmp(&b.director)));
    stats.truncate(TOP_DIRECTORS);
    stats
}

// ---------------------------------------------------------------------------
// Per-genre rating distributions (density chart)
// ---------------------------------------------------------------------------

/// Rating samples per genre. Genres with at most one rated film are left
/// out: a density estimate over a single point is undefined.
pub fn rating_distributions(dataset: &FilmDataset, rows: &[usize]) -> BTreeMap<String, Vec<f64>> {
    let mut dists: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for &i in rows {
        let row = &dataset.exploded[i];
        if let Some(r) = dataset.film_of(row).rating {
            dists.entry(row.genre.clone()).or_default().push(r);
        }
    }
    dists.retain(|_, samples| samples.len() > 1);
    dists
}

/// Gaussian kernel density estimate sampled at `points` positions across the
/// sample range (Silverman's rule-of-thumb bandwidth).
pub fn kde_curve(samples: &[f64], points: usize) -> Vec<[f64; 2]> {
    if samples.len() < 2 || points < 2 {
        return Vec::new();
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    let bandwidth = if std > 0.0 {
        1.06 * std * n.powf(-0.2)
    } else {
        0.1
    };

    let lo = samples.iter().cloned().fold(f64::INFINITY, f64::min) - 3.0 * bandwidth;
    let hi = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + 3.0 * bandwidth;
    let step = (hi - lo) / (points - 1) as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density: f64 = samples
                .iter()
                .map(|&s| (-0.5 * ((x - s) / bandwidth).powi(2)).exp())
                .sum();
            [x, norm * density]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Decade frames (bar race)
// ---------------------------------------------------------------------------

/// Sorted distinct decades present in the filtered view.
pub fn decades(dataset: &FilmDataset, rows: &[usize]) -> Vec<i32> {
    rows.iter()
        .map(|&i| dataset.film_of(&dataset.exploded[i]).decade())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Top-N genre counts within one decade, descending.
pub fn decade_top_counts(
    dataset: &FilmDataset,
    rows: &[usize],
    decade: i32,
    n: usize,
) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for &i in rows {
        let row = &dataset.exploded[i];
        if dataset.film_of(row).decade() == decade {
            *counts.entry(row.genre.as_str()).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(g, c)| (g.to_string(), c))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{FilmDataset, FilmRecord};

    fn film(
        title: &str,
        director: &str,
        year: i32,
        duration: &str,
        category: &str,
        rating: Option<f64>,
    ) -> FilmRecord {
        FilmRecord {
            title: title.to_string(),
            director: director.to_string(),
            stars: String::new(),
            release_year: year,
            duration_raw: duration.to_string(),
            duration_min: crate::data::loader::parse_duration(duration),
            category: category.to_string(),
            rating,
        }
    }

    fn all_rows(ds: &FilmDataset) -> Vec<usize> {
        (0..ds.exploded.len()).collect()
    }

    #[test]
    fn dense_ranking_shares_ranks_without_gaps() {
        // One decade with counts Drama:10, Action:10, Comedy:5.
        let mut films = Vec::new();
        for i in 0..10 {
            films.push(film(&format!("d{i}"), "", 1995, "", "Drama", None));
            films.push(film(&format!("a{i}"), "", 1995, "", "Action", None));
        }
        for i in 0..5 {
            films.push(film(&format!("c{i}"), "", 1995, "", "Comedy", None));
        }
        let ds = FilmDataset::from_films(films);
        let stats = decade_genre_stats(&ds, &all_rows(&ds));

        let rank_of = |genre: &str| stats.iter().find(|s| s.genre == genre).unwrap().rank;
        assert_eq!(rank_of("Drama"), 1);
        assert_eq!(rank_of("Action"), 1);
        assert_eq!(rank_of("Comedy"), 2);
    }

    #[test]
    fn ranks_are_recomputed_per_decade() {
        let ds = FilmDataset::from_films(vec![
            film("a", "", 1985, "", "Drama", Some(8.0)),
            film("b", "", 1985, "", "Drama", Some(7.0)),
            film("c", "", 1985, "", "Comedy", None),
            film("d", "", 1995, "", "Comedy", None),
        ]);
        let stats = decade_genre_stats(&ds, &all_rows(&ds));
        let find = |decade: i32, genre: &str| {
            stats
                .iter()
                .find(|s| s.decade == decade && s.genre == genre)
                .unwrap()
        };
        assert_eq!(find(1980, "Drama").rank, 1);
        assert_eq!(find(1980, "Comedy").rank, 2);
        assert_eq!(find(1990, "Comedy").rank, 1);

        // Mean rating is null-aware per group.
        assert_eq!(find(1980, "Drama").mean_rating, Some(7.5));
        assert_eq!(find(1980, "Comedy").mean_rating, None);
    }

    #[test]
    fn partially_parseable_rows_end_to_end() {
        let ds = FilmDataset::from_films(vec![
            film("Film A", "", 2015, "120 min", "Drama, Action", Some(8.1)),
            film("Film B", "", 2015, "abc", "Drama", Some(7.9)),
        ]);
        let rows = all_rows(&ds);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.exploded.len(), 3);
        assert_eq!(distinct_titles(&ds, &rows), 2);

        let k = kpis(&ds, &rows);
        assert_eq!(k.total_films, 2);
        // Film B's duration is absent, not zero: mean over valid values.
        assert_eq!(k.mean_duration, Some(120.0));
        assert_eq!(k.year_span, Some((2015, 2015)));
    }

    #[test]
    fn distinct_titles_never_exceeds_row_count() {
        let ds = FilmDataset::from_films(vec![
            film("a", "", 2000, "", "Drama, Action", None),
            film("b", "", 2000, "", "Comedy", None),
        ]);
        let rows = all_rows(&ds);
        assert!(distinct_titles(&ds, &rows) <= rows.len());

        // Equality iff every film has exactly one genre.
        let single = FilmDataset::from_films(vec![
            film("a", "", 2000, "", "Drama", None),
            film("b", "", 2000, "", "Comedy", None),
        ]);
        let rows = all_rows(&single);
        assert_eq!(distinct_titles(&single, &rows), rows.len());
    }

    #[test]
    fn director_threshold_counts_distinct_titles_not_rows() {
        // Two films with many genres each: 8 exploded rows but only 2 titles.
        let ds = FilmDataset::from_films(vec![
            film("a", "Busy", 2000, "", "Drama, Action, Comedy, Crime", None),
            film("b", "Busy", 2001, "", "Drama, Action, Comedy, Crime", None),
            film("c", "Steady", 2000, "", "Drama", Some(8.0)),
            film("d", "Steady", 2001, "", "Comedy", Some(7.0)),
            film("e", "Steady", 2002, "", "Drama", Some(9.0)),
        ]);
        let stats = director_stats(&ds, &all_rows(&ds));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].director, "Steady");
        assert_eq!(stats[0].films, 3);
        assert_eq!(stats[0].genres, 2);
        assert_eq!(stats[0].mean_rating, Some(8.0));
    }

    #[test]
    fn top_genres_ranks_by_instance_count() {
        let ds = FilmDataset::from_films(vec![
            film("a", "", 2000, "", "Drama, Action", None),
            film("b", "", 2000, "", "Drama", None),
            film("c", "", 2000, "", "Comedy", None),
        ]);
        let top = top_genres(&ds, &all_rows(&ds), 2);
        assert_eq!(top, vec![("Drama".to_string(), 2), ("Action".to_string(), 1)]);
    }

    #[test]
    fn single_sample_genres_are_left_out_of_distributions() {
        let ds = FilmDataset::from_films(vec![
            film("a", "", 2000, "", "Drama", Some(8.0)),
            film("b", "", 2000, "", "Drama", Some(7.5)),
            film("c", "", 2000, "", "Comedy", Some(7.0)),
            film("d", "", 2000, "", "Action", None),
            film("e", "", 2000, "", "Action", None),
        ]);
        let dists = rating_distributions(&ds, &all_rows(&ds));
        assert!(dists.contains_key("Drama"));
        assert!(!dists.contains_key("Comedy")); // one rated film
        assert!(!dists.contains_key("Action")); // no rated films
    }

    #[test]
    fn kde_integrates_to_roughly_one() {
        let samples = [7.6, 7.8, 8.0, 8.1, 8.3, 8.7, 9.0];
        let curve = kde_curve(&samples, 256);
        assert!(!curve.is_empty());
        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * step).sum();
        assert!((area - 1.0).abs() < 0.05, "area = {area}");
    }

    #[test]
    fn decade_frames_are_sorted_and_distinct() {
        let ds = FilmDataset::from_films(vec![
            film("a", "", 1994, "", "Drama", None),
            film("b", "", 1991, "", "Action", None),
            film("c", "", 2003, "", "Drama", None),
        ]);
        assert_eq!(decades(&ds, &all_rows(&ds)), vec![1990, 2000]);
        let top = decade_top_counts(&ds, &all_rows(&ds), 1990, 10);
        assert_eq!(top.len(), 2);
    }
}
