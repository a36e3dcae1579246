use std::fs;
use std::path::PathBuf;

use cinelens::data::aggregate;
use cinelens::data::error::DataError;
use cinelens::data::filter::{filtered_rows, init_filter_state};
use cinelens::data::loader::load_file;

const SOURCE: &str = "\
Title,Director,Stars,ReleaseYear,Duration,Category,IMDb-Rating
The Long Road,Ava Lindqvist,\"R. Calloway, M. Trent\",1994,142 min,\"Drama, Adventure\",8.4
Night Shift,Marco Beltrane,\"D. Osei, F. Marchetti\",1994,2h 22m,Crime,8.1
Night Shift,Sofia Ueda,\"K. Larsen, T. Ibarra\",2011,98 min,\"Crime, Thriller\",7.7
Quiet Hours,Ava Lindqvist,\"S. Novak, A. Reyes\",2003,n/a,Drama,7.9
Lost Reel,Hal Okafor,\"R. Calloway, M. Trent\",not-a-year,101 min,Comedy,7.6
Uncatalogued,June Carraway,\"D. Osei, F. Marchetti\",1987,95 min,,8.9
";

fn write_temp_csv(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("cinelens_pipeline_tests");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, SOURCE).unwrap();
    path
}

#[test]
fn load_prepares_base_and_exploded_tables() {
    let path = write_temp_csv("films.csv");
    let ds = load_file(&path).unwrap();

    // "Lost Reel" has no parseable year and is dropped from both tables.
    assert_eq!(ds.len(), 5);
    assert!(ds.films.iter().all(|f| f.title != "Lost Reel"));

    // Exploded row count is the sum of max(1, distinct genre tokens).
    assert_eq!(ds.exploded.len(), 2 + 1 + 2 + 1 + 1);
    assert!(ds.genres.contains("Unknown"));

    // "2h 22m" and "142 min" both parse to 142; "n/a" stays absent.
    assert_eq!(ds.films[0].duration_min, Some(142));
    assert_eq!(ds.films[1].duration_min, Some(142));
    let quiet = ds.films.iter().find(|f| f.title == "Quiet Hours").unwrap();
    assert_eq!(quiet.duration_min, None);

    fs::remove_file(&path).ok();
}

#[test]
fn default_filter_is_identity_and_counts_respect_distinct_titles() {
    let path = write_temp_csv("films_identity.csv");
    let ds = load_file(&path).unwrap();

    let filters = init_filter_state(&ds);
    let rows = filtered_rows(&ds, &filters);
    assert_eq!(rows.len(), ds.exploded.len());

    // "Night Shift" is a remake sharing a title: 5 base rows, 4 titles.
    let kpis = aggregate::kpis(&ds, &rows);
    assert_eq!(kpis.total_films, 4);
    assert!(aggregate::distinct_titles(&ds, &rows) <= rows.len());

    // Mean duration skips the absent marker: (142 + 142 + 98 + 95) / 4.
    assert_eq!(kpis.mean_duration, Some(119.25));

    fs::remove_file(&path).ok();
}

#[test]
fn filtered_aggregates_feed_the_race_frames() {
    let path = write_temp_csv("films_race.csv");
    let ds = load_file(&path).unwrap();

    let mut filters = init_filter_state(&ds);
    filters.genres.insert("Crime".to_string());
    let rows = filtered_rows(&ds, &filters);

    let decades = aggregate::decades(&ds, &rows);
    assert_eq!(decades, vec![1990, 2010]);

    let top = aggregate::decade_top_counts(&ds, &rows, 1990, 10);
    assert_eq!(top, vec![("Crime".to_string(), 1)]);

    fs::remove_file(&path).ok();
}

#[test]
fn missing_file_surfaces_data_unavailable() {
    let err = load_file(std::path::Path::new("/no/such/films.csv")).unwrap_err();
    assert!(matches!(err, DataError::Unavailable { .. }));
}
