use anicat_core::stats::{
    average_rating, average_rating_for_genre, counts_by_status, genre_average_ratings,
    genre_distribution, summarize, top_genres, top_three_genres,
};
use anicat_core::{AnimeEntry, AnimeStore, Genre, Repository, StatisticsService, WatchStatus};

fn entry(title: &str, year: i32, genres: &[Genre], status: WatchStatus, rating: u8) -> AnimeEntry {
    let mut entry =
        AnimeEntry::series(title, year, "Studio", 12, genres.iter().copied(), false).unwrap();
    entry.status = status;
    if rating > 0 {
        entry.set_rating(rating).unwrap();
    }
    entry
}

fn catalog() -> Vec<AnimeEntry> {
    vec![
        entry("One", 2005, &[Genre::Shonen, Genre::Mecha], WatchStatus::Finished, 4),
        entry("Two", 1999, &[Genre::Shonen], WatchStatus::Watching, 2),
        entry("Three", 2015, &[Genre::Mecha, Genre::Seinen], WatchStatus::Finished, 0),
        entry("Four", 1999, &[Genre::Josei], WatchStatus::Finished, 4),
        entry("Five", 2015, &[Genre::Isekai], WatchStatus::ToWatch, 0),
    ]
}

#[test]
fn averages_ignore_unrated_and_default_to_zero() {
    let catalog = catalog();
    assert!((average_rating(&catalog) - 10.0 / 3.0).abs() < 1e-9);
    assert_eq!(average_rating_for_genre(&catalog, Genre::Shonen), 3.0);
    assert_eq!(average_rating_for_genre(&catalog, Genre::Isekai), 0.0);
    assert_eq!(average_rating_for_genre(&catalog, Genre::Shojo), 0.0);
    assert_eq!(average_rating(&[]), 0.0);

    let per_genre = genre_average_ratings(&catalog);
    assert_eq!(per_genre.get(&Genre::Mecha), Some(&4.0));
    assert!(!per_genre.contains_key(&Genre::Isekai));
}

#[test]
fn status_counts_always_cover_every_status() {
    let catalog = catalog();
    let counts = counts_by_status(&catalog);
    assert_eq!(counts.len(), WatchStatus::ALL.len());
    assert_eq!(counts[&WatchStatus::Finished], 3);
    assert_eq!(counts[&WatchStatus::Abandoned], 0);
    assert_eq!(counts.values().sum::<u64>(), catalog.len() as u64);

    let empty = counts_by_status(&[]);
    assert_eq!(empty.len(), 4);
    assert!(empty.values().all(|count| *count == 0));
}

#[test]
fn multi_genre_entries_count_once_per_genre() {
    let distribution = genre_distribution(&catalog());
    assert_eq!(distribution[&Genre::Shonen], 2);
    assert_eq!(distribution[&Genre::Mecha], 2);
    assert_eq!(distribution[&Genre::Seinen], 1);
    assert_eq!(distribution.values().sum::<u64>(), 7);
    assert!(!distribution.contains_key(&Genre::Shojo));
}

#[test]
fn genre_ties_follow_declaration_order() {
    let top = top_three_genres(&catalog());
    assert_eq!(
        top,
        vec![(Genre::Shonen, 2), (Genre::Mecha, 2), (Genre::Seinen, 1)]
    );
    assert_eq!(top_genres(&catalog(), 10).len(), 5);
    assert!(top_genres(&catalog(), 0).is_empty());
}

#[test]
fn summary_reports_extremes_with_first_encountered_ties() {
    let summary = summarize(&catalog());
    assert_eq!(summary.total, 5);
    assert_eq!(summary.rated, 3);
    assert_eq!(summary.oldest.as_ref().unwrap().title, "Two");
    assert_eq!(summary.newest.as_ref().unwrap().title, "Three");
    assert_eq!(summary.best_rated.as_ref().unwrap().title, "One");
    assert_eq!(summary.top_genres.len(), 3);

    let report = summary.to_string();
    assert!(report.contains("Total entries: 5"));
    assert!(report.contains("Best rated: One"));
}

#[test]
fn empty_summary_has_no_extremes() {
    let summary = summarize(&[]);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.average_rating, 0.0);
    assert!(summary.oldest.is_none());
    assert!(summary.best_rated.is_none());
    assert!(summary.top_genres.is_empty());
}

#[test]
fn service_figures_match_the_pure_functions() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AnimeStore::new(dir.path().join("animes.json"));
    store.save_all(catalog()).unwrap();

    let mut service = StatisticsService::new(&mut store);
    assert_eq!(service.summary().unwrap(), summarize(&catalog()));
    assert_eq!(service.counts_by_status().unwrap(), counts_by_status(&catalog()));
    assert_eq!(service.top_three_genres().unwrap(), top_three_genres(&catalog()));
    assert_eq!(service.genre_distribution().unwrap(), genre_distribution(&catalog()));
    assert_eq!(service.average_rating_for_genre(Genre::Josei).unwrap(), 4.0);
    assert_eq!(
        service.genre_average_ratings().unwrap(),
        genre_average_ratings(&catalog())
    );
    assert!((service.average_rating().unwrap() - average_rating(&catalog())).abs() < 1e-9);
}
