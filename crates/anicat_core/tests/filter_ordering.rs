use anicat_core::search::ordering::{sort_entries, sorted};
use anicat_core::{
    AnimeEntry, AnimeFilter, ByRating, ByTitle, ByYear, EntryOrdering, Genre, WatchStatus,
};

fn series(title: &str, year: i32, genres: &[Genre], rating: u8) -> AnimeEntry {
    let mut entry =
        AnimeEntry::series(title, year, "Studio", 12, genres.iter().copied(), false).unwrap();
    if rating > 0 {
        entry.set_rating(rating).unwrap();
    }
    entry
}

fn titles(entries: &[AnimeEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.title.as_str()).collect()
}

fn sample_catalog() -> Vec<AnimeEntry> {
    let mut watching = series("Gurren Lagann", 2007, &[Genre::Mecha, Genre::Shonen], 5);
    watching.status = WatchStatus::Watching;
    vec![
        series("Evangelion", 1995, &[Genre::Mecha], 4),
        watching,
        series("Nana", 2006, &[Genre::Josei], 0),
        series("Re:Zero", 2016, &[Genre::Isekai], 3),
    ]
}

#[test]
fn genre_and_min_rating_select_the_intersection() {
    let catalog = vec![
        series("A", 2000, &[Genre::Mecha], 5),
        series("B", 2000, &[Genre::Mecha], 3),
        series("C", 2000, &[Genre::Shonen], 5),
    ];
    let filter = AnimeFilter::new().genre(Genre::Mecha).min_rating(4);
    assert_eq!(titles(&filter.apply(&catalog)), ["A"]);
}

#[test]
fn unconfigured_filter_matches_everything() {
    let catalog = sample_catalog();
    let filter = AnimeFilter::new();
    assert!(filter.is_unconstrained());
    assert_eq!(filter.apply(&catalog).len(), catalog.len());
}

#[test]
fn clause_order_does_not_change_the_result() {
    let catalog = sample_catalog();
    let forward = AnimeFilter::new()
        .genre(Genre::Mecha)
        .year_range(Some(2000), None)
        .status(WatchStatus::Watching)
        .min_rating(2);
    let backward = AnimeFilter::new()
        .min_rating(2)
        .status(WatchStatus::Watching)
        .year_range(Some(2000), None)
        .genre(Genre::Mecha);

    assert_eq!(titles(&forward.apply(&catalog)), ["Gurren Lagann"]);
    assert_eq!(
        titles(&forward.apply(&catalog)),
        titles(&backward.apply(&catalog))
    );
}

#[test]
fn blank_and_zero_criteria_are_ignored() {
    let catalog = sample_catalog();
    let filter = AnimeFilter::new()
        .title("   ")
        .min_rating(0)
        .any_genre(Vec::new())
        .maybe_genre(None)
        .maybe_status(None);
    assert!(filter.is_unconstrained());
    assert_eq!(filter.apply(&catalog).len(), 4);
}

#[test]
fn min_rating_and_only_rated_exclude_unrated_entries() {
    let catalog = sample_catalog();
    assert_eq!(
        titles(&AnimeFilter::new().only_rated().apply(&catalog)),
        ["Evangelion", "Gurren Lagann", "Re:Zero"]
    );
    assert_eq!(
        titles(&AnimeFilter::new().min_rating(4).apply(&catalog)),
        ["Evangelion", "Gurren Lagann"]
    );
}

#[test]
fn any_genre_and_studio_match_partially() {
    let catalog = sample_catalog();
    let filter = AnimeFilter::new()
        .any_genre([Genre::Josei, Genre::Isekai])
        .studio("stud");
    assert_eq!(titles(&filter.apply(&catalog)), ["Nana", "Re:Zero"]);
    assert!(AnimeFilter::new()
        .studio("ghibli")
        .apply(&catalog)
        .is_empty());
}

#[test]
fn year_range_is_inclusive_and_open_ended() {
    let catalog = sample_catalog();
    let filter = AnimeFilter::new().year_range(Some(1995), Some(2006));
    assert_eq!(
        titles(&filter.apply(&catalog)),
        ["Evangelion", "Nana"]
    );
    let upper_only = AnimeFilter::new().year_range(None, Some(2006));
    assert_eq!(upper_only.apply(&catalog).len(), 2);
}

#[test]
fn title_sort_directions_are_exact_reverses() {
    let catalog = sample_catalog();
    let ascending = sorted(catalog.clone(), &ByTitle::ascending());
    let mut descending = sorted(catalog, &ByTitle::descending());
    descending.reverse();
    assert_eq!(titles(&ascending), titles(&descending));
    assert_eq!(
        titles(&ascending),
        ["Evangelion", "Gurren Lagann", "Nana", "Re:Zero"]
    );
}

#[test]
fn unrated_entries_sort_last_in_both_directions() {
    let catalog = vec![
        series("X", 2000, &[Genre::Shonen], 0),
        series("Y", 2000, &[Genre::Shonen], 2),
        series("Z", 2000, &[Genre::Shonen], 5),
    ];
    assert_eq!(
        titles(&sorted(catalog.clone(), &ByRating::descending())),
        ["Z", "Y", "X"]
    );
    assert_eq!(
        titles(&sorted(catalog, &ByRating::ascending())),
        ["Y", "Z", "X"]
    );
}

#[test]
fn equal_keys_keep_catalog_order() {
    let mut catalog = vec![
        series("First", 2010, &[Genre::Shonen], 4),
        series("Second", 2001, &[Genre::Shonen], 4),
        series("Third", 2010, &[Genre::Shonen], 4),
        series("Fourth", 2005, &[Genre::Shonen], 0),
        series("Fifth", 2001, &[Genre::Shonen], 0),
    ];
    assert_eq!(
        titles(&sorted(catalog.clone(), &ByRating::default())),
        ["First", "Second", "Third", "Fourth", "Fifth"]
    );

    sort_entries(&mut catalog, &ByYear::default());
    assert_eq!(
        titles(&catalog),
        ["First", "Third", "Fourth", "Second", "Fifth"]
    );
}

#[test]
fn strategies_describe_themselves() {
    let strategies: Vec<Box<dyn EntryOrdering>> = vec![
        Box::new(ByTitle::default()),
        Box::new(ByYear::default()),
        Box::new(ByRating::default()),
    ];
    let descriptions: Vec<String> = strategies.iter().map(|s| s.description()).collect();
    assert_eq!(
        descriptions,
        [
            "By title (A-Z)",
            "By year (newest first)",
            "By rating (best first)"
        ]
    );
}
