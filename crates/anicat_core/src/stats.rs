//! Read-only catalog statistics.
//!
//! # Responsibility
//! - Aggregate ratings, statuses and genres over one collection snapshot.
//!
//! # Invariants
//! - Averages only count rated entries and are `0.0` when nothing is rated.
//! - Status counts always hold every `WatchStatus` key.
//! - Genre ranking ties fall back to genre declaration order.
//! - Extremes keep the first entry encountered on ties.

use crate::model::anime::{AnimeEntry, Genre, WatchStatus};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

const SUMMARY_TOP_GENRES: usize = 3;

/// Mean rating over rated entries.
pub fn average_rating(entries: &[AnimeEntry]) -> f64 {
    mean_rating(entries.iter())
}

/// Mean rating over rated entries carrying `genre`.
pub fn average_rating_for_genre(entries: &[AnimeEntry], genre: Genre) -> f64 {
    mean_rating(entries.iter().filter(|entry| entry.has_genre(genre)))
}

/// Per-genre averages, omitting genres with no rated entry.
pub fn genre_average_ratings(entries: &[AnimeEntry]) -> BTreeMap<Genre, f64> {
    Genre::ALL
        .into_iter()
        .filter_map(|genre| {
            let average = average_rating_for_genre(entries, genre);
            (average > 0.0).then_some((genre, average))
        })
        .collect()
}

pub fn counts_by_status(entries: &[AnimeEntry]) -> BTreeMap<WatchStatus, u64> {
    let mut counts: BTreeMap<WatchStatus, u64> =
        WatchStatus::ALL.into_iter().map(|status| (status, 0)).collect();
    for entry in entries {
        *counts.entry(entry.status).or_insert(0) += 1;
    }
    counts
}

/// Occurrence count of every genre present in the collection.
///
/// An entry with N genres contributes to N counters.
pub fn genre_distribution(entries: &[AnimeEntry]) -> BTreeMap<Genre, u64> {
    let mut distribution = BTreeMap::new();
    for genre in entries.iter().flat_map(|entry| entry.genres.iter()) {
        *distribution.entry(*genre).or_insert(0) += 1;
    }
    distribution
}

/// Most frequent genres, count descending, at most `limit` of them.
pub fn top_genres(entries: &[AnimeEntry], limit: usize) -> Vec<(Genre, u64)> {
    // BTreeMap yields declaration order; the stable sort keeps it for ties.
    let mut ranked: Vec<(Genre, u64)> = genre_distribution(entries).into_iter().collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1));
    ranked.truncate(limit);
    ranked
}

pub fn top_three_genres(entries: &[AnimeEntry]) -> Vec<(Genre, u64)> {
    top_genres(entries, SUMMARY_TOP_GENRES)
}

/// One consistent view over a collection snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSummary {
    pub total: usize,
    pub rated: usize,
    pub average_rating: f64,
    pub counts_by_status: BTreeMap<WatchStatus, u64>,
    pub top_genres: Vec<(Genre, u64)>,
    /// Lowest release year.
    pub oldest: Option<AnimeEntry>,
    /// Highest release year.
    pub newest: Option<AnimeEntry>,
    /// Highest rating among rated entries.
    pub best_rated: Option<AnimeEntry>,
}

/// Computes every summary figure from the same slice.
pub fn summarize(entries: &[AnimeEntry]) -> CatalogSummary {
    let mut rated = 0;
    let mut oldest: Option<&AnimeEntry> = None;
    let mut newest: Option<&AnimeEntry> = None;
    let mut best_rated: Option<&AnimeEntry> = None;

    for entry in entries {
        if oldest.map_or(true, |current| entry.release_year < current.release_year) {
            oldest = Some(entry);
        }
        if newest.map_or(true, |current| entry.release_year > current.release_year) {
            newest = Some(entry);
        }
        if entry.is_rated() {
            rated += 1;
            if best_rated.map_or(true, |current| entry.rating > current.rating) {
                best_rated = Some(entry);
            }
        }
    }

    CatalogSummary {
        total: entries.len(),
        rated,
        average_rating: average_rating(entries),
        counts_by_status: counts_by_status(entries),
        top_genres: top_three_genres(entries),
        oldest: oldest.cloned(),
        newest: newest.cloned(),
        best_rated: best_rated.cloned(),
    }
}

impl Display for CatalogSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Catalog summary ===")?;
        writeln!(f, "Total entries: {}", self.total)?;
        writeln!(f, "Rated entries: {}", self.rated)?;
        writeln!(f, "Average rating: {:.2}", self.average_rating)?;
        writeln!(f)?;
        writeln!(f, "By status:")?;
        for (status, count) in &self.counts_by_status {
            writeln!(f, "  {status}: {count}")?;
        }
        writeln!(f)?;
        writeln!(f, "Top genres:")?;
        for (rank, (genre, count)) in self.top_genres.iter().enumerate() {
            writeln!(f, "  {}. {genre} ({count} entries)", rank + 1)?;
        }
        if let Some(best) = &self.best_rated {
            writeln!(f)?;
            writeln!(f, "Best rated: {} (★{})", best.title, best.rating)?;
        }
        Ok(())
    }
}

fn mean_rating<'a>(entries: impl Iterator<Item = &'a AnimeEntry>) -> f64 {
    let (sum, count) = entries
        .filter(|entry| entry.is_rated())
        .fold((0_u64, 0_u64), |(sum, count), entry| {
            (sum + u64::from(entry.rating), count + 1)
        });
    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}
