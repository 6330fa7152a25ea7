//! Top-N recommendation strategies.
//!
//! # Responsibility
//! - Select the best-rated entries under a strategy-specific eligibility rule.
//!
//! # Invariants
//! - Results never exceed `limit`; `limit == 0` yields nothing.
//! - Every recommended entry is rated.
//! - Equal ratings keep catalog order (stable ranking).

use super::filter::AnimeFilter;
use super::ordering::{sorted, ByRating};
use crate::model::anime::{AnimeEntry, Genre, WatchStatus};

/// Strategy that ranks eligible entries by rating, best first.
pub trait Recommendation {
    fn recommend(&self, entries: &[AnimeEntry], limit: usize) -> Vec<AnimeEntry>;

    fn name(&self) -> String;

    fn description(&self) -> String;
}

/// Best-rated entries across the whole catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopGlobal;

impl Recommendation for TopGlobal {
    fn recommend(&self, entries: &[AnimeEntry], limit: usize) -> Vec<AnimeEntry> {
        top_rated(entries.iter(), limit)
    }

    fn name(&self) -> String {
        "Top global".to_string()
    }

    fn description(&self) -> String {
        "Best-rated entries in the catalog".to_string()
    }
}

/// Best-rated entries carrying one genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopByGenre {
    pub genre: Genre,
}

impl TopByGenre {
    pub fn new(genre: Genre) -> Self {
        Self { genre }
    }
}

impl Recommendation for TopByGenre {
    fn recommend(&self, entries: &[AnimeEntry], limit: usize) -> Vec<AnimeEntry> {
        top_rated(
            entries.iter().filter(|entry| entry.has_genre(self.genre)),
            limit,
        )
    }

    fn name(&self) -> String {
        format!("Top {}", self.genre)
    }

    fn description(&self) -> String {
        format!("Best-rated entries of the {} genre", self.genre)
    }
}

/// Best-rated entries in one watch status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopByStatus {
    pub status: WatchStatus,
}

impl TopByStatus {
    pub fn new(status: WatchStatus) -> Self {
        Self { status }
    }
}

impl Recommendation for TopByStatus {
    fn recommend(&self, entries: &[AnimeEntry], limit: usize) -> Vec<AnimeEntry> {
        top_rated(
            entries.iter().filter(|entry| entry.status == self.status),
            limit,
        )
    }

    fn name(&self) -> String {
        format!("Top {}", self.status)
    }

    fn description(&self) -> String {
        format!("Best-rated entries with status {}", self.status)
    }
}

/// Optional criteria for [`advanced_recommendation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvancedCriteria {
    pub genre: Option<Genre>,
    pub min_rating: Option<u8>,
    pub status: Option<WatchStatus>,
}

impl AdvancedCriteria {
    /// Builds the rated-only filter for these criteria.
    pub fn filter(&self) -> AnimeFilter {
        AnimeFilter::new()
            .maybe_genre(self.genre)
            .maybe_status(self.status)
            .min_rating(self.min_rating.unwrap_or(0))
            .only_rated()
    }
}

/// Filter, then rank by rating, then truncate.
pub fn advanced_recommendation(
    entries: &[AnimeEntry],
    criteria: &AdvancedCriteria,
    limit: usize,
) -> Vec<AnimeEntry> {
    let mut ranked = sorted(criteria.filter().apply(entries), &ByRating::descending());
    ranked.truncate(limit);
    ranked
}

fn top_rated<'a>(candidates: impl Iterator<Item = &'a AnimeEntry>, limit: usize) -> Vec<AnimeEntry> {
    if limit == 0 {
        return Vec::new();
    }
    let mut eligible: Vec<&AnimeEntry> = candidates.filter(|entry| entry.is_rated()).collect();
    eligible.sort_by(|left, right| right.rating.cmp(&left.rating));
    eligible.into_iter().take(limit).cloned().collect()
}
