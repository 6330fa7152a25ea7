//! Composable filter predicate builder.
//!
//! # Responsibility
//! - Collect optional search criteria and evaluate them as one conjunction.
//!
//! # Invariants
//! - An unconfigured filter matches every entry.
//! - Each configured clause narrows the match set; clause order is irrelevant.
//! - Blank text and non-positive thresholds are ignored rather than matching
//!   nothing.

use crate::model::anime::{AnimeEntry, Genre, WatchStatus};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    Title(String),
    YearRange { from: Option<i32>, to: Option<i32> },
    Genre(Genre),
    AnyGenre(BTreeSet<Genre>),
    Status(WatchStatus),
    MinRating(u8),
    OnlyRated,
    Studio(String),
}

impl Clause {
    fn matches(&self, entry: &AnimeEntry) -> bool {
        match self {
            Self::Title(text) => entry.title_contains(text),
            Self::YearRange { from, to } => {
                from.map_or(true, |from| entry.release_year >= from)
                    && to.map_or(true, |to| entry.release_year <= to)
            }
            Self::Genre(genre) => entry.has_genre(*genre),
            Self::AnyGenre(genres) => entry.has_any_genre(genres),
            Self::Status(status) => entry.status == *status,
            Self::MinRating(minimum) => entry.meets_min_rating(*minimum),
            Self::OnlyRated => entry.is_rated(),
            Self::Studio(text) => entry.studio_contains(text),
        }
    }
}

/// AND-conjunction of search criteria.
///
/// ```
/// use anicat_core::{AnimeFilter, Genre};
///
/// let filter = AnimeFilter::new().genre(Genre::Mecha).min_rating(4);
/// assert!(!filter.is_unconstrained());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimeFilter {
    clauses: Vec<Clause>,
}

impl AnimeFilter {
    /// Creates a filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match on the title. Blank text is ignored.
    pub fn title(self, text: &str) -> Self {
        match non_blank(text) {
            Some(text) => self.with(Clause::Title(text)),
            None => self,
        }
    }

    /// Inclusive release-year bounds; either side may be open.
    pub fn year_range(self, from: Option<i32>, to: Option<i32>) -> Self {
        if from.is_none() && to.is_none() {
            return self;
        }
        self.with(Clause::YearRange { from, to })
    }

    pub fn genre(self, genre: Genre) -> Self {
        self.with(Clause::Genre(genre))
    }

    pub fn maybe_genre(self, genre: Option<Genre>) -> Self {
        match genre {
            Some(genre) => self.genre(genre),
            None => self,
        }
    }

    /// Entry must carry at least one of `genres`. An empty set is ignored.
    pub fn any_genre(self, genres: impl IntoIterator<Item = Genre>) -> Self {
        let genres: BTreeSet<Genre> = genres.into_iter().collect();
        if genres.is_empty() {
            return self;
        }
        self.with(Clause::AnyGenre(genres))
    }

    pub fn status(self, status: WatchStatus) -> Self {
        self.with(Clause::Status(status))
    }

    pub fn maybe_status(self, status: Option<WatchStatus>) -> Self {
        match status {
            Some(status) => self.status(status),
            None => self,
        }
    }

    /// Entry must be rated with at least `minimum`. `0` is ignored.
    pub fn min_rating(self, minimum: u8) -> Self {
        if minimum == 0 {
            return self;
        }
        self.with(Clause::MinRating(minimum))
    }

    pub fn only_rated(self) -> Self {
        self.with(Clause::OnlyRated)
    }

    /// Case-insensitive substring match on the studio. Blank text is ignored.
    pub fn studio(self, text: &str) -> Self {
        match non_blank(text) {
            Some(text) => self.with(Clause::Studio(text)),
            None => self,
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, entry: &AnimeEntry) -> bool {
        self.clauses.iter().all(|clause| clause.matches(entry))
    }

    /// Returns matching entries in input order.
    pub fn apply(&self, entries: &[AnimeEntry]) -> Vec<AnimeEntry> {
        entries
            .iter()
            .filter(|entry| self.matches(entry))
            .cloned()
            .collect()
    }

    fn with(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::AnimeFilter;

    #[test]
    fn blank_and_zero_inputs_add_no_clause() {
        let filter = AnimeFilter::new()
            .title("   ")
            .studio("")
            .min_rating(0)
            .year_range(None, None)
            .any_genre([]);
        assert!(filter.is_unconstrained());
    }
}
