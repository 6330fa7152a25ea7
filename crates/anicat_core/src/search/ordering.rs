//! Ordering strategies over catalog entries.
//!
//! # Invariants
//! - Each strategy is a total order; direction only reverses the base
//!   comparison.
//! - `ByRating` keeps unrated entries after every rated entry in both
//!   directions.
//! - [`sort_entries`] is stable.

use crate::model::anime::AnimeEntry;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Applies the direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Three-way comparison strategy usable with any stable sort.
pub trait EntryOrdering {
    fn compare(&self, left: &AnimeEntry, right: &AnimeEntry) -> Ordering;

    fn description(&self) -> String;
}

/// Case-insensitive lexicographic order on titles. Defaults to A-Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByTitle {
    direction: SortDirection,
}

impl ByTitle {
    pub fn new(direction: SortDirection) -> Self {
        Self { direction }
    }

    pub fn ascending() -> Self {
        Self::new(SortDirection::Ascending)
    }

    pub fn descending() -> Self {
        Self::new(SortDirection::Descending)
    }
}

impl Default for ByTitle {
    fn default() -> Self {
        Self::ascending()
    }
}

impl EntryOrdering for ByTitle {
    fn compare(&self, left: &AnimeEntry, right: &AnimeEntry) -> Ordering {
        let base = left
            .title
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(right.title.chars().flat_map(char::to_lowercase));
        self.direction.apply(base)
    }

    fn description(&self) -> String {
        match self.direction {
            SortDirection::Ascending => "By title (A-Z)".to_string(),
            SortDirection::Descending => "By title (Z-A)".to_string(),
        }
    }
}

/// Numeric order on release year. Defaults to most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByYear {
    direction: SortDirection,
}

impl ByYear {
    pub fn new(direction: SortDirection) -> Self {
        Self { direction }
    }

    pub fn ascending() -> Self {
        Self::new(SortDirection::Ascending)
    }

    pub fn descending() -> Self {
        Self::new(SortDirection::Descending)
    }
}

impl Default for ByYear {
    fn default() -> Self {
        Self::descending()
    }
}

impl EntryOrdering for ByYear {
    fn compare(&self, left: &AnimeEntry, right: &AnimeEntry) -> Ordering {
        self.direction
            .apply(left.release_year.cmp(&right.release_year))
    }

    fn description(&self) -> String {
        match self.direction {
            SortDirection::Ascending => "By year (oldest first)".to_string(),
            SortDirection::Descending => "By year (newest first)".to_string(),
        }
    }
}

/// Numeric order on rating with unrated entries always last.
/// Defaults to best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByRating {
    direction: SortDirection,
}

impl ByRating {
    pub fn new(direction: SortDirection) -> Self {
        Self { direction }
    }

    pub fn ascending() -> Self {
        Self::new(SortDirection::Ascending)
    }

    pub fn descending() -> Self {
        Self::new(SortDirection::Descending)
    }
}

impl Default for ByRating {
    fn default() -> Self {
        Self::descending()
    }
}

impl EntryOrdering for ByRating {
    fn compare(&self, left: &AnimeEntry, right: &AnimeEntry) -> Ordering {
        // Unrated placement is independent of direction.
        match (left.is_rated(), right.is_rated()) {
            (false, false) => Ordering::Equal,
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (true, true) => self.direction.apply(left.rating.cmp(&right.rating)),
        }
    }

    fn description(&self) -> String {
        match self.direction {
            SortDirection::Ascending => "By rating (worst first)".to_string(),
            SortDirection::Descending => "By rating (best first)".to_string(),
        }
    }
}

/// Stable in-place sort.
pub fn sort_entries(entries: &mut [AnimeEntry], ordering: &dyn EntryOrdering) {
    entries.sort_by(|left, right| ordering.compare(left, right));
}

/// Stable sort returning the reordered collection.
pub fn sorted(mut entries: Vec<AnimeEntry>, ordering: &dyn EntryOrdering) -> Vec<AnimeEntry> {
    sort_entries(&mut entries, ordering);
    entries
}
