//! Anime entry domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by series and movie entries.
//! - Provide query helpers used by filters, orderings and statistics.
//! - Validate fields before registration, update and snapshot load.
//!
//! # Invariants
//! - `title` is the only identity key; equality and hashing fold case.
//! - `rating == 0` means unrated, otherwise `1..=5`.
//! - `genres` is never empty for a valid entry.
//! - `release_year` lies in `1917..=current_year + 2`.
//! - Title, studio and director never contain `|` or line breaks, so every
//!   entry fits on one line of the text interchange format.

use super::{contains_folded, fold_key, keys_match};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

pub const MIN_RELEASE_YEAR: i32 = 1917;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const MIN_EPISODE_COUNT: u32 = 1;
pub const MIN_DURATION_MINUTES: u32 = 1;
const RELEASE_YEAR_LOOKAHEAD: i32 = 2;
const RESERVED_TEXT_CHARS: [char; 3] = ['|', '\n', '\r'];

/// Latest accepted release year, relative to the local clock.
pub fn max_release_year() -> i32 {
    chrono::Local::now().year() + RELEASE_YEAR_LOOKAHEAD
}

/// Field-level validation failure raised before any state is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable reason.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl Error for ValidationError {}

/// Genre tags an entry can carry.
///
/// Declaration order is the canonical order used for sets, exports and
/// statistics tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Shonen,
    Shojo,
    Seinen,
    Josei,
    Mecha,
    Isekai,
    SliceOfLife,
}

impl Genre {
    pub const ALL: [Genre; 7] = [
        Genre::Shonen,
        Genre::Shojo,
        Genre::Seinen,
        Genre::Josei,
        Genre::Mecha,
        Genre::Isekai,
        Genre::SliceOfLife,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Shonen => "Shonen",
            Self::Shojo => "Shojo",
            Self::Seinen => "Seinen",
            Self::Josei => "Josei",
            Self::Mecha => "Mecha",
            Self::Isekai => "Isekai",
            Self::SliceOfLife => "Slice of Life",
        }
    }

    /// Token used by the text interchange format.
    pub fn code(self) -> &'static str {
        match self {
            Self::Shonen => "SHONEN",
            Self::Shojo => "SHOJO",
            Self::Seinen => "SEINEN",
            Self::Josei => "JOSEI",
            Self::Mecha => "MECHA",
            Self::Isekai => "ISEKAI",
            Self::SliceOfLife => "SLICE_OF_LIFE",
        }
    }

    /// Parses an interchange token, ignoring case and surrounding spaces.
    pub fn from_code(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|genre| genre.code() == normalized)
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Viewing lifecycle state of an entry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    /// Registered but not started.
    #[default]
    ToWatch,
    Watching,
    Finished,
    Abandoned,
}

impl WatchStatus {
    pub const ALL: [WatchStatus; 4] = [
        WatchStatus::ToWatch,
        WatchStatus::Watching,
        WatchStatus::Finished,
        WatchStatus::Abandoned,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ToWatch => "To watch",
            Self::Watching => "Watching",
            Self::Finished => "Finished",
            Self::Abandoned => "Abandoned",
        }
    }

    /// Token used by the text interchange format.
    pub fn code(self) -> &'static str {
        match self {
            Self::ToWatch => "POR_VER",
            Self::Watching => "VIENDO",
            Self::Finished => "FINALIZADO",
            Self::Abandoned => "ABANDONADO",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.code() == normalized)
    }
}

impl Display for WatchStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Entry variant without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Series,
    Movie,
}

impl EntryKind {
    /// Token used by the text interchange format.
    pub fn code(self) -> &'static str {
        match self {
            Self::Series => "SERIE",
            Self::Movie => "PELICULA",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SERIE" => Some(Self::Series),
            "PELICULA" => Some(Self::Movie),
            _ => None,
        }
    }
}

/// Variant-specific payload.
///
/// Serialized as an internal `type` tag next to the shared entry fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryDetails {
    Series { episode_count: u32, airing: bool },
    Movie { duration_minutes: u32, director: String },
}

/// Canonical catalog record for series and movies.
///
/// Equality and hashing only look at the case-folded title. Use
/// [`AnimeEntry::same_fields`] for a structural comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeEntry {
    pub title: String,
    pub release_year: i32,
    pub studio: String,
    pub status: WatchStatus,
    /// `0` when unrated.
    pub rating: u8,
    pub genres: BTreeSet<Genre>,
    #[serde(flatten)]
    pub details: EntryDetails,
}

impl AnimeEntry {
    /// Creates a validated series entry with status `ToWatch` and no rating.
    ///
    /// Title and studio are trimmed before validation.
    pub fn series(
        title: &str,
        release_year: i32,
        studio: &str,
        episode_count: u32,
        genres: impl IntoIterator<Item = Genre>,
        airing: bool,
    ) -> Result<Self, ValidationError> {
        let entry = Self::with_details(
            title,
            release_year,
            studio,
            genres,
            EntryDetails::Series {
                episode_count,
                airing,
            },
        );
        entry.validate()?;
        Ok(entry)
    }

    /// Creates a validated movie entry with status `ToWatch` and no rating.
    ///
    /// Title, studio and director are trimmed before validation.
    pub fn movie(
        title: &str,
        release_year: i32,
        studio: &str,
        duration_minutes: u32,
        genres: impl IntoIterator<Item = Genre>,
        director: &str,
    ) -> Result<Self, ValidationError> {
        let entry = Self::with_details(
            title,
            release_year,
            studio,
            genres,
            EntryDetails::Movie {
                duration_minutes,
                director: director.trim().to_string(),
            },
        );
        entry.validate()?;
        Ok(entry)
    }

    /// Builds an entry without validating it.
    ///
    /// Used by import paths that validate after applying format defaults.
    pub fn with_details(
        title: &str,
        release_year: i32,
        studio: &str,
        genres: impl IntoIterator<Item = Genre>,
        details: EntryDetails,
    ) -> Self {
        Self {
            title: title.trim().to_string(),
            release_year,
            studio: studio.trim().to_string(),
            status: WatchStatus::default(),
            rating: 0,
            genres: genres.into_iter().collect(),
            details,
        }
    }

    /// Validates every field invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_text_field("studio", &self.studio)?;
        validate_release_year(self.release_year)?;
        if self.rating != 0 {
            validate_rating(self.rating)?;
        }
        validate_genres(&self.genres)?;
        match &self.details {
            EntryDetails::Series { episode_count, .. } => validate_episode_count(*episode_count),
            EntryDetails::Movie {
                duration_minutes,
                director,
            } => {
                validate_text_field("director", director)?;
                validate_duration(*duration_minutes)
            }
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self.details {
            EntryDetails::Series { .. } => EntryKind::Series,
            EntryDetails::Movie { .. } => EntryKind::Movie,
        }
    }

    /// Episode count for series, minutes for movies.
    pub fn duration(&self) -> u32 {
        match self.details {
            EntryDetails::Series { episode_count, .. } => episode_count,
            EntryDetails::Movie {
                duration_minutes, ..
            } => duration_minutes,
        }
    }

    pub fn duration_label(&self) -> String {
        match &self.details {
            EntryDetails::Series {
                episode_count,
                airing,
            } => {
                let suffix = if *airing { " (airing)" } else { "" };
                format!("{episode_count} episodes{suffix}")
            }
            EntryDetails::Movie {
                duration_minutes, ..
            } => format!("{duration_minutes} min"),
        }
    }

    pub fn is_rated(&self) -> bool {
        self.rating > 0
    }

    /// Sets a rating in `1..=5`.
    pub fn set_rating(&mut self, rating: u8) -> Result<(), ValidationError> {
        validate_rating(rating)?;
        self.rating = rating;
        Ok(())
    }

    pub fn clear_rating(&mut self) {
        self.rating = 0;
    }

    pub fn has_genre(&self, genre: Genre) -> bool {
        self.genres.contains(&genre)
    }

    pub fn has_any_genre(&self, genres: &BTreeSet<Genre>) -> bool {
        genres.iter().any(|genre| self.genres.contains(genre))
    }

    /// Inclusive year range check.
    pub fn released_between(&self, from: i32, to: i32) -> bool {
        self.release_year >= from && self.release_year <= to
    }

    pub fn title_contains(&self, text: &str) -> bool {
        contains_folded(&self.title, text)
    }

    pub fn studio_contains(&self, text: &str) -> bool {
        contains_folded(&self.studio, text)
    }

    /// Rated and at least `minimum`.
    pub fn meets_min_rating(&self, minimum: u8) -> bool {
        self.is_rated() && self.rating >= minimum
    }

    /// Returns whether `title` is this entry's key, ignoring case.
    pub fn has_title(&self, title: &str) -> bool {
        keys_match(&self.title, title)
    }

    /// Field-by-field comparison, unlike `==` which only compares keys.
    pub fn same_fields(&self, other: &Self) -> bool {
        self.title == other.title
            && self.release_year == other.release_year
            && self.studio == other.studio
            && self.status == other.status
            && self.rating == other.rating
            && self.genres == other.genres
            && self.details == other.details
    }
}

impl PartialEq for AnimeEntry {
    fn eq(&self, other: &Self) -> bool {
        keys_match(&self.title, &other.title)
    }
}

impl Eq for AnimeEntry {}

impl Hash for AnimeEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        fold_key(&self.title).hash(state);
    }
}

impl Display for AnimeEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tag = match self.kind() {
            EntryKind::Series => "SERIES",
            EntryKind::Movie => "MOVIE",
        };
        write!(
            f,
            "[{tag}] {} ({}) - {} - {} [{}] ",
            self.title,
            self.release_year,
            self.studio,
            self.duration_label(),
            self.status
        )?;
        if self.is_rated() {
            write!(f, "★{}", self.rating)
        } else {
            f.write_str("★-")
        }
    }
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title", "title cannot be empty"));
    }
    validate_text_field("title", title)
}

/// Rejects the interchange field separator and line breaks.
pub fn validate_text_field(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.contains(&RESERVED_TEXT_CHARS[..]) {
        return Err(ValidationError::new(
            field,
            "cannot contain `|` or line breaks",
        ));
    }
    Ok(())
}

pub fn validate_release_year(year: i32) -> Result<(), ValidationError> {
    let max_year = max_release_year();
    if !(MIN_RELEASE_YEAR..=max_year).contains(&year) {
        return Err(ValidationError::new(
            "release_year",
            format!("release year must be between {MIN_RELEASE_YEAR} and {max_year}, got {year}"),
        ));
    }
    Ok(())
}

pub fn validate_rating(rating: u8) -> Result<(), ValidationError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::new(
            "rating",
            format!("rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"),
        ));
    }
    Ok(())
}

pub fn validate_genres(genres: &BTreeSet<Genre>) -> Result<(), ValidationError> {
    if genres.is_empty() {
        return Err(ValidationError::new(
            "genres",
            "at least one genre is required",
        ));
    }
    Ok(())
}

pub fn validate_episode_count(episode_count: u32) -> Result<(), ValidationError> {
    if episode_count < MIN_EPISODE_COUNT {
        return Err(ValidationError::new(
            "episode_count",
            format!("episode count must be at least {MIN_EPISODE_COUNT}"),
        ));
    }
    Ok(())
}

pub fn validate_duration(duration_minutes: u32) -> Result<(), ValidationError> {
    if duration_minutes < MIN_DURATION_MINUTES {
        return Err(ValidationError::new(
            "duration_minutes",
            format!("duration must be at least {MIN_DURATION_MINUTES} minute"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{max_release_year, validate_text_field, AnimeEntry, Genre, WatchStatus};

    #[test]
    fn interchange_codes_parse_case_insensitively() {
        assert_eq!(Genre::from_code(" slice_of_life "), Some(Genre::SliceOfLife));
        assert_eq!(Genre::from_code("romance"), None);
        assert_eq!(WatchStatus::from_code("viendo"), Some(WatchStatus::Watching));
    }

    #[test]
    fn release_year_upper_bound_tracks_clock() {
        let max_year = max_release_year();
        assert!(AnimeEntry::series("Future", max_year, "", 1, [Genre::Mecha], false).is_ok());
        let err = AnimeEntry::series("Too far", max_year + 1, "", 1, [Genre::Mecha], false)
            .unwrap_err();
        assert_eq!(err.field, "release_year");
    }

    #[test]
    fn separator_and_line_breaks_are_rejected_in_text_fields() {
        assert!(validate_text_field("studio", "Studio Trigger").is_ok());

        let err = AnimeEntry::series("Fate|Zero", 2011, "ufotable", 25, [Genre::Seinen], false)
            .unwrap_err();
        assert_eq!(err.field, "title");

        let err = AnimeEntry::series("Fate", 2011, "ufo\ntable", 25, [Genre::Seinen], false)
            .unwrap_err();
        assert_eq!(err.field, "studio");

        let err =
            AnimeEntry::movie("Paprika", 2006, "Madhouse", 90, [Genre::Seinen], "Kon|Satoshi")
                .unwrap_err();
        assert_eq!(err.field, "director");
    }
}
