//! Pipe-delimited text export/import format.
//!
//! # Responsibility
//! - Render the catalog as one line per entry.
//! - Parse lines back into entries, applying the format's lenient defaults.
//!
//! # Invariants
//! - Line layout is `TYPE|TITLE|YEAR|STUDIO|DURATION|GENRES|STATUS|RATING|EXTRA`.
//! - Blank lines and lines starting with `#` carry no record.
//! - Unknown genre tokens are dropped; an empty result becomes `SHONEN`.
//! - Unknown status becomes `POR_VER`; bad or out-of-range rating is unrated.
//! - Text fields never contain `|` or line breaks (enforced by entry
//!   validation), so every exported line parses back to the same entry.

use crate::model::anime::{
    AnimeEntry, EntryDetails, EntryKind, Genre, WatchStatus, MAX_RATING, MIN_RATING,
};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

pub const EXPORT_HEADER: [&str; 5] = [
    "# Anime catalog - export",
    "# Format: TYPE|TITLE|YEAR|STUDIO|DURATION|GENRES|STATUS|RATING|EXTRA",
    "# EXTRA for series: airing (true/false)",
    "# EXTRA for movies: director",
    "#",
];

const FIELD_SEPARATOR: char = '|';
const GENRE_SEPARATOR: char = ',';
const MIN_FIELDS: usize = 8;
const FALLBACK_GENRE: Genre = Genre::Shonen;

/// Outcome counters of a text import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Entries inserted into the catalog.
    pub imported: usize,
    /// Parsed entries whose title already existed.
    pub skipped: usize,
    /// Parsed entries rejected by field validation.
    pub invalid: usize,
    /// Record lines that could not be parsed at all.
    pub ignored_lines: usize,
}

impl Display for ImportReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "imported={} skipped={} invalid={} ignored_lines={}",
            self.imported, self.skipped, self.invalid, self.ignored_lines
        )
    }
}

/// Renders one entry as an export line (without newline).
pub fn format_line(entry: &AnimeEntry) -> String {
    let genres = entry
        .genres
        .iter()
        .map(|genre| genre.code())
        .collect::<Vec<_>>()
        .join(",");
    let extra = match &entry.details {
        EntryDetails::Series { airing, .. } => airing.to_string(),
        EntryDetails::Movie { director, .. } => director.clone(),
    };
    [
        entry.kind().code().to_string(),
        entry.title.clone(),
        entry.release_year.to_string(),
        entry.studio.clone(),
        entry.duration().to_string(),
        genres,
        entry.status.code().to_string(),
        entry.rating.to_string(),
        extra,
    ]
    .join("|")
}

/// Renders the header followed by one line per entry, in input order.
pub fn export_catalog(entries: &[AnimeEntry]) -> String {
    let mut output = String::new();
    for line in EXPORT_HEADER {
        output.push_str(line);
        output.push('\n');
    }
    for entry in entries {
        output.push_str(&format_line(entry));
        output.push('\n');
    }
    output
}

/// Returns whether a line is meant to carry a record.
pub fn is_record_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// Parses one record line.
///
/// Returns `None` for comment/blank lines, lines with fewer than eight
/// fields, an unknown `TYPE`, or an unparsable `YEAR`/`DURATION`. The result
/// is not validated against entry invariants.
pub fn parse_line(line: &str) -> Option<AnimeEntry> {
    if !is_record_line(line) {
        return None;
    }

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let kind = EntryKind::from_code(fields[0])?;
    let title = fields[1].trim();
    let release_year: i32 = fields[2].trim().parse().ok()?;
    let studio = fields[3].trim();
    let duration: u32 = fields[4].trim().parse().ok()?;
    let genres = parse_genres(fields[5]);
    let status = WatchStatus::from_code(fields[6]).unwrap_or_default();
    let rating = parse_rating(fields[7]);
    let extra = fields.get(8).map_or("", |value| value.trim());

    let details = match kind {
        EntryKind::Series => EntryDetails::Series {
            episode_count: duration,
            airing: extra.eq_ignore_ascii_case("true"),
        },
        EntryKind::Movie => EntryDetails::Movie {
            duration_minutes: duration,
            director: extra.to_string(),
        },
    };

    let mut entry = AnimeEntry::with_details(title, release_year, studio, genres, details);
    entry.status = status;
    entry.rating = rating;
    Some(entry)
}

/// Parses every record line of a document, keeping per-line outcomes.
pub fn parse_document(text: &str) -> Vec<Option<AnimeEntry>> {
    text.lines()
        .filter(|line| is_record_line(line))
        .map(parse_line)
        .collect()
}

fn parse_genres(field: &str) -> BTreeSet<Genre> {
    let mut genres: BTreeSet<Genre> = field
        .split(GENRE_SEPARATOR)
        .filter_map(Genre::from_code)
        .collect();
    if genres.is_empty() {
        genres.insert(FALLBACK_GENRE);
    }
    genres
}

fn parse_rating(field: &str) -> u8 {
    match field.trim().parse::<i64>() {
        Ok(value) if (i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&value) => {
            value as u8
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_genres, parse_rating};
    use crate::model::anime::Genre;

    #[test]
    fn rating_outside_range_or_garbage_is_unrated() {
        assert_eq!(parse_rating(" 4 "), 4);
        assert_eq!(parse_rating("9"), 0);
        assert_eq!(parse_rating("-1"), 0);
        assert_eq!(parse_rating("five"), 0);
    }

    #[test]
    fn genres_drop_unknown_tokens_and_fall_back() {
        let parsed = parse_genres("mecha, ROMANCE ,isekai");
        assert_eq!(parsed.into_iter().collect::<Vec<_>>(), vec![Genre::Mecha, Genre::Isekai]);
        let fallback = parse_genres("ROMANCE,");
        assert_eq!(fallback.into_iter().collect::<Vec<_>>(), vec![Genre::Shonen]);
    }
}
