//! Catalog entry use-case service.
//!
//! # Responsibility
//! - Register, update, rate and delete entries with full validation.
//! - Provide search, sorted listings and text import/export over the store.
//!
//! # Invariants
//! - Titles are unique ignoring case; collisions raise `AlreadyExists`.
//! - Every input is validated before the store is touched.
//! - Renames keep the entry's position and never cascade into lists.
//! - Logs carry metadata only (kinds, counts), never titles.

use super::{EntityKind, ServiceError, ServiceResult};
use crate::interchange::{export_catalog, parse_document, ImportReport};
use crate::model::anime::{
    validate_duration, validate_episode_count, validate_genres, validate_rating,
    validate_release_year, validate_title, AnimeEntry, EntryDetails, Genre, ValidationError,
    WatchStatus,
};
use crate::model::keys_match;
use crate::repo::AnimeRepository;
use crate::search::filter::AnimeFilter;
use crate::search::ordering::{sorted, ByRating, ByTitle, ByYear, EntryOrdering};
use log::info;
use std::collections::BTreeSet;

/// Partial entry update. `None` leaves a field untouched.
///
/// Variant fields (`episode_count`, `airing`, `duration_minutes`,
/// `director`) are rejected when they do not apply to the entry's kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub studio: Option<String>,
    pub status: Option<WatchStatus>,
    pub rating: Option<u8>,
    pub genres: Option<BTreeSet<Genre>>,
    pub episode_count: Option<u32>,
    pub airing: Option<bool>,
    pub duration_minutes: Option<u32>,
    pub director: Option<String>,
}

/// Entry service facade over a repository implementation.
pub struct AnimeService<R: AnimeRepository> {
    repo: R,
}

impl<R: AnimeRepository> AnimeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn into_inner(self) -> R {
        self.repo
    }

    /// Registers a new series with status `ToWatch` and no rating.
    pub fn register_series(
        &mut self,
        title: &str,
        release_year: i32,
        studio: &str,
        episode_count: u32,
        genres: BTreeSet<Genre>,
        airing: bool,
    ) -> ServiceResult<AnimeEntry> {
        let entry =
            AnimeEntry::series(title, release_year, studio, episode_count, genres, airing)?;
        self.register(entry)
    }

    /// Registers a new movie with status `ToWatch` and no rating.
    pub fn register_movie(
        &mut self,
        title: &str,
        release_year: i32,
        studio: &str,
        duration_minutes: u32,
        genres: BTreeSet<Genre>,
        director: &str,
    ) -> ServiceResult<AnimeEntry> {
        let entry =
            AnimeEntry::movie(title, release_year, studio, duration_minutes, genres, director)?;
        self.register(entry)
    }

    /// Validates and stores a fully built entry.
    pub fn register(&mut self, entry: AnimeEntry) -> ServiceResult<AnimeEntry> {
        entry.validate()?;
        self.ensure_title_available(&entry.title)?;
        self.repo.save(entry.clone())?;
        info!(
            "event=entry_register module=service status=ok kind={}",
            entry.kind().code()
        );
        Ok(entry)
    }

    /// Stores a validated entry unless its title is taken.
    ///
    /// Returns `false` when the title already exists.
    pub fn register_direct(&mut self, entry: AnimeEntry) -> ServiceResult<bool> {
        entry.validate()?;
        if self.repo.exists(&entry.title)? {
            return Ok(false);
        }
        self.repo.save(entry)?;
        Ok(true)
    }

    /// Applies a partial update to the entry titled `original_title`.
    pub fn update_entry(
        &mut self,
        original_title: &str,
        update: &EntryUpdate,
    ) -> ServiceResult<AnimeEntry> {
        let mut entry = self.find_exact(original_title)?;
        let stored_key = entry.title.clone();

        if let Some(new_title) = &update.title {
            let new_title = new_title.trim();
            validate_title(new_title)?;
            if !keys_match(&stored_key, new_title) {
                self.ensure_title_available(new_title)?;
                entry.title = new_title.to_string();
            }
        }
        if let Some(year) = update.release_year {
            validate_release_year(year)?;
            entry.release_year = year;
        }
        if let Some(studio) = &update.studio {
            entry.studio = studio.trim().to_string();
        }
        if let Some(status) = update.status {
            entry.status = status;
        }
        if let Some(rating) = update.rating {
            validate_rating(rating)?;
            entry.rating = rating;
        }
        if let Some(genres) = &update.genres {
            validate_genres(genres)?;
            entry.genres = genres.clone();
        }
        apply_variant_update(&mut entry.details, update)?;
        entry.validate()?;

        self.repo.replace_by_key(&stored_key, entry.clone())?;
        info!(
            "event=entry_update module=service status=ok renamed={}",
            stored_key != entry.title
        );
        Ok(entry)
    }

    /// Sets a rating in `1..=5`.
    pub fn rate(&mut self, title: &str, rating: u8) -> ServiceResult<AnimeEntry> {
        validate_rating(rating)?;
        let mut entry = self.find_exact(title)?;
        entry.rating = rating;
        self.repo.save(entry.clone())?;
        Ok(entry)
    }

    pub fn change_status(&mut self, title: &str, status: WatchStatus) -> ServiceResult<AnimeEntry> {
        let mut entry = self.find_exact(title)?;
        entry.status = status;
        self.repo.save(entry.clone())?;
        Ok(entry)
    }

    /// Deletes by title. Lists referencing the title are left untouched.
    pub fn delete(&mut self, title: &str) -> ServiceResult<bool> {
        let removed = self.repo.delete_by_key(title)?;
        info!("event=entry_delete module=service status=ok removed={removed}");
        Ok(removed)
    }

    pub fn list_all(&mut self) -> ServiceResult<Vec<AnimeEntry>> {
        Ok(self.repo.find_all()?)
    }

    pub fn find(&mut self, title: &str) -> ServiceResult<Option<AnimeEntry>> {
        Ok(self.repo.find_by_key(title)?)
    }

    /// Returns the entry titled `title` or `NotFound`.
    pub fn find_exact(&mut self, title: &str) -> ServiceResult<AnimeEntry> {
        self.repo
            .find_by_key(title)?
            .ok_or_else(|| ServiceError::entry_not_found(title))
    }

    /// Case-insensitive title substring search. Blank text lists everything.
    pub fn search_by_title(&mut self, text: &str) -> ServiceResult<Vec<AnimeEntry>> {
        self.search(&AnimeFilter::new().title(text))
    }

    pub fn search_by_year_range(&mut self, from: i32, to: i32) -> ServiceResult<Vec<AnimeEntry>> {
        self.search(&AnimeFilter::new().year_range(Some(from), Some(to)))
    }

    pub fn filter_by_genre(&mut self, genre: Genre) -> ServiceResult<Vec<AnimeEntry>> {
        self.search(&AnimeFilter::new().genre(genre))
    }

    pub fn filter_by_status(&mut self, status: WatchStatus) -> ServiceResult<Vec<AnimeEntry>> {
        self.search(&AnimeFilter::new().status(status))
    }

    pub fn filter_by_min_rating(&mut self, minimum: u8) -> ServiceResult<Vec<AnimeEntry>> {
        self.search(&AnimeFilter::new().min_rating(minimum))
    }

    /// Entries matching every clause of `filter`, in catalog order.
    pub fn search(&mut self, filter: &AnimeFilter) -> ServiceResult<Vec<AnimeEntry>> {
        let entries = self.repo.find_all()?;
        Ok(filter.apply(&entries))
    }

    pub fn list_sorted(&mut self, ordering: &dyn EntryOrdering) -> ServiceResult<Vec<AnimeEntry>> {
        Ok(sorted(self.repo.find_all()?, ordering))
    }

    pub fn list_by_title(&mut self) -> ServiceResult<Vec<AnimeEntry>> {
        self.list_sorted(&ByTitle::default())
    }

    pub fn list_by_rating(&mut self) -> ServiceResult<Vec<AnimeEntry>> {
        self.list_sorted(&ByRating::default())
    }

    pub fn list_by_year(&mut self) -> ServiceResult<Vec<AnimeEntry>> {
        self.list_sorted(&ByYear::default())
    }

    pub fn count(&mut self) -> ServiceResult<usize> {
        Ok(self.repo.count()?)
    }

    pub fn exists(&mut self, title: &str) -> ServiceResult<bool> {
        Ok(self.repo.exists(title)?)
    }

    /// Renders the whole catalog in the pipe-delimited text format.
    pub fn export_text(&mut self) -> ServiceResult<String> {
        let entries = self.repo.find_all()?;
        info!(
            "event=catalog_export module=service status=ok count={}",
            entries.len()
        );
        Ok(export_catalog(&entries))
    }

    /// Imports a text document, skipping titles that already exist.
    ///
    /// The catalog is rewritten once, after all lines are processed.
    pub fn import_text(&mut self, text: &str) -> ServiceResult<ImportReport> {
        let mut report = ImportReport::default();
        let mut catalog = self.repo.find_all()?;

        for parsed in parse_document(text) {
            let Some(entry) = parsed else {
                report.ignored_lines += 1;
                continue;
            };
            if entry.validate().is_err() {
                report.invalid += 1;
                continue;
            }
            if catalog.iter().any(|existing| existing.has_title(&entry.title)) {
                report.skipped += 1;
                continue;
            }
            catalog.push(entry);
            report.imported += 1;
        }

        if report.imported > 0 {
            self.repo.save_all(catalog)?;
        }
        info!("event=catalog_import module=service status=ok {report}");
        Ok(report)
    }

    fn ensure_title_available(&mut self, title: &str) -> ServiceResult<()> {
        if self.repo.exists(title)? {
            return Err(ServiceError::AlreadyExists {
                kind: EntityKind::Entry,
                key: title.trim().to_string(),
            });
        }
        Ok(())
    }
}

fn apply_variant_update(
    details: &mut EntryDetails,
    update: &EntryUpdate,
) -> Result<(), ValidationError> {
    match details {
        EntryDetails::Series {
            episode_count,
            airing,
        } => {
            if update.duration_minutes.is_some() {
                return Err(ValidationError::new(
                    "duration_minutes",
                    "only movies have a duration in minutes",
                ));
            }
            if update.director.is_some() {
                return Err(ValidationError::new("director", "only movies have a director"));
            }
            if let Some(count) = update.episode_count {
                validate_episode_count(count)?;
                *episode_count = count;
            }
            if let Some(value) = update.airing {
                *airing = value;
            }
        }
        EntryDetails::Movie {
            duration_minutes,
            director,
        } => {
            if update.episode_count.is_some() {
                return Err(ValidationError::new(
                    "episode_count",
                    "only series have an episode count",
                ));
            }
            if update.airing.is_some() {
                return Err(ValidationError::new("airing", "only series can be airing"));
            }
            if let Some(minutes) = update.duration_minutes {
                validate_duration(minutes)?;
                *duration_minutes = minutes;
            }
            if let Some(value) = &update.director {
                *director = value.trim().to_string();
            }
        }
    }
    Ok(())
}
