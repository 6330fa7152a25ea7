//! Repository layer: keyed collection contracts and snapshot persistence.
//!
//! # Responsibility
//! - Define the CRUD contract shared by the entry and list collections.
//! - Isolate file I/O and (de)serialization inside the persistence boundary.
//!
//! # Invariants
//! - Keys compare case-insensitively.
//! - Absence is a normal result (`None`/`false`), never an error, at this layer.
//! - Every observable mutation rewrites the whole snapshot before returning.

use crate::model::anime::{AnimeEntry, ValidationError};
use crate::model::custom_list::{validate_list_name, CustomList};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod snapshot;

pub use snapshot::SnapshotStore;

pub type RepoResult<T> = Result<T, PersistenceError>;

/// Catalog entry store backed by a JSON snapshot.
pub type AnimeStore = SnapshotStore<AnimeEntry>;

/// Custom list store backed by a JSON snapshot.
pub type ListStore = SnapshotStore<CustomList>;

/// I/O or (de)serialization failure in a store.
///
/// The underlying cause is kept and exposed through `Error::source`.
#[derive(Debug)]
pub struct PersistenceError {
    message: String,
    cause: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(
        message: impl Into<String>,
        cause: impl Into<Box<dyn Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn has_cause(&self) -> bool {
        self.cause.is_some()
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {cause}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}

/// Record with a case-insensitive business key.
pub trait Keyed {
    fn key(&self) -> &str;

    /// Checks a record read back from storage.
    fn validate_persisted(&self) -> Result<(), ValidationError>;
}

impl Keyed for AnimeEntry {
    fn key(&self) -> &str {
        &self.title
    }

    fn validate_persisted(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}

impl Keyed for CustomList {
    fn key(&self) -> &str {
        &self.name
    }

    fn validate_persisted(&self) -> Result<(), ValidationError> {
        validate_list_name(&self.name)
    }
}

/// CRUD contract over a keyed collection.
///
/// Receivers are `&mut self` because reads may populate a lazy cache.
pub trait Repository<T> {
    /// Replaces the same-key item in place, or appends.
    fn save(&mut self, item: T) -> RepoResult<()>;
    /// Replaces the whole collection.
    fn save_all(&mut self, items: Vec<T>) -> RepoResult<()>;
    fn find_by_key(&mut self, key: &str) -> RepoResult<Option<T>>;
    /// Returns a copy of the collection in stored order.
    fn find_all(&mut self) -> RepoResult<Vec<T>>;
    /// Replaces the item stored under `key`, keeping its position.
    ///
    /// Returns `false` when no item matches `key`.
    fn replace_by_key(&mut self, key: &str, item: T) -> RepoResult<bool>;
    fn delete_by_key(&mut self, key: &str) -> RepoResult<bool>;
    fn delete_all(&mut self) -> RepoResult<()>;
    fn exists(&mut self, key: &str) -> RepoResult<bool>;
    fn count(&mut self) -> RepoResult<usize>;
    /// Drops cached state so the next call re-reads storage.
    fn invalidate(&mut self);
}

impl<T, R> Repository<T> for &mut R
where
    R: Repository<T> + ?Sized,
{
    fn save(&mut self, item: T) -> RepoResult<()> {
        (**self).save(item)
    }

    fn save_all(&mut self, items: Vec<T>) -> RepoResult<()> {
        (**self).save_all(items)
    }

    fn find_by_key(&mut self, key: &str) -> RepoResult<Option<T>> {
        (**self).find_by_key(key)
    }

    fn find_all(&mut self) -> RepoResult<Vec<T>> {
        (**self).find_all()
    }

    fn replace_by_key(&mut self, key: &str, item: T) -> RepoResult<bool> {
        (**self).replace_by_key(key, item)
    }

    fn delete_by_key(&mut self, key: &str) -> RepoResult<bool> {
        (**self).delete_by_key(key)
    }

    fn delete_all(&mut self) -> RepoResult<()> {
        (**self).delete_all()
    }

    fn exists(&mut self, key: &str) -> RepoResult<bool> {
        (**self).exists(key)
    }

    fn count(&mut self) -> RepoResult<usize> {
        (**self).count()
    }

    fn invalidate(&mut self) {
        (**self).invalidate()
    }
}

/// Repository of catalog entries.
pub trait AnimeRepository: Repository<AnimeEntry> {}

impl<R: Repository<AnimeEntry> + ?Sized> AnimeRepository for R {}

/// Repository of custom lists.
pub trait ListRepository: Repository<CustomList> {}

impl<R: Repository<CustomList> + ?Sized> ListRepository for R {}
