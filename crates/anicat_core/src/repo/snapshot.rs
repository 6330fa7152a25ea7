//! Lazily-loaded, write-through snapshot store.
//!
//! # Responsibility
//! - Cache one keyed collection in memory, loading it on first use.
//! - Rewrite the whole collection to disk after every mutation.
//!
//! # Invariants
//! - A missing snapshot file is an empty collection, not an error.
//! - A snapshot that is not a JSON array is rejected as `invalid format`.
//! - Records read back from disk are validated before they are served.
//! - Writes go to a temp file in the target directory and are renamed over
//!   the snapshot, so a crash never leaves a half-written file behind.
//! - A failed write drops the cache; the next read reloads what is on disk.

use super::{Keyed, PersistenceError, RepoResult, Repository};
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Write-through cache over one snapshot file.
///
/// Not safe for concurrent use without external synchronization: every
/// operation takes `&mut self`, and the store does no locking of its own.
/// Two stores pointed at the same file do not see each other's writes until
/// [`Repository::invalidate`] is called.
#[derive(Debug)]
pub struct SnapshotStore<T> {
    path: PathBuf,
    loaded: bool,
    items: Vec<T>,
}

impl<T> SnapshotStore<T> {
    /// Creates an unloaded store. No I/O happens until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: false,
            items: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl<T> SnapshotStore<T>
where
    T: Keyed + Serialize + DeserializeOwned + Clone,
{
    fn ensure_loaded(&mut self) -> RepoResult<()> {
        if !self.loaded {
            self.load()?;
        }
        Ok(())
    }

    fn load(&mut self) -> RepoResult<()> {
        let started_at = Instant::now();
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.items = Vec::new();
                self.loaded = true;
                info!(
                    "event=snapshot_load module=store status=ok source=missing path={} count=0",
                    self.path.display()
                );
                return Ok(());
            }
            Err(err) => {
                error!(
                    "event=snapshot_load module=store status=error path={} error_code=read_failed error={}",
                    self.path.display(),
                    err
                );
                return Err(PersistenceError::with_cause(
                    format!("failed to read snapshot `{}`", self.path.display()),
                    err,
                ));
            }
        };

        match decode_snapshot::<T>(&bytes) {
            Ok(items) => {
                info!(
                    "event=snapshot_load module=store status=ok source=file path={} count={} duration_ms={}",
                    self.path.display(),
                    items.len(),
                    started_at.elapsed().as_millis()
                );
                self.items = items;
                self.loaded = true;
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=snapshot_load module=store status=error path={} error_code=decode_failed error={}",
                    self.path.display(),
                    err
                );
                Err(err)
            }
        }
    }

    fn persist(&self) -> RepoResult<()> {
        let started_at = Instant::now();
        match write_snapshot(&self.path, &self.items) {
            Ok(()) => {
                info!(
                    "event=snapshot_persist module=store status=ok path={} count={} duration_ms={}",
                    self.path.display(),
                    self.items.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=snapshot_persist module=store status=error path={} error={}",
                    self.path.display(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Persists the cache, unloading it when the write fails.
    fn commit(&mut self) -> RepoResult<()> {
        let result = self.persist();
        if result.is_err() {
            self.invalidate();
        }
        result
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| crate::model::keys_match(item.key(), key))
    }
}

impl<T> Repository<T> for SnapshotStore<T>
where
    T: Keyed + Serialize + DeserializeOwned + Clone,
{
    fn save(&mut self, item: T) -> RepoResult<()> {
        self.ensure_loaded()?;
        let index = self.position(item.key());
        match index {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
        self.commit()
    }

    fn save_all(&mut self, items: Vec<T>) -> RepoResult<()> {
        self.items = items;
        self.loaded = true;
        self.commit()
    }

    fn find_by_key(&mut self, key: &str) -> RepoResult<Option<T>> {
        self.ensure_loaded()?;
        Ok(self.position(key).map(|index| self.items[index].clone()))
    }

    fn find_all(&mut self) -> RepoResult<Vec<T>> {
        self.ensure_loaded()?;
        Ok(self.items.clone())
    }

    fn replace_by_key(&mut self, key: &str, item: T) -> RepoResult<bool> {
        self.ensure_loaded()?;
        let Some(index) = self.position(key) else {
            return Ok(false);
        };
        self.items[index] = item;
        self.commit()?;
        Ok(true)
    }

    fn delete_by_key(&mut self, key: &str) -> RepoResult<bool> {
        self.ensure_loaded()?;
        let Some(index) = self.position(key) else {
            return Ok(false);
        };
        self.items.remove(index);
        self.commit()?;
        Ok(true)
    }

    fn delete_all(&mut self) -> RepoResult<()> {
        self.items.clear();
        self.loaded = true;
        self.commit()
    }

    fn exists(&mut self, key: &str) -> RepoResult<bool> {
        self.ensure_loaded()?;
        Ok(self.position(key).is_some())
    }

    fn count(&mut self) -> RepoResult<usize> {
        self.ensure_loaded()?;
        Ok(self.items.len())
    }

    fn invalidate(&mut self) {
        self.loaded = false;
        self.items.clear();
    }
}

fn decode_snapshot<T>(bytes: &[u8]) -> RepoResult<Vec<T>>
where
    T: Keyed + DeserializeOwned,
{
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|err| PersistenceError::with_cause("failed to parse snapshot", err))?;
    if !value.is_array() {
        return Err(PersistenceError::new("invalid format"));
    }

    let items: Vec<T> = serde_json::from_value(value).map_err(|err| {
        PersistenceError::with_cause("snapshot records do not match the expected shape", err)
    })?;

    for item in &items {
        item.validate_persisted().map_err(|err| {
            PersistenceError::with_cause(format!("invalid persisted record `{}`", item.key()), err)
        })?;
    }

    Ok(items)
}

fn write_snapshot<T: Serialize>(path: &Path, items: &[T]) -> RepoResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|err| {
        PersistenceError::with_cause(
            format!("failed to create directory `{}`", parent.display()),
            err,
        )
    })?;

    let payload = serde_json::to_vec_pretty(items)
        .map_err(|err| PersistenceError::with_cause("failed to serialize snapshot", err))?;

    let io_error = |action: &str, err: io::Error| {
        PersistenceError::with_cause(format!("failed to {action} `{}`", path.display()), err)
    };

    let mut tmp = NamedTempFile::new_in(&parent)
        .map_err(|err| io_error("create temporary file for", err))?;
    tmp.write_all(&payload)
        .map_err(|err| io_error("write temporary file for", err))?;
    tmp.flush()
        .map_err(|err| io_error("flush temporary file for", err))?;
    tmp.as_file()
        .sync_all()
        .map_err(|err| io_error("sync temporary file for", err))?;
    tmp.persist(path)
        .map_err(|err| io_error("replace snapshot", err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::decode_snapshot;
    use crate::model::custom_list::CustomList;

    #[test]
    fn decode_rejects_non_array_as_invalid_format() {
        let err = decode_snapshot::<CustomList>(br#"{"name": "x"}"#).unwrap_err();
        assert_eq!(err.message(), "invalid format");
        assert!(!err.has_cause());
    }

    #[test]
    fn decode_keeps_parse_cause() {
        let err = decode_snapshot::<CustomList>(b"[{").unwrap_err();
        assert_eq!(err.message(), "failed to parse snapshot");
        assert!(err.has_cause());
    }

    #[test]
    fn decode_rejects_blank_list_name() {
        let err = decode_snapshot::<CustomList>(
            br#"[{"name": "  ", "description": "", "members": []}]"#,
        )
        .unwrap_err();
        assert!(err.message().contains("invalid persisted record"));
    }
}
