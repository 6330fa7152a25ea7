//! Custom list use-case service.
//!
//! # Responsibility
//! - Create, rename and delete named lists.
//! - Add/remove catalog entries to/from lists by title.
//!
//! # Invariants
//! - List names are unique ignoring case.
//! - Adding requires both the list and the catalog entry to exist.
//! - Catalog deletes/renames never rewrite list members; stale titles stay
//!   until [`ListService::remove_stale_members`] is called.

use super::{EntityKind, ServiceError, ServiceResult};
use crate::model::anime::AnimeEntry;
use crate::model::custom_list::{validate_list_name, CustomList};
use crate::model::keys_match;
use crate::repo::{AnimeRepository, ListRepository};
use log::info;

/// Partial list update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// List members split by whether the catalog still holds them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedMembers {
    /// Catalog entries, in list order.
    pub entries: Vec<AnimeEntry>,
    /// Member titles with no catalog entry, in list order.
    pub stale: Vec<String>,
}

/// List service over a list repository and the entry catalog.
pub struct ListService<L: ListRepository, A: AnimeRepository> {
    lists: L,
    entries: A,
}

impl<L: ListRepository, A: AnimeRepository> ListService<L, A> {
    pub fn new(lists: L, entries: A) -> Self {
        Self { lists, entries }
    }

    pub fn create_list(&mut self, name: &str, description: &str) -> ServiceResult<CustomList> {
        let list = CustomList::new(name, description)?;
        self.ensure_name_available(&list.name)?;
        self.lists.save(list.clone())?;
        info!("event=list_create module=service status=ok");
        Ok(list)
    }

    /// Appends an existing catalog entry to a list.
    ///
    /// Returns `false` when the entry is already a member.
    pub fn add_entry(&mut self, list_name: &str, title: &str) -> ServiceResult<bool> {
        let mut list = self.find_list(list_name)?;
        let entry = self
            .entries
            .find_by_key(title)?
            .ok_or_else(|| ServiceError::entry_not_found(title))?;

        let added = list.add_member(&entry.title);
        if added {
            self.lists.save(list)?;
        }
        Ok(added)
    }

    /// Removes a catalog entry from a list.
    ///
    /// The entry must still exist in the catalog; use
    /// [`ListService::remove_stale_members`] for titles that do not.
    pub fn remove_entry(&mut self, list_name: &str, title: &str) -> ServiceResult<bool> {
        let mut list = self.find_list(list_name)?;
        let entry = self
            .entries
            .find_by_key(title)?
            .ok_or_else(|| ServiceError::entry_not_found(title))?;

        let removed = list.remove_member(&entry.title);
        if removed {
            self.lists.save(list)?;
        }
        Ok(removed)
    }

    pub fn list_all(&mut self) -> ServiceResult<Vec<CustomList>> {
        Ok(self.lists.find_all()?)
    }

    /// Returns the list named `name` or `NotFound`.
    pub fn find_list(&mut self, name: &str) -> ServiceResult<CustomList> {
        self.lists
            .find_by_key(name)?
            .ok_or_else(|| ServiceError::list_not_found(name))
    }

    pub fn delete_list(&mut self, name: &str) -> ServiceResult<bool> {
        Ok(self.lists.delete_by_key(name)?)
    }

    /// Renames and/or re-describes a list, keeping its position.
    pub fn update_list(
        &mut self,
        original_name: &str,
        update: &ListUpdate,
    ) -> ServiceResult<CustomList> {
        let mut list = self.find_list(original_name)?;
        let stored_key = list.name.clone();

        if let Some(new_name) = &update.name {
            let new_name = new_name.trim();
            validate_list_name(new_name)?;
            if !keys_match(&stored_key, new_name) {
                self.ensure_name_available(new_name)?;
                list.name = new_name.to_string();
            }
        }
        if let Some(description) = &update.description {
            list.description = description.clone();
        }

        self.lists.replace_by_key(&stored_key, list.clone())?;
        Ok(list)
    }

    /// Member titles in insertion order, including stale ones.
    pub fn members(&mut self, list_name: &str) -> ServiceResult<Vec<String>> {
        Ok(self.find_list(list_name)?.members().to_vec())
    }

    /// Looks every member up in the catalog.
    pub fn resolve_members(&mut self, list_name: &str) -> ServiceResult<ResolvedMembers> {
        let list = self.find_list(list_name)?;
        let catalog = self.entries.find_all()?;
        let mut resolved = ResolvedMembers::default();
        for title in list.members() {
            match catalog.iter().find(|entry| entry.has_title(title)) {
                Some(entry) => resolved.entries.push(entry.clone()),
                None => resolved.stale.push(title.clone()),
            }
        }
        Ok(resolved)
    }

    pub fn contains_entry(&mut self, list_name: &str, title: &str) -> ServiceResult<bool> {
        Ok(self.find_list(list_name)?.contains(title))
    }

    /// Lists that reference `title`, in stored order.
    pub fn lists_containing(&mut self, title: &str) -> ServiceResult<Vec<CustomList>> {
        Ok(self
            .lists
            .find_all()?
            .into_iter()
            .filter(|list| list.contains(title))
            .collect())
    }

    /// Drops members whose title no longer exists in the catalog.
    ///
    /// Returns the removed titles; the list is only rewritten when non-empty.
    pub fn remove_stale_members(&mut self, list_name: &str) -> ServiceResult<Vec<String>> {
        let mut list = self.find_list(list_name)?;
        let catalog = self.entries.find_all()?;
        let removed =
            list.retain_members(|title| catalog.iter().any(|entry| entry.has_title(title)));
        if !removed.is_empty() {
            self.lists.save(list)?;
            info!(
                "event=list_prune module=service status=ok removed={}",
                removed.len()
            );
        }
        Ok(removed)
    }

    pub fn count(&mut self) -> ServiceResult<usize> {
        Ok(self.lists.count()?)
    }

    fn ensure_name_available(&mut self, name: &str) -> ServiceResult<()> {
        if self.lists.exists(name)? {
            return Err(ServiceError::AlreadyExists {
                kind: EntityKind::List,
                key: name.trim().to_string(),
            });
        }
        Ok(())
    }
}
