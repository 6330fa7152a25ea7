//! Custom list domain model.
//!
//! # Invariants
//! - `name` is the identity key and compares case-insensitively.
//! - `members` holds entry titles, unique ignoring case, in insertion order.
//! - Members are plain title references; a member may outlive its entry.

use super::anime::ValidationError;
use super::{fold_key, keys_match};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// User-curated, ordered collection of entry titles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomList {
    pub name: String,
    pub description: String,
    members: Vec<String>,
}

impl CustomList {
    /// Creates an empty list. The name is trimmed and must not be empty.
    pub fn new(name: &str, description: &str) -> Result<Self, ValidationError> {
        validate_list_name(name)?;
        Ok(Self {
            name: name.trim().to_string(),
            description: description.to_string(),
            members: Vec::new(),
        })
    }

    /// Appends a title unless an equal one is already present.
    pub fn add_member(&mut self, title: &str) -> bool {
        if self.contains(title) {
            return false;
        }
        self.members.push(title.to_string());
        true
    }

    pub fn remove_member(&mut self, title: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|member| !keys_match(member, title));
        self.members.len() != before
    }

    pub fn contains(&self, title: &str) -> bool {
        self.members.iter().any(|member| keys_match(member, title))
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Keeps only members accepted by `keep`, returning the removed titles.
    pub(crate) fn retain_members(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut removed = Vec::new();
        self.members.retain(|member| {
            let kept = keep(member);
            if !kept {
                removed.push(member.clone());
            }
            kept
        });
        removed
    }

    pub fn has_name(&self, name: &str) -> bool {
        keys_match(&self.name, name)
    }
}

impl PartialEq for CustomList {
    fn eq(&self, other: &Self) -> bool {
        keys_match(&self.name, &other.name)
    }
}

impl Eq for CustomList {}

impl Hash for CustomList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        fold_key(&self.name).hash(state);
    }
}

impl Display for CustomList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let count = self.members.len();
        let noun = if count == 1 { "entry" } else { "entries" };
        write!(f, "{} ({count} {noun})", self.name)
    }
}

pub fn validate_list_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("name", "list name cannot be empty"));
    }
    Ok(())
}
