//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into catalog use-cases.
//! - Translate "absent" repository results into `NotFound`/`AlreadyExists`.
//! - Keep callers (CLI or any other driver) decoupled from storage details.
//!
//! # Invariants
//! - Validation runs before any repository mutation.
//! - Errors are propagated unchanged; nothing is retried or swallowed.

use crate::model::anime::ValidationError;
use crate::repo::PersistenceError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod anime_service;
pub mod list_service;
pub mod recommendation_service;
pub mod stats_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Kind of keyed record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Entry,
    List,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry => f.write_str("entry"),
            Self::List => f.write_str("list"),
        }
    }
}

/// Service-level error taxonomy.
#[derive(Debug)]
pub enum ServiceError {
    /// Input violates a field invariant; nothing was committed.
    Validation(ValidationError),
    /// Operation requires an existing record.
    NotFound { kind: EntityKind, key: String },
    /// Registration or rename collides with an existing key.
    AlreadyExists { kind: EntityKind, key: String },
    /// Store I/O or (de)serialization failure.
    Persistence(PersistenceError),
}

impl ServiceError {
    pub(crate) fn entry_not_found(key: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::Entry,
            key: key.to_string(),
        }
    }

    pub(crate) fn list_not_found(key: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::List,
            key: key.to_string(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, key } => write!(f, "{kind} not found: `{key}`"),
            Self::AlreadyExists { kind, key } => write!(f, "{kind} already exists: `{key}`"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::NotFound { .. } | Self::AlreadyExists { .. } => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for ServiceError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}
