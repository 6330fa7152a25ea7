//! Catalog domain model.
//!
//! # Responsibility
//! - Define the canonical catalog entry (series/movie) and custom list shapes.
//! - Own field-level validation shared by services and snapshot loading.
//!
//! # Invariants
//! - Entries are identified only by their title, folded case-insensitively.
//! - Lists are identified only by their name, folded case-insensitively.
//! - Lists reference entries by title and never own them.

pub mod anime;
pub mod custom_list;

/// Returns whether two business keys are equal ignoring case.
pub fn keys_match(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

/// Folds a business key into its case-insensitive canonical form.
pub fn fold_key(key: &str) -> String {
    key.to_lowercase()
}

/// Returns whether `haystack` contains `needle` ignoring case.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold_key(haystack).contains(&fold_key(needle))
}
