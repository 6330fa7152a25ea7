//! Core domain logic for the anime catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod config;
pub mod interchange;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod stats;

pub use config::{CatalogConfig, ConfigError};
pub use interchange::{export_catalog, parse_document, parse_line, ImportReport};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::anime::{
    AnimeEntry, EntryDetails, EntryKind, Genre, ValidationError, WatchStatus,
};
pub use model::custom_list::CustomList;
pub use repo::{
    AnimeRepository, AnimeStore, ListRepository, ListStore, PersistenceError, RepoResult,
    Repository, SnapshotStore,
};
pub use search::filter::AnimeFilter;
pub use search::ordering::{ByRating, ByTitle, ByYear, EntryOrdering, SortDirection};
pub use search::recommend::{AdvancedCriteria, Recommendation, TopByGenre, TopByStatus, TopGlobal};
pub use service::anime_service::{AnimeService, EntryUpdate};
pub use service::list_service::{ListService, ListUpdate, ResolvedMembers};
pub use service::recommendation_service::RecommendationService;
pub use service::stats_service::StatisticsService;
pub use service::{EntityKind, ServiceError, ServiceResult};
pub use stats::CatalogSummary;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
