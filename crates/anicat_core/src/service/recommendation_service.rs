//! Recommendation use-case service.
//!
//! Runs recommendation strategies against the current catalog snapshot.

use super::ServiceResult;
use crate::model::anime::{AnimeEntry, Genre, WatchStatus};
use crate::repo::AnimeRepository;
use crate::search::recommend::{
    advanced_recommendation, AdvancedCriteria, Recommendation, TopByGenre, TopByStatus, TopGlobal,
};

pub struct RecommendationService<R: AnimeRepository> {
    repo: R,
}

impl<R: AnimeRepository> RecommendationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn recommend(
        &mut self,
        strategy: &dyn Recommendation,
        limit: usize,
    ) -> ServiceResult<Vec<AnimeEntry>> {
        let entries = self.repo.find_all()?;
        Ok(strategy.recommend(&entries, limit))
    }

    pub fn top_global(&mut self, limit: usize) -> ServiceResult<Vec<AnimeEntry>> {
        self.recommend(&TopGlobal, limit)
    }

    pub fn top_by_genre(&mut self, genre: Genre, limit: usize) -> ServiceResult<Vec<AnimeEntry>> {
        self.recommend(&TopByGenre::new(genre), limit)
    }

    pub fn top_by_status(
        &mut self,
        status: WatchStatus,
        limit: usize,
    ) -> ServiceResult<Vec<AnimeEntry>> {
        self.recommend(&TopByStatus::new(status), limit)
    }

    pub fn advanced(
        &mut self,
        criteria: &AdvancedCriteria,
        limit: usize,
    ) -> ServiceResult<Vec<AnimeEntry>> {
        let entries = self.repo.find_all()?;
        Ok(advanced_recommendation(&entries, criteria, limit))
    }
}
