//! Statistics use-case service.
//!
//! # Invariants
//! - Every call reads the catalog exactly once, so each result reflects one
//!   consistent snapshot.
//! - The service never mutates the catalog.

use super::ServiceResult;
use crate::model::anime::{Genre, WatchStatus};
use crate::repo::AnimeRepository;
use crate::stats::{self, CatalogSummary};
use std::collections::BTreeMap;

pub struct StatisticsService<R: AnimeRepository> {
    repo: R,
}

impl<R: AnimeRepository> StatisticsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn average_rating(&mut self) -> ServiceResult<f64> {
        Ok(stats::average_rating(&self.repo.find_all()?))
    }

    pub fn average_rating_for_genre(&mut self, genre: Genre) -> ServiceResult<f64> {
        Ok(stats::average_rating_for_genre(
            &self.repo.find_all()?,
            genre,
        ))
    }

    pub fn genre_average_ratings(&mut self) -> ServiceResult<BTreeMap<Genre, f64>> {
        Ok(stats::genre_average_ratings(&self.repo.find_all()?))
    }

    pub fn counts_by_status(&mut self) -> ServiceResult<BTreeMap<WatchStatus, u64>> {
        Ok(stats::counts_by_status(&self.repo.find_all()?))
    }

    pub fn top_three_genres(&mut self) -> ServiceResult<Vec<(Genre, u64)>> {
        Ok(stats::top_three_genres(&self.repo.find_all()?))
    }

    pub fn genre_distribution(&mut self) -> ServiceResult<BTreeMap<Genre, u64>> {
        Ok(stats::genre_distribution(&self.repo.find_all()?))
    }

    pub fn summary(&mut self) -> ServiceResult<CatalogSummary> {
        Ok(stats::summarize(&self.repo.find_all()?))
    }
}
