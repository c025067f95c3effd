//! Statistics service

use super::today;
use crate::{error::AppResult, models::stats::LibraryStats, repository::Repository};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Totals, loan counters and the leading book and student
    pub async fn overview(&self) -> AppResult<LibraryStats> {
        let counters = self.repository.stats.counters(today()).await?;
        let most_borrowed_book = self.repository.stats.most_borrowed_book().await?;
        let most_active_student = self.repository.stats.most_active_student().await?;
        Ok(LibraryStats::new(counters, most_borrowed_book, most_active_student))
    }
}
