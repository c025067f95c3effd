//! API handlers for the library REST endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod stats;
pub mod students;

use crate::{models::page::PageRequest, AppState};

/// Build a page request bounded by the configured pagination limits
pub(crate) fn page_request(state: &AppState, page: Option<i64>, per_page: Option<i64>) -> PageRequest {
    PageRequest::new(page, per_page, &state.config.pagination)
}
