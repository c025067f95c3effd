//! Page/offset arithmetic shared by every list endpoint

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::PaginationConfig;

/// A validated page request (1-based page, bounded page size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Clamp raw query values against the configured bounds.
    pub fn new(page: Option<i64>, per_page: Option<i64>, config: &PaginationConfig) -> Self {
        let per_page = per_page
            .unwrap_or(config.default_per_page)
            .clamp(1, config.max_per_page.max(1));
        // Largest page whose offset still fits in an i64
        let last_page = i64::MAX / per_page;
        Self {
            page: page.unwrap_or(1).clamp(1, last_page),
            per_page,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Bare paging parameters for relationship listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Records on this page
    pub items: Vec<T>,
    /// Total number of matching records
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Records per page
    pub per_page: i64,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply() {
        let page = PageRequest::new(None, None, &PaginationConfig::default());
        assert_eq!(page, PageRequest { page: 1, per_page: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_bounds_are_clamped() {
        let config = PaginationConfig::default();
        assert_eq!(PageRequest::new(Some(0), Some(500), &config).per_page, 100);
        assert_eq!(PageRequest::new(Some(-3), Some(0), &config), PageRequest { page: 1, per_page: 1 });

        let huge = PageRequest::new(Some(i64::MAX), Some(100), &config);
        assert_eq!(huge.page, i64::MAX / 100);
        assert!(huge.offset() >= 0);
        assert_eq!(PageRequest::new(Some(i64::MAX), Some(1), &config).offset(), i64::MAX - 1);
    }

    #[test]
    fn test_offset() {
        let page = PageRequest::new(Some(3), Some(20), &PaginationConfig::default());
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
    }
}
