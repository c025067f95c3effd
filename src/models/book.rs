//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    /// Publication year
    pub year: i32,
    /// ISBN, unique across books
    pub isbn: String,
    pub category: Option<String>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 512, message = "Title is required"))]
    pub title: String,
    pub year: i32,
    #[validate(length(min = 1, max = 32, message = "ISBN is required"))]
    pub isbn: String,
    #[validate(length(max = 128))]
    pub category: Option<String>,
}

/// Update book request; omitted fields are left untouched.
///
/// `null` reads the same as an omitted field, so a stored `category` can be
/// replaced but not cleared.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 512))]
    pub title: Option<String>,
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 32))]
    pub isbn: Option<String>,
    #[validate(length(max = 128))]
    pub category: Option<String>,
}

impl UpdateBook {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.year.is_none() && self.isbn.is_none() && self.category.is_none()
    }
}

/// Book query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the category
    pub category: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Free-text search over title, category and linked author names
#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
pub struct BookSearchQuery {
    #[validate(length(min = 1, message = "Search term is required"))]
    pub q: String,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Ranking query parameters
#[derive(Debug, Default, Deserialize, Validate, IntoParams, ToSchema)]
pub struct RankingQuery {
    /// Number of books to return (default 10, max 50)
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<i64>,
}

impl RankingQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10)
    }
}

/// Book with its loan counters, used by the most-borrowed ranking
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookLoanStats {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub category: Option<String>,
    /// Loans ever recorded for this book
    pub total_loans: i64,
    /// Loans not yet returned
    pub active_loans: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_category_leaves_update_empty() {
        let update: UpdateBook = serde_json::from_str(r#"{"category": null}"#).expect("valid json");
        assert!(update.category.is_none());
        assert!(update.is_empty());
    }

    #[test]
    fn test_ranking_limit_default() {
        assert_eq!(RankingQuery::default().limit(), 10);
        assert!(RankingQuery { limit: Some(51) }.validate().is_err());
    }
}
