//! Library-wide statistics

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Raw counters read in one round-trip
#[derive(Debug, Clone, Copy, FromRow)]
pub struct StatsCounters {
    pub total_students: i64,
    pub total_authors: i64,
    pub total_books: i64,
    pub total_loans: i64,
    pub active_loans: i64,
    pub overdue_loans: i64,
}

/// Statistics response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryStats {
    pub total_students: i64,
    pub total_authors: i64,
    pub total_books: i64,
    pub total_loans: i64,
    /// Loans not yet returned
    pub active_loans: i64,
    /// Loans already returned
    pub finished_loans: i64,
    /// Active loans past their expected return date
    pub overdue_loans: i64,
    /// Title of the book with the most loans
    pub most_borrowed_book: Option<String>,
    /// Name of the student with the most loans
    pub most_active_student: Option<String>,
}

impl LibraryStats {
    pub fn new(
        counters: StatsCounters,
        most_borrowed_book: Option<String>,
        most_active_student: Option<String>,
    ) -> Self {
        Self {
            total_students: counters.total_students,
            total_authors: counters.total_authors,
            total_books: counters.total_books,
            total_loans: counters.total_loans,
            active_loans: counters.active_loans,
            finished_loans: counters.total_loans - counters.active_loans,
            overdue_loans: counters.overdue_loans,
            most_borrowed_book,
            most_active_student,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_is_total_minus_active() {
        let stats = LibraryStats::new(
            StatsCounters {
                total_students: 15,
                total_authors: 10,
                total_books: 12,
                total_loans: 20,
                active_loans: 7,
                overdue_loans: 2,
            },
            Some("Clean Code".into()),
            None,
        );
        assert_eq!(stats.finished_loans, 13);
        assert_eq!(stats.most_borrowed_book.as_deref(), Some("Clean Code"));
    }
}
