//! Data models for the library server

pub mod author;
pub mod book;
pub mod book_author;
pub mod loan;
pub mod page;
pub mod stats;
pub mod student;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookLoanStats};
pub use book_author::BookAuthor;
pub use loan::{Loan, LoanDetails, LoanStatus, LoanSummary};
pub use page::{PageParams, PageRequest, PaginatedResponse};
pub use stats::LibraryStats;
pub use student::Student;
