//! Book-Author junction model (N:M relationship)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Edge linking a book to one of its authors.
///
/// The pair is the primary key of `book_authors`, so an edge exists at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookAuthor {
    pub book_id: i32,
    pub author_id: i32,
}
