//! Book catalog service, including the book/author edge set

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookLoanStats, BookQuery, BookSearchQuery, CreateBook, RankingQuery, UpdateBook},
        book_author::BookAuthor,
        page::PageRequest,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn search(&self, query: &BookQuery, page: PageRequest) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query, page).await
    }

    /// Match title, category or author name
    pub async fn search_text(&self, query: &BookSearchQuery, page: PageRequest) -> AppResult<(Vec<Book>, i64)> {
        query.validate()?;
        if query.q.trim().is_empty() {
            return Err(AppError::Validation("Search term is required".to_string()));
        }
        tracing::debug!("Book text search: {}", query.q);
        self.repository.books.search_text(&query.q, page).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        data.validate()?;
        let book = self.repository.books.create(data).await?;
        tracing::info!("Created book {} ({})", book.id, book.isbn);
        Ok(book)
    }

    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        data.validate()?;
        let book = self.repository.books.update(id, data).await?;
        tracing::info!("Updated book {}", id);
        Ok(book)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }

    pub async fn most_borrowed(&self, query: &RankingQuery) -> AppResult<Vec<BookLoanStats>> {
        query.validate()?;
        self.repository.books.most_borrowed(query.limit()).await
    }

    /// Authors linked to a book
    pub async fn authors(&self, book_id: i32) -> AppResult<Vec<Author>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.book_authors.authors_of_book(book_id).await
    }

    pub async fn link_author(&self, book_id: i32, author_id: i32) -> AppResult<BookAuthor> {
        match self.repository.book_authors.link(book_id, author_id).await {
            Ok(edge) => {
                tracing::info!("Linked author {} to book {}", author_id, book_id);
                Ok(edge)
            }
            Err(AppError::Conflict(msg)) => {
                tracing::warn!("Rejected duplicate link: {}", msg);
                Err(AppError::Conflict(msg))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn unlink_author(&self, book_id: i32, author_id: i32) -> AppResult<()> {
        self.repository.book_authors.unlink(book_id, author_id).await?;
        tracing::info!("Unlinked author {} from book {}", author_id, book_id);
        Ok(())
    }
}
