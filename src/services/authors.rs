//! Author management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
        book::Book,
        page::PageRequest,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn search(&self, query: &AuthorQuery, page: PageRequest) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.search(query, page).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        data.validate()?;
        let author = self.repository.authors.create(data).await?;
        tracing::info!("Created author {} ({})", author.id, author.name);
        Ok(author)
    }

    pub async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        data.validate()?;
        let author = self.repository.authors.update(id, data).await?;
        tracing::info!("Updated author {}", id);
        Ok(author)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(())
    }

    /// Books linked to an author
    pub async fn books(&self, author_id: i32, page: PageRequest) -> AppResult<(Vec<Book>, i64)> {
        self.repository.authors.get_by_id(author_id).await?;
        self.repository.book_authors.books_of_author(author_id, page).await
    }
}
