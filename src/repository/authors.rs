//! Authors repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use super::{contains_pattern, Entity};
use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
        page::PageRequest,
    },
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &AuthorQuery) {
    builder.push(" WHERE TRUE");
    if let Some(name) = query.name.as_deref().filter(|s| !s.trim().is_empty()) {
        builder.push(" AND name ILIKE ").push_bind(contains_pattern(name));
    }
    if let Some(nationality) = query.nationality.as_deref().filter(|s| !s.trim().is_empty()) {
        builder
            .push(" AND nationality ILIKE ")
            .push_bind(contains_pattern(nationality));
    }
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Entity::Author.not_found(id))
    }

    pub async fn search(&self, query: &AuthorQuery, page: PageRequest) -> AppResult<(Vec<Author>, i64)> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM authors");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new("SELECT * FROM authors");
        push_filters(&mut select, query);
        select
            .push(" ORDER BY name, id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let authors = select.build_query_as::<Author>().fetch_all(&self.pool).await?;

        Ok((authors, total))
    }

    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, nationality, birth_year)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.nationality)
        .bind(data.birth_year)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    pub async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        if data.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE authors SET ");
        let mut sets = builder.separated(", ");
        if let Some(ref name) = data.name {
            sets.push("name = ").push_bind_unseparated(name);
        }
        if let Some(ref nationality) = data.nationality {
            sets.push("nationality = ").push_bind_unseparated(nationality);
        }
        if let Some(birth_year) = data.birth_year {
            sets.push("birth_year = ").push_bind_unseparated(birth_year);
        }
        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        builder
            .build_query_as::<Author>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Entity::Author.not_found(id))
    }

    /// Delete an author; its book links go with it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Entity::Author.not_found(id));
        }
        Ok(())
    }
}
