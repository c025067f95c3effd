//! Students repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use super::{contains_pattern, Entity};
use crate::{
    error::AppResult,
    models::{
        page::PageRequest,
        student::{CreateStudent, Student, StudentQuery, UpdateStudent},
    },
};

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &StudentQuery) {
    builder.push(" WHERE TRUE");
    if let Some(name) = query.name.as_deref().filter(|s| !s.trim().is_empty()) {
        builder.push(" AND name ILIKE ").push_bind(contains_pattern(name));
    }
    if let Some(course) = query.course.as_deref().filter(|s| !s.trim().is_empty()) {
        builder.push(" AND course ILIKE ").push_bind(contains_pattern(course));
    }
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Student> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Entity::Student.not_found(id))
    }

    /// Search students with filters and pagination
    pub async fn search(&self, query: &StudentQuery, page: PageRequest) -> AppResult<(Vec<Student>, i64)> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM students");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new("SELECT * FROM students");
        push_filters(&mut select, query);
        select
            .push(" ORDER BY name, id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let students = select.build_query_as::<Student>().fetch_all(&self.pool).await?;

        Ok((students, total))
    }

    /// Create a new student
    pub async fn create(&self, data: &CreateStudent) -> AppResult<Student> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (name, registration, course, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.registration)
        .bind(&data.course)
        .bind(&data.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(student)
    }

    /// Update the supplied fields of a student
    pub async fn update(&self, id: i32, data: &UpdateStudent) -> AppResult<Student> {
        if data.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE students SET ");
        let mut sets = builder.separated(", ");
        if let Some(ref name) = data.name {
            sets.push("name = ").push_bind_unseparated(name);
        }
        if let Some(ref registration) = data.registration {
            sets.push("registration = ").push_bind_unseparated(registration);
        }
        if let Some(ref course) = data.course {
            sets.push("course = ").push_bind_unseparated(course);
        }
        if let Some(ref email) = data.email {
            sets.push("email = ").push_bind_unseparated(email);
        }
        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        builder
            .build_query_as::<Student>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Entity::Student.not_found(id))
    }

    /// Delete a student; fails while loans still reference it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Entity::Student.not_found(id));
        }
        Ok(())
    }
}
