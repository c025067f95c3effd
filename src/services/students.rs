//! Student management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        page::PageRequest,
        student::{CreateStudent, Student, StudentQuery, UpdateStudent},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn search(&self, query: &StudentQuery, page: PageRequest) -> AppResult<(Vec<Student>, i64)> {
        self.repository.students.search(query, page).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Student> {
        self.repository.students.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateStudent) -> AppResult<Student> {
        data.validate()?;
        let student = self.repository.students.create(data).await?;
        tracing::info!("Created student {} ({})", student.id, student.registration);
        Ok(student)
    }

    pub async fn update(&self, id: i32, data: &UpdateStudent) -> AppResult<Student> {
        data.validate()?;
        let student = self.repository.students.update(id, data).await?;
        tracing::info!("Updated student {}", id);
        Ok(student)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.students.delete(id).await?;
        tracing::info!("Deleted student {}", id);
        Ok(())
    }
}
