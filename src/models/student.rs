//! Student model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Student record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub name: String,
    /// Registration number, unique across students
    pub registration: String,
    pub course: String,
    /// Unique e-mail address
    pub email: String,
}

/// Create student request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudent {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 64, message = "Registration number is required"))]
    pub registration: String,
    #[validate(length(min = 1, max = 255, message = "Course is required"))]
    pub course: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Update student request; omitted fields are left untouched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudent {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub registration: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub course: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl UpdateStudent {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.registration.is_none()
            && self.course.is_none()
            && self.email.is_none()
    }
}

/// Student query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct StudentQuery {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Case-insensitive substring of the course
    pub course: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_bad_email() {
        let student = CreateStudent {
            name: "Ana Silva".into(),
            registration: "2024001".into(),
            course: "Computer Science".into(),
            email: "not-an-email".into(),
        };
        assert!(student.validate().is_err());
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        assert!(UpdateStudent::default().validate().is_ok());
        let update = UpdateStudent {
            email: Some("ana@university.edu".into()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert!(!update.is_empty());
    }
}
