//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Author record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub nationality: Option<String>,
    pub birth_year: Option<i32>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 128))]
    pub nationality: Option<String>,
    pub birth_year: Option<i32>,
}

/// Update author request; omitted fields are left untouched.
///
/// `null` reads the same as an omitted field, so `nationality` and
/// `birth_year` can be replaced but not cleared.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 128))]
    pub nationality: Option<String>,
    pub birth_year: Option<i32>,
}

impl UpdateAuthor {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.nationality.is_none() && self.birth_year.is_none()
    }
}

/// Author query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AuthorQuery {
    pub name: Option<String>,
    pub nationality: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_fields_leave_update_empty() {
        let update: UpdateAuthor =
            serde_json::from_str(r#"{"nationality": null, "birth_year": null}"#).expect("valid json");
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_sets_nationality() {
        let update: UpdateAuthor = serde_json::from_str(r#"{"nationality": "Brazilian"}"#).expect("valid json");
        assert_eq!(update.nationality.as_deref(), Some("Brazilian"));
        assert!(!update.is_empty());
    }
}
