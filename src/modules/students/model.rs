//! Student role-extension records.
//!
//! A student row links exactly one user to an optional level and an optional
//! academic program. The program is an external entity: referenced by id,
//! never owned or mutated here.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// Board level a student is enrolled under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "student_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Ssc,
    Cbsc,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ssc => "State Board",
            Self::Cbsc => "CBSC Board",
        };
        f.write_str(s)
    }
}

/// A student row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level: Option<Level>,
    pub program_id: Option<Uuid>,
}

/// A student joined with its owning user and program title, as rendered to
/// clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub level: Option<Level>,
    pub program_id: Option<Uuid>,
    pub program_title: Option<String>,
}

/// DTO for enrolling an existing user as a student.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    pub user_id: Uuid,
    pub level: Option<Level>,
    pub program_id: Option<Uuid>,
}

/// DTO for updating a student's level or program. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    pub level: Option<Level>,
    pub program_id: Option<Uuid>,
}

/// Query parameters for listing/searching students.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StudentFilterParams {
    /// Case-insensitive substring matched against the stored level or the
    /// program title.
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated students response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<StudentDetails>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_displays_board_names() {
        assert_eq!(Level::Ssc.to_string(), "State Board");
        assert_eq!(Level::Cbsc.to_string(), "CBSC Board");
    }

    #[test]
    fn level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Level::Ssc).unwrap(), r#""ssc""#);
        assert_eq!(
            serde_json::from_str::<Level>(r#""cbsc""#).unwrap(),
            Level::Cbsc
        );
    }

    #[test]
    fn create_student_dto_deserializes() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"user_id":"{}","level":"ssc"}}"#, id);
        let dto: CreateStudentDto = serde_json::from_str(&json).unwrap();
        assert_eq!(dto.user_id, id);
        assert_eq!(dto.level, Some(Level::Ssc));
        assert_eq!(dto.program_id, None);
    }
}
