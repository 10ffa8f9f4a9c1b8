//! Parent role-extension records.
//!
//! A parent owns its own login user and optionally points at one student.
//! The student link is set-null on student deletion: a parent survives its
//! student's removal. Contact fields are denormalized copies kept on the
//! parent row itself.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// How the parent is related to the student.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "parent_relationship", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Father,
    Mother,
    Brother,
    Sister,
    Grandmother,
    Grandfather,
    Other,
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Brother => "Brother",
            Self::Sister => "Sister",
            Self::Grandmother => "Grandmother",
            Self::Grandfather => "Grandfather",
            Self::Other => "Other",
        };
        f.write_str(s)
    }
}

/// A parent row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Parent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub student_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub relationship: Relationship,
}

/// A parent joined with its owning user's username.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ParentDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub student_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub relationship: Relationship,
}

impl fmt::Display for ParentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// DTO for registering an existing user as a parent.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateParentDto {
    pub user_id: Uuid,
    pub student_id: Option<Uuid>,
    #[validate(length(min = 1, max = 120, message = "first_name must be 1-120 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 120, message = "last_name must be 1-120 characters"))]
    pub last_name: String,
    pub phone: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub relationship: Relationship,
}

/// DTO for updating a parent's student link or contact fields.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateParentDto {
    pub student_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub relationship: Option<Relationship>,
}

/// Query parameters for listing parents.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ParentFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated parents response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedParentsResponse {
    pub data: Vec<ParentDetails>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Relationship::Grandmother).unwrap(),
            r#""grandmother""#
        );
        assert_eq!(
            serde_json::from_str::<Relationship>(r#""father""#).unwrap(),
            Relationship::Father
        );
    }

    #[test]
    fn parent_details_display_is_the_username() {
        let parent = ParentDetails {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "pat".to_string(),
            student_id: None,
            first_name: "Pat".to_string(),
            last_name: "Doe".to_string(),
            phone: None,
            email: None,
            relationship: Relationship::Mother,
        };
        assert_eq!(parent.to_string(), "pat");
    }

    #[test]
    fn create_parent_dto_requires_names() {
        let dto = CreateParentDto {
            user_id: Uuid::new_v4(),
            student_id: None,
            first_name: String::new(),
            last_name: "Doe".to_string(),
            phone: None,
            email: None,
            relationship: Relationship::Other,
        };
        assert!(dto.validate().is_err());
    }
}
