//! Department-head role-extension records. Pure data holders: one owning
//! user plus a program reference.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// A department-head row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DepartmentHead {
    pub id: Uuid,
    pub user_id: Uuid,
    pub program_id: Option<Uuid>,
}

/// A department head joined with its owning user and program title.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DepartmentHeadDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub program_id: Option<Uuid>,
    pub program_title: Option<String>,
}

impl DepartmentHeadDetails {
    fn user_full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            _ => self.username.clone(),
        }
    }
}

// Renders the owning user, in the user's own display form.
impl fmt::Display for DepartmentHeadDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.user_full_name())
    }
}

/// DTO for appointing an existing user as a department head.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentHeadDto {
    pub user_id: Uuid,
    pub program_id: Option<Uuid>,
}

/// Query parameters for listing department heads.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DepartmentHeadFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated department-heads response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedDepartmentHeadsResponse {
    pub data: Vec<DepartmentHeadDetails>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_the_owning_user() {
        let head = DepartmentHeadDetails {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "drjones".to_string(),
            first_name: Some("Indiana".to_string()),
            last_name: Some("Jones".to_string()),
            program_id: None,
            program_title: Some("Archaeology".to_string()),
        };
        assert_eq!(head.to_string(), "drjones (Indiana Jones)");
    }

    #[test]
    fn display_falls_back_to_username() {
        let head = DepartmentHeadDetails {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "drjones".to_string(),
            first_name: None,
            last_name: None,
            program_id: None,
            program_title: None,
        };
        assert_eq!(head.to_string(), "drjones (drjones)");
    }
}
