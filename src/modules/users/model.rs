//! User entity and DTOs.
//!
//! A user is the root identity record. The role booleans are
//! independent at the data level; the single display role is derived by
//! [`User::role`] with a fixed priority, and the profile picture is a
//! storage key resolved through the blob store at read time.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// A user account.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Storage key of the profile picture; `default.png` until one is set.
    pub picture: String,
    pub is_admin: bool,
    pub is_student: bool,
    pub is_lecturer: bool,
    pub is_parent: bool,
    pub is_dep_head: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// The single display role derived from the account flags.
///
/// The department-head flag does not carry a display role of its own; an
/// account with only that flag set has no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    Admin,
    Student,
    Lecturer,
    Parent,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Admin => "Admin",
            Self::Student => "Student",
            Self::Lecturer => "Lecturer",
            Self::Parent => "Parent",
        };
        f.write_str(s)
    }
}

impl User {
    /// `"first last"` when both names are present, the username otherwise.
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            _ => self.username.clone(),
        }
    }

    /// Resolve the display role by priority: admin > student > lecturer >
    /// parent. Flags are not mutually exclusive; only the highest-priority
    /// one shows.
    pub fn role(&self) -> Option<UserRole> {
        if self.is_admin {
            Some(UserRole::Admin)
        } else if self.is_student {
            Some(UserRole::Student)
        } else if self.is_lecturer {
            Some(UserRole::Lecturer)
        } else if self.is_parent {
            Some(UserRole::Parent)
        } else {
            None
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.full_name())
    }
}

/// Usernames are restricted to ASCII letters, digits, and `@ . + - _`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset").with_message(Cow::Borrowed(
            "username may only contain ASCII letters, digits, and @/./+/-/_",
        )))
    }
}

/// DTO for registering a user.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(
        length(min = 1, max = 150, message = "username must be 1-150 characters"),
        custom(function = validate_username)
    )]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub is_student: bool,
    #[serde(default)]
    pub is_lecturer: bool,
    #[serde(default)]
    pub is_parent: bool,
    #[serde(default)]
    pub is_dep_head: bool,
}

/// DTO for updating profile fields. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Query parameters for listing/searching users.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserFilterParams {
    /// Case-insensitive substring matched against username, first name,
    /// last name, or email.
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// A user as rendered to clients, with the derived display fields attached.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: User,
    pub full_name: String,
    pub role: Option<UserRole>,
    /// Resolved picture URL; falls back to the default picture on any
    /// resolution failure.
    pub picture_url: String,
}

impl UserResponse {
    pub fn new(user: User, picture_url: String) -> Self {
        Self {
            full_name: user.full_name(),
            role: user.role(),
            user,
            picture_url,
        }
    }
}

/// Paginated users response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<UserResponse>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn test_user(username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: None,
            first_name: None,
            last_name: None,
            phone: None,
            address: None,
            picture: "default.png".to_string(),
            is_admin: false,
            is_student: false,
            is_lecturer: false,
            is_parent: false,
            is_dep_head: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn role_resolution_respects_priority() {
        let mut user = test_user("jo");

        assert_eq!(user.role(), None);

        user.is_parent = true;
        assert_eq!(user.role(), Some(UserRole::Parent));

        user.is_lecturer = true;
        assert_eq!(user.role(), Some(UserRole::Lecturer));

        user.is_student = true;
        assert_eq!(user.role(), Some(UserRole::Student));

        user.is_admin = true;
        assert_eq!(user.role(), Some(UserRole::Admin));
    }

    #[test]
    fn dep_head_flag_alone_has_no_display_role() {
        let mut user = test_user("head");
        user.is_dep_head = true;
        assert_eq!(user.role(), None);
    }

    #[test]
    fn full_name_falls_back_to_username() {
        let mut user = test_user("jsmith");
        assert_eq!(user.full_name(), "jsmith");

        user.first_name = Some("John".to_string());
        assert_eq!(user.full_name(), "jsmith");

        user.last_name = Some("Smith".to_string());
        assert_eq!(user.full_name(), "John Smith");
    }

    #[test]
    fn display_renders_username_and_full_name() {
        let mut user = test_user("jsmith");
        user.first_name = Some("John".to_string());
        user.last_name = Some("Smith".to_string());
        assert_eq!(user.to_string(), "jsmith (John Smith)");
    }

    #[test]
    fn username_charset_is_ascii_only() {
        assert!(validate_username("john.smith+1@here_now-x").is_ok());
        assert!(validate_username("jöhn").is_err());
        assert!(validate_username("john smith").is_err());
        assert!(validate_username("джон").is_err());
    }

    #[test]
    fn create_user_dto_validates_username() {
        let dto: CreateUserDto =
            serde_json::from_str(r#"{"username":"véra"}"#).expect("deserializes");
        assert!(dto.validate().is_err());

        let dto: CreateUserDto =
            serde_json::from_str(r#"{"username":"vera","is_student":true}"#).unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.is_student);
        assert!(!dto.is_lecturer);
    }

    #[test]
    fn role_serializes_as_plain_name() {
        assert_eq!(
            serde_json::to_string(&UserRole::Lecturer).unwrap(),
            r#""Lecturer""#
        );
    }

    #[test]
    fn user_response_carries_derived_fields() {
        let mut user = test_user("amy");
        user.is_admin = true;
        let resp = UserResponse::new(user, "http://files/default.png".to_string());
        assert_eq!(resp.role, Some(UserRole::Admin));
        assert_eq!(resp.full_name, "amy");

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["username"], "amy");
        assert_eq!(json["role"], "Admin");
        assert_eq!(json["picture_url"], "http://files/default.png");
    }
}
