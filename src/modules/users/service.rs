use anyhow::Context;
use campuskit_core::{FileStorage, images};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::storage::{DEFAULT_PICTURE, StorageConfig};
use crate::modules::users::model::{CreateUserDto, UpdateProfileDto, User};
use crate::utils::errors::AppError;

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, phone, address, picture, \
     is_admin, is_student, is_lecturer, is_parent, is_dep_head, created_at, updated_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, first_name, last_name, phone, address,
                               is_student, is_lecturer, is_parent, is_dep_head)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(dto.is_student)
        .bind(dto.is_lecturer)
        .bind(dto.is_parent)
        .bind(dto.is_dep_head)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(
                    "Username {} is already taken",
                    dto.username
                ));
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await
                .context("Failed to fetch user by ID")
                .map_err(AppError::database)?
                .ok_or_else(|| {
                    AppError::not_found(anyhow::anyhow!("User with id {} not found", id))
                })?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn list_users(
        db: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await
            .context("Failed to count users")
            .map_err(AppError::database)?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch users")
        .map_err(AppError::database)?;

        Ok((users, total))
    }

    /// Case-insensitive substring search over username, first name, last
    /// name, or email, deduplicated.
    #[instrument(skip(db))]
    pub async fn search_users(db: &PgPool, query: &str) -> Result<Vec<User>, AppError> {
        let pattern = format!("%{}%", query);
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT DISTINCT {USER_COLUMNS}
            FROM users
            WHERE username ILIKE $1
               OR first_name ILIKE $1
               OR last_name ILIKE $1
               OR email ILIKE $1
            ORDER BY username
            "#
        ))
        .bind(&pattern)
        .fetch_all(db)
        .await
        .context("Failed to search users")
        .map_err(AppError::database)?;

        Ok(users)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        let existing = Self::get_user(db, id).await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = $1, first_name = $2, last_name = $3, phone = $4, address = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(dto.email.or(existing.email))
        .bind(dto.first_name.or(existing.first_name))
        .bind(dto.last_name.or(existing.last_name))
        .bind(dto.phone.or(existing.phone))
        .bind(dto.address.or(existing.address))
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to update profile")
        .map_err(AppError::database)?;

        Ok(user)
    }

    /// Store a new profile picture and point the account at it.
    ///
    /// The upload is persisted first, then downsampled in place when either
    /// dimension exceeds [`images::MAX_PICTURE_DIM`]. A picture that fails to
    /// decode or re-encode stays in storage untouched and the account still
    /// points at it; the failure is only logged.
    #[instrument(skip(db, storage, content))]
    pub async fn set_picture(
        db: &PgPool,
        storage: &dyn FileStorage,
        id: Uuid,
        filename: Option<&str>,
        content: &[u8],
    ) -> Result<User, AppError> {
        let existing = Self::get_user(db, id).await?;

        let extension = filename
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "png".to_string());

        let key = format!(
            "profile_pictures/{}/{}.{}",
            Utc::now().format("%y/%m/%d"),
            Uuid::new_v4(),
            extension
        );

        storage
            .save(&key, content)
            .await
            .context("Failed to store profile picture")
            .map_err(AppError::internal)?;

        match images::shrink_to_bounds(content, images::MAX_PICTURE_DIM) {
            Ok(Some(resized)) => {
                if let Err(e) = storage.save(&key, &resized).await {
                    warn!(key = %key, error = %e, "Failed to overwrite picture with resized copy");
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(key = %key, error = %e, "Picture could not be processed; keeping original");
            }
        }

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET picture = $1, updated_at = NOW() WHERE id = $2 RETURNING {USER_COLUMNS}"
        ))
        .bind(&key)
        .bind(id)
        .fetch_one(db)
        .await;

        let user = match updated {
            Ok(user) => user,
            Err(e) => {
                // The account still points at its previous picture, so the
                // newly stored file must not be left behind.
                Self::discard_picture_file(storage, &key).await;
                return Err(AppError::database(
                    anyhow::Error::from(e).context("Failed to update picture reference"),
                ));
            }
        };

        Self::discard_picture_file(storage, &existing.picture).await;

        Ok(user)
    }

    /// Point the account back at the default picture, discarding the stored
    /// file if there was one.
    #[instrument(skip(db, storage))]
    pub async fn reset_picture(
        db: &PgPool,
        storage: &dyn FileStorage,
        id: Uuid,
    ) -> Result<User, AppError> {
        let existing = Self::get_user(db, id).await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET picture = $1, updated_at = NOW() WHERE id = $2 RETURNING {USER_COLUMNS}"
        ))
        .bind(DEFAULT_PICTURE)
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to reset picture reference")
        .map_err(AppError::database)?;

        Self::discard_picture_file(storage, &existing.picture).await;

        Ok(user)
    }

    /// Resolve the account's picture URL, falling back to the default
    /// picture on any resolution failure. Failures never surface to the
    /// caller; a missing picture must not break a profile render.
    pub fn picture_url(user: &User, storage: &dyn FileStorage, config: &StorageConfig) -> String {
        match storage.get_url(&user.picture) {
            Ok(url) => url,
            Err(e) => {
                debug!(user_id = %user.id, key = %user.picture, error = %e,
                    "Falling back to default picture URL");
                config.default_picture_url()
            }
        }
    }

    /// Delete the account and its stored picture (unless it is the default
    /// placeholder). Role rows cascade away with the user.
    #[instrument(skip(db, storage))]
    pub async fn delete_user(
        db: &PgPool,
        storage: &dyn FileStorage,
        id: Uuid,
    ) -> Result<(), AppError> {
        let existing = Self::get_user(db, id).await?;

        Self::discard_picture_file(storage, &existing.picture).await;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete user")
            .map_err(AppError::database)?;

        Ok(())
    }

    /// Remove a stored picture file, keeping the default placeholder.
    /// Storage failures are logged, never propagated.
    async fn discard_picture_file(storage: &dyn FileStorage, key: &str) {
        if key == DEFAULT_PICTURE {
            return;
        }
        if let Err(e) = storage.delete(key).await {
            warn!(key = %key, error = %e, "Failed to delete stored picture file");
        }
    }
}
