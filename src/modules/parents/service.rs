use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::parents::model::{CreateParentDto, Parent, ParentDetails, UpdateParentDto};
use crate::utils::errors::AppError;

const DETAIL_COLUMNS: &str = "p.id, p.user_id, u.username, p.student_id, p.first_name, \
     p.last_name, p.phone, p.email, p.relationship";

const DETAIL_FROM: &str = "FROM parents p JOIN users u ON u.id = p.user_id";

pub struct ParentService;

impl ParentService {
    /// Register an existing user as a parent, optionally linked to one
    /// student. The user's `is_parent` flag is raised in the same
    /// transaction.
    #[instrument(skip(db, dto), fields(user_id = %dto.user_id))]
    pub async fn create_parent(db: &PgPool, dto: CreateParentDto) -> Result<Parent, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let parent = sqlx::query_as::<_, Parent>(
            r#"
            INSERT INTO parents (user_id, student_id, first_name, last_name, phone, email, relationship)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, student_id, first_name, last_name, phone, email, relationship
            "#,
        )
        .bind(dto.user_id)
        .bind(dto.student_id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.phone)
        .bind(&dto.email)
        .bind(dto.relationship)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "User {} is already registered as a parent, or the student already has one",
                        dto.user_id
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Referenced user or student does not exist"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        sqlx::query("UPDATE users SET is_parent = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(dto.user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to flag user as parent")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit parent registration")
            .map_err(AppError::database)?;

        Ok(parent)
    }

    #[instrument(skip(db))]
    pub async fn get_parent(db: &PgPool, id: Uuid) -> Result<ParentDetails, AppError> {
        let parent = sqlx::query_as::<_, ParentDetails>(&format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch parent by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Parent with id {} not found", id)))?;

        Ok(parent)
    }

    #[instrument(skip(db))]
    pub async fn list_parents(
        db: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ParentDetails>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM parents")
            .fetch_one(db)
            .await
            .context("Failed to count parents")
            .map_err(AppError::database)?;

        let parents = sqlx::query_as::<_, ParentDetails>(&format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} ORDER BY u.username LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch parents")
        .map_err(AppError::database)?;

        Ok((parents, total))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_parent(
        db: &PgPool,
        id: Uuid,
        dto: UpdateParentDto,
    ) -> Result<ParentDetails, AppError> {
        let existing = Self::get_parent(db, id).await?;

        sqlx::query(
            r#"
            UPDATE parents
            SET student_id = $1, first_name = $2, last_name = $3, phone = $4, email = $5,
                relationship = $6
            WHERE id = $7
            "#,
        )
        .bind(dto.student_id.or(existing.student_id))
        .bind(dto.first_name.unwrap_or(existing.first_name))
        .bind(dto.last_name.unwrap_or(existing.last_name))
        .bind(dto.phone.or(existing.phone))
        .bind(dto.email.or(existing.email))
        .bind(dto.relationship.unwrap_or(existing.relationship))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "That student is already linked to another parent"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Referenced student does not exist"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Self::get_parent(db, id).await
    }

    /// Delete the parent row only. The owning user and any linked student
    /// are untouched.
    #[instrument(skip(db))]
    pub async fn delete_parent(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM parents WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete parent")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Parent with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
