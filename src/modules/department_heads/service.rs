use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::department_heads::model::{
    CreateDepartmentHeadDto, DepartmentHead, DepartmentHeadDetails,
};
use crate::utils::errors::AppError;

const DETAIL_COLUMNS: &str = "d.id, d.user_id, u.username, u.first_name, u.last_name, \
     d.program_id, p.title AS program_title";

const DETAIL_FROM: &str = "FROM department_heads d \
     JOIN users u ON u.id = d.user_id \
     LEFT JOIN programs p ON p.id = d.program_id";

pub struct DepartmentHeadService;

impl DepartmentHeadService {
    /// Appoint an existing user as a department head. The user's
    /// `is_dep_head` flag is raised in the same transaction.
    #[instrument(skip(db, dto), fields(user_id = %dto.user_id))]
    pub async fn create_department_head(
        db: &PgPool,
        dto: CreateDepartmentHeadDto,
    ) -> Result<DepartmentHead, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let head = sqlx::query_as::<_, DepartmentHead>(
            r#"
            INSERT INTO department_heads (user_id, program_id)
            VALUES ($1, $2)
            RETURNING id, user_id, program_id
            "#,
        )
        .bind(dto.user_id)
        .bind(dto.program_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "User {} is already a department head",
                        dto.user_id
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Referenced user or program does not exist"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        sqlx::query("UPDATE users SET is_dep_head = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(dto.user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to flag user as department head")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit department head appointment")
            .map_err(AppError::database)?;

        Ok(head)
    }

    #[instrument(skip(db))]
    pub async fn get_department_head(
        db: &PgPool,
        id: Uuid,
    ) -> Result<DepartmentHeadDetails, AppError> {
        let head = sqlx::query_as::<_, DepartmentHeadDetails>(&format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE d.id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch department head by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("Department head with id {} not found", id))
        })?;

        Ok(head)
    }

    #[instrument(skip(db))]
    pub async fn list_department_heads(
        db: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<DepartmentHeadDetails>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM department_heads")
            .fetch_one(db)
            .await
            .context("Failed to count department heads")
            .map_err(AppError::database)?;

        let heads = sqlx::query_as::<_, DepartmentHeadDetails>(&format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} ORDER BY u.username LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch department heads")
        .map_err(AppError::database)?;

        Ok((heads, total))
    }

    /// Delete the department-head row only; the owning user is untouched.
    #[instrument(skip(db))]
    pub async fn delete_department_head(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM department_heads WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete department head")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Department head with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
