use anyhow::Context;
use campuskit_core::FileStorage;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::students::model::{CreateStudentDto, Student, StudentDetails, UpdateStudentDto};
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;

const DETAIL_COLUMNS: &str = "s.id, s.user_id, u.username, u.first_name, u.last_name, \
     s.level, s.program_id, p.title AS program_title";

const DETAIL_FROM: &str = "FROM students s \
     JOIN users u ON u.id = s.user_id \
     LEFT JOIN programs p ON p.id = s.program_id";

pub struct StudentService;

impl StudentService {
    /// Enroll an existing user as a student. The user's `is_student` flag is
    /// raised in the same transaction as the link row.
    #[instrument(skip(db, dto), fields(user_id = %dto.user_id))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (user_id, level, program_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, level, program_id
            "#,
        )
        .bind(dto.user_id)
        .bind(dto.level)
        .bind(dto.program_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "User {} is already enrolled as a student",
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

        sqlx::query("UPDATE users SET is_student = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(dto.user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to flag user as student")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit student enrollment")
            .map_err(AppError::database)?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: Uuid) -> Result<StudentDetails, AppError> {
        let student = sqlx::query_as::<_, StudentDetails>(&format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE s.id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student with id {} not found", id)))?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn list_students(
        db: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<StudentDetails>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(db)
            .await
            .context("Failed to count students")
            .map_err(AppError::database)?;

        let students = sqlx::query_as::<_, StudentDetails>(&format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} ORDER BY u.username LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch students")
        .map_err(AppError::database)?;

        Ok((students, total))
    }

    /// Case-insensitive substring search over the stored level or the
    /// program title, deduplicated.
    #[instrument(skip(db))]
    pub async fn search_students(db: &PgPool, query: &str) -> Result<Vec<StudentDetails>, AppError> {
        let pattern = format!("%{}%", query);
        let students = sqlx::query_as::<_, StudentDetails>(&format!(
            r#"
            SELECT DISTINCT {DETAIL_COLUMNS}
            {DETAIL_FROM}
            WHERE s.level::text ILIKE $1 OR p.title ILIKE $1
            ORDER BY u.username
            "#
        ))
        .bind(&pattern)
        .fetch_all(db)
        .await
        .context("Failed to search students")
        .map_err(AppError::database)?;

        Ok(students)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<StudentDetails, AppError> {
        let existing = Self::get_student(db, id).await?;

        sqlx::query("UPDATE students SET level = $1, program_id = $2 WHERE id = $3")
            .bind(dto.level.or(existing.level))
            .bind(dto.program_id.or(existing.program_id))
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Referenced program does not exist"
                    ));
                }
                AppError::database(anyhow::Error::from(e))
            })?;

        Self::get_student(db, id).await
    }

    /// Delete a student by deleting its owning user.
    ///
    /// The user row goes first; the student row follows via the foreign-key
    /// cascade, the stored picture file is cleaned up by the user deletion,
    /// and any parent referencing this student is left in place with its
    /// link nulled. Deleting a student always takes the account down with
    /// it.
    #[instrument(skip(db, storage))]
    pub async fn delete_student(
        db: &PgPool,
        storage: &dyn FileStorage,
        id: Uuid,
    ) -> Result<(), AppError> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT id, user_id, level, program_id FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student with id {} not found", id)))?;

        UserService::delete_user(db, storage, student.user_id).await
    }
}
