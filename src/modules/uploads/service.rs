use anyhow::Context;
use campuskit_core::FileStorage;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::storage::StorageConfig;
use crate::modules::uploads::model::{
    ListKind, UploadRecord, sanitize_filename, spreadsheet_extension,
};
use crate::utils::errors::AppError;

const UPLOAD_COLUMNS: &str = "id, file_key, upload_time, updated_date";

pub struct UploadService;

impl UploadService {
    fn build_key(kind: ListKind, filename: &str) -> Result<String, AppError> {
        if spreadsheet_extension(filename).is_none() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Only .xls and .xlsx files are accepted"
            )));
        }
        Ok(format!(
            "{}/{}_{}",
            kind.prefix(),
            Uuid::new_v4(),
            sanitize_filename(filename)
        ))
    }

    /// Store a new list file and create its record. The extension gate runs
    /// before anything touches storage.
    #[instrument(skip(db, storage, content))]
    pub async fn create_upload(
        db: &PgPool,
        storage: &dyn FileStorage,
        kind: ListKind,
        filename: &str,
        content: &[u8],
    ) -> Result<UploadRecord, AppError> {
        let key = Self::build_key(kind, filename)?;

        storage
            .save(&key, content)
            .await
            .context("Failed to store uploaded list")
            .map_err(AppError::internal)?;

        let record = sqlx::query_as::<_, UploadRecord>(&format!(
            "INSERT INTO {} (file_key) VALUES ($1) RETURNING {UPLOAD_COLUMNS}",
            kind.table()
        ))
        .bind(&key)
        .fetch_one(db)
        .await
        .context("Failed to insert upload record")
        .map_err(AppError::database)?;

        Ok(record)
    }

    /// Swap the record's file for a new one. `upload_time` is immutable;
    /// only `updated_date` is refreshed. The old file is discarded after the
    /// record points at the new one.
    #[instrument(skip(db, storage, content))]
    pub async fn replace_upload(
        db: &PgPool,
        storage: &dyn FileStorage,
        kind: ListKind,
        id: Uuid,
        filename: &str,
        content: &[u8],
    ) -> Result<UploadRecord, AppError> {
        let existing = Self::get_upload(db, kind, id).await?;
        let key = Self::build_key(kind, filename)?;

        storage
            .save(&key, content)
            .await
            .context("Failed to store uploaded list")
            .map_err(AppError::internal)?;

        let record = sqlx::query_as::<_, UploadRecord>(&format!(
            "UPDATE {} SET file_key = $1, updated_date = NOW() WHERE id = $2 RETURNING {UPLOAD_COLUMNS}",
            kind.table()
        ))
        .bind(&key)
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to update upload record")
        .map_err(AppError::database)?;

        if let Err(e) = storage.delete(&existing.file_key).await {
            warn!(key = %existing.file_key, error = %e, "Failed to delete replaced list file");
        }

        Ok(record)
    }

    /// Resolve the record's public file URL, falling back to the base URL
    /// joined with the bare file name on any resolution failure. Failures
    /// never surface to the caller, and the raw storage key is never
    /// rendered to clients.
    pub fn file_url(
        record: &UploadRecord,
        storage: &dyn FileStorage,
        config: &StorageConfig,
    ) -> String {
        match storage.get_url(&record.file_key) {
            Ok(url) => url,
            Err(e) => {
                debug!(key = %record.file_key, error = %e, "Falling back to name-based file URL");
                format!("{}/{}", config.base_url.trim_end_matches('/'), record.name())
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn get_upload(
        db: &PgPool,
        kind: ListKind,
        id: Uuid,
    ) -> Result<UploadRecord, AppError> {
        let record = sqlx::query_as::<_, UploadRecord>(&format!(
            "SELECT {UPLOAD_COLUMNS} FROM {} WHERE id = $1",
            kind.table()
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch upload record")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("Upload record with id {} not found", id))
        })?;

        Ok(record)
    }

    #[instrument(skip(db))]
    pub async fn list_uploads(
        db: &PgPool,
        kind: ListKind,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<UploadRecord>, i64), AppError> {
        let total =
            sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", kind.table()))
                .fetch_one(db)
                .await
                .context("Failed to count upload records")
                .map_err(AppError::database)?;

        let records = sqlx::query_as::<_, UploadRecord>(&format!(
            "SELECT {UPLOAD_COLUMNS} FROM {} ORDER BY upload_time DESC LIMIT $1 OFFSET $2",
            kind.table()
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch upload records")
        .map_err(AppError::database)?;

        Ok((records, total))
    }

    /// Remove the file from storage, then the record.
    #[instrument(skip(db, storage))]
    pub async fn delete_upload(
        db: &PgPool,
        storage: &dyn FileStorage,
        kind: ListKind,
        id: Uuid,
    ) -> Result<(), AppError> {
        let existing = Self::get_upload(db, kind, id).await?;

        storage
            .delete(&existing.file_key)
            .await
            .context("Failed to delete stored list file")
            .map_err(AppError::internal)?;

        sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete upload record")
            .map_err(AppError::database)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campuskit_core::LocalFileStorage;
    use std::path::PathBuf;

    fn test_storage() -> (LocalFileStorage, StorageConfig) {
        let base_url = "http://localhost:3000/files".to_string();
        let storage = LocalFileStorage::new(PathBuf::from("./storage/uploads"), base_url.clone());
        let config = StorageConfig {
            upload_dir: PathBuf::from("./storage/uploads"),
            base_url,
        };
        (storage, config)
    }

    fn record(key: &str) -> UploadRecord {
        UploadRecord {
            id: Uuid::new_v4(),
            file_key: key.to_string(),
            upload_time: chrono::Utc::now(),
            updated_date: chrono::Utc::now(),
        }
    }

    #[test]
    fn file_url_resolves_valid_keys() {
        let (storage, config) = test_storage();
        let url = UploadService::file_url(&record("lecturer_list/abc.xls"), &storage, &config);
        assert_eq!(url, "http://localhost:3000/files/lecturer_list/abc.xls");
    }

    #[test]
    fn file_url_fallback_never_renders_the_raw_key() {
        let (storage, config) = test_storage();
        let url = UploadService::file_url(&record("../escaped/roster.xls"), &storage, &config);
        assert_eq!(url, "http://localhost:3000/files/roster.xls");
        assert!(!url.contains(".."));
    }

    #[test]
    fn build_key_rejects_non_spreadsheets() {
        let err = UploadService::build_key(ListKind::Lecturer, "staff.csv").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn build_key_prefixes_by_kind() {
        let key = UploadService::build_key(ListKind::Student, "class of 2026.xlsx").unwrap();
        assert!(key.starts_with("student_list/"));
        assert!(key.ends_with("_class-of-2026.xlsx"));
    }
}
