//! Bulk-upload records: one row per uploaded lecturer or student list.
//!
//! The two list kinds live in separate tables with identical shapes; a
//! record wraps one spreadsheet file (`xls`/`xlsx` only), an immutable
//! upload timestamp, and an updated timestamp refreshed on every save.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// File extensions a list upload may carry.
pub const ALLOWED_EXTENSIONS: &[&str] = &["xls", "xlsx"];

/// Which list a record belongs to. Appears as a path segment
/// (`/api/uploads/{kind}`) and selects the backing table and storage
/// prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Lecturer,
    Student,
}

impl ListKind {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Lecturer => "lecturer_list_uploads",
            Self::Student => "student_list_uploads",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Lecturer => "lecturer_list",
            Self::Student => "student_list",
        }
    }
}

/// An upload row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UploadRecord {
    pub id: Uuid,
    /// Storage key of the spreadsheet file.
    pub file_key: String,
    /// Set once when the record is created.
    pub upload_time: chrono::DateTime<chrono::Utc>,
    /// Refreshed on every save.
    pub updated_date: chrono::DateTime<chrono::Utc>,
}

impl UploadRecord {
    /// The file's name without its storage prefix.
    pub fn name(&self) -> &str {
        self.file_key
            .rsplit_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.file_key)
    }

    /// Short format label: `"excel"` for either accepted extension.
    ///
    /// `None` only occurs for keys that never passed the extension gate.
    pub fn extension_short(&self) -> Option<&'static str> {
        let ext = self.file_key.rsplit_once('.').map(|(_, ext)| ext)?;
        if ALLOWED_EXTENSIONS.contains(&ext) {
            Some("excel")
        } else {
            None
        }
    }
}

/// Extract and check the extension of an uploaded filename.
///
/// Returns the lowercased extension when it is an accepted spreadsheet
/// extension, `None` otherwise.
pub fn spreadsheet_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

/// Make a filename safe for use inside a storage key.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// An upload record as rendered to clients, with the resolved URL and the
/// derived display fields attached.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadRecordResponse {
    pub id: Uuid,
    pub file_key: String,
    pub file_url: String,
    pub name: String,
    pub extension_short: Option<String>,
    pub upload_time: chrono::DateTime<chrono::Utc>,
    pub updated_date: chrono::DateTime<chrono::Utc>,
}

impl UploadRecordResponse {
    pub fn new(record: UploadRecord, file_url: String) -> Self {
        Self {
            name: record.name().to_string(),
            extension_short: record.extension_short().map(str::to_string),
            file_url,
            id: record.id,
            file_key: record.file_key,
            upload_time: record.upload_time,
            updated_date: record.updated_date,
        }
    }
}

/// Query parameters for listing upload records.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UploadFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated upload-records response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUploadsResponse {
    pub data: Vec<UploadRecordResponse>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str) -> UploadRecord {
        UploadRecord {
            id: Uuid::new_v4(),
            file_key: key.to_string(),
            upload_time: chrono::Utc::now(),
            updated_date: chrono::Utc::now(),
        }
    }

    #[test]
    fn kind_selects_table_and_prefix() {
        assert_eq!(ListKind::Lecturer.table(), "lecturer_list_uploads");
        assert_eq!(ListKind::Lecturer.prefix(), "lecturer_list");
        assert_eq!(ListKind::Student.table(), "student_list_uploads");
        assert_eq!(ListKind::Student.prefix(), "student_list");
    }

    #[test]
    fn kind_deserializes_from_path_segment() {
        assert_eq!(
            serde_json::from_str::<ListKind>(r#""lecturer""#).unwrap(),
            ListKind::Lecturer
        );
        assert!(serde_json::from_str::<ListKind>(r#""teacher""#).is_err());
    }

    #[test]
    fn only_spreadsheet_extensions_pass() {
        assert_eq!(spreadsheet_extension("roster.xls"), Some("xls".to_string()));
        assert_eq!(
            spreadsheet_extension("Roster.XLSX"),
            Some("xlsx".to_string())
        );
        assert_eq!(spreadsheet_extension("roster.csv"), None);
        assert_eq!(spreadsheet_extension("roster.pdf"), None);
        assert_eq!(spreadsheet_extension("roster"), None);
    }

    #[test]
    fn extension_short_is_excel_for_accepted_files() {
        assert_eq!(
            record("lecturer_list/abc_roster.xls").extension_short(),
            Some("excel")
        );
        assert_eq!(
            record("student_list/abc_roster.xlsx").extension_short(),
            Some("excel")
        );
        assert_eq!(record("student_list/abc_roster.csv").extension_short(), None);
    }

    #[test]
    fn name_strips_the_storage_prefix() {
        assert_eq!(record("lecturer_list/abc_roster.xls").name(), "abc_roster.xls");
        assert_eq!(record("bare.xlsx").name(), "bare.xlsx");
    }

    #[test]
    fn filenames_are_sanitized_for_keys() {
        assert_eq!(
            sanitize_filename("spring term (final).xlsx"),
            "spring-term--final-.xlsx"
        );
        assert_eq!(sanitize_filename("roster_2025.xls"), "roster_2025.xls");
    }
}
