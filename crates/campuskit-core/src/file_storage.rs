//! File storage abstraction.
//!
//! The API only ever talks to a [`FileStorage`] handle: store bytes under a
//! key, read them back, delete them, and resolve a public URL. Backends can
//! be swapped (local disk, S3, ...) without touching business logic.

use std::fmt;
use std::path::PathBuf;
use tokio::fs;

/// Abstract trait for blob storage backends.
///
/// All methods take a storage key: a relative, slash-separated path such as
/// `profile_pictures/25/08/30/abc.png`.
pub trait FileStorage: Send + Sync {
    /// Save file content and return the storage key.
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, StorageError>> + Send + 'a>>;

    /// Read a file's content by key.
    fn read<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<u8>, StorageError>> + Send + 'a>>;

    /// Delete a file by key. Deleting a missing file is not an error.
    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), StorageError>> + Send + 'a>>;

    /// Resolve the public URL for a key.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;
}

/// Error type for storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// File exceeds the maximum allowed size.
    FileTooLarge { max_bytes: usize },

    /// I/O error from the backing filesystem.
    Io(std::io::Error),

    /// File not found.
    NotFound,

    /// Key is empty, escapes the storage root, or contains disallowed
    /// characters.
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileTooLarge { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::NotFound => write!(f, "File not found"),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e)
        }
    }
}

/// Local-filesystem storage rooted at a base directory and served under a
/// public base URL.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
}

impl LocalFileStorage {
    /// Default cap on a single stored file: 10MB, enough for a spreadsheet
    /// or an unprocessed camera photo.
    pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_max_size(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
        }
    }

    /// Reject keys that could escape the storage root.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, StorageError>> + Send + 'a>>
    {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::FileTooLarge {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn read<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<u8>, StorageError>> + Send + 'a>>
    {
        Box::pin(async move {
            Self::validate_key(key)?;

            let file_path = self.base_dir.join(key);
            Ok(fs::read(&file_path).await?)
        })
    }

    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), StorageError>> + Send + 'a>>
    {
        Box::pin(async move {
            Self::validate_key(key)?;

            let file_path = self.base_dir.join(key);
            match fs::remove_file(&file_path).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> LocalFileStorage {
        let dir = std::env::temp_dir().join(format!("campuskit-test-{}", uuid::Uuid::new_v4()));
        LocalFileStorage::new(dir, "http://localhost:3000/files".to_string())
    }

    #[test]
    fn validate_key_accepts_relative_paths() {
        assert!(LocalFileStorage::validate_key("profile_pictures/25/08/30/pic.png").is_ok());
        assert!(LocalFileStorage::validate_key("lecturer_list/list.xlsx").is_ok());
        assert!(LocalFileStorage::validate_key("default.png").is_ok());
    }

    #[test]
    fn validate_key_rejects_traversal_and_absolute() {
        assert!(LocalFileStorage::validate_key("../../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
        assert!(LocalFileStorage::validate_key("a b.png").is_err());
    }

    #[test]
    fn get_url_joins_base_and_key() {
        let storage = temp_storage();
        let url = storage.get_url("student_list/roster.xls").unwrap();
        assert_eq!(url, "http://localhost:3000/files/student_list/roster.xls");
    }

    #[test]
    fn get_url_handles_trailing_slash() {
        let dir = std::env::temp_dir();
        let storage = LocalFileStorage::new(dir, "http://localhost:3000/files/".to_string());
        let url = storage.get_url("default.png").unwrap();
        assert_eq!(url, "http://localhost:3000/files/default.png");
    }

    #[tokio::test]
    async fn save_read_delete_round_trip() {
        let storage = temp_storage();

        let key = storage.save("uploads/hello.txt", b"hello").await.unwrap();
        assert_eq!(key, "uploads/hello.txt");
        assert_eq!(storage.read(&key).await.unwrap(), b"hello");

        storage.delete(&key).await.unwrap();
        assert!(matches!(
            storage.read(&key).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn delete_missing_file_is_ok() {
        let storage = temp_storage();
        assert!(storage.delete("uploads/never-existed.xls").await.is_ok());
    }

    #[tokio::test]
    async fn save_rejects_oversized_content() {
        let dir = std::env::temp_dir().join(format!("campuskit-test-{}", uuid::Uuid::new_v4()));
        let storage =
            LocalFileStorage::with_max_size(dir, "http://localhost:3000/files".to_string(), 4);
        assert!(matches!(
            storage.save("uploads/big.bin", b"too big").await,
            Err(StorageError::FileTooLarge { max_bytes: 4 })
        ));
    }
}
