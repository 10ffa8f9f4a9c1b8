use std::env;
use std::path::PathBuf;

/// Key of the placeholder picture every account starts with. Never deleted
/// from storage.
pub const DEFAULT_PICTURE: &str = "default.png";

/// File storage configuration.
///
/// # Environment Variables
///
/// - `UPLOAD_DIR`: base directory for stored files (default `./storage/uploads`)
/// - `FILE_BASE_URL`: public URL prefix files are served under
///   (default `http://localhost:3000/files`)
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub base_url: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./storage/uploads"));
        let base_url = env::var("FILE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/files".to_string());

        Self {
            upload_dir,
            base_url,
        }
    }

    /// URL of the fallback picture, used whenever resolution of a stored
    /// picture fails.
    pub fn default_picture_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), DEFAULT_PICTURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_picture_url_joins_cleanly() {
        let config = StorageConfig {
            upload_dir: PathBuf::from("./storage/uploads"),
            base_url: "http://localhost:3000/files/".to_string(),
        };
        assert_eq!(
            config.default_picture_url(),
            "http://localhost:3000/files/default.png"
        );
    }
}
