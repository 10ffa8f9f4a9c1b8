use std::path::{Path, PathBuf};

use campuskit::modules::users::model::CreateUserDto;
use campuskit_core::LocalFileStorage;

#[allow(dead_code)]
pub fn user_dto(username: &str) -> CreateUserDto {
    CreateUserDto {
        username: username.to_string(),
        email: None,
        first_name: None,
        last_name: None,
        phone: None,
        address: None,
        is_student: false,
        is_lecturer: false,
        is_parent: false,
        is_dep_head: false,
    }
}

/// A storage handle rooted at a fresh temp directory, returned together with
/// the directory so tests can inspect what actually landed on disk.
#[allow(dead_code)]
pub fn temp_storage() -> (LocalFileStorage, PathBuf) {
    let dir = std::env::temp_dir().join(format!("campuskit-it-{}", uuid::Uuid::new_v4()));
    let storage = LocalFileStorage::new(dir.clone(), "http://localhost:3000/files".to_string());
    (storage, dir)
}

/// Count regular files anywhere under `dir`. A missing directory counts as
/// empty.
#[allow(dead_code)]
pub fn stored_file_count(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() {
                stored_file_count(&path)
            } else {
                1
            }
        })
        .sum()
}
