//! # CampusKit Core
//!
//! Storage and media primitives shared by the CampusKit API:
//!
//! - [`file_storage`]: capability-typed blob storage (`save`/`read`/`delete`/
//!   `get_url`) with a local-filesystem implementation
//! - [`images`]: bounded downsampling for profile pictures

pub mod file_storage;
pub mod images;

pub use file_storage::{FileStorage, LocalFileStorage, StorageError};
pub use images::shrink_to_bounds;
