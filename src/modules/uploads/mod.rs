pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::{ListKind, UploadRecord};
pub use router::init_uploads_router;
