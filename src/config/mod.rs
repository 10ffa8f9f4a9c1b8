//! Application configuration, loaded from environment variables.
//!
//! - [`cors`]: allowed origins for the CORS layer
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`storage`]: upload directory, public file URL, and picture defaults

pub mod cors;
pub mod database;
pub mod storage;
