//! Shared utilities.
//!
//! - [`errors`]: application error type and HTTP rendering
//! - [`pagination`]: request pagination parameters and response metadata

pub mod errors;
pub mod pagination;
