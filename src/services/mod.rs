//! Business flows sitting between routes and repositories.
//!
//! Every function checks the caller's capabilities first and maps
//! repository failures onto [`ServiceError`] so routes stay thin.

pub mod api;
pub mod auth;
pub mod billing;
pub mod categories;
pub mod errors;
pub mod main;
pub mod students;
pub mod videos;

pub use errors::{ServiceError, ServiceResult};
