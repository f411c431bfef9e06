//! View models handed to templates and the JSON API.

pub mod categories;
pub mod students;
pub mod videos;
