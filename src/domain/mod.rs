//! Domain entities and the rules that hold regardless of transport.

pub mod billing;
pub mod capability;
pub mod category;
pub mod collection;
pub mod page;
pub mod session;
pub mod student;
pub mod tree;
pub mod types;
pub mod user;
pub mod video;
