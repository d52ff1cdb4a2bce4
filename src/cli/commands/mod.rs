//! Command implementations

pub mod completions;
pub mod cost;
pub mod ing;
pub mod init;
pub mod recipe;
