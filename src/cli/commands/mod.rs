//! Command implementations

pub mod completions;
pub mod config;
pub mod details;
pub mod matrix;
pub mod select;
pub mod utils;
