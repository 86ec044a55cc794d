//! repmat: repair parts matrix and selection toolkit
//!
//! Builds a repair-type × category matrix from a parts catalog and tracks
//! which parts a user has selected, with pricing overlaid from an external
//! price source.

pub mod cli;
pub mod core;
pub mod entities;
