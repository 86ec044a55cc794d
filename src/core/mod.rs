//! Core module - matrix construction, selection state and their inputs

pub mod config;
pub mod details;
pub mod diagnostics;
pub mod entity;
pub mod key;
pub mod loader;
pub mod matrix;
pub mod selection;
pub mod session;

pub use config::Config;
pub use details::{DetailsContext, DetailsDialog, DetailsPayload, PartWithInfo, PartsWithInfo};
pub use diagnostics::DocumentSyntaxError;
pub use entity::Entity;
pub use key::{PartKey, PartRef, PartRefError};
pub use loader::{CatalogError, DocumentFormat};
pub use matrix::{MatrixCell, MatrixStats, PartMatrix, TitleEntry};
pub use selection::{PartStatus, SelectionEngine, SelectionSummary};
pub use session::{BulkSelection, PartToggled, SelectionSession};
