//! Entity type definitions
//!
//! The catalog is made of the following entity types:
//!
//! - [`Category`] - Top-level grouping owning an ordered list of repair-types
//! - [`RepairType`] - A type of repair (TOR) with included and excluded parts
//! - [`Part`] - An individual repairable part
//! - [`CategorizedPart`] - A part tied to the category/repair-type it was selected under
//! - [`CheckedPart`] - A selected part enriched with price and availability data

pub mod category;
pub mod part;
pub mod pricing;

pub use category::{Category, RepairType};
pub use part::{CategorizedPart, Part};
pub use pricing::{CheckedPart, PriceInfo};
