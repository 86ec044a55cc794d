//! Details payload - data handed to the part details dialog
//!
//! The dialog itself lives outside this crate. It receives a fully assembled
//! [`DetailsPayload`] through the [`DetailsDialog`] trait; nothing it returns
//! flows back into the selection state.

use serde::Serialize;

use crate::core::matrix::TitleEntry;
use crate::entities::{CheckedPart, Part};

/// A cell part paired with its priced counterpart, if one exists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartWithInfo {
    pub part: Part,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<CheckedPart>,
}

impl PartWithInfo {
    pub fn is_priced(&self) -> bool {
        self.info.is_some()
    }
}

/// Included/excluded split of a cell's parts with pricing attached
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartsWithInfo {
    pub included: Vec<PartWithInfo>,
    pub excluded: Vec<PartWithInfo>,
}

/// Caller-supplied display context for the dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsContext {
    pub currency: String,
    pub warehouse: Option<String>,
}

/// Everything the details dialog needs to render one inspected part
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsPayload {
    pub category: TitleEntry,
    pub tor: TitleEntry,
    pub inspected: CheckedPart,
    pub parts_with_info: PartsWithInfo,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
}

impl DetailsPayload {
    /// Sum of line totals over priced included parts
    pub fn included_total(&self) -> f64 {
        self.parts_with_info
            .included
            .iter()
            .filter_map(|p| p.info.as_ref().and_then(CheckedPart::line_total))
            .sum()
    }
}

/// Consumer of assembled details payloads (e.g. a modal dialog)
pub trait DetailsDialog {
    /// Show the payload; the outcome is not reported back
    fn open(&mut self, payload: DetailsPayload);
}

/// Dialog that keeps every payload it is given
impl DetailsDialog for Vec<DetailsPayload> {
    fn open(&mut self, payload: DetailsPayload) {
        self.push(payload);
    }
}
