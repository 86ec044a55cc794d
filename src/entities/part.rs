//! Part entity types - individual repairable parts and their selection records

use serde::{Deserialize, Serialize};

/// A repairable part as delivered by the catalog feed
///
/// Parts are identified by their part number together with the secondary
/// `sos` attribute. The same part may be listed under both the included and
/// the excluded list of a repair-type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Part number
    #[serde(alias = "partNumber")]
    pub part_number: String,

    /// Secondary attribute distinguishing variants of the same part number
    #[serde(default, alias = "sOS")]
    pub sos: String,

    /// Whether the part is excluded from the repair (informational only)
    #[serde(default, alias = "isExcluded")]
    pub is_excluded: bool,

    /// Requested quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub(crate) fn default_quantity() -> u32 {
    1
}

impl Part {
    /// Create an included part with quantity 1
    pub fn new(part_number: impl Into<String>, sos: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            sos: sos.into(),
            is_excluded: false,
            quantity: default_quantity(),
            description: None,
        }
    }

    /// Set the description (builder style)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Return a copy of this part with the exclusion flag set
    pub fn as_excluded(&self) -> Self {
        Self {
            is_excluded: true,
            ..self.clone()
        }
    }

    /// Return a copy of this part with the given quantity
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Display label, e.g. "P1 (A)"
    pub fn label(&self) -> String {
        if self.sos.is_empty() {
            self.part_number.clone()
        } else {
            format!("{} ({})", self.part_number, self.sos)
        }
    }
}

/// A part tied to the (category, repair-type) pair it was selected under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedPart {
    /// Owning category
    #[serde(alias = "categoryId")]
    pub category_id: String,

    /// Owning repair-type
    #[serde(alias = "torId")]
    pub tor_id: String,

    /// The part itself; its `quantity` is the user-editable quantity
    #[serde(flatten)]
    pub part: Part,
}

impl CategorizedPart {
    pub fn new(category_id: impl Into<String>, tor_id: impl Into<String>, part: Part) -> Self {
        Self {
            category_id: category_id.into(),
            tor_id: tor_id.into(),
            part,
        }
    }

    /// Current quantity
    pub fn quantity(&self) -> u32 {
        self.part.quantity
    }
}
