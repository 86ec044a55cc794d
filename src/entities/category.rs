//! Category and repair-type (TOR) entity types

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::entity::Entity;
use crate::entities::part::Part;

/// A repair-type ("type of repair") grouping parts into included and excluded lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairType {
    /// Stable identifier
    pub id: String,

    /// Display title
    #[serde(default)]
    pub title: String,

    /// Parts replaced as part of this repair
    #[serde(
        default,
        alias = "includedParts",
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub included_parts: Vec<Part>,

    /// Parts explicitly not covered by this repair
    #[serde(
        default,
        alias = "excludedParts",
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub excluded_parts: Vec<Part>,
}

impl RepairType {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            included_parts: Vec::new(),
            excluded_parts: Vec::new(),
        }
    }

    /// Add an included part (builder style)
    pub fn include(mut self, part: Part) -> Self {
        self.included_parts.push(part);
        self
    }

    /// Add an excluded part (builder style)
    pub fn exclude(mut self, part: Part) -> Self {
        self.excluded_parts.push(part);
        self
    }

    /// Included parts followed by excluded parts
    pub fn all_parts(&self) -> impl Iterator<Item = &Part> {
        self.included_parts.iter().chain(self.excluded_parts.iter())
    }
}

impl Entity for RepairType {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// A category of the catalog, owning an ordered list of repair-types
///
/// `repair_types` is `None` when the feed omitted the list (or sent `null`).
/// Such categories are skipped by the matrix builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier
    pub id: String,

    /// Display title
    #[serde(default)]
    pub title: String,

    /// Repair-types offered for this category
    #[serde(
        default,
        alias = "tors",
        alias = "repairTypes",
        skip_serializing_if = "Option::is_none"
    )]
    pub repair_types: Option<Vec<RepairType>>,
}

impl Category {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            repair_types: Some(Vec::new()),
        }
    }

    /// Add a repair-type (builder style)
    pub fn with_repair_type(mut self, tor: RepairType) -> Self {
        self.repair_types.get_or_insert_with(Vec::new).push(tor);
        self
    }

    /// Repair-types, treating an absent list as empty
    pub fn repair_types(&self) -> &[RepairType] {
        self.repair_types.as_deref().unwrap_or_default()
    }

    /// Look up a repair-type by id
    pub fn repair_type(&self, tor_id: &str) -> Option<&RepairType> {
        self.repair_types().iter().find(|t| t.id == tor_id)
    }

    /// Every part of every repair-type, paired with its repair-type
    pub fn parts(&self) -> impl Iterator<Item = (&RepairType, &Part)> {
        self.repair_types()
            .iter()
            .flat_map(|tor| tor.all_parts().map(move |part| (tor, part)))
    }
}

impl Entity for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Part>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Part>>::deserialize(deserializer)?.unwrap_or_default())
}
