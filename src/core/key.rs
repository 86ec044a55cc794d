//! Part identity - composite registry keys and textual part references

use miette::Diagnostic;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::entities::{CategorizedPart, Part};

/// Registry key naming a selectable unit: (category, repair-type, part number, sOS)
///
/// The included/excluded flag is not part of the key, so the same part listed
/// under both lists of a repair-type is one selectable unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartKey {
    pub category_id: String,
    pub tor_id: String,
    pub part_number: String,
    pub sos: String,
}

impl PartKey {
    /// Key for `part` selected under (`category_id`, `tor_id`)
    pub fn new(category_id: &str, tor_id: &str, part: &Part) -> Self {
        Self {
            category_id: category_id.to_string(),
            tor_id: tor_id.to_string(),
            part_number: part.part_number.clone(),
            sos: part.sos.clone(),
        }
    }

    /// Key of an already categorized part
    pub fn of(item: &CategorizedPart) -> Self {
        Self::new(&item.category_id, &item.tor_id, &item.part)
    }

    /// Render the flat string form `<prefix>_<category>_<tor>_<part>_<sos>`
    pub fn render(&self, prefix: &str) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            prefix, self.category_id, self.tor_id, self.part_number, self.sos
        )
    }
}

impl fmt::Display for PartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.category_id, self.tor_id, self.part_number, self.sos
        )
    }
}

/// A textual part reference `CATEGORY/TOR/PART[/SOS]` as typed on the command line
///
/// When `sos` is omitted the reference matches the first part with that part
/// number in the repair-type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRef {
    pub category_id: String,
    pub tor_id: String,
    pub part_number: String,
    pub sos: Option<String>,
}

impl PartRef {
    /// Whether `part` is the part this reference names
    pub fn matches(&self, part: &Part) -> bool {
        part.part_number == self.part_number
            && self.sos.as_deref().map_or(true, |sos| part.sos == sos)
    }
}

impl fmt::Display for PartRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.category_id, self.tor_id, self.part_number)?;
        if let Some(sos) = &self.sos {
            write!(f, "/{}", sos)?;
        }
        Ok(())
    }
}

impl FromStr for PartRef {
    type Err = PartRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('/').map(str::trim).collect();
        if segments.len() < 3 || segments.len() > 4 {
            return Err(PartRefError::WrongSegmentCount(s.to_string(), segments.len()));
        }
        if segments.iter().take(3).any(|seg| seg.is_empty()) {
            return Err(PartRefError::EmptySegment(s.to_string()));
        }

        Ok(Self {
            category_id: segments[0].to_string(),
            tor_id: segments[1].to_string(),
            part_number: segments[2].to_string(),
            sos: segments.get(3).map(|s| s.to_string()),
        })
    }
}

/// Errors that can occur when parsing part references
#[derive(Debug, Error, Diagnostic)]
pub enum PartRefError {
    #[error("invalid part reference '{0}': expected 3 or 4 '/'-separated segments, found {1}")]
    #[diagnostic(
        code(repmat::part_ref::segments),
        help("use CATEGORY/TOR/PART or CATEGORY/TOR/PART/SOS")
    )]
    WrongSegmentCount(String, usize),

    #[error("invalid part reference '{0}': empty category, repair-type or part number")]
    #[diagnostic(code(repmat::part_ref::empty))]
    EmptySegment(String),
}
