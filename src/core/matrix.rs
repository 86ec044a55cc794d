//! Part matrix - repair-type × category index of the catalog
//!
//! The matrix is keyed first by repair-type id, then by category id. Each
//! cell holds the parts to render for that (repair-type, category) pair. The
//! builder also produces a display order for the repair-type columns and flat
//! id → title lookups for both axes.

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::core::entity::Entity;
use crate::entities::{Category, Part, RepairType};

/// Parts rendered in one (repair-type, category) cell
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatrixCell {
    pub included_parts: Vec<Part>,
    /// Every part here carries `is_excluded = true`
    pub excluded_parts: Vec<Part>,
}

impl MatrixCell {
    fn from_repair_type(tor: &RepairType) -> Self {
        Self {
            included_parts: tor.included_parts.clone(),
            excluded_parts: tor.excluded_parts.iter().map(Part::as_excluded).collect(),
        }
    }

    /// Number of parts listed in this cell (included + excluded)
    pub fn part_count(&self) -> usize {
        self.included_parts.len() + self.excluded_parts.len()
    }

    /// Included parts followed by excluded parts
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.included_parts.iter().chain(self.excluded_parts.iter())
    }
}

/// Id and title of a matrix axis entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleEntry {
    pub id: String,
    pub title: String,
}

impl TitleEntry {
    pub fn of<E: Entity>(entity: &E) -> Self {
        Self {
            id: entity.id().to_string(),
            title: entity.title().to_string(),
        }
    }
}

/// Summary figures for a built matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatrixStats {
    pub categories: usize,
    pub repair_types: usize,
    pub populated_cells: usize,
    pub total_parts: usize,
}

/// The repair-type × category lookup structure
#[derive(Debug, Clone, Default)]
pub struct PartMatrix {
    cells: HashMap<String, HashMap<String, MatrixCell>>,
    columns: Vec<String>,
    rows: Vec<String>,
    category_titles: HashMap<String, String>,
    tor_titles: HashMap<String, String>,
}

impl PartMatrix {
    /// Build the matrix from an ordered list of categories
    ///
    /// Categories without a repair-type list are skipped. Excluded parts are
    /// copied with their exclusion flag forced on; the input is never mutated.
    /// Columns are ordered by the number of distinct categories offering the
    /// repair-type (most first), ties keep encounter order.
    pub fn build(categories: &[Category]) -> Self {
        let mut matrix = Self::default();
        let mut holders: HashMap<String, HashSet<String>> = HashMap::new();
        let mut seen_rows: HashSet<String> = HashSet::new();

        for category in categories {
            let Some(tors) = category.repair_types.as_ref() else {
                tracing::debug!(category = %category.id, "skipping category without repair-types");
                continue;
            };

            for tor in tors {
                matrix
                    .category_titles
                    .insert(category.id.clone(), category.title.clone());
                matrix.tor_titles.insert(tor.id.clone(), tor.title.clone());

                matrix
                    .cells
                    .entry(tor.id.clone())
                    .or_default()
                    .insert(category.id.clone(), MatrixCell::from_repair_type(tor));

                if !holders.contains_key(&tor.id) {
                    matrix.columns.push(tor.id.clone());
                }
                holders
                    .entry(tor.id.clone())
                    .or_default()
                    .insert(category.id.clone());

                if seen_rows.insert(category.id.clone()) {
                    matrix.rows.push(category.id.clone());
                }
            }
        }

        // Stable sort keeps encounter order among equally dense columns
        matrix
            .columns
            .sort_by_key(|id| Reverse(holders.get(id).map_or(0, HashSet::len)));

        tracing::debug!(
            rows = matrix.rows.len(),
            columns = matrix.columns.len(),
            "built part matrix"
        );
        matrix
    }

    /// Cell for (`tor_id`, `category_id`), if that category offers the repair-type
    pub fn cell(&self, tor_id: &str, category_id: &str) -> Option<&MatrixCell> {
        self.cells.get(tor_id).and_then(|row| row.get(category_id))
    }

    /// All cells of one repair-type, keyed by category id
    pub fn repair_type_cells(&self, tor_id: &str) -> Option<&HashMap<String, MatrixCell>> {
        self.cells.get(tor_id)
    }

    /// Repair-type ids in display order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Category ids in encounter order
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn category_title(&self, category_id: &str) -> Option<&str> {
        self.category_titles.get(category_id).map(String::as_str)
    }

    pub fn tor_title(&self, tor_id: &str) -> Option<&str> {
        self.tor_titles.get(tor_id).map(String::as_str)
    }

    /// Title lookup entry for a repair-type column
    pub fn tor_entry(&self, tor_id: &str) -> Option<TitleEntry> {
        self.tor_title(tor_id).map(|title| TitleEntry {
            id: tor_id.to_string(),
            title: title.to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn stats(&self) -> MatrixStats {
        let populated_cells = self.cells.values().map(HashMap::len).sum();
        let total_parts = self
            .cells
            .values()
            .flat_map(HashMap::values)
            .map(MatrixCell::part_count)
            .sum();

        MatrixStats {
            categories: self.rows.len(),
            repair_types: self.columns.len(),
            populated_cells,
            total_parts,
        }
    }
}
