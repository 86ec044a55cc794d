//! Selection session - routes catalog, pricing and selection events
//!
//! A session owns the current catalog, the matrix built from it and the
//! [`SelectionEngine`]. Inbound events are applied one at a time:
//!
//! 1. catalog change: rebuild the matrix, then reset the registries
//! 2. pricing change: overlay the checked registry
//! 3. bulk selection: toggle every part of one category
//!
//! Individual part toggles produce a [`PartToggled`] event carrying the
//! category's fully-selected state right after the toggle.

use serde::{Deserialize, Serialize};

use crate::core::details::{DetailsContext, DetailsDialog, DetailsPayload};
use crate::core::key::{PartKey, PartRef};
use crate::core::matrix::PartMatrix;
use crate::core::selection::SelectionEngine;
use crate::entities::{Category, CheckedPart, Part, RepairType};

/// Category-level selection command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSelection {
    pub checked: bool,
    #[serde(alias = "categoryId")]
    pub category_id: String,
}

/// Outbound event emitted for every individual part toggle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartToggled {
    /// Rendered composite key
    pub key: String,
    pub part: Part,
    pub checked: bool,
    pub category_id: String,
    pub tor_id: String,
    /// Whether the whole category is selected after this toggle
    pub category_checked: bool,
}

/// Event-driven wrapper around the matrix builder and selection engine
#[derive(Debug, Clone, Default)]
pub struct SelectionSession {
    categories: Vec<Category>,
    matrix: PartMatrix,
    engine: SelectionEngine,
}

impl SelectionSession {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            categories: Vec::new(),
            matrix: PartMatrix::default(),
            engine: SelectionEngine::new(prefix),
        }
    }

    /// Replace the catalog: rebuild the matrix and clear all selection state
    pub fn on_catalog_changed(&mut self, categories: Vec<Category>) {
        self.matrix = PartMatrix::build(&categories);
        self.categories = categories;
        self.engine.reset();
        tracing::debug!(categories = self.categories.len(), "catalog changed");
    }

    /// Replace the checked registry with fresh pricing data
    pub fn on_prices_changed(&mut self, priced: Vec<CheckedPart>) {
        self.engine.overlay_prices(priced);
    }

    /// Apply a category-level selection command
    ///
    /// Returns `false` (and changes nothing) when the category is unknown.
    pub fn on_bulk_selection(&mut self, command: &BulkSelection) -> bool {
        match find_category(&self.categories, &command.category_id) {
            Some(category) => {
                self.engine.bulk_toggle(category, command.checked);
                true
            }
            None => {
                tracing::debug!(
                    category = %command.category_id,
                    "bulk selection for unknown category ignored"
                );
                false
            }
        }
    }

    /// Toggle a single part and report the category's aggregate state
    ///
    /// Returns `None` when the category is not part of the current catalog.
    pub fn toggle_part(
        &mut self,
        category_id: &str,
        tor_id: &str,
        part: &Part,
        checked: bool,
    ) -> Option<PartToggled> {
        let Some(category) = find_category(&self.categories, category_id) else {
            tracing::debug!(category = category_id, "toggle for unknown category ignored");
            return None;
        };
        self.engine
            .toggle_parts(std::iter::once(part), category_id, tor_id, checked);

        Some(PartToggled {
            key: self.engine.render_key(&PartKey::new(category_id, tor_id, part)),
            part: part.clone(),
            checked,
            category_id: category_id.to_string(),
            tor_id: tor_id.to_string(),
            category_checked: self.engine.is_category_fully_selected(category),
        })
    }

    /// Apply a quantity to the whole selection (drops prices)
    pub fn set_quantity(&mut self, quantity: u32) {
        self.engine.set_quantity(quantity);
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        find_category(&self.categories, category_id)
    }

    /// Resolve a part reference against the current catalog
    pub fn find_part(&self, part_ref: &PartRef) -> Option<(&Category, &RepairType, &Part)> {
        let category = self.category(&part_ref.category_id)?;
        let tor = category.repair_type(&part_ref.tor_id)?;
        let part = tor.all_parts().find(|p| part_ref.matches(p))?;
        Some((category, tor, part))
    }

    pub fn matrix(&self) -> &PartMatrix {
        &self.matrix
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    /// Assemble the details payload for a priced part
    ///
    /// `None` when the part is unknown, has no matrix cell or was never priced.
    pub fn details_payload(
        &self,
        part_ref: &PartRef,
        context: &DetailsContext,
    ) -> Option<DetailsPayload> {
        let (category, tor, part) = self.find_part(part_ref)?;
        let key = PartKey::new(&category.id, &tor.id, part);
        let checked = self.engine.checked_part(&key)?;
        let cell = self.matrix.cell(&tor.id, &category.id)?;
        let tor_entry = self.matrix.tor_entry(&tor.id)?;

        Some(
            self.engine
                .assemble_details(category, tor_entry, checked, cell, context),
        )
    }

    /// Hand the details payload for `part_ref` to `dialog`
    ///
    /// Returns whether the dialog was opened.
    pub fn open_details<D: DetailsDialog>(
        &self,
        part_ref: &PartRef,
        context: &DetailsContext,
        dialog: &mut D,
    ) -> bool {
        match self.details_payload(part_ref, context) {
            Some(payload) => {
                dialog.open(payload);
                true
            }
            None => {
                tracing::debug!(part = %part_ref, "no priced data for details");
                false
            }
        }
    }
}

/// Category with the given id; the last one wins when ids repeat, as in the matrix
fn find_category<'a>(categories: &'a [Category], category_id: &str) -> Option<&'a Category> {
    categories.iter().rev().find(|c| c.id == category_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CategorizedPart, PriceInfo};

    fn catalog() -> Vec<Category> {
        vec![
            Category::new("C1", "Brakes").with_repair_type(
                RepairType::new("T1", "Pads")
                    .include(Part::new("P1", "A"))
                    .exclude(Part::new("P2", "B")),
            ),
            Category::new("C2", "Engine")
                .with_repair_type(RepairType::new("T1", "Pads").include(Part::new("P5", "A"))),
        ]
    }

    fn session() -> SelectionSession {
        let mut session = SelectionSession::new("repair");
        session.on_catalog_changed(catalog());
        session
    }

    fn price(category_id: &str, tor_id: &str, pn: &str, sos: &str) -> CheckedPart {
        CheckedPart::new(
            CategorizedPart::new(category_id, tor_id, Part::new(pn, sos)),
            PriceInfo {
                unit_price: Some(4.0),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_toggle_event_reports_category_state() {
        let mut session = session();

        let event = session
            .toggle_part("C1", "T1", &Part::new("P1", "A"), true)
            .unwrap();
        assert_eq!(event.key, "repair_C1_T1_P1_A");
        assert!(event.checked);
        assert!(!event.category_checked);

        let event = session
            .toggle_part("C1", "T1", &Part::new("P2", "B").as_excluded(), true)
            .unwrap();
        assert!(event.category_checked);

        let event = session
            .toggle_part("C1", "T1", &Part::new("P2", "B"), false)
            .unwrap();
        assert!(!event.checked);
        assert!(!event.category_checked);
    }

    #[test]
    fn test_toggle_unknown_category() {
        let mut session = session();
        assert!(session
            .toggle_part("C9", "T1", &Part::new("P1", "A"), true)
            .is_none());
        assert!(session.engine().selected().is_empty());
    }

    #[test]
    fn test_catalog_change_resets_state() {
        let mut session = session();
        session.toggle_part("C1", "T1", &Part::new("P1", "A"), true);
        session.on_prices_changed(vec![price("C1", "T1", "P1", "A")]);

        session.on_catalog_changed(catalog());

        assert!(session.engine().selected().is_empty());
        assert!(session.engine().checked().is_empty());
        assert!(session.matrix().cell("T1", "C2").is_some());
    }

    #[test]
    fn test_bulk_selection() {
        let mut session = session();
        assert!(session.on_bulk_selection(&BulkSelection {
            checked: true,
            category_id: "C1".to_string(),
        }));
        assert_eq!(session.engine().selected().len(), 2);
        assert!(session
            .engine()
            .is_category_fully_selected(session.category("C1").unwrap()));

        assert!(!session.on_bulk_selection(&BulkSelection {
            checked: true,
            category_id: "nope".to_string(),
        }));
        assert_eq!(session.engine().selected().len(), 2);
    }

    #[test]
    fn test_find_part() {
        let session = session();
        let r: PartRef = "C1/T1/P2".parse().unwrap();
        let (category, tor, part) = session.find_part(&r).unwrap();
        assert_eq!(category.id, "C1");
        assert_eq!(tor.id, "T1");
        assert_eq!(part.sos, "B");

        assert!(session.find_part(&"C1/T1/P2/Z".parse().unwrap()).is_none());
        assert!(session.find_part(&"C1/T9/P2".parse().unwrap()).is_none());
    }

    #[test]
    fn test_open_details_requires_price() {
        let mut session = session();
        let r: PartRef = "C1/T1/P1/A".parse().unwrap();
        let context = DetailsContext {
            currency: "EUR".to_string(),
            warehouse: None,
        };
        let mut dialog: Vec<DetailsPayload> = Vec::new();

        assert!(!session.open_details(&r, &context, &mut dialog));
        assert!(dialog.is_empty());

        session.on_prices_changed(vec![price("C1", "T1", "P1", "A"), price("C1", "T1", "P2", "B")]);
        assert!(session.open_details(&r, &context, &mut dialog));

        let payload = &dialog[0];
        assert_eq!(payload.tor.title, "Pads");
        assert_eq!(payload.category.title, "Brakes");
        assert_eq!(payload.parts_with_info.included.len(), 1);
        assert!(payload.parts_with_info.excluded[0].part.is_excluded);
        assert_eq!(payload.parts_with_info.excluded[0].part.quantity, 1);
    }

    #[test]
    fn test_duplicate_category_ids_resolve_like_the_matrix() {
        let mut session = SelectionSession::new("repair");
        session.on_catalog_changed(vec![
            Category::new("C1", "Old")
                .with_repair_type(RepairType::new("T1", "Pads").include(Part::new("P1", "A"))),
            Category::new("C1", "New")
                .with_repair_type(RepairType::new("T1", "Pads").include(Part::new("P7", "A"))),
        ]);

        let cell = session.matrix().cell("T1", "C1").unwrap();
        assert_eq!(cell.included_parts[0].part_number, "P7");
        assert_eq!(session.category("C1").unwrap().title, "New");
        assert_eq!(session.matrix().category_title("C1"), Some("New"));

        assert!(session.on_bulk_selection(&BulkSelection {
            checked: true,
            category_id: "C1".to_string(),
        }));
        let selected: Vec<_> = session.engine().selected().keys().cloned().collect();
        assert_eq!(selected, vec![PartKey::new("C1", "T1", &Part::new("P7", "A"))]);

        let event = session
            .toggle_part("C1", "T1", &Part::new("P7", "A"), false)
            .unwrap();
        assert!(!event.category_checked);

        let found = session.find_part(&"C1/T1/P7".parse().unwrap());
        assert!(found.is_some());
        assert!(session.find_part(&"C1/T1/P1".parse().unwrap()).is_none());
    }

    #[test]
    fn test_bulk_selection_parses_feed_shape() {
        let cmd: BulkSelection =
            serde_json::from_str(r#"{"checked": true, "categoryId": "C1"}"#).unwrap();
        assert_eq!(cmd.category_id, "C1");
        assert!(cmd.checked);
    }
}
