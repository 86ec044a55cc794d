//! Selection state engine - selected and checked (priced) part registries
//!
//! The engine owns two registries keyed by [`PartKey`]:
//!
//! - **selected**: parts the user ticked, with their user-editable quantity
//! - **checked**: selected parts enriched with price/availability data
//!
//! Every operation is total and in-memory. The only transitions that clear
//! state are [`SelectionEngine::reset`] (catalog replaced) and
//! [`SelectionEngine::set_quantity`] (prices go stale).

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::details::{DetailsContext, DetailsPayload, PartWithInfo, PartsWithInfo};
use crate::core::key::PartKey;
use crate::core::matrix::{MatrixCell, TitleEntry};
use crate::entities::{CategorizedPart, Category, CheckedPart, Part};

/// Default context prefix for rendered keys
pub const DEFAULT_KEY_PREFIX: &str = "repair";

/// Result of a single-part status lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartStatus<'a> {
    pub is_selected: bool,
    pub is_checked: bool,
    pub checked_part: Option<&'a CheckedPart>,
}

/// Aggregate figures over the current registries
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionSummary {
    pub selected: usize,
    /// Selected parts priced for their current quantity
    pub priced: usize,
    /// Selected parts with no current price
    pub unpriced: usize,
    pub total_cost: f64,
    /// Set when every priced part shares one currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Selected/checked part registries and their transitions
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    prefix: String,
    selected: BTreeMap<PartKey, CategorizedPart>,
    checked: BTreeMap<PartKey, CheckedPart>,
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

impl SelectionEngine {
    /// Create an empty engine rendering keys with the given context prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            selected: BTreeMap::new(),
            checked: BTreeMap::new(),
        }
    }

    /// Render a key in its flat string form using this engine's prefix
    pub fn render_key(&self, key: &PartKey) -> String {
        key.render(&self.prefix)
    }

    /// Clear both registries
    pub fn reset(&mut self) {
        tracing::debug!(
            selected = self.selected.len(),
            checked = self.checked.len(),
            "resetting selection"
        );
        self.selected.clear();
        self.checked.clear();
    }

    /// Select or deselect `parts` under (`category_id`, `tor_id`)
    ///
    /// Selecting keeps the quantity of a part that is already selected and
    /// defaults to 1 otherwise. Deselecting an unselected part is a no-op.
    pub fn toggle_parts<'p, I>(&mut self, parts: I, category_id: &str, tor_id: &str, checked: bool)
    where
        I: IntoIterator<Item = &'p Part>,
    {
        for part in parts {
            let key = PartKey::new(category_id, tor_id, part);
            if checked {
                let quantity = self
                    .selected
                    .get(&key)
                    .map_or(1, CategorizedPart::quantity);
                let item = CategorizedPart::new(category_id, tor_id, part.with_quantity(quantity));
                tracing::trace!(key = %key, quantity, "select part");
                self.selected.insert(key, item);
            } else if self.selected.remove(&key).is_some() {
                tracing::trace!(key = %key, "deselect part");
            }
        }
    }

    /// Select or deselect every part of every repair-type of `category`
    pub fn bulk_toggle(&mut self, category: &Category, checked: bool) {
        for tor in category.repair_types() {
            self.toggle_parts(tor.all_parts(), &category.id, &tor.id, checked);
        }
        tracing::debug!(category = %category.id, checked, "bulk toggled category");
    }

    /// Apply `quantity` to every selected part and drop all prices
    pub fn set_quantity(&mut self, quantity: u32) {
        self.checked.clear();
        for item in self.selected.values_mut() {
            item.part.quantity = quantity;
        }
        tracing::debug!(quantity, selected = self.selected.len(), "quantity changed");
    }

    /// Replace the checked registry with freshly priced parts
    pub fn overlay_prices<I>(&mut self, priced: I)
    where
        I: IntoIterator<Item = CheckedPart>,
    {
        self.checked = priced
            .into_iter()
            .map(|checked| (PartKey::of(&checked.item), checked))
            .collect();
        tracing::debug!(checked = self.checked.len(), "price overlay applied");
    }

    /// True when every part of every repair-type of `category` is selected
    ///
    /// Vacuously true for categories with no repair-types or no parts.
    pub fn is_category_fully_selected(&self, category: &Category) -> bool {
        category.parts().all(|(tor, part)| {
            self.selected
                .contains_key(&PartKey::new(&category.id, &tor.id, part))
        })
    }

    /// Selection and price status of one part
    pub fn query(&self, category: &Category, tor_id: &str, part: &Part) -> PartStatus<'_> {
        let key = PartKey::new(&category.id, tor_id, part);
        let checked_part = self.checked.get(&key);
        PartStatus {
            is_selected: self.selected.contains_key(&key),
            is_checked: checked_part.is_some(),
            checked_part,
        }
    }

    pub fn selected_part(&self, key: &PartKey) -> Option<&CategorizedPart> {
        self.selected.get(key)
    }

    pub fn checked_part(&self, key: &PartKey) -> Option<&CheckedPart> {
        self.checked.get(key)
    }

    /// Priced record of a selected part, if it was priced for the selected quantity
    ///
    /// A record priced for a different quantity is stale and reads as unpriced.
    pub fn current_price(&self, key: &PartKey) -> Option<&CheckedPart> {
        let item = self.selected.get(key)?;
        self.checked
            .get(key)
            .filter(|checked| checked.quantity() == item.quantity())
    }

    /// Selected registry in key order
    pub fn selected(&self) -> &BTreeMap<PartKey, CategorizedPart> {
        &self.selected
    }

    /// Checked registry in key order
    pub fn checked(&self) -> &BTreeMap<PartKey, CheckedPart> {
        &self.checked
    }

    /// Number of selected parts within one (category, repair-type) cell
    pub fn selected_in_cell(&self, category_id: &str, tor_id: &str, cell: &MatrixCell) -> usize {
        cell.parts()
            .filter(|part| self.selected.contains_key(&PartKey::new(category_id, tor_id, part)))
            .count()
    }

    /// Build the payload handed to the details dialog for one inspected part
    ///
    /// Included parts are paired with their priced counterpart as-is; excluded
    /// parts are informational and always carry quantity 1.
    pub fn assemble_details(
        &self,
        category: &Category,
        tor: TitleEntry,
        checked_part: &CheckedPart,
        parts: &MatrixCell,
        context: &DetailsContext,
    ) -> DetailsPayload {
        let pair = |part: &Part| {
            self.checked
                .get(&PartKey::new(&category.id, &tor.id, part))
                .cloned()
        };

        let included = parts
            .included_parts
            .iter()
            .map(|part| PartWithInfo {
                part: part.clone(),
                info: pair(part),
            })
            .collect();

        let excluded = parts
            .excluded_parts
            .iter()
            .map(|part| PartWithInfo {
                part: part.with_quantity(1),
                info: pair(part).map(|info| info.with_quantity(1)),
            })
            .collect();

        DetailsPayload {
            category: TitleEntry::of(category),
            tor,
            inspected: checked_part.clone(),
            parts_with_info: PartsWithInfo { included, excluded },
            currency: context.currency.clone(),
            warehouse: context.warehouse.clone(),
        }
    }

    /// Aggregate counts and the priced total over the selection
    ///
    /// Only selected parts with a current price count as priced.
    pub fn summary(&self) -> SelectionSummary {
        let priced: Vec<&CheckedPart> = self
            .selected
            .keys()
            .filter_map(|key| self.current_price(key))
            .collect();

        let mut currencies = priced.iter().map(|c| c.price.currency.as_deref());
        let first = currencies.next().flatten();
        let uniform = currencies.all(|c| c == first);

        SelectionSummary {
            selected: self.selected.len(),
            priced: priced.len(),
            unpriced: self.selected.len() - priced.len(),
            total_cost: priced.iter().filter_map(|c| c.line_total()).sum(),
            currency: if uniform { first.map(str::to_string) } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PriceInfo, RepairType};

    fn scenario_category() -> Category {
        Category::new("C1", "Brakes").with_repair_type(
            RepairType::new("T1", "Pads")
                .include(Part::new("P1", "A"))
                .exclude(Part::new("P2", "B")),
        )
    }

    fn priced(category_id: &str, tor_id: &str, part: Part, unit_price: f64) -> CheckedPart {
        CheckedPart::new(
            CategorizedPart::new(category_id, tor_id, part),
            PriceInfo {
                unit_price: Some(unit_price),
                currency: Some("EUR".to_string()),
                ..Default::default()
            },
        )
    }

    fn key(category_id: &str, tor_id: &str, pn: &str, sos: &str) -> PartKey {
        PartKey::new(category_id, tor_id, &Part::new(pn, sos))
    }

    #[test]
    fn test_scenario_selection() {
        let category = scenario_category();
        let mut engine = SelectionEngine::new("ctx");
        let p1 = Part::new("P1", "A");

        engine.toggle_parts([&p1], "C1", "T1", true);

        let k = key("C1", "T1", "P1", "A");
        assert_eq!(engine.render_key(&k), "ctx_C1_T1_P1_A");
        assert_eq!(engine.selected_part(&k).unwrap().quantity(), 1);
        assert!(!engine.is_category_fully_selected(&category));

        let p2 = Part::new("P2", "B").as_excluded();
        engine.toggle_parts([&p2], "C1", "T1", true);
        assert!(engine.is_category_fully_selected(&category));
    }

    #[test]
    fn test_reselect_preserves_quantity() {
        let mut engine = SelectionEngine::default();
        let part = Part::new("P1", "A");

        engine.toggle_parts([&part], "C1", "T1", true);
        engine.set_quantity(5);
        engine.toggle_parts([&part], "C1", "T1", true);

        assert_eq!(engine.selected_part(&key("C1", "T1", "P1", "A")).unwrap().quantity(), 5);
    }

    #[test]
    fn test_new_selection_ignores_feed_quantity() {
        let mut engine = SelectionEngine::default();
        let part = Part::new("P1", "A").with_quantity(9);

        engine.toggle_parts([&part], "C1", "T1", true);
        assert_eq!(engine.selected_part(&key("C1", "T1", "P1", "A")).unwrap().quantity(), 1);
    }

    #[test]
    fn test_deselect_is_idempotent() {
        let mut engine = SelectionEngine::default();
        let a = Part::new("P1", "A");
        let b = Part::new("P2", "B");
        engine.toggle_parts([&a, &b], "C1", "T1", true);

        engine.toggle_parts([&a], "C1", "T1", false);
        let once = engine.selected().clone();
        engine.toggle_parts([&a], "C1", "T1", false);

        assert_eq!(engine.selected(), &once);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn test_deselect_unknown_part_is_noop() {
        let mut engine = SelectionEngine::default();
        engine.toggle_parts([&Part::new("P1", "A")], "C1", "T1", false);
        assert!(engine.selected().is_empty());
    }

    #[test]
    fn test_included_and_excluded_share_a_key() {
        let mut engine = SelectionEngine::default();
        let part = Part::new("P1", "A");
        engine.toggle_parts([&part, &part.as_excluded()], "C1", "T1", true);
        assert_eq!(engine.selected().len(), 1);
    }

    #[test]
    fn test_same_part_under_other_repair_type_is_distinct() {
        let mut engine = SelectionEngine::default();
        let part = Part::new("P1", "A");
        engine.toggle_parts([&part], "C1", "T1", true);
        engine.toggle_parts([&part], "C1", "T2", true);
        assert_eq!(engine.selected().len(), 2);
    }

    #[test]
    fn test_bulk_toggle() {
        let category = scenario_category().with_repair_type(
            RepairType::new("T2", "Discs").include(Part::new("P3", "A")),
        );
        let mut engine = SelectionEngine::default();

        engine.bulk_toggle(&category, true);
        assert_eq!(engine.selected().len(), 3);
        assert!(engine.is_category_fully_selected(&category));

        engine.bulk_toggle(&category, false);
        assert!(engine.selected().is_empty());
        assert!(!engine.is_category_fully_selected(&category));
    }

    #[test]
    fn test_bulk_toggle_keeps_quantities() {
        let category = scenario_category();
        let mut engine = SelectionEngine::default();

        engine.toggle_parts([&Part::new("P1", "A")], "C1", "T1", true);
        engine.set_quantity(3);
        engine.bulk_toggle(&category, true);

        assert_eq!(engine.selected_part(&key("C1", "T1", "P1", "A")).unwrap().quantity(), 3);
        assert_eq!(engine.selected_part(&key("C1", "T1", "P2", "B")).unwrap().quantity(), 1);
    }

    #[test]
    fn test_fully_selected_is_vacuous_for_empty_categories() {
        let engine = SelectionEngine::default();
        assert!(engine.is_category_fully_selected(&Category::new("C1", "Empty")));
        assert!(engine.is_category_fully_selected(
            &Category::new("C2", "No parts").with_repair_type(RepairType::new("T1", "Nothing"))
        ));

        let mut absent = Category::new("C3", "Absent");
        absent.repair_types = None;
        assert!(engine.is_category_fully_selected(&absent));
    }

    #[test]
    fn test_fully_selected_ignores_other_categories() {
        let category = scenario_category();
        let mut engine = SelectionEngine::default();
        engine.toggle_parts(
            [&Part::new("P1", "A"), &Part::new("P2", "B")],
            "C9",
            "T1",
            true,
        );
        assert!(!engine.is_category_fully_selected(&category));
    }

    #[test]
    fn test_set_quantity_clears_prices_and_updates_all() {
        let mut engine = SelectionEngine::default();
        engine.toggle_parts([&Part::new("P1", "A")], "C1", "T1", true);
        engine.toggle_parts([&Part::new("P9", "Z")], "C2", "T7", true);
        engine.overlay_prices([priced("C1", "T1", Part::new("P1", "A"), 10.0)]);
        assert_eq!(engine.checked().len(), 1);

        engine.set_quantity(4);

        assert!(engine.checked().is_empty());
        assert!(engine.selected().values().all(|item| item.quantity() == 4));
    }

    #[test]
    fn test_overlay_replaces_checked_registry() {
        let mut engine = SelectionEngine::default();
        engine.overlay_prices([
            priced("C1", "T1", Part::new("P1", "A"), 1.0),
            priced("C1", "T1", Part::new("P2", "B"), 2.0),
        ]);
        engine.overlay_prices([priced("C1", "T2", Part::new("P3", "C"), 3.0)]);

        let keys: Vec<&PartKey> = engine.checked().keys().collect();
        assert_eq!(keys, vec![&key("C1", "T2", "P3", "C")]);
    }

    #[test]
    fn test_overlay_does_not_touch_selection() {
        let mut engine = SelectionEngine::default();
        engine.toggle_parts([&Part::new("P1", "A")], "C1", "T1", true);
        engine.overlay_prices(Vec::new());
        assert_eq!(engine.selected().len(), 1);
        assert!(engine.checked().is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut engine = SelectionEngine::default();
        engine.toggle_parts([&Part::new("P1", "A")], "C1", "T1", true);
        engine.overlay_prices([priced("C1", "T1", Part::new("P1", "A"), 1.0)]);

        engine.reset();
        assert!(engine.selected().is_empty());
        assert!(engine.checked().is_empty());
    }

    #[test]
    fn test_query() {
        let category = scenario_category();
        let mut engine = SelectionEngine::default();
        let p1 = Part::new("P1", "A");
        let p2 = Part::new("P2", "B");

        let status = engine.query(&category, "T1", &p1);
        assert!(!status.is_selected);
        assert!(!status.is_checked);
        assert!(status.checked_part.is_none());

        engine.toggle_parts([&p1], "C1", "T1", true);
        engine.overlay_prices([priced("C1", "T1", p1.clone(), 5.0)]);

        let status = engine.query(&category, "T1", &p1);
        assert!(status.is_selected);
        assert!(status.is_checked);
        assert_eq!(status.checked_part.unwrap().price.unit_price, Some(5.0));

        let status = engine.query(&category, "T1", &p2);
        assert!(!status.is_selected);
        assert!(status.checked_part.is_none());
    }

    #[test]
    fn test_assemble_details_forces_excluded_quantity() {
        let category = scenario_category();
        let cell = MatrixCell {
            included_parts: vec![Part::new("P1", "A")],
            excluded_parts: vec![Part::new("P2", "B").as_excluded()],
        };
        let mut engine = SelectionEngine::default();
        engine.overlay_prices([
            priced("C1", "T1", Part::new("P1", "A").with_quantity(6), 2.0),
            priced("C1", "T1", Part::new("P2", "B").with_quantity(6), 3.0),
        ]);
        let inspected = engine.checked_part(&key("C1", "T1", "P1", "A")).unwrap().clone();
        let context = DetailsContext {
            currency: "EUR".to_string(),
            warehouse: Some("North".to_string()),
        };
        let tor = TitleEntry {
            id: "T1".to_string(),
            title: "Pads".to_string(),
        };

        let payload = engine.assemble_details(&category, tor, &inspected, &cell, &context);

        let included = &payload.parts_with_info.included;
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].info.as_ref().unwrap().quantity(), 6);

        let excluded = &payload.parts_with_info.excluded;
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].part.quantity, 1);
        assert!(excluded[0].part.is_excluded);
        assert_eq!(excluded[0].info.as_ref().unwrap().quantity(), 1);

        assert_eq!(payload.category.id, "C1");
        assert_eq!(payload.tor.title, "Pads");
        assert_eq!(payload.currency, "EUR");
        assert_eq!(payload.warehouse.as_deref(), Some("North"));
        assert_eq!(payload.inspected.part().part_number, "P1");
    }

    #[test]
    fn test_assemble_details_unpriced_parts_have_no_info() {
        let category = scenario_category();
        let cell = MatrixCell {
            included_parts: vec![Part::new("P1", "A")],
            excluded_parts: vec![],
        };
        let engine = SelectionEngine::default();
        let inspected = priced("C1", "T1", Part::new("P1", "A"), 1.0);
        let tor = TitleEntry {
            id: "T1".to_string(),
            title: "Pads".to_string(),
        };

        let context = DetailsContext::default();
        let payload = engine.assemble_details(&category, tor, &inspected, &cell, &context);
        assert!(payload.parts_with_info.included[0].info.is_none());
    }

    #[test]
    fn test_summary() {
        let mut engine = SelectionEngine::default();
        engine.toggle_parts([&Part::new("P1", "A"), &Part::new("P2", "B")], "C1", "T1", true);
        engine.set_quantity(2);
        engine.overlay_prices([
            priced("C1", "T1", Part::new("P1", "A").with_quantity(2), 10.0),
            priced("C9", "T1", Part::new("P8", "A").with_quantity(2), 99.0),
        ]);

        let summary = engine.summary();
        assert_eq!(summary.selected, 2);
        assert_eq!(summary.priced, 1);
        assert_eq!(summary.unpriced, 1);
        assert_eq!(summary.total_cost, 20.0);
        assert_eq!(summary.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_summary_mixed_currency() {
        let mut engine = SelectionEngine::default();
        engine.toggle_parts([&Part::new("P1", "A"), &Part::new("P2", "B")], "C1", "T1", true);
        let mut usd = priced("C1", "T1", Part::new("P2", "B"), 1.0);
        usd.price.currency = Some("USD".to_string());
        engine.overlay_prices([priced("C1", "T1", Part::new("P1", "A"), 1.0), usd]);

        assert_eq!(engine.summary().priced, 2);
        assert!(engine.summary().currency.is_none());
    }

    #[test]
    fn test_price_for_other_quantity_is_stale() {
        let mut engine = SelectionEngine::default();
        engine.toggle_parts([&Part::new("P1", "A")], "C1", "T1", true);
        engine.set_quantity(3);
        engine.overlay_prices([priced("C1", "T1", Part::new("P1", "A").with_quantity(2), 10.0)]);

        let k = key("C1", "T1", "P1", "A");
        assert!(engine.checked_part(&k).is_some());
        assert!(engine.current_price(&k).is_none());

        let summary = engine.summary();
        assert_eq!(summary.priced, 0);
        assert_eq!(summary.unpriced, 1);
        assert_eq!(summary.total_cost, 0.0);

        engine.overlay_prices([priced("C1", "T1", Part::new("P1", "A").with_quantity(3), 10.0)]);
        assert_eq!(engine.current_price(&k).and_then(CheckedPart::line_total), Some(30.0));
        assert_eq!(engine.summary().total_cost, 30.0);
    }

    #[test]
    fn test_current_price_requires_selection() {
        let mut engine = SelectionEngine::default();
        engine.overlay_prices([priced("C1", "T1", Part::new("P1", "A"), 10.0)]);
        assert!(engine.current_price(&key("C1", "T1", "P1", "A")).is_none());
    }
}
