//! Checked (priced) part type - selection records enriched by the pricing feed

use serde::{Deserialize, Serialize};

use crate::entities::part::{CategorizedPart, Part};

/// Price and availability data for a single part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceInfo {
    /// Unit price in `currency`
    #[serde(default, alias = "unitPrice", skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,

    /// ISO currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Quantity available for immediate shipping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<u32>,

    /// Lead time in days when not in stock
    #[serde(default, alias = "leadTimeDays", skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<u32>,

    /// Warehouse the availability figure refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
}

impl PriceInfo {
    /// Price for `quantity` units, if a unit price is known
    pub fn price_for_qty(&self, quantity: u32) -> Option<f64> {
        self.unit_price.map(|p| p * quantity as f64)
    }

    /// True when the warehouse can cover `quantity` units right away
    pub fn covers(&self, quantity: u32) -> bool {
        self.available.map_or(false, |a| a >= quantity)
    }
}

/// A selected part enriched with authoritative price/availability data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckedPart {
    #[serde(flatten)]
    pub item: CategorizedPart,

    #[serde(flatten)]
    pub price: PriceInfo,
}

impl CheckedPart {
    pub fn new(item: CategorizedPart, price: PriceInfo) -> Self {
        Self { item, price }
    }

    pub fn part(&self) -> &Part {
        &self.item.part
    }

    pub fn quantity(&self) -> u32 {
        self.item.part.quantity
    }

    /// Line total (unit price times quantity)
    pub fn line_total(&self) -> Option<f64> {
        self.price.price_for_qty(self.quantity())
    }

    /// Return a copy with the quantity replaced
    pub fn with_quantity(&self, quantity: u32) -> Self {
        let mut copy = self.clone();
        copy.item.part.quantity = quantity;
        copy
    }
}
