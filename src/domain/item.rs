use crate::error::{Result, VendingError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field separator of the inventory record format. Slot ids and names may not
/// contain it, start or end with `:`, or span lines.
pub const DELIMITER: &str = "::";

/// Normalizes a slot identifier for lookup: slots are case-insensitive and
/// stored uppercase.
pub fn normalize_slot(slot_id: &str) -> String {
    slot_id.trim().to_uppercase()
}

/// An item stocked at a slot of the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Uppercase slot identifier, e.g. `A1`. Identity of the item.
    pub slot_id: String,
    pub name: String,
    /// Unit price with two fractional digits.
    pub price: Decimal,
    pub quantity_available: u32,
}

impl Item {
    /// Builds an item with a normalized slot id and a price scaled to two
    /// fractional digits. No business validation happens here; see
    /// [`Item::validate`].
    pub fn new(slot_id: &str, name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            slot_id: normalize_slot(slot_id),
            name: name.into(),
            price: with_cents_scale(price),
            quantity_available: quantity,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.quantity_available != 0
    }

    /// Checks the fields every stored item must carry.
    pub fn validate(&self) -> Result<()> {
        if self.slot_id.trim().is_empty() {
            return Err(VendingError::InvalidItem("slot id is required".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(VendingError::InvalidItem(
                "missing required item fields [name, price]".to_string(),
            ));
        }
        for field in [&self.slot_id, &self.name] {
            if field.contains(DELIMITER) || field.starts_with(':') || field.ends_with(':') {
                return Err(VendingError::InvalidItem(format!(
                    "slot id and name may not contain '{DELIMITER}' or start or end with ':': {field:?}"
                )));
            }
            if field.contains(['\n', '\r']) {
                return Err(VendingError::InvalidItem(format!(
                    "slot id and name must fit on one line: {field:?}"
                )));
            }
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(VendingError::InvalidItem(format!(
                "price may not be negative: {}",
                self.price
            )));
        }
        if self.price.normalize().scale() > 2 {
            return Err(VendingError::InvalidItem(format!(
                "price must be a whole number of cents: {}",
                self.price
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Item {
    /// `[name (n in stock) : $price]`, the snapshot format used in audit lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} ({} in stock) : ${}]",
            self.name, self.quantity_available, self.price
        )
    }
}

// Sub-cent prices keep their scale so `validate` can reject them.
fn with_cents_scale(price: Decimal) -> Decimal {
    let mut cents = price.normalize();
    if cents.scale() > 2 {
        return price;
    }
    cents.rescale(2);
    cents
}
