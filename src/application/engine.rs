use crate::domain::change::ChangeBreakdown;
use crate::domain::item::{Item, normalize_slot};
use crate::domain::ports::{AuditSinkBox, InventoryStoreBox};
use crate::error::{Result, VendingError};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// The transaction engine of the vending machine.
///
/// `VendingEngine` enforces the purchase and inventory rules on top of an
/// [`InventoryStore`](crate::domain::ports::InventoryStore) and writes one
/// audit line per committed mutation. Mutating operations are serialized by a
/// writer lock, so each call is atomic from the caller's point of view.
/// Storage errors are passed through unchanged.
pub struct VendingEngine {
    inventory: InventoryStoreBox,
    audit: AuditSinkBox,
    writer: Mutex<()>,
}

impl VendingEngine {
    /// Creates a new `VendingEngine`.
    ///
    /// # Arguments
    ///
    /// * `inventory` - The store holding the authoritative item records.
    /// * `audit` - The sink receiving one line per create, update, delete and sale.
    pub fn new(inventory: InventoryStoreBox, audit: AuditSinkBox) -> Self {
        Self {
            inventory,
            audit,
            writer: Mutex::new(()),
        }
    }

    /// Stocks a new slot.
    ///
    /// Fails with `DuplicateSlot` when the slot is taken, then with
    /// `InvalidItem` when the item is incomplete.
    pub async fn create_item(&self, item: Item) -> Result<()> {
        let _guard = self.writer.lock().await;

        if self.inventory.get(&item.slot_id).await?.is_some() {
            return Err(VendingError::DuplicateSlot(normalize_slot(&item.slot_id)));
        }
        item.validate()?;

        let entry = format!("Item {} : {} CREATED.", item.slot_id, item.name);
        info!(slot = %item.slot_id, name = %item.name, "Item created");
        let slot = item.slot_id.clone();
        self.inventory.create(&slot, item).await?;
        self.audit.record(&entry).await?;
        Ok(())
    }

    /// Looks up a slot, promoting an absent record to `InvalidSlot`.
    pub async fn get_item(&self, slot_id: &str) -> Result<Item> {
        self.inventory
            .get(slot_id)
            .await?
            .ok_or_else(|| VendingError::InvalidSlot(normalize_slot(slot_id)))
    }

    /// Items with stock left, in slot order.
    pub async fn list_available_items(&self) -> Result<Vec<Item>> {
        let items = self.inventory.get_all().await?;
        Ok(items.into_iter().filter(Item::is_in_stock).collect())
    }

    pub async fn update_item(&self, slot_id: &str, item: Item) -> Result<Item> {
        let _guard = self.writer.lock().await;
        self.apply_update(slot_id, item).await
    }

    pub async fn delete_item(&self, slot_id: &str) -> Result<Item> {
        let _guard = self.writer.lock().await;

        let deleted = self
            .inventory
            .delete(slot_id)
            .await?
            .ok_or_else(|| VendingError::InvalidSlot(normalize_slot(slot_id)))?;

        info!(slot = %deleted.slot_id, "Item deleted");
        self.audit
            .record(&format!("Item {} : {} DELETED.", deleted.slot_id, deleted.name))
            .await?;
        Ok(deleted)
    }

    /// Sells one unit of the item at `slot_id` and returns the change owed.
    ///
    /// Checks run in a fixed order: the slot must exist, then be in stock,
    /// then `deposited` must cover the price. Exact payment yields no change.
    /// The change is worked out before the sale is written, so a deposit too
    /// large to pay back fails with `InvalidArgument` and sells nothing.
    pub async fn sell_item(&self, slot_id: &str, deposited: Decimal) -> Result<ChangeBreakdown> {
        let _guard = self.writer.lock().await;

        let mut item = self
            .inventory
            .get(slot_id)
            .await?
            .ok_or_else(|| VendingError::InvalidSlot(normalize_slot(slot_id)))?;

        if !item.is_in_stock() {
            debug!(slot = %item.slot_id, "Rejected sale: out of stock");
            return Err(VendingError::OutOfStock(item.slot_id));
        }

        let price = item.price;
        if deposited < price {
            debug!(slot = %item.slot_id, %price, %deposited, "Rejected sale: insufficient funds");
            return Err(VendingError::InsufficientFunds {
                name: item.name,
                price,
                deposited,
            });
        }

        let change = ChangeBreakdown::from_monetary_amount(deposited - price)?;

        item.quantity_available -= 1;
        info!(slot = %item.slot_id, remaining = item.quantity_available, "Item sold");
        self.apply_update(slot_id, item).await?;

        Ok(change)
    }

    /// Replaces the record at `slot_id`. Callers hold the writer lock.
    async fn apply_update(&self, slot_id: &str, item: Item) -> Result<Item> {
        let slot = normalize_slot(slot_id);
        let previous = self
            .inventory
            .get(&slot)
            .await?
            .ok_or_else(|| VendingError::InvalidSlot(slot.clone()))?;
        item.validate()?;

        let updated = self.inventory.update(&slot, item).await?;
        self.audit
            .record(&format!("Item at {slot}: {previous} UPDATED to: {updated}"))
            .await?;
        Ok(updated)
    }
}
