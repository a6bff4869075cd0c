use crate::domain::item::{Item, normalize_slot};
use crate::domain::ports::{AuditSink, InventoryStore, StoreResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory inventory.
///
/// Uses `Arc<RwLock<BTreeMap<String, Item>>>` so listings come back in slot
/// order. Ideal for testing or embedding where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryInventoryStore {
    items: Arc<RwLock<BTreeMap<String, Item>>>,
}

impl InMemoryInventoryStore {
    /// Creates a new, empty in-memory inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inventory preloaded with `items`, keyed by their slot ids.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (normalize_slot(&item.slot_id), item))
            .collect();
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn create(&self, slot_id: &str, item: Item) -> StoreResult<Option<Item>> {
        let mut items = self.items.write().await;
        Ok(items.insert(normalize_slot(slot_id), item))
    }

    async fn get(&self, slot_id: &str) -> StoreResult<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(&normalize_slot(slot_id)).cloned())
    }

    async fn get_all(&self) -> StoreResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn update(&self, slot_id: &str, item: Item) -> StoreResult<Item> {
        let mut items = self.items.write().await;
        items.remove(&normalize_slot(slot_id));
        items.insert(normalize_slot(&item.slot_id), item.clone());
        Ok(item)
    }

    async fn delete(&self, slot_id: &str) -> StoreResult<Option<Item>> {
        let mut items = self.items.write().await;
        Ok(items.remove(&normalize_slot(slot_id)))
    }
}

/// Collects audit lines in memory, in the order they were recorded.
#[derive(Default, Clone)]
pub struct InMemoryAuditLog {
    entries: Arc<RwLock<Vec<String>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<String> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditLog {
    async fn record(&self, entry: &str) -> StoreResult<()> {
        self.entries.write().await.push(entry.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_in_memory_store_case_insensitive() {
        let store = InMemoryInventoryStore::new();
        let item = Item::new("A1", "Chips", dec!(1.25), 4);

        assert!(store.create("a1", item.clone()).await.unwrap().is_none());
        assert_eq!(store.get("A1").await.unwrap(), Some(item.clone()));
        assert_eq!(store.get("a1").await.unwrap(), Some(item));
        assert!(store.get("B1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_store_sorted_and_delete() {
        let store = InMemoryInventoryStore::with_items([
            Item::new("C1", "Candy", dec!(0.85), 2),
            Item::new("A2", "Gum", dec!(0.50), 9),
            Item::new("B1", "Cola", dec!(1.75), 0),
        ]);

        let slots: Vec<_> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.slot_id)
            .collect();
        assert_eq!(slots, ["A2", "B1", "C1"]);

        assert!(store.delete("b1").await.unwrap().is_some());
        assert!(store.delete("b1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_audit_log() {
        let log = InMemoryAuditLog::new();
        log.record("first").await.unwrap();
        log.record("second").await.unwrap();
        assert_eq!(log.entries().await, ["first", "second"]);
    }
}
