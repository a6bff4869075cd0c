use super::item::Item;
use crate::error::PersistenceError;
use async_trait::async_trait;

pub type StoreResult<T> = std::result::Result<T, PersistenceError>;

/// Durable mapping from slot id to item.
///
/// Slot ids are case-insensitive: implementations normalize them with
/// [`normalize_slot`](super::item::normalize_slot) on every call. An absent
/// record is `Ok(None)`, never an error.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Inserts or overwrites the item at `slot_id`, returning the previous one.
    async fn create(&self, slot_id: &str, item: Item) -> StoreResult<Option<Item>>;
    async fn get(&self, slot_id: &str) -> StoreResult<Option<Item>>;
    /// All items sorted ascending by slot id.
    async fn get_all(&self) -> StoreResult<Vec<Item>>;
    /// Removes the record at `slot_id` and stores `item` under its own slot id,
    /// which may differ.
    async fn update(&self, slot_id: &str, item: Item) -> StoreResult<Item>;
    async fn delete(&self, slot_id: &str) -> StoreResult<Option<Item>>;
}

/// Append-only sink for audit lines.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: &str) -> StoreResult<()>;
}

pub type InventoryStoreBox = Box<dyn InventoryStore>;
pub type AuditSinkBox = Box<dyn AuditSink>;
pub type InventoryStoreFactory = Box<dyn Fn() -> InventoryStoreBox + Send + Sync>;
