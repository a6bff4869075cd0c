use crate::domain::item::{Item, normalize_slot};
use crate::domain::ports::{InventoryStore, StoreResult};
use crate::error::PersistenceError;
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing inventory items.
pub const CF_INVENTORY: &str = "inventory";

/// A persistent inventory implementation using RocksDB.
///
/// Items are stored as JSON keyed by their uppercase slot id, so iterating the
/// column family from the start yields items in slot order.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
/// Read-modify-write calls hold a shared writer lock.
#[derive(Clone)]
pub struct RocksDbInventoryStore {
    db: Arc<DB>,
    writer: Arc<Mutex<()>>,
}

fn backend_error(message: impl Into<String>) -> PersistenceError {
    let message: String = message.into();
    PersistenceError::Backend(message.into())
}

impl RocksDbInventoryStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "inventory" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_inventory = ColumnFamilyDescriptor::new(CF_INVENTORY, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_inventory])
            .map_err(|e| PersistenceError::Backend(Box::new(e)))?;

        Ok(Self {
            db: Arc::new(db),
            writer: Arc::new(Mutex::new(())),
        })
    }

    fn read(&self, key: &str) -> StoreResult<Option<Item>> {
        let cf = self
            .db
            .cf_handle(CF_INVENTORY)
            .ok_or_else(|| backend_error("Inventory column family not found"))?;

        let result = self
            .db
            .get_cf(&cf, key.as_bytes())
            .map_err(|e| PersistenceError::Backend(Box::new(e)))?;

        match result {
            Some(bytes) => {
                let item = serde_json::from_slice(&bytes)
                    .map_err(|e| backend_error(format!("Deserialization error: {}", e)))?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    fn encode(item: &Item) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(item).map_err(|e| backend_error(format!("Serialization error: {}", e)))
    }

    fn put(&self, key: &str, item: &Item) -> StoreResult<()> {
        let cf = self
            .db
            .cf_handle(CF_INVENTORY)
            .ok_or_else(|| backend_error("Inventory column family not found"))?;

        self.db
            .put_cf(&cf, key.as_bytes(), Self::encode(item)?)
            .map_err(|e| PersistenceError::Backend(Box::new(e)))
    }

    /// Deletes `old_key` and writes `item` under `new_key` in one batch, so a
    /// crash never leaves the item under both keys or neither.
    fn replace(&self, old_key: &str, new_key: &str, item: &Item) -> StoreResult<()> {
        let cf = self
            .db
            .cf_handle(CF_INVENTORY)
            .ok_or_else(|| backend_error("Inventory column family not found"))?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf, old_key.as_bytes());
        batch.put_cf(&cf, new_key.as_bytes(), Self::encode(item)?);
        self.db
            .write(batch)
            .map_err(|e| PersistenceError::Backend(Box::new(e)))
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let cf = self
            .db
            .cf_handle(CF_INVENTORY)
            .ok_or_else(|| backend_error("Inventory column family not found"))?;

        self.db
            .delete_cf(&cf, key.as_bytes())
            .map_err(|e| PersistenceError::Backend(Box::new(e)))
    }
}

#[async_trait]
impl InventoryStore for RocksDbInventoryStore {
    async fn create(&self, slot_id: &str, item: Item) -> StoreResult<Option<Item>> {
        let _guard = self.writer.lock().await;
        let key = normalize_slot(slot_id);
        let previous = self.read(&key)?;
        self.put(&key, &item)?;
        Ok(previous)
    }

    async fn get(&self, slot_id: &str) -> StoreResult<Option<Item>> {
        self.read(&normalize_slot(slot_id))
    }

    async fn get_all(&self) -> StoreResult<Vec<Item>> {
        let handle = self
            .db
            .cf_handle(CF_INVENTORY)
            .ok_or_else(|| backend_error("Inventory column family not found"))?;

        let mut items = Vec::new();
        let iter = self.db.iterator_cf(handle, rocksdb::IteratorMode::Start);

        for entry in iter {
            let (_key, value) =
                entry.map_err(|e| backend_error(format!("RocksDB iteration error: {}", e)))?;
            let item: Item = serde_json::from_slice(&value)
                .map_err(|e| backend_error(format!("Failed to deserialize item: {}", e)))?;
            items.push(item);
        }

        Ok(items)
    }

    async fn update(&self, slot_id: &str, item: Item) -> StoreResult<Item> {
        let _guard = self.writer.lock().await;
        self.replace(
            &normalize_slot(slot_id),
            &normalize_slot(&item.slot_id),
            &item,
        )?;
        Ok(item)
    }

    async fn delete(&self, slot_id: &str) -> StoreResult<Option<Item>> {
        let _guard = self.writer.lock().await;
        let key = normalize_slot(slot_id);
        let removed = self.read(&key)?;
        if removed.is_some() {
            self.remove(&key)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDbInventoryStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_INVENTORY).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_inventory_store() {
        let dir = tempdir().unwrap();
        let store = RocksDbInventoryStore::open(dir.path()).unwrap();

        let chips = Item::new("B1", "Chips", dec!(2.50), 5);
        let gum = Item::new("A1", "Gum", dec!(0.50), 9);
        store.create("b1", chips.clone()).await.unwrap();
        store.create("A1", gum.clone()).await.unwrap();

        assert_eq!(store.get("B1").await.unwrap(), Some(chips.clone()));
        assert_eq!(store.get_all().await.unwrap(), vec![gum, chips]);

        assert!(store.delete("b1").await.unwrap().is_some());
        assert!(store.delete("b1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_update_moves_slot() {
        let dir = tempdir().unwrap();
        let store = RocksDbInventoryStore::open(dir.path()).unwrap();

        store
            .create("A1", Item::new("A1", "Gum", dec!(0.50), 9))
            .await
            .unwrap();
        let moved = Item::new("C3", "Gum", dec!(0.50), 9);
        store.update("a1", moved.clone()).await.unwrap();

        assert!(store.get("A1").await.unwrap().is_none());
        assert_eq!(store.get("C3").await.unwrap(), Some(moved));
    }

    #[tokio::test]
    async fn test_rocksdb_update_in_place_and_create_keeps_item() {
        let dir = tempdir().unwrap();
        let store = RocksDbInventoryStore::open(dir.path()).unwrap();

        let gum = Item::new("A1", "Gum", dec!(0.50), 9);
        store.create("a1", gum.clone()).await.unwrap();
        assert_eq!(store.get("A1").await.unwrap(), Some(gum));

        let restocked = Item::new("A1", "Gum", dec!(0.55), 20);
        store.update("A1", restocked.clone()).await.unwrap();
        assert_eq!(store.get_all().await.unwrap(), vec![restocked]);
    }
}
