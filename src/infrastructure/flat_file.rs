use crate::domain::item::{DELIMITER, Item, normalize_slot};
use crate::domain::ports::{InventoryStore, StoreResult};
use crate::error::PersistenceError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;

/// An inventory backed by a line-oriented record file.
///
/// Each line is `slot::name::quantity::price`. Every call reloads the whole
/// file, applies its change to the in-memory map and rewrites the whole file.
/// That load-mutate-rewrite sequence runs under a single mutex, so callers
/// sharing one store never lose an update.
///
/// The file must exist before the first call; a missing file is a load error.
pub struct FileInventoryStore {
    path: PathBuf,
    items: Mutex<BTreeMap<String, Item>>,
}

impl FileInventoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            items: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces `items` with the file contents. `items` is untouched on failure.
    async fn load(&self, items: &mut BTreeMap<String, Item>) -> StoreResult<()> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| PersistenceError::Load {
                path: self.path.clone(),
                source,
            })?;
        *items = unmarshal_inventory(&text)?;
        debug!(path = %self.path.display(), records = items.len(), "Loaded inventory");
        Ok(())
    }

    async fn write(&self, items: &BTreeMap<String, Item>) -> StoreResult<()> {
        let contents = marshal_inventory(items);
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, &contents))
            .await
            .map_err(|e| PersistenceError::Backend(Box::new(e)))?
    }
}

#[async_trait]
impl InventoryStore for FileInventoryStore {
    async fn create(&self, slot_id: &str, item: Item) -> StoreResult<Option<Item>> {
        let mut items = self.items.lock().await;
        self.load(&mut items).await?;
        let previous = items.insert(normalize_slot(slot_id), item);
        self.write(&items).await?;
        Ok(previous)
    }

    async fn get(&self, slot_id: &str) -> StoreResult<Option<Item>> {
        let mut items = self.items.lock().await;
        self.load(&mut items).await?;
        Ok(items.get(&normalize_slot(slot_id)).cloned())
    }

    async fn get_all(&self) -> StoreResult<Vec<Item>> {
        let mut items = self.items.lock().await;
        self.load(&mut items).await?;
        Ok(items.values().cloned().collect())
    }

    async fn update(&self, slot_id: &str, item: Item) -> StoreResult<Item> {
        let mut items = self.items.lock().await;
        self.load(&mut items).await?;
        items.remove(&normalize_slot(slot_id));
        items.insert(normalize_slot(&item.slot_id), item.clone());
        self.write(&items).await?;
        Ok(item)
    }

    async fn delete(&self, slot_id: &str) -> StoreResult<Option<Item>> {
        let mut items = self.items.lock().await;
        self.load(&mut items).await?;
        let removed = items.remove(&normalize_slot(slot_id));
        self.write(&items).await?;
        Ok(removed)
    }
}

fn marshal_item(item: &Item) -> String {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{:.2}",
        item.slot_id, item.name, item.quantity_available, item.price
    )
}

fn marshal_inventory(items: &BTreeMap<String, Item>) -> String {
    items
        .values()
        .map(|item| marshal_item(item) + "\n")
        .collect()
}

fn unmarshal_item(line: &str, line_no: usize) -> StoreResult<Item> {
    let malformed = |reason: String| PersistenceError::MalformedRecord {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let [slot_id, name, quantity, price] = fields.as_slice() else {
        return Err(malformed(format!(
            "expected 4 fields, found {}",
            fields.len()
        )));
    };
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|e| malformed(format!("invalid quantity '{quantity}': {e}")))?;
    let price = Decimal::from_str(price.trim())
        .map_err(|e| malformed(format!("invalid price '{price}': {e}")))?;

    Ok(Item::new(slot_id, *name, price, quantity))
}

/// Parses a whole record file. Blank lines are ignored; any other line that
/// fails to parse aborts the load.
fn unmarshal_inventory(text: &str) -> StoreResult<BTreeMap<String, Item>> {
    let mut items = BTreeMap::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let item = unmarshal_item(line, idx + 1)?;
        items.insert(item.slot_id.clone(), item);
    }
    Ok(items)
}

/// Writes `contents` to a temporary sibling of `path`, then renames it over
/// `path`.
fn replace_file(path: &Path, contents: &str) -> StoreResult<()> {
    let save_err = |source: io::Error| PersistenceError::Save {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(save_err)?;
    file.write_all(contents.as_bytes()).map_err(save_err)?;
    file.as_file().sync_all().map_err(save_err)?;
    file.persist(path).map_err(|e| save_err(e.error))?;
    Ok(())
}
