//! Shopping cart state and its local persistence.
//!
//! A cart is just an ordered list of item ids with no duplicates. Nothing is
//! reserved by adding to a cart; the list exists so a shopper can quote the
//! ids in a DM or share them as a link.

use crate::catalog::{InventoryIndex, InventoryRecord, ItemId};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use url::form_urlencoded;

/// Storage key the cart is kept under.
pub const CART_KEY: &str = "ptg-cart";

/// Query parameter carrying a shared cart.
pub const SHARE_PARAM: &str = "items";

/// Backing store for the cart id list.
pub trait CartStore {
    /// Stored ids; missing or unreadable storage reads as an empty cart.
    fn get(&self) -> Vec<ItemId>;
    fn set(&mut self, ids: &[ItemId]) -> Result<()>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Ordered, de-duplicated cart contents.
pub struct CartState {
    ids: Vec<ItemId>,
}

impl CartState {
    /// Build from arbitrary ids, dropping blanks and repeats (first wins).
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ItemId>,
    {
        let mut state = Self::default();
        for id in ids {
            state.add(id);
        }
        state
    }

    pub fn load(store: &impl CartStore) -> Self {
        Self::from_ids(store.get())
    }

    pub fn save(&self, store: &mut impl CartStore) -> Result<()> {
        store.set(&self.ids)
    }

    /// Parse a shared link's query string (`?items=a|b`).
    ///
    /// Returns `None` when the parameter is absent or empty so callers leave
    /// the existing cart alone.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.trim_start_matches('?');
        let raw = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == SHARE_PARAM)
            .map(|(_, value)| value.into_owned())?;
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self::from_ids(
            raw.split('|').map(|id| ItemId::from(id.trim())),
        ))
    }

    /// Append `id` unless it is blank or already present.
    pub fn add(&mut self, id: ItemId) -> bool {
        let id = ItemId(id.0.trim().to_string());
        if id.is_empty() || self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: &ItemId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        before != self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `base?items=a|b`, in cart order, form-encoded.
    pub fn share_url(&self, base: &str) -> String {
        let joined = self
            .ids
            .iter()
            .map(ItemId::as_str)
            .collect::<Vec<_>>()
            .join("|");
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(SHARE_PARAM, &joined)
            .finish();
        format!("{base}?{query}")
    }

    /// Cart entries that still exist in the inventory, in cart order.
    ///
    /// Ids that disappeared from the feed are skipped, not reported.
    pub fn resolve<'a>(&self, index: &'a InventoryIndex) -> Vec<&'a InventoryRecord> {
        self.ids.iter().filter_map(|id| index.record(id)).collect()
    }
}

#[derive(Clone, Debug, Default)]
/// In-process store; nothing survives the process.
pub struct MemoryCartStore {
    ids: Vec<ItemId>,
}

impl CartStore for MemoryCartStore {
    fn get(&self) -> Vec<ItemId> {
        self.ids.clone()
    }

    fn set(&mut self, ids: &[ItemId]) -> Result<()> {
        self.ids = ids.to_vec();
        Ok(())
    }
}

#[derive(Clone, Debug)]
/// Cart kept as a JSON array at `<dir>/ptg-cart.json`.
pub struct FileCartStore {
    dir: PathBuf,
}

impl FileCartStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{CART_KEY}.json"))
    }

    fn read_ids(path: &Path) -> Option<Vec<ItemId>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Some(Vec::new()),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cart storage unreadable");
                return None;
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(values)) => Some(
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ItemId::from)
                    .collect(),
            ),
            Ok(_) => {
                warn!(path = %path.display(), "cart storage is not an array");
                None
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cart storage is not valid JSON");
                None
            }
        }
    }
}

impl CartStore for FileCartStore {
    fn get(&self) -> Vec<ItemId> {
        Self::read_ids(&self.path()).unwrap_or_default()
    }

    /// Write via a temp file in the same directory and rename into place.
    fn set(&mut self, ids: &[ItemId]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating cart directory {}", self.dir.display()))?;
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("creating temp file in {}", self.dir.display()))?;
        serde_json::to_writer(&mut tmp, ids).context("serializing cart")?;
        tmp.write_all(b"\n").context("writing cart")?;

        let path = self.path();
        tmp.persist(&path)
            .map_err(|err| err.error)
            .with_context(|| format!("writing cart {}", path.display()))?;
        debug!(path = %path.display(), items = ids.len(), "saved cart");
        Ok(())
    }
}
