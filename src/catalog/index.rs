//! Loaded inventory plus a lookup table keyed by item id.
//!
//! The index is built once from a feed and never mutated. Duplicate ids are
//! not rejected here (soft validation already reported them); lookups resolve
//! to the first occurrence in feed order.

use crate::catalog::{InventoryRecord, ItemId};
use crate::feed::{FeedError, FeedLayout, FeedSource, load_feed};
use crate::validation::{log_diagnostics, validate_records};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::info;

#[derive(Debug)]
/// Feed records, their soft diagnostics, and an id → position map.
pub struct InventoryIndex {
    layout: FeedLayout,
    records: Vec<InventoryRecord>,
    diagnostics: Vec<String>,
    by_id: BTreeMap<ItemId, usize>,
}

impl InventoryIndex {
    /// Load, validate and index a feed.
    ///
    /// Only structural feed failures are errors.
    pub fn load(source: &FeedSource) -> Result<Self, FeedError> {
        let feed = load_feed(source)?;
        let diagnostics = validate_records(&feed.records, feed.layout);
        log_diagnostics(&diagnostics);
        let index = Self::from_records(feed.layout, feed.records, diagnostics);
        info!(
            records = index.records.len(),
            unique_ids = index.by_id.len(),
            diagnostics = index.diagnostics.len(),
            "indexed inventory"
        );
        Ok(index)
    }

    pub fn from_records(
        layout: FeedLayout,
        records: Vec<InventoryRecord>,
        diagnostics: Vec<String>,
    ) -> Self {
        let by_id = build_index(&records);
        Self {
            layout,
            records,
            diagnostics,
            by_id,
        }
    }

    /// Every record in feed order, including sold and invalid ones.
    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn layout(&self) -> FeedLayout {
        self.layout
    }

    /// Resolve a single item for the detail view.
    pub fn record(&self, id: &ItemId) -> Option<&InventoryRecord> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    /// Item ids in stable (sorted) order.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.by_id.keys()
    }
}

fn build_index(records: &[InventoryRecord]) -> BTreeMap<ItemId, usize> {
    let mut map = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        if record.id.is_empty() {
            continue;
        }
        if let Entry::Vacant(slot) = map.entry(record.id.clone()) {
            slot.insert(idx);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "id,title,category,price,size,fitsLike,condition,status,notes,images,createdAt,featured,audience";

    fn csv_feed(rows: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("tempfile");
        write!(file, "{HEADER}\n{rows}").expect("write feed");
        file
    }

    #[test]
    fn duplicate_ids_resolve_to_first_occurrence() {
        let file = csv_feed(
            "PTG-1,First,Tops,10,M,M,Good,available,Soft,a.jpg,2024-05-01,false,unisex\n\
             PTG-1,Second,Tops,12,M,M,Good,available,Soft,b.jpg,2024-05-02,false,unisex\n\
             PTG-2,Other,Bottoms,20,32,32,Fair,sold,Worn,c.jpg,2024-04-01,false,mens\n",
        );
        let index = InventoryIndex::load(&FeedSource::File(file.path().to_path_buf()))
            .expect("load index");

        assert_eq!(index.records().len(), 3);
        assert_eq!(index.layout(), FeedLayout::Current);
        assert_eq!(
            index.record(&ItemId::from("PTG-1")).map(|r| r.title.as_str()),
            Some("First")
        );
        assert!(index.record(&ItemId::from("PTG-404")).is_none());
        assert_eq!(index.ids().count(), 2);
        assert!(
            index
                .diagnostics()
                .iter()
                .any(|d| d == "Duplicate id: PTG-1 (2 occurrences)")
        );
    }

    #[test]
    fn structural_failure_is_an_error() {
        let file = csv_feed("PTG-1,\"unterminated\n");
        let err = InventoryIndex::load(&FeedSource::File(file.path().to_path_buf()))
            .expect_err("unterminated quote should fail");
        assert!(matches!(err, FeedError::UnterminatedQuote { line: 2 }));
    }
}
