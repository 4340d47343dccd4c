//! Option lists and counts for the filter widgets.
//!
//! Options come from catalog-eligible records only (sold items never show in
//! the catalog, so their sizes would be dead chips) and use the same size
//! extractors as the query engine.

use crate::catalog::InventoryRecord;
use crate::sizes::LetterSize;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Every waist size present across listed records, ascending.
pub fn waist_options(records: &[InventoryRecord]) -> Vec<u32> {
    listed(records)
        .flat_map(|record| record.size_tokens().waists)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every letter size present across listed records, smallest first.
pub fn letter_options(records: &[InventoryRecord]) -> Vec<LetterSize> {
    listed(records)
        .flat_map(|record| record.size_tokens().letters)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Default, Serialize)]
/// Number of listed records carrying each facet value.
pub struct FacetCounts {
    pub audience: BTreeMap<String, usize>,
    pub category: BTreeMap<String, usize>,
    pub condition: BTreeMap<String, usize>,
    pub letters: BTreeMap<LetterSize, usize>,
    pub waists: BTreeMap<u32, usize>,
}

/// Count listed records per facet value.
///
/// Unrecognized enum values are counted under their raw text so they are
/// visible next to the validation warnings. A record with both size fields
/// naming the same token counts once.
pub fn facet_counts(records: &[InventoryRecord]) -> FacetCounts {
    let mut counts = FacetCounts::default();
    for record in listed(records) {
        if let Some(audience) = &record.audience {
            *counts.audience.entry(audience.to_string()).or_default() += 1;
        }
        *counts
            .category
            .entry(record.category.to_string())
            .or_default() += 1;
        *counts
            .condition
            .entry(record.condition.to_string())
            .or_default() += 1;

        let tokens = record.size_tokens();
        for letter in tokens.letters {
            *counts.letters.entry(letter).or_default() += 1;
        }
        for waist in tokens.waists {
            *counts.waists.entry(waist).or_default() += 1;
        }
    }
    counts
}

fn listed(records: &[InventoryRecord]) -> impl Iterator<Item = &InventoryRecord> {
    records.iter().filter(|record| record.status.is_listed())
}
