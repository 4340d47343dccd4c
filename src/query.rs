//! Catalog query engine.
//!
//! A query is a pure function of the loaded records, one immutable
//! [`FilterSpec`], one [`SortKey`] and the instant used for the new-arrival
//! window. Facets AND together; the letter and waist size facets are the one
//! exception and OR with each other. Storefront variants that lack a facet
//! pass their [`FacetSupport`] through [`FilterSpec::restricted_to`] instead of
//! carrying their own filter code.

use crate::catalog::{Audience, Category, Condition, InventoryRecord};
use crate::sizes::LetterSize;
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Home page "new arrivals" strip length.
pub const ARRIVALS_LIMIT: usize = 8;
/// Sold archive length on pages that show it alongside other sections.
pub const SOLD_SECTION_LIMIT: usize = 6;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
/// Current selection across every facet. `None` and empty sets mean "all".
pub struct FilterSpec {
    pub audience: Option<Audience>,
    pub category: Option<Category>,
    pub condition: Option<Condition>,
    pub search: String,
    pub search_ids: bool,
    pub new_only: bool,
    pub letter_sizes: BTreeSet<LetterSize>,
    pub waist_sizes: BTreeSet<u32>,
}

impl FilterSpec {
    /// Drop every facet the storefront variant does not offer.
    pub fn restricted_to(&self, support: &FacetSupport) -> FilterSpec {
        let mut restricted = self.clone();
        if !support.audience {
            restricted.audience = None;
        }
        if !support.new_arrivals {
            restricted.new_only = false;
        }
        if !support.sizes {
            restricted.letter_sizes.clear();
            restricted.waist_sizes.clear();
        }
        restricted.search_ids = support.search_ids;
        restricted
    }

    /// Facet checks only; catalog eligibility is applied by [`query_at`].
    pub fn matches(&self, record: &InventoryRecord, now: DateTime<Utc>) -> bool {
        if let Some(audience) = &self.audience {
            if record.audience.as_ref() != Some(audience) {
                return false;
            }
        }
        if self
            .category
            .as_ref()
            .is_some_and(|category| &record.category != category)
        {
            return false;
        }
        if self
            .condition
            .as_ref()
            .is_some_and(|condition| &record.condition != condition)
        {
            return false;
        }
        if self.new_only && !record.is_new_arrival(now) {
            return false;
        }
        if !(self.letter_sizes.is_empty() && self.waist_sizes.is_empty())
            && !record
                .size_tokens()
                .matches_any(&self.letter_sizes, &self.waist_sizes)
        {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || record.search_text(self.search_ids).contains(&needle)
    }
}

/// Facets a storefront variant exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FacetSupport {
    pub audience: bool,
    pub new_arrivals: bool,
    pub sizes: bool,
    pub search_ids: bool,
}

impl Default for FacetSupport {
    fn default() -> Self {
        Self {
            audience: true,
            new_arrivals: true,
            sizes: true,
            search_ids: true,
        }
    }
}

impl FacetSupport {
    pub const NAMES: [&'static str; 4] = ["audience", "new", "sizes", "search-ids"];

    pub fn none() -> Self {
        Self {
            audience: false,
            new_arrivals: false,
            sizes: false,
            search_ids: false,
        }
    }

    /// Build from facet names (`audience`, `new`, `sizes`, `search-ids`).
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut support = Self::none();
        for name in names {
            match name.as_ref().trim().to_ascii_lowercase().as_str() {
                "audience" => support.audience = true,
                "new" | "new-arrivals" => support.new_arrivals = true,
                "sizes" => support.sizes = true,
                "search-ids" => support.search_ids = true,
                "" => {}
                other => bail!(
                    "unknown facet '{other}'; expected one of {}",
                    Self::NAMES.join(", ")
                ),
            }
        }
        Ok(support)
    }
}

/// Result ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SortKey {
    #[default]
    Newest,
    PriceLowHigh,
    PriceHighLow,
}

impl SortKey {
    /// Accepts the storefront labels plus ASCII spellings. Anything else sorts
    /// newest first.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "newest" => SortKey::Newest,
            "price low→high" | "price low->high" | "price-asc" | "low-high" => {
                SortKey::PriceLowHigh
            }
            "price high→low" | "price high->low" | "price-desc" | "high-low" => {
                SortKey::PriceHighLow
            }
            other => {
                debug!(label = other, "unknown sort label; using newest");
                SortKey::Newest
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Newest => "Newest",
            SortKey::PriceLowHigh => "Price Low→High",
            SortKey::PriceHighLow => "Price High→Low",
        }
    }

    fn compare(&self, a: &InventoryRecord, b: &InventoryRecord) -> Ordering {
        match self {
            SortKey::Newest => newest_first(a, b),
            SortKey::PriceLowHigh => price_order(a.price, b.price, false),
            SortKey::PriceHighLow => price_order(a.price, b.price, true),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn newest_first(a: &InventoryRecord, b: &InventoryRecord) -> Ordering {
    match (a.created_at.instant(), b.created_at.instant()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// NaN sorts after every number whichever way the prices run.
fn price_order(first: f64, second: f64, descending: bool) -> Ordering {
    match (first.is_nan(), second.is_nan()) {
        (false, false) => {
            let order = first.partial_cmp(&second).unwrap_or(Ordering::Equal);
            if descending { order.reverse() } else { order }
        }
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Stable sort of `records` by `sort`; ties keep their input order.
pub fn sort_records(records: &mut [&InventoryRecord], sort: SortKey) {
    records.sort_by(|a, b| sort.compare(a, b));
}

/// Catalog view at the current time.
pub fn query<'a>(
    records: &'a [InventoryRecord],
    filter: &FilterSpec,
    sort: SortKey,
) -> Vec<&'a InventoryRecord> {
    query_at(records, filter, sort, Utc::now())
}

/// Catalog view with an explicit clock.
///
/// Only available and reserved records are eligible; sold items are reachable
/// through [`sold_archive`] alone.
pub fn query_at<'a>(
    records: &'a [InventoryRecord],
    filter: &FilterSpec,
    sort: SortKey,
    now: DateTime<Utc>,
) -> Vec<&'a InventoryRecord> {
    let mut matched: Vec<&InventoryRecord> = records
        .iter()
        .filter(|record| record.status.is_listed() && filter.matches(record, now))
        .collect();
    sort_records(&mut matched, sort);
    debug!(
        ?filter,
        sort = sort.label(),
        total = records.len(),
        matched = matched.len(),
        "catalog query"
    );
    matched
}

/// Newest listed items for the home page strip.
pub fn arrivals(records: &[InventoryRecord]) -> Vec<&InventoryRecord> {
    let mut listed: Vec<&InventoryRecord> = records
        .iter()
        .filter(|record| record.status.is_listed())
        .collect();
    sort_records(&mut listed, SortKey::Newest);
    listed.truncate(ARRIVALS_LIMIT);
    listed
}

/// Sold items, newest first. `limit` caps the list for multi-section pages;
/// `None` returns the full archive.
pub fn sold_archive(records: &[InventoryRecord], limit: Option<usize>) -> Vec<&InventoryRecord> {
    let mut sold: Vec<&InventoryRecord> = records
        .iter()
        .filter(|record| record.status.is_sold())
        .collect();
    sort_records(&mut sold, SortKey::Newest);
    if let Some(limit) = limit {
        sold.truncate(limit);
    }
    sold
}
