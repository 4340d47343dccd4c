//! Row-to-record normalization for the CSV feed.
//!
//! Every cell is trimmed first. Normalization never fails: values that do not
//! fit the model are carried through (`NaN` prices, `Other` enum variants,
//! unparsed timestamps) and surface later as soft diagnostics.

use super::FeedLayout;
use crate::catalog::{Audience, Category, Condition, InventoryRecord, ItemId, Status, Timestamp};

/// Build a record from a row whose width already matches `layout`.
pub fn record_from_row(layout: FeedLayout, values: &[String]) -> InventoryRecord {
    let cell = |idx: usize| values.get(idx).map(|value| value.trim()).unwrap_or("");

    InventoryRecord {
        id: ItemId(cell(0).to_string()),
        title: cell(1).to_string(),
        category: Category::normalize(cell(2)),
        price: parse_price(cell(3)),
        size: cell(4).to_string(),
        fits_like: cell(5).to_string(),
        condition: Condition::from(cell(6)),
        status: Status::from(cell(7).to_lowercase().as_str()),
        notes: cell(8).to_string(),
        images: split_images(cell(9)),
        created_at: Timestamp::parse(cell(10)),
        featured: parse_flag(cell(11)),
        audience: if layout.has_audience() {
            parse_audience(cell(12))
        } else {
            None
        },
    }
}

/// Decimal price; anything non-numeric (including blank) becomes `NaN`.
pub fn parse_price(value: &str) -> f64 {
    if value.is_empty() {
        return f64::NAN;
    }
    value.parse::<f64>().unwrap_or(f64::NAN)
}

pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// `|`-joined image references, order preserved, blanks dropped.
pub fn split_images(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_audience(value: &str) -> Option<Audience> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(Audience::from(value.to_lowercase().as_str()))
    }
}
