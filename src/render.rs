//! Plain-text rendering of product cards, the item detail view and the cart.
//!
//! Output is what the CLIs print; the wording matches the storefront so the
//! same strings can be checked in tests.

use crate::catalog::{Audience, InventoryRecord};
use chrono::{DateTime, Utc};

/// Shown wherever a view has no records.
pub const EMPTY_MESSAGE: &str = "Nothing here right now — check back soon.";
/// Shown in every view when the feed failed to load.
pub const UNAVAILABLE_MESSAGE: &str = "Unable to load inventory right now.";
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";
/// Stand-in for listings without photos.
pub const PLACEHOLDER_IMAGE: &str = "assets/items/placeholder.jpg";

/// Which grid a card is rendered into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardStyle {
    Listing,
    Sold,
}

/// Whole-dollar price (`$45`); half-dollars round away from zero.
pub fn format_price(price: f64) -> String {
    if price.is_finite() {
        format!("${}", price.round() as i64)
    } else {
        "Price TBD".to_string()
    }
}

/// Size and fit line. Womens items get an explicit label in views that mix
/// audiences without the audience tabs.
pub fn size_line(record: &InventoryRecord, womens_label: bool) -> String {
    if womens_label && record.audience == Some(Audience::Womens) {
        format!(
            "Women's size {} • Fits like {}",
            record.size, record.fits_like
        )
    } else {
        format!("Size {} • Fits like {}", record.size, record.fits_like)
    }
}

pub fn audience_label(audience: Option<&Audience>) -> &'static str {
    match audience {
        Some(Audience::Mens) => "Men's",
        Some(Audience::Womens) => "Women's",
        _ => "Unisex",
    }
}

pub fn status_badge(record: &InventoryRecord) -> String {
    format!("[{}]", record.status.as_str().to_uppercase())
}

pub fn image_or_placeholder(src: Option<&str>) -> &str {
    src.filter(|src| !src.trim().is_empty())
        .unwrap_or(PLACEHOLDER_IMAGE)
}

/// One product card.
pub fn render_card(record: &InventoryRecord, style: CardStyle, now: DateTime<Utc>) -> String {
    let mut lines = Vec::new();
    if record.is_new_arrival(now) {
        lines.push("New Arrival".to_string());
    }
    lines.push(record.title.clone());
    lines.push(format!(
        "{} {}",
        format_price(record.price),
        status_badge(record)
    ));
    lines.push(size_line(record, style == CardStyle::Sold));
    lines.push(format!(
        "{} • {}",
        record.condition,
        audience_label(record.audience.as_ref())
    ));
    lines.push(record.id.to_string());
    lines.push(format!(
        "image: {}",
        image_or_placeholder(record.primary_image())
    ));
    if style == CardStyle::Listing {
        lines.push(format!("add to cart: shop-cart add {}", record.id));
    }
    join_lines(lines)
}

/// Cards separated by blank lines, or the empty-state message.
pub fn render_cards(records: &[&InventoryRecord], style: CardStyle, now: DateTime<Utc>) -> String {
    if records.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }
    records
        .iter()
        .map(|record| render_card(record, style, now))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-item view with the reservation call to action.
pub fn render_detail(record: &InventoryRecord, handle: &str) -> String {
    let gallery = Gallery::for_record(record);
    let mut lines = vec![
        record.title.clone(),
        format!("Item ID: {}", record.id),
        format!(
            "{} • {}",
            format_price(record.price),
            size_line(record, true)
        ),
        format!(
            "{} Condition: {}",
            status_badge(record),
            record.condition
        ),
    ];
    if record.notes.trim().is_empty() {
        lines.push("No additional notes.".to_string());
    } else {
        lines.push(record.notes.clone());
    }
    lines.push(format!("Listed {}", format_listed(record)));
    lines.extend(
        gallery
            .images()
            .iter()
            .enumerate()
            .map(|(idx, image)| format!("photo {}/{}: {image}", idx + 1, gallery.len())),
    );
    lines.push(format!(
        "DM {handle} with Item ID {} to reserve.",
        record.id
    ));
    join_lines(lines)
}

/// Cart rows in cart order, or the empty-cart message.
pub fn render_cart(records: &[&InventoryRecord]) -> String {
    if records.is_empty() {
        return format!("{EMPTY_CART_MESSAGE}\n");
    }
    join_lines(records.iter().map(|record| {
        format!(
            "{}: {} • {} • {}",
            record.title,
            format_price(record.price),
            size_line(record, true),
            record.id
        )
    }))
}

/// Newline-terminated lines.
fn join_lines(lines: impl IntoIterator<Item = String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

fn format_listed(record: &InventoryRecord) -> String {
    match record.created_at.instant() {
        Some(instant) => instant.format("%b %-d, %Y").to_string(),
        None => record.created_at.raw().to_string(),
    }
}

/// Photo carousel state for the detail view.
///
/// Always holds at least one image (the placeholder when the listing has
/// none). Selection wraps in both directions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gallery {
    images: Vec<String>,
    index: usize,
}

impl Gallery {
    pub fn new(images: &[String]) -> Self {
        let mut images: Vec<String> = images
            .iter()
            .filter(|src| !src.trim().is_empty())
            .cloned()
            .collect();
        if images.is_empty() {
            images.push(PLACEHOLDER_IMAGE.to_string());
        }
        Self { images, index: 0 }
    }

    pub fn for_record(record: &InventoryRecord) -> Self {
        Self::new(&record.images)
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &str {
        &self.images[self.index]
    }

    /// Jump to `index`, wrapping out-of-range values (including negatives).
    pub fn select(&mut self, index: isize) {
        let len = self.images.len() as isize;
        self.index = index.rem_euclid(len) as usize;
    }

    /// Move by `delta` photos; ignored when there is only one.
    pub fn step(&mut self, delta: isize) {
        if self.images.len() < 2 {
            return;
        }
        self.select(self.index as isize + delta);
    }
}
