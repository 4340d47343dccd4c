//! Typed representation of one inventory feed row.
//!
//! CSV rows are normalized into these structs by `feed`; the JSON feed
//! deserializes into them directly using the same camelCase field names. Enum
//! fields keep unrecognized values (`Other`) so validation can report them
//! while the record still renders.

use crate::catalog::identity::{Audience, Category, Condition, ItemId, Status};
use crate::sizes::{SizeTokens, extract_size_tokens};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Window during which a listed item counts as a new arrival.
pub const NEW_ARRIVAL_DAYS: f64 = 7.0;

const SECONDS_PER_DAY: f64 = 60.0 * 60.0 * 24.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One catalog entry.
pub struct InventoryRecord {
    #[serde(default)]
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default = "blank_category")]
    pub category: Category,
    #[serde(default = "missing_price", deserialize_with = "price_or_nan")]
    pub price: f64,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub fits_like: String,
    #[serde(default = "blank_condition")]
    pub condition: Condition,
    #[serde(default = "blank_status")]
    pub status: Status,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
}

impl InventoryRecord {
    /// First image reference, if the listing has any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Fractional days between `created_at` and `now`.
    pub fn age_days(&self, now: DateTime<Utc>) -> Option<f64> {
        let created = self.created_at.instant()?;
        let millis = (now - created).num_milliseconds() as f64;
        Some(millis / 1000.0 / SECONDS_PER_DAY)
    }

    /// Non-sold items listed within the last seven days.
    ///
    /// The window moves with `now`; an unparseable timestamp is never new.
    pub fn is_new_arrival(&self, now: DateTime<Utc>) -> bool {
        if self.status.is_sold() {
            return false;
        }
        self.age_days(now)
            .map(|age| age <= NEW_ARRIVAL_DAYS)
            .unwrap_or(false)
    }

    /// Size tokens drawn from both `size` and `fitsLike`.
    pub fn size_tokens(&self) -> SizeTokens {
        let mut tokens = extract_size_tokens(&self.size);
        tokens.merge(extract_size_tokens(&self.fits_like));
        tokens
    }

    /// Lower-cased text matched by free-text search.
    pub fn search_text(&self, include_id: bool) -> String {
        let text = if include_id {
            format!("{} {} {}", self.title, self.notes, self.id)
        } else {
            format!("{} {}", self.title, self.notes)
        };
        text.to_lowercase()
    }
}

/// Listing timestamp as written in the feed plus its parsed instant.
///
/// The raw text is kept so records serialize back exactly as received even
/// when the value could not be parsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    parsed: Option<DateTime<Utc>>,
}

impl Timestamp {
    /// Accepts RFC 3339, `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]` (read as UTC) and
    /// bare `YYYY-MM-DD` dates (midnight UTC).
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        Self {
            raw: raw.to_string(),
            parsed: parse_instant(raw),
        }
    }

    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            raw: instant.to_rfc3339(),
            parsed: Some(instant),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.parsed
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Timestamp::parse(&value))
    }
}

fn blank_category() -> Category {
    Category::Other(String::new())
}

fn blank_condition() -> Condition {
    Condition::Other(String::new())
}

fn blank_status() -> Status {
    Status::Other(String::new())
}

fn missing_price() -> f64 {
    f64::NAN
}

// JSON has no NaN; a null price is how a non-numeric value comes back out.
fn price_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
