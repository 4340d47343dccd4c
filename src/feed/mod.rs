//! Inventory feed ingestion.
//!
//! Turns raw feed text (CSV, or the JSON variant) into typed records. Any
//! structural problem (wrong header, ragged row, unterminated quote, JSON of
//! the wrong shape) fails the whole feed with a [`FeedError`]; there is no
//! partial result. Data-entry problems inside well-formed rows are left for
//! [`crate::validation`] to report.

pub mod normalize;
pub mod schema;
pub mod tokenizer;

use crate::catalog::InventoryRecord;
use crate::validation::{log_diagnostics, validate_records};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Column order of the current feed export.
pub static CURRENT_COLUMNS: [&str; 13] = [
    "id",
    "title",
    "category",
    "price",
    "size",
    "fitsLike",
    "condition",
    "status",
    "notes",
    "images",
    "createdAt",
    "featured",
    "audience",
];

/// Structural failures that reject a feed outright.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("CSV format error: file is empty.")]
    Empty,
    #[error("CSV format error: header must be exactly {expected}")]
    HeaderMismatch { expected: String },
    #[error("CSV format error: row {row} has {found} columns; expected {expected}.")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("CSV format error: unmatched quote opened on line {line}.")]
    UnterminatedQuote { line: usize },
    #[error("JSON feed could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON feed failed schema validation:\n{0}")]
    Schema(String),
    #[error("unable to read feed {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which header a feed uses.
///
/// Older exports lack the trailing `audience` column; both are accepted and
/// audience checks only apply where the column exists.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FeedLayout {
    Current,
    Legacy,
}

impl FeedLayout {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            FeedLayout::Current => &CURRENT_COLUMNS,
            FeedLayout::Legacy => &CURRENT_COLUMNS[..12],
        }
    }

    pub fn has_audience(&self) -> bool {
        matches!(self, FeedLayout::Current)
    }

    /// Exact match on count, names and order after trimming each cell.
    fn from_header(header: &[String]) -> Option<Self> {
        [FeedLayout::Current, FeedLayout::Legacy]
            .into_iter()
            .find(|layout| {
                let expected = layout.columns();
                expected.len() == header.len()
                    && expected
                        .iter()
                        .zip(header)
                        .all(|(name, cell)| *name == cell.trim())
            })
    }
}

/// Input feed encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FeedFormat {
    Csv,
    Json,
}

impl FeedFormat {
    /// `.json` files are JSON; everything else is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FeedFormat::Json,
            _ => FeedFormat::Csv,
        }
    }
}

/// Where a feed comes from.
#[derive(Clone, Debug)]
pub enum FeedSource {
    File(PathBuf),
    Csv(String),
    Json(String),
}

#[derive(Clone, Debug)]
/// Records from a structurally valid feed plus the layout they were read with.
pub struct ParsedFeed {
    pub layout: FeedLayout,
    pub records: Vec<InventoryRecord>,
}

/// Parse CSV feed text.
///
/// The header must match one of the known layouts exactly and every data row
/// must be as wide as the header. Row numbers in errors count the header as
/// row 1 and skip dropped blank rows.
pub fn parse_csv_feed(text: &str) -> Result<ParsedFeed, FeedError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rows = tokenizer::tokenize(text)?;
    let Some((header, data)) = rows.split_first() else {
        return Err(FeedError::Empty);
    };

    let layout = FeedLayout::from_header(header).ok_or_else(|| FeedError::HeaderMismatch {
        expected: CURRENT_COLUMNS.join(","),
    })?;
    let expected = layout.columns().len();

    let mut records = Vec::with_capacity(data.len());
    for (idx, values) in data.iter().enumerate() {
        if values.len() != expected {
            return Err(FeedError::RowWidth {
                row: idx + 2,
                found: values.len(),
                expected,
            });
        }
        records.push(normalize::record_from_row(layout, values));
    }

    debug!(rows = records.len(), ?layout, "parsed csv feed");
    Ok(ParsedFeed { layout, records })
}

/// Parse the JSON variant: an array of already-coerced record objects.
pub fn parse_json_feed(text: &str) -> Result<ParsedFeed, FeedError> {
    let document: Value = serde_json::from_str(text)?;
    schema::validate_json_feed(&document)?;

    let mut records: Vec<InventoryRecord> = serde_json::from_value(document)?;
    for record in &mut records {
        if record
            .audience
            .as_ref()
            .is_some_and(|audience| audience.as_str().trim().is_empty())
        {
            record.audience = None;
        }
    }
    let layout = if records.iter().any(|record| record.audience.is_some()) {
        FeedLayout::Current
    } else {
        FeedLayout::Legacy
    };

    debug!(rows = records.len(), ?layout, "parsed json feed");
    Ok(ParsedFeed { layout, records })
}

/// Read and parse a feed from `source` without soft validation.
pub fn load_feed(source: &FeedSource) -> Result<ParsedFeed, FeedError> {
    match source {
        FeedSource::Csv(text) => parse_csv_feed(text),
        FeedSource::Json(text) => parse_json_feed(text),
        FeedSource::File(path) => {
            let text = fs::read_to_string(path).map_err(|source| FeedError::Io {
                path: path.clone(),
                source,
            })?;
            match FeedFormat::from_path(path) {
                FeedFormat::Csv => parse_csv_feed(&text),
                FeedFormat::Json => parse_json_feed(&text),
            }
        }
    }
}

/// Load a feed and run soft validation over it.
///
/// Only structural failures are errors; diagnostics come back alongside the
/// records (and are logged) and never remove a record.
pub fn load_and_parse(
    source: &FeedSource,
) -> Result<(Vec<InventoryRecord>, Vec<String>), FeedError> {
    let feed = load_feed(source)?;
    let diagnostics = validate_records(&feed.records, feed.layout);
    log_diagnostics(&diagnostics);
    info!(
        records = feed.records.len(),
        diagnostics = diagnostics.len(),
        "loaded inventory feed"
    );
    Ok((feed.records, diagnostics))
}
