//! Storefront core for a small thrifted-goods shop.
//!
//! The crate turns the shop's inventory feed (a spreadsheet CSV export, or the
//! equivalent JSON) into typed records and answers catalog questions over them.
//! The pipeline is:
//!
//! 1. [`feed`] tokenizes and normalizes the feed, failing the whole load on
//!    structural problems;
//! 2. [`validation`] reports data-entry problems without dropping records;
//! 3. [`query`] filters and sorts the catalog, and builds the arrivals and
//!    sold views;
//! 4. [`render`] and [`cart`] back the helper binaries under `src/bin/`.
//!
//! Nothing here talks to a server. The feed is read once; every view is a pure
//! function of the loaded records.

pub mod cart;
pub mod catalog;
pub mod facets;
pub mod feed;
pub mod query;
pub mod render;
pub mod runtime;
pub mod sizes;
pub mod validation;

pub use cart::{CartState, CartStore, FileCartStore, MemoryCartStore};
pub use catalog::{
    Audience, Category, Condition, InventoryIndex, InventoryRecord, ItemId, Status, Timestamp,
};
pub use facets::{FacetCounts, facet_counts, letter_options, waist_options};
pub use feed::{
    FeedError, FeedFormat, FeedLayout, FeedSource, ParsedFeed, load_and_parse, load_feed,
    parse_csv_feed, parse_json_feed,
};
pub use query::{
    ARRIVALS_LIMIT, FacetSupport, FilterSpec, SOLD_SECTION_LIMIT, SortKey, arrivals, query,
    query_at, sold_archive,
};
pub use runtime::{Settings, setup_tracing, split_list};
pub use sizes::{LetterSize, SizeTokens, extract_size_tokens};
pub use validation::validate_records;
