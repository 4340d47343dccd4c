//! Runtime configuration shared across binaries.
//!
//! Every CLI resolves its settings the same way: explicit flags win, then
//! `THRIFTFEED_*` environment variables, then built-in defaults. The feed
//! path additionally falls back to the build-time root hint so binaries run
//! from outside the checkout still find the bundled sample feed.

use crate::query::FacetSupport;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const FEED_ENV: &str = "THRIFTFEED_FEED";
pub const CART_DIR_ENV: &str = "THRIFTFEED_CART_DIR";
pub const HANDLE_ENV: &str = "THRIFTFEED_HANDLE";
pub const FACETS_ENV: &str = "THRIFTFEED_FACETS";

pub const DEFAULT_FEED: &str = "data/items.csv";
pub const DEFAULT_CART_DIR: &str = ".thriftfeed";
pub const DEFAULT_HANDLE: &str = "@perlethriftedgoods";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Values given on the command line; `None` defers to env and defaults.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub feed: Option<PathBuf>,
    pub cart_dir: Option<PathBuf>,
    pub handle: Option<String>,
    pub facets: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub feed_path: PathBuf,
    pub cart_dir: PathBuf,
    pub handle: String,
    pub facets: FacetSupport,
}

impl Settings {
    /// Resolve against the process environment.
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| env::var(key).ok())
    }

    /// Resolve with an explicit variable lookup.
    pub fn resolve_with<F>(overrides: &Overrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let feed_path = match overrides.feed.clone() {
            Some(path) => path,
            None => match var(FEED_ENV) {
                Some(path) => PathBuf::from(path),
                None => default_feed_path(),
            },
        };
        let cart_dir = overrides
            .cart_dir
            .clone()
            .or_else(|| var(CART_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CART_DIR));
        let handle = overrides
            .handle
            .clone()
            .or_else(|| var(HANDLE_ENV))
            .unwrap_or_else(|| DEFAULT_HANDLE.to_string());

        let facets = match overrides.facets.clone().or_else(|| var(FACETS_ENV)) {
            Some(list) => FacetSupport::from_names(split_list(&list))
                .with_context(|| format!("parsing facet list '{list}'"))?,
            None => FacetSupport::default(),
        };

        let settings = Self {
            feed_path,
            cart_dir,
            handle,
            facets,
        };
        debug!(?settings, "resolved settings");
        Ok(settings)
    }
}

/// `data/items.csv` under the working directory, else under the checkout the
/// binary was built from. Returns the relative path when neither exists so the
/// load error names what was looked for.
fn default_feed_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_FEED);
    if local.is_file() {
        return local;
    }
    if let Some(candidate) = option_env!("THRIFTFEED_ROOT_HINT")
        .filter(|hint| !hint.is_empty())
        .map(|hint| Path::new(hint).join(DEFAULT_FEED))
    {
        if candidate.is_file() {
            return candidate;
        }
    }
    local
}

/// Split comma- or whitespace-delimited configuration lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Install the stderr subscriber used by every binary.
///
/// `RUST_LOG` selects levels; without it only warnings (soft validation
/// diagnostics among them) are shown. Calling twice is harmless.
pub fn setup_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
