//! Load an inventory feed and report what the storefront would see.
//!
//! Structural failures (bad header, ragged rows, unterminated quotes, JSON of
//! the wrong shape) exit non-zero with the parser's message. Soft validation
//! diagnostics are printed one per line; with `--strict` any diagnostic also
//! fails the run so the check can gate a feed publish.

use anyhow::{Result, bail};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use thriftfeed::runtime::{Overrides, Settings, setup_tracing};
use thriftfeed::{FeedSource, InventoryIndex, Status};

#[derive(Parser)]
#[command(name = "feed-check", version, about = "Validate a thrift shop inventory feed")]
struct Cli {
    /// Feed to check (.csv or .json); defaults to THRIFTFEED_FEED or data/items.csv
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,

    /// Treat any soft diagnostic as a failure
    #[arg(long)]
    strict: bool,
}

fn main() {
    setup_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(&Overrides {
        feed: cli.feed,
        ..Overrides::default()
    })?;
    let path = settings.feed_path;
    let index = InventoryIndex::load(&FeedSource::File(path.clone()))?;

    let records = index.records();
    let count = |status: Status| records.iter().filter(|r| r.status == status).count();
    let (available, reserved, sold) = (
        count(Status::Available),
        count(Status::Reserved),
        count(Status::Sold),
    );

    if cli.json {
        let summary = json!({
            "feed": path.display().to_string(),
            "layout": format!("{:?}", index.layout()).to_lowercase(),
            "records": records.len(),
            "available": available,
            "reserved": reserved,
            "sold": sold,
            "diagnostics": index.diagnostics(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{}: {} records ({available} available, {reserved} reserved, {sold} sold)",
            path.display(),
            records.len()
        );
        if index.diagnostics().is_empty() {
            println!("no diagnostics");
        }
        for diagnostic in index.diagnostics() {
            println!("warning: {diagnostic}");
        }
    }

    if cli.strict && !index.diagnostics().is_empty() {
        bail!(
            "{} diagnostic(s) reported for {}",
            index.diagnostics().len(),
            path.display()
        );
    }
    Ok(())
}
