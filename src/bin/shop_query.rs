//! Query the storefront catalog from the command line.
//!
//! Each subcommand corresponds to one storefront view: the filterable catalog,
//! the home page arrivals strip, the sold archive, a single item's detail
//! panel, and the size facet options. If the feed cannot be loaded every view
//! prints the same unavailable message and the command exits non-zero.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thriftfeed::render::{self, CardStyle, UNAVAILABLE_MESSAGE};
use thriftfeed::runtime::{Overrides, Settings, setup_tracing};
use thriftfeed::{
    Audience, Category, Condition, FeedSource, FilterSpec, InventoryIndex, InventoryRecord, ItemId,
    LetterSize, SOLD_SECTION_LIMIT, SortKey, Timestamp, arrivals, facet_counts, letter_options,
    query_at, sold_archive, waist_options,
};

#[derive(Parser)]
#[command(name = "shop-query", version, about = "Browse the thrift shop catalog")]
struct Cli {
    /// Inventory feed (.csv or .json)
    #[arg(long, global = true)]
    feed: Option<PathBuf>,

    /// Supported facets, comma separated (audience, new, sizes, search-ids)
    #[arg(long, global = true)]
    facets: Option<String>,

    /// DM handle shown in the item view
    #[arg(long, global = true)]
    handle: Option<String>,

    /// Evaluate the new-arrival window at this instant instead of now
    #[arg(long, global = true)]
    now: Option<String>,

    /// Emit records as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter and sort the catalog (available and reserved items)
    Catalog {
        /// mens, womens or unisex
        #[arg(long)]
        audience: Option<String>,

        /// Tops, Bottoms or Outerwear
        #[arg(long)]
        category: Option<String>,

        /// New, Very Good, Good or Fair
        #[arg(long)]
        condition: Option<String>,

        /// Case-insensitive text search over title and notes, plus item ids
        /// while the search-ids facet is enabled (the default)
        #[arg(long, default_value = "")]
        search: String,

        /// Only items listed within the last seven days
        #[arg(long)]
        new_only: bool,

        /// Letter size to match (repeatable)
        #[arg(long = "size")]
        sizes: Vec<String>,

        /// Waist size to match (repeatable)
        #[arg(long = "waist")]
        waists: Vec<u32>,

        /// Newest, "Price Low→High" or "Price High→Low"
        #[arg(long, default_value = "Newest")]
        sort: String,
    },

    /// Newest listed items for the home page
    Arrivals,

    /// Sold archive, newest first
    Sold {
        /// Show the whole archive instead of the section preview
        #[arg(long)]
        all: bool,
    },

    /// Detail view for one item
    Item { id: String },

    /// Size options and facet counts across listed items
    Sizes,
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
        feed: cli.feed.clone(),
        handle: cli.handle.clone(),
        facets: cli.facets.clone(),
        ..Overrides::default()
    })?;
    let now = match cli.now.as_deref() {
        Some(raw) => Timestamp::parse(raw)
            .instant()
            .ok_or_else(|| anyhow!("--now must be an ISO 8601 timestamp, got '{raw}'"))?,
        None => Utc::now(),
    };

    let index = match InventoryIndex::load(&FeedSource::File(settings.feed_path.clone())) {
        Ok(index) => index,
        Err(err) => {
            println!("{UNAVAILABLE_MESSAGE}");
            return Err(err).with_context(|| {
                format!("loading inventory feed {}", settings.feed_path.display())
            });
        }
    };
    let records = index.records();

    match cli.command {
        Commands::Catalog {
            audience,
            category,
            condition,
            search,
            new_only,
            sizes,
            waists,
            sort,
        } => {
            let filter = FilterSpec {
                audience: audience.as_deref().map(parse_audience).transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                condition: condition.as_deref().map(parse_condition).transpose()?,
                search,
                search_ids: false,
                new_only,
                letter_sizes: sizes
                    .iter()
                    .map(String::as_str)
                    .map(parse_letter_size)
                    .collect::<Result<BTreeSet<_>>>()?,
                waist_sizes: waists.into_iter().collect(),
            }
            .restricted_to(&settings.facets);
            let matched = query_at(records, &filter, SortKey::from_label(&sort), now);
            print_cards(&matched, CardStyle::Listing, now, cli.json)
        }
        Commands::Arrivals => print_cards(&arrivals(records), CardStyle::Listing, now, cli.json),
        Commands::Sold { all } => {
            let limit = if all { None } else { Some(SOLD_SECTION_LIMIT) };
            print_cards(&sold_archive(records, limit), CardStyle::Sold, now, cli.json)
        }
        Commands::Item { id } => {
            let record = index
                .record(&ItemId::from(id.trim()))
                .ok_or_else(|| anyhow!("no item with id '{}'", id.trim()))?;
            if cli.json {
                print_json(record)
            } else {
                print!("{}", render::render_detail(record, &settings.handle));
                Ok(())
            }
        }
        Commands::Sizes => {
            let letters = letter_options(records);
            let waists = waist_options(records);
            if cli.json {
                print_json(&json!({
                    "letters": letters,
                    "waists": waists,
                    "counts": facet_counts(records),
                }))
            } else {
                let letters: Vec<&str> = letters.iter().map(LetterSize::as_str).collect();
                let waists: Vec<String> = waists.iter().map(u32::to_string).collect();
                println!("letters: {}", letters.join(" "));
                println!("waists: {}", waists.join(" "));
                Ok(())
            }
        }
    }
}

fn print_cards(
    records: &[&InventoryRecord],
    style: CardStyle,
    now: DateTime<Utc>,
    as_json: bool,
) -> Result<()> {
    if as_json {
        return print_json(&records);
    }
    print!("{}", render::render_cards(records, style, now));
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_audience(raw: &str) -> Result<Audience> {
    let audience = Audience::from(raw.trim().to_lowercase().as_str());
    if !audience.is_known() {
        bail!("Unknown audience '{raw}'. Valid values: mens, womens, unisex");
    }
    Ok(audience)
}

fn parse_category(raw: &str) -> Result<Category> {
    let category = Category::normalize(raw);
    if !category.is_known() {
        bail!("Unknown category '{raw}'. Valid values: Tops, Bottoms, Outerwear");
    }
    Ok(category)
}

fn parse_condition(raw: &str) -> Result<Condition> {
    Condition::KNOWN
        .iter()
        .find(|known| known.as_str().eq_ignore_ascii_case(raw.trim()))
        .cloned()
        .ok_or_else(|| {
            anyhow!("Unknown condition '{raw}'. Valid values: New, Very Good, Good, Fair")
        })
}

fn parse_letter_size(raw: &str) -> Result<LetterSize> {
    LetterSize::from_token(&raw.trim().to_uppercase())
        .ok_or_else(|| {
            anyhow!("Unknown letter size '{raw}'. Valid values: XS, S, M, L, XL, XXL, XXXL")
        })
}
