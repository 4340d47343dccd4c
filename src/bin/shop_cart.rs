//! Manage the locally persisted shopping cart.
//!
//! The cart lives under `THRIFTFEED_CART_DIR` (default `.thriftfeed/`) as a
//! JSON array of item ids. Adding checks the id against the current feed so a
//! cart only ever holds items a shopper could have seen in the catalog.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thriftfeed::render::{UNAVAILABLE_MESSAGE, render_cart};
use thriftfeed::runtime::{Overrides, Settings, setup_tracing};
use thriftfeed::{CartState, FeedSource, FileCartStore, InventoryIndex, ItemId};

#[derive(Parser)]
#[command(name = "shop-cart", version, about = "Manage the thrift shop cart")]
struct Cli {
    /// Inventory feed (.csv or .json)
    #[arg(long, global = true)]
    feed: Option<PathBuf>,

    /// Directory holding the cart file
    #[arg(long, global = true)]
    cart_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add listed items by id
    Add {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Remove items by id
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show cart contents that are still in the feed
    List,

    /// Empty the cart
    Clear,

    /// Print a shareable link for the current cart
    Share {
        /// Page the link points at
        #[arg(long, default_value = "cart.html")]
        base: String,
    },

    /// Replace the cart with the items from a shared link's query string
    Seed { query: String },
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
        cart_dir: cli.cart_dir.clone(),
        ..Overrides::default()
    })?;
    let mut store = FileCartStore::new(&settings.cart_dir);
    let mut cart = CartState::load(&store);

    match cli.command {
        Commands::Add { ids } => {
            let index = load_index(&settings)?;
            for raw in ids {
                let id = ItemId::from(raw.trim());
                match index.record(&id) {
                    Some(record) if record.status.is_listed() => {}
                    Some(_) => bail!("item {id} is no longer available"),
                    None => bail!("no item with id '{id}'"),
                }
                if !cart.add(id.clone()) {
                    println!("{id} is already in the cart");
                }
            }
            save(&cart, &mut store)?;
            println!("{} item(s) in cart", cart.len());
        }
        Commands::Remove { ids } => {
            for raw in ids {
                let id = ItemId::from(raw.trim());
                if !cart.remove(&id) {
                    println!("{id} was not in the cart");
                }
            }
            save(&cart, &mut store)?;
            println!("{} item(s) in cart", cart.len());
        }
        Commands::List => {
            let index = load_index(&settings)?;
            print!("{}", render_cart(&cart.resolve(&index)));
        }
        Commands::Clear => {
            cart.clear();
            save(&cart, &mut store)?;
            println!("Cart cleared");
        }
        Commands::Share { base } => println!("{}", cart.share_url(&base)),
        Commands::Seed { query } => {
            let query = query.split_once('?').map(|(_, q)| q).unwrap_or(&query);
            match CartState::from_query(query) {
                Some(seeded) => {
                    save(&seeded, &mut store)?;
                    println!("{} item(s) in cart", seeded.len());
                }
                None => println!("no items in link; cart unchanged"),
            }
        }
    }
    Ok(())
}

fn load_index(settings: &Settings) -> Result<InventoryIndex> {
    InventoryIndex::load(&FeedSource::File(settings.feed_path.clone())).map_err(|err| {
        println!("{UNAVAILABLE_MESSAGE}");
        anyhow::Error::new(err).context(format!(
            "loading inventory feed {}",
            settings.feed_path.display()
        ))
    })
}

fn save(cart: &CartState, store: &mut FileCartStore) -> Result<()> {
    cart.save(store).context("saving cart")
}
