// Integration suite: drives the public library API against the bundled sample
// feeds, then the three binaries end to end.
mod support;

use std::collections::BTreeSet;
use support::{
    FIXED_NOW, HEADER, fixed_now, positions, run_bin, sample_csv, sample_json, stderr, stdout,
    write_file,
};
use tempfile::TempDir;
use thriftfeed::render::{EMPTY_MESSAGE, UNAVAILABLE_MESSAGE};
use thriftfeed::{
    Audience, CartState, Category, FacetSupport, FeedError, FeedLayout, FeedSource, FilterSpec,
    InventoryIndex, InventoryRecord, ItemId, LetterSize, MemoryCartStore, SortKey, arrivals,
    extract_size_tokens, letter_options, load_and_parse, query_at, sold_archive, waist_options,
};

const FEED_CHECK: &str = env!("CARGO_BIN_EXE_feed-check");
const SHOP_QUERY: &str = env!("CARGO_BIN_EXE_shop-query");
const SHOP_CART: &str = env!("CARGO_BIN_EXE_shop-cart");

fn sample_index() -> InventoryIndex {
    InventoryIndex::load(&FeedSource::File(sample_csv())).expect("sample feed loads")
}

fn ids(records: &[&InventoryRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.to_string()).collect()
}

#[test]
fn sample_feed_is_clean() {
    let index = sample_index();
    assert_eq!(index.layout(), FeedLayout::Current);
    assert_eq!(index.records().len(), 10);
    assert!(index.diagnostics().is_empty(), "{:?}", index.diagnostics());

    let tee = index.record(&ItemId::from("PTG-004")).expect("PTG-004");
    assert_eq!(tee.category, Category::Tops);
    assert_eq!(tee.notes, "Faded print, \"Tour '94\" on back.\nBoxy fit.");
}

#[test]
fn default_catalog_view_is_listed_items_newest_first() {
    let index = sample_index();
    let result = query_at(
        index.records(),
        &FilterSpec::default(),
        SortKey::Newest,
        fixed_now(),
    );
    assert_eq!(
        ids(&result),
        vec![
            "PTG-009", "PTG-003", "PTG-001", "PTG-006", "PTG-002", "PTG-007", "PTG-004", "PTG-010"
        ]
    );
}

#[test]
fn price_sort_orders_are_reverses() {
    let index = sample_index();
    let filter = FilterSpec::default();
    let low = ids(&query_at(index.records(), &filter, SortKey::PriceLowHigh, fixed_now()));
    let mut high = ids(&query_at(index.records(), &filter, SortKey::PriceHighLow, fixed_now()));
    assert_eq!(low.first().map(String::as_str), Some("PTG-004"));
    assert_eq!(low.last().map(String::as_str), Some("PTG-002"));
    high.reverse();
    assert_eq!(low, high);
}

#[test]
fn new_only_filter_uses_seven_day_window() {
    let index = sample_index();
    let filter = FilterSpec {
        new_only: true,
        ..FilterSpec::default()
    };
    let result = query_at(index.records(), &filter, SortKey::Newest, fixed_now());
    assert_eq!(
        ids(&result),
        vec!["PTG-009", "PTG-003", "PTG-001", "PTG-006", "PTG-002"]
    );

    let plain = filter.restricted_to(&FacetSupport::none());
    assert_eq!(
        query_at(index.records(), &plain, SortKey::Newest, fixed_now()).len(),
        8
    );
}

#[test]
fn letter_and_waist_facets_or_together() {
    let index = sample_index();
    let filter = FilterSpec {
        letter_sizes: BTreeSet::from([LetterSize::M]),
        waist_sizes: BTreeSet::from([32]),
        ..FilterSpec::default()
    };
    let result = query_at(index.records(), &filter, SortKey::Newest, fixed_now());
    assert_eq!(ids(&result), vec!["PTG-009", "PTG-001", "PTG-010"]);
}

#[test]
fn audience_category_and_search_and_together() {
    let index = sample_index();
    let filter = FilterSpec {
        audience: Some(Audience::Womens),
        category: Some(Category::Bottoms),
        search: "JEANS".into(),
        ..FilterSpec::default()
    };
    let result = query_at(index.records(), &filter, SortKey::Newest, fixed_now());
    assert_eq!(ids(&result), vec!["PTG-006"]);
}

#[test]
fn facet_options_cover_listed_items() {
    let index = sample_index();
    assert_eq!(waist_options(index.records()), vec![27, 28, 29, 30, 31, 32]);
    let jeans = index.record(&ItemId::from("PTG-001")).unwrap();
    assert_eq!(
        extract_size_tokens(&jeans.size).waists,
        BTreeSet::from([32])
    );
    assert_eq!(letter_options(index.records()), LetterSize::ALL.to_vec());
}

#[test]
fn arrivals_and_sold_views() {
    let index = sample_index();
    let strip = arrivals(index.records());
    assert_eq!(strip.len(), 8);
    assert!(strip.iter().all(|r| !r.status.is_sold()));
    assert_eq!(
        ids(&sold_archive(index.records(), None)),
        vec!["PTG-005", "PTG-008"]
    );
}

#[test]
fn json_feed_reports_null_price_softly() {
    let (records, diagnostics) =
        load_and_parse(&FeedSource::File(sample_json())).expect("json feed loads");
    assert_eq!(records.len(), 3);
    assert!(records[1].price.is_nan());
    assert_eq!(diagnostics, vec!["Price must be numeric on PTG-102"]);

    let result = query_at(&records, &FilterSpec::default(), SortKey::PriceLowHigh, fixed_now());
    assert_eq!(ids(&result), vec!["PTG-101", "PTG-102"]);
}

#[test]
fn duplicate_ids_are_diagnosed_but_kept() {
    let text = format!(
        "{HEADER}\n\
         PTG-1,First,Tops,10,M,M,Good,available,Soft,a.jpg,2024-06-01,false,unisex\n\
         PTG-1,Second,Tops,12,M,M,Good,available,Soft,b.jpg,2024-06-02,false,unisex\n"
    );
    let (records, diagnostics) = load_and_parse(&FeedSource::Csv(text)).unwrap();
    assert_eq!(diagnostics, vec!["Duplicate id: PTG-1 (2 occurrences)"]);
    let result = query_at(&records, &FilterSpec::default(), SortKey::Newest, fixed_now());
    assert_eq!(result.len(), 2);
}

#[test]
fn structural_errors_fail_the_whole_feed() {
    let unterminated = format!(
        "{HEADER}\n\
         PTG-1,First,Tops,10,M,M,Good,available,Soft,a.jpg,2024-06-01,false,unisex\n\
         PTG-2,\"Second,Tops,12,M,M,Good,available,Soft,b.jpg,2024-06-02,false,unisex\n"
    );
    assert!(matches!(
        load_and_parse(&FeedSource::Csv(unterminated)),
        Err(FeedError::UnterminatedQuote { line: 3 })
    ));

    let reordered = HEADER.replace("size,fitsLike", "fitsLike,size");
    let err = load_and_parse(&FeedSource::Csv(format!("{reordered}\n"))).unwrap_err();
    assert!(err.to_string().starts_with("CSV format error: header must be exactly id,title"));

    let ragged = format!("{HEADER}\nPTG-1,First,Tops\n");
    let err = load_and_parse(&FeedSource::Csv(ragged)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "CSV format error: row 2 has 3 columns; expected 13."
    );
}

#[test]
fn cart_resolves_against_inventory() {
    let index = sample_index();
    let mut store = MemoryCartStore::default();
    let mut cart = CartState::from_query("items=PTG-003|PTG-404|PTG-001").unwrap();
    cart.add(ItemId::from("PTG-003"));
    cart.save(&mut store).unwrap();

    let loaded = CartState::load(&store);
    assert_eq!(loaded.len(), 3);
    assert_eq!(ids(&loaded.resolve(&index)), vec!["PTG-003", "PTG-001"]);
}

#[test]
fn feed_check_reports_summary() {
    let sample = sample_csv();
    let output = run_bin(FEED_CHECK, &["--feed", sample.to_str().unwrap()], &[]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(
        text.contains("10 records (7 available, 1 reserved, 2 sold)"),
        "{text}"
    );
    assert!(text.contains("no diagnostics"));
}

#[test]
fn feed_check_strict_fails_on_diagnostics() {
    let sample = sample_json();
    let output = run_bin(
        FEED_CHECK,
        &["--strict"],
        &[("THRIFTFEED_FEED", sample.to_str().unwrap())],
    );
    assert!(!output.status.success());
    assert!(stdout(&output).contains("warning: Price must be numeric on PTG-102"));
    assert!(stderr(&output).contains("1 diagnostic(s)"));
}

#[test]
fn feed_check_fails_on_broken_feed() {
    let dir = TempDir::new().unwrap();
    let feed = write_file(dir.path(), "broken.csv", "id,title\nPTG-1,Tee\n");
    let output = run_bin(FEED_CHECK, &["--feed", feed.to_str().unwrap()], &[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("CSV format error: header must be exactly"));
}

#[test]
fn shop_query_catalog_filters_and_sorts() {
    let sample = sample_csv();
    let output = run_bin(
        SHOP_QUERY,
        &[
            "--feed",
            sample.to_str().unwrap(),
            "--now",
            FIXED_NOW,
            "catalog",
            "--category",
            "bottoms",
            "--sort",
            "Price Low→High",
        ],
        &[],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    let found = positions(&text, &["PTG-003", "PTG-006", "PTG-001"]);
    assert!(found.windows(2).all(|pair| pair[0] < pair[1]), "{text}");
    assert!(!text.contains("PTG-008"));
    assert!(text.contains("$22 [RESERVED]"));
}

#[test]
fn shop_query_empty_result_prints_message() {
    let sample = sample_csv();
    let output = run_bin(
        SHOP_QUERY,
        &[
            "--feed",
            sample.to_str().unwrap(),
            "catalog",
            "--search",
            "ballgown",
        ],
        &[],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), EMPTY_MESSAGE);
}

#[test]
fn shop_query_search_covers_ids_while_facet_enabled() {
    let sample = sample_csv();
    let feed = sample.to_str().unwrap();
    let by_id = run_bin(SHOP_QUERY, &["--feed", feed, "catalog", "--search", "ptg-009"], &[]);
    assert!(by_id.status.success(), "{}", stderr(&by_id));
    assert!(stdout(&by_id).contains("Linen Button-Up"));

    let restricted = run_bin(
        SHOP_QUERY,
        &["--feed", feed, "--facets", "audience,new,sizes", "catalog", "--search", "ptg-009"],
        &[],
    );
    assert_eq!(stdout(&restricted).trim(), EMPTY_MESSAGE);

    let help = run_bin(SHOP_QUERY, &["catalog", "--help"], &[]);
    assert!(stdout(&help).contains("search-ids facet"), "{}", stdout(&help));
}

#[test]
fn shop_query_item_detail_uses_handle() {
    let sample = sample_csv();
    let output = run_bin(
        SHOP_QUERY,
        &["item", "PTG-002"],
        &[
            ("THRIFTFEED_FEED", sample.to_str().unwrap()),
            ("THRIFTFEED_HANDLE", "@testshop"),
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Listed Jun 5, 2024"), "{text}");
    assert!(text.contains("photo 3/3: assets/items/ptg-002-tag.jpg"));
    assert!(text.contains("DM @testshop with Item ID PTG-002 to reserve."));
}

#[test]
fn shop_query_sold_view_is_json_capable() {
    let sample = sample_csv();
    let output = run_bin(
        SHOP_QUERY,
        &["--feed", sample.to_str().unwrap(), "--json", "sold", "--all"],
        &[],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let sold: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(sold, vec!["PTG-005", "PTG-008"]);
}

#[test]
fn shop_query_missing_feed_shows_unavailable() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.csv");
    let output = run_bin(
        SHOP_QUERY,
        &["--feed", missing.to_str().unwrap(), "arrivals"],
        &[],
    );
    assert!(!output.status.success());
    assert_eq!(stdout(&output).trim(), UNAVAILABLE_MESSAGE);
    assert!(stderr(&output).contains("nope.csv"));
}

#[test]
fn shop_cart_round_trip() {
    let dir = TempDir::new().unwrap();
    let sample = sample_csv();
    let envs = [
        ("THRIFTFEED_FEED", sample.to_str().unwrap()),
        ("THRIFTFEED_CART_DIR", dir.path().to_str().unwrap()),
    ];

    let added = run_bin(SHOP_CART, &["add", "PTG-001", "PTG-003"], &envs);
    assert!(added.status.success(), "{}", stderr(&added));
    assert!(stdout(&added).contains("2 item(s) in cart"));

    let sold = run_bin(SHOP_CART, &["add", "PTG-005"], &envs);
    assert!(!sold.status.success());
    assert!(stderr(&sold).contains("no longer available"));

    let shared = run_bin(SHOP_CART, &["share", "--base", "https://shop.example/cart.html"], &envs);
    assert_eq!(
        stdout(&shared).trim(),
        "https://shop.example/cart.html?items=PTG-001%7CPTG-003"
    );

    let listed = run_bin(SHOP_CART, &["list"], &envs);
    let text = stdout(&listed);
    assert!(text.contains("Levi's 501 Straight Jeans: $38"), "{text}");
    assert!(text.contains("Women's size S"), "{text}");

    let seeded = run_bin(SHOP_CART, &["seed", "cart.html?items=PTG-010"], &envs);
    assert!(stdout(&seeded).contains("1 item(s) in cart"));

    let cleared = run_bin(SHOP_CART, &["clear"], &envs);
    assert!(cleared.status.success());
    let empty = run_bin(SHOP_CART, &["list"], &envs);
    assert_eq!(stdout(&empty).trim(), "Your cart is empty.");
}
