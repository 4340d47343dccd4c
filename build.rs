//! Bakes the checkout root into `THRIFTFEED_ROOT_HINT` so the binaries can
//! fall back to the bundled `data/items.csv` when run from another directory.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=THRIFTFEED_ROOT_HINT");

    let hint = env::var("THRIFTFEED_ROOT_HINT")
        .ok()
        .or_else(|| env::var("CARGO_MANIFEST_DIR").ok());

    if let Some(raw_hint) = hint {
        let candidate = PathBuf::from(raw_hint);
        let canonical = candidate.canonicalize().unwrap_or(candidate);

        println!(
            "cargo:rustc-env=THRIFTFEED_ROOT_HINT={}",
            canonical.display()
        );
    }
}
