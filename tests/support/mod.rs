use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub const HEADER: &str =
    "id,title,category,price,size,fitsLike,condition,status,notes,images,createdAt,featured,audience";

/// Reference instant the sample feed's dates are written against.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
}

pub const FIXED_NOW: &str = "2024-06-10T12:00:00Z";

pub fn repo_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

pub fn sample_csv() -> PathBuf {
    repo_path("data/items.csv")
}

pub fn sample_json() -> PathBuf {
    repo_path("tests/mocks/items.json")
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

/// Run a crate binary with a scrubbed `THRIFTFEED_*` environment.
pub fn run_bin(bin: &str, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(bin);
    cmd.args(args)
        .env_remove("RUST_LOG")
        .env_remove("THRIFTFEED_FEED")
        .env_remove("THRIFTFEED_CART_DIR")
        .env_remove("THRIFTFEED_HANDLE")
        .env_remove("THRIFTFEED_FACETS");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output()
        .unwrap_or_else(|err| panic!("failed to run {bin}: {err}"))
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Positions of `ids` in `text`, panicking when one is missing.
pub fn positions(text: &str, ids: &[&str]) -> Vec<usize> {
    ids.iter()
        .map(|id| {
            text.find(id)
                .unwrap_or_else(|| panic!("{id} missing from output:\n{text}"))
        })
        .collect()
}
