//! Size-token extraction for the size facets.
//!
//! Feed size fields are free text ("X-Large", "2XL/3XL", "30-32", "W32 L30").
//! Two independent extractors run over the same string and their results are
//! unioned: one for letter sizes, one for numeric waist sizes. Filter widgets
//! use the same extractors to enumerate options, so matching and option lists
//! never disagree.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Ranges wider than this are treated as two discrete sizes, not a run.
pub const WAIST_RANGE_MAX_SPAN: u32 = 6;

/// Letter sizes recognized by the size facet, smallest first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub enum LetterSize {
    #[serde(rename = "XS")]
    Xs,
    #[serde(rename = "S")]
    S,
    #[serde(rename = "M")]
    M,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "XL")]
    Xl,
    #[serde(rename = "XXL")]
    Xxl,
    #[serde(rename = "XXXL")]
    Xxxl,
}

impl LetterSize {
    pub const ALL: [LetterSize; 7] = [
        LetterSize::Xs,
        LetterSize::S,
        LetterSize::M,
        LetterSize::L,
        LetterSize::Xl,
        LetterSize::Xxl,
        LetterSize::Xxxl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterSize::Xs => "XS",
            LetterSize::S => "S",
            LetterSize::M => "M",
            LetterSize::L => "L",
            LetterSize::Xl => "XL",
            LetterSize::Xxl => "XXL",
            LetterSize::Xxxl => "XXXL",
        }
    }

    /// Match an already upper-cased, trimmed token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "XS" => Some(LetterSize::Xs),
            "S" => Some(LetterSize::S),
            "M" => Some(LetterSize::M),
            "L" => Some(LetterSize::L),
            "XL" => Some(LetterSize::Xl),
            "XXL" | "2XL" => Some(LetterSize::Xxl),
            "XXXL" | "3XL" => Some(LetterSize::Xxxl),
            _ => None,
        }
    }
}

impl fmt::Display for LetterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
/// Letter and waist tokens found in one or more size strings.
pub struct SizeTokens {
    pub letters: BTreeSet<LetterSize>,
    pub waists: BTreeSet<u32>,
}

impl SizeTokens {
    pub fn merge(&mut self, other: SizeTokens) {
        self.letters.extend(other.letters);
        self.waists.extend(other.waists);
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty() && self.waists.is_empty()
    }

    /// True when either token set overlaps the matching selection.
    ///
    /// The two facets are alternatives: a letter hit or a waist hit is enough.
    pub fn matches_any(&self, letters: &BTreeSet<LetterSize>, waists: &BTreeSet<u32>) -> bool {
        !self.letters.is_disjoint(letters) || !self.waists.is_disjoint(waists)
    }
}

/// Run both extractors over `raw` and union the results.
pub fn extract_size_tokens(raw: &str) -> SizeTokens {
    SizeTokens {
        letters: extract_letter_sizes(raw),
        waists: extract_waist_sizes(raw),
    }
}

pub fn extract_letter_sizes(raw: &str) -> BTreeSet<LetterSize> {
    let upper = raw.to_uppercase();
    let collapsed = upper.split_whitespace().collect::<Vec<_>>().join(" ");
    // XX-LARGE must be rewritten first; it contains X-LARGE.
    let expanded = collapsed
        .replace("XX-LARGE", "XXL")
        .replace("X-LARGE", "XL");
    expanded
        .split(['/', ',', '|', '-'])
        .filter_map(|token| LetterSize::from_token(token.trim()))
        .collect()
}

pub fn extract_waist_sizes(raw: &str) -> BTreeSet<u32> {
    let runs = digit_runs(raw);
    let mut waists = BTreeSet::new();
    let mut in_range = vec![false; runs.len()];

    for idx in 0..runs.len().saturating_sub(1) {
        if in_range[idx] {
            continue;
        }
        let (first, second) = (&runs[idx], &runs[idx + 1]);
        let (Some(a), Some(b)) = (first.two_digit, second.two_digit) else {
            continue;
        };
        if !is_range_separator(&raw[first.end..second.start]) {
            continue;
        }
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        if high - low <= WAIST_RANGE_MAX_SPAN {
            waists.extend(low..=high);
        } else {
            waists.insert(low);
            waists.insert(high);
        }
        in_range[idx] = true;
        in_range[idx + 1] = true;
    }

    for (run, used) in runs.iter().zip(in_range) {
        if used {
            continue;
        }
        if let Some(value) = run.two_digit {
            waists.insert(value);
        }
    }
    waists
}

struct DigitRun {
    start: usize,
    end: usize,
    /// Set only for standalone runs of exactly two digits.
    two_digit: Option<u32>,
}

fn digit_runs(raw: &str) -> Vec<DigitRun> {
    let bytes = raw.as_bytes();
    let mut runs = Vec::new();
    let mut idx = 0;
    while idx < bytes.len() {
        if !bytes[idx].is_ascii_digit() {
            idx += 1;
            continue;
        }
        let start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        let standalone = is_waist_prefix(&bytes[..start])
            && !bytes.get(idx).is_some_and(u8::is_ascii_alphanumeric);
        let two_digit = if idx - start == 2 && standalone {
            raw[start..idx].parse().ok()
        } else {
            None
        };
        runs.push(DigitRun {
            start,
            end: idx,
            two_digit,
        });
    }
    runs
}

/// A number may follow a word boundary or a lone `W` (`W32`), never another
/// letter (`L30` is an inseam).
fn is_waist_prefix(before: &[u8]) -> bool {
    match before {
        [] => true,
        [.., b'W' | b'w'] => !before[..before.len() - 1]
            .last()
            .is_some_and(u8::is_ascii_alphanumeric),
        [.., last] => !last.is_ascii_alphanumeric(),
    }
}

fn is_range_separator(between: &str) -> bool {
    matches!(between.trim(), "-" | "\u{2013}")
}
