//! Single-pass CSV tokenizer.
//!
//! Handles the subset of RFC 4180 the inventory sheet export produces: quoted
//! fields that carry commas or newlines, `""` escapes inside quotes, and LF,
//! CRLF or bare CR row endings. Rows with nothing but whitespace are dropped.

use super::FeedError;
use std::mem;

/// Split `text` into rows of raw (untrimmed) cells.
///
/// An unterminated quote fails the whole input; no rows are returned.
pub fn tokenize(text: &str) -> Result<Vec<Vec<String>>, FeedError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut quote_line = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                    if in_quotes {
                        quote_line = line;
                    }
                }
            }
            ',' if !in_quotes => row.push(mem::take(&mut cell)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                line += 1;
                row.push(mem::take(&mut cell));
                push_row(&mut rows, mem::take(&mut row));
            }
            _ => {
                if ch == '\n' {
                    line += 1;
                }
                cell.push(ch);
            }
        }
    }

    if in_quotes {
        return Err(FeedError::UnterminatedQuote { line: quote_line });
    }

    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        push_row(&mut rows, row);
    }

    Ok(rows)
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|value| !value.trim().is_empty()) {
        rows.push(row);
    }
}
