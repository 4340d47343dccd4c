//! Soft validation for parsed inventory.
//!
//! These checks catch data-entry mistakes (blank cells, misspelled enum
//! values, non-numeric prices, reused ids) in a feed that already parsed. They
//! never reject a record: the storefront keeps rendering and the messages go
//! to the operator log.

use crate::catalog::{Audience, Category, Condition, InventoryRecord, Status};
use crate::feed::FeedLayout;
use std::collections::HashMap;
use tracing::warn;

/// Check every record and return human-readable diagnostics.
///
/// Records are labelled by id, or by feed row (header is row 1) when the id
/// itself is blank.
pub fn validate_records(records: &[InventoryRecord], layout: FeedLayout) -> Vec<String> {
    // Collect everything rather than short-circuiting so one pass over the
    // sheet surfaces every problem.
    let mut errors = Vec::new();
    let mut id_order: Vec<&str> = Vec::new();
    let mut id_counts: HashMap<&str, usize> = HashMap::new();

    for (idx, record) in records.iter().enumerate() {
        let label = if record.id.as_str().trim().is_empty() {
            format!("row {}", idx + 2)
        } else {
            record.id.to_string()
        };

        for (field, value) in required_text_fields(record, layout) {
            if value.trim().is_empty() {
                errors.push(format!("Missing required field \"{field}\" on {label}"));
            }
        }

        if !record.status.is_known() && !record.status.as_str().is_empty() {
            errors.push(format!(
                "Invalid status on {label}: {}. Must be one of {}",
                record.status,
                known_list(&Status::KNOWN)
            ));
        }
        if !record.condition.is_known() && !record.condition.as_str().is_empty() {
            errors.push(format!(
                "Invalid condition on {label}: {}. Must be one of {}",
                record.condition,
                known_list(&Condition::KNOWN)
            ));
        }
        if !record.category.is_known() && !record.category.as_str().is_empty() {
            errors.push(format!(
                "Invalid category on {label}: {}. Must be one of {}",
                record.category,
                known_list(&Category::KNOWN)
            ));
        }
        if layout.has_audience() {
            if let Some(audience) = record.audience.as_ref().filter(|a| !a.is_known()) {
                errors.push(format!(
                    "Invalid audience on {label}: {audience}. Must be one of {}",
                    known_list(&Audience::KNOWN)
                ));
            }
        }

        if !record.price.is_finite() {
            errors.push(format!("Price must be numeric on {label}"));
        } else if record.price < 0.0 {
            errors.push(format!(
                "Price must not be negative on {label}: {}",
                record.price
            ));
        }

        let created = record.created_at.raw();
        if !created.is_empty() && record.created_at.instant().is_none() {
            errors.push(format!("Invalid createdAt on {label}: {created}"));
        }

        let id = record.id.as_str();
        if !id.is_empty() {
            let count = id_counts.entry(id).or_insert(0);
            if *count == 0 {
                id_order.push(id);
            }
            *count += 1;
        }
    }

    for id in id_order {
        let count = id_counts[id];
        if count > 1 {
            errors.push(format!("Duplicate id: {id} ({count} occurrences)"));
        }
    }

    errors
}

/// Emit each diagnostic as an operator-facing warning.
pub fn log_diagnostics(diagnostics: &[String]) {
    for diagnostic in diagnostics {
        warn!(target: "inventory_validation", "{diagnostic}");
    }
}

fn required_text_fields(
    record: &InventoryRecord,
    layout: FeedLayout,
) -> Vec<(&'static str, &str)> {
    let mut fields = vec![
        ("id", record.id.as_str()),
        ("title", record.title.as_str()),
        ("category", record.category.as_str()),
        ("size", record.size.as_str()),
        ("fitsLike", record.fits_like.as_str()),
        ("condition", record.condition.as_str()),
        ("status", record.status.as_str()),
        ("notes", record.notes.as_str()),
        ("createdAt", record.created_at.raw()),
    ];
    if layout.has_audience() {
        fields.push((
            "audience",
            record.audience.as_ref().map(Audience::as_str).unwrap_or(""),
        ));
    }
    fields
}

fn known_list<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::parse_csv_feed;

    const HEADER: &str =
        "id,title,category,price,size,fitsLike,condition,status,notes,images,createdAt,featured,audience";

    fn diagnostics_for(rows: &str) -> Vec<String> {
        let feed = parse_csv_feed(&format!("{HEADER}\n{rows}")).expect("feed parses");
        validate_records(&feed.records, feed.layout)
    }

    #[test]
    fn clean_record_has_no_diagnostics() {
        let diags = diagnostics_for(
            "PTG-1,Levi's 501,Bottoms,30,32,30-32,Good,available,Light fade,a.jpg,2024-05-01,false,mens\n",
        );
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn reports_invalid_enums_and_price() {
        let diags = diagnostics_for(
            "PTG-1,Scarf,Accessories,cheap,OS,OS,Like New,pending,Wool,,2024-05-01,false,kids\n",
        );
        let joined = diags.join("\n");
        assert!(joined.contains("Invalid category on PTG-1: Accessories"), "{joined}");
        assert!(joined.contains("Invalid condition on PTG-1: Like New"), "{joined}");
        assert!(joined.contains("Invalid status on PTG-1: pending"), "{joined}");
        assert!(joined.contains("Invalid audience on PTG-1: kids"), "{joined}");
        assert!(joined.contains("Price must be numeric on PTG-1"), "{joined}");
    }

    #[test]
    fn blank_fields_are_labelled_by_row_when_id_missing() {
        let diags = diagnostics_for(
            ",Tee,Tops,10,M,M,Good,available,,a.jpg,2024-05-01,false,\n",
        );
        assert!(diags.contains(&"Missing required field \"id\" on row 2".to_string()));
        assert!(diags.contains(&"Missing required field \"notes\" on row 2".to_string()));
        assert!(diags.contains(&"Missing required field \"audience\" on row 2".to_string()));
    }

    #[test]
    fn duplicate_ids_reported_once_with_count() {
        let row = "PTG-7,Tee,Tops,10,M,M,Good,available,Soft,a.jpg,2024-05-01,false,unisex\n";
        let diags = diagnostics_for(&row.repeat(3));
        let dupes: Vec<_> = diags.iter().filter(|d| d.starts_with("Duplicate id")).collect();
        assert_eq!(dupes, vec!["Duplicate id: PTG-7 (3 occurrences)"]);
    }

    #[test]
    fn unparseable_timestamp_is_reported() {
        let diags = diagnostics_for(
            "PTG-1,Tee,Tops,10,M,M,Good,available,Soft,a.jpg,someday,false,unisex\n",
        );
        assert_eq!(diags, vec!["Invalid createdAt on PTG-1: someday"]);
    }
}
