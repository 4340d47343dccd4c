//! Structural check for the JSON form of the feed.
//!
//! The JSON feed arrives with values already coerced, so the only structural
//! contract is shape and field types. Missing fields are allowed here; they
//! are reported by soft validation like blank CSV cells.

use super::FeedError;
use jsonschema::JSONSchema;
use serde_json::{Value, json};

fn feed_schema() -> Value {
    let text = json!({"type": "string"});
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "inventory feed",
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "id": text,
                "title": text,
                "category": text,
                "price": {"type": ["number", "null"]},
                "size": text,
                "fitsLike": text,
                "condition": text,
                "status": text,
                "notes": text,
                "images": {"type": "array", "items": text},
                "createdAt": text,
                "featured": {"type": "boolean"},
                "audience": {"type": ["string", "null"]}
            }
        }
    })
}

/// Reject JSON feeds whose shape does not match the inventory contract.
pub fn validate_json_feed(document: &Value) -> Result<(), FeedError> {
    let schema = feed_schema();
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| FeedError::Schema(format!("feed schema does not compile: {err}")))?;

    if let Err(errors) = compiled.validate(document) {
        let details = errors
            .map(|err| format!("{}: {err}", err.instance_path))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(FeedError::Schema(details));
    }
    Ok(())
}
