//! JSON ↔ BSON conversion at the driver boundary.

use hospital_storage::DocumentFilter;
use mongodb::bson::{self, Bson, Document};
use serde_json::Value;

use crate::error::Result;

/// Server-assigned primary key, never exposed to callers.
const OBJECT_ID_FIELD: &str = "_id";

/// Converts a JSON object into a BSON document.
pub fn to_document(value: &Value) -> Result<Document> {
    Ok(bson::to_document(value)?)
}

/// Converts a stored document back to JSON, dropping `_id`.
///
/// BSON dates become RFC 3339 strings rather than `{"$date": ...}`, so
/// documents seeded by mongosh decode into timestamp fields.
pub fn from_document(mut document: Document) -> Value {
    document.remove(OBJECT_ID_FIELD);
    dates_to_rfc3339(Bson::Document(document)).into_relaxed_extjson()
}

fn dates_to_rfc3339(value: Bson) -> Bson {
    match value {
        Bson::DateTime(date) => match date.try_to_rfc3339_string() {
            Ok(text) => Bson::String(text),
            // Outside the RFC 3339 year range
            Err(_) => Bson::DateTime(date),
        },
        Bson::Document(document) => Bson::Document(
            document
                .into_iter()
                .map(|(key, value)| (key, dates_to_rfc3339(value)))
                .collect(),
        ),
        Bson::Array(items) => Bson::Array(items.into_iter().map(dates_to_rfc3339).collect()),
        other => other,
    }
}

/// Builds an equality query. Dotted field paths are passed through.
pub fn filter_document(filter: &DocumentFilter) -> Result<Document> {
    let mut query = Document::new();
    for (field, value) in filter.iter() {
        query.insert(field, bson::to_bson(value)?);
    }
    Ok(query)
}
