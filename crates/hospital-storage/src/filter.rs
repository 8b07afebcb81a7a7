//! Equality filters over document fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the field every document is keyed by.
pub const ID_FIELD: &str = "id";

/// A conjunction of `field == value` conditions.
///
/// Field names may be dotted paths into nested objects
/// (`status.patient_id`). An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentFilter {
    conditions: BTreeMap<String, Value>,
}

impl DocumentFilter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches the document with the given id.
    pub fn by_id(id: &str) -> Self {
        Self::all().where_eq(ID_FIELD, id)
    }

    /// Adds an equality condition.
    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Evaluates the filter against a JSON document.
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(path, expected)| lookup(document, path) == Some(expected))
    }
}

fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

impl std::fmt::Display for DocumentFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(&self.conditions) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("{..}"),
        }
    }
}
