// Store models: the document shapes that flow between the store and the pipeline.
//
// Documents are schemaless JSON objects. The store keeps attribute order as
// written (serde_json's preserve_order), which the field resolver relies on
// when breaking frequency ties.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute name that carries a document's identifier, when present.
pub const ID_FIELD: &str = "_id";

/// A single schemaless record from a named collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Source identifier: the `_id` attribute if the document has one,
    /// otherwise an identifier assigned by the store.
    pub id: String,
    /// All attributes in stored order (including `_id` when present).
    pub fields: Map<String, Value>,
}

impl Document {
    /// Build a document from a JSON value, using `fallback_id` when the
    /// value has no `_id` attribute.
    pub fn from_value(value: Value, fallback_id: &str) -> Result<Self> {
        let fields = match value {
            Value::Object(map) => map,
            other => anyhow::bail!(
                "Documents must be JSON objects, got: {}",
                crate::output::truncate_chars(&other.to_string(), 60)
            ),
        };
        let id = fields
            .get(ID_FIELD)
            .map(id_from_value)
            .unwrap_or_else(|| fallback_id.to_string());
        Ok(Self { id, fields })
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Attribute names in stored order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }
}

/// Render an `_id` value as a plain identifier string.
///
/// Handles the shapes document exports usually carry: plain strings,
/// numbers, and extended-JSON `{"$oid": "..."}` objects.
pub fn id_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("$oid") {
            Some(Value::String(oid)) => oid.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

/// One page of a full-collection scan.
#[derive(Debug, Clone, Default)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    /// Position to resume after, or None once the collection is exhausted.
    pub next_cursor: Option<i64>,
}

/// One row of the per-category count summary written back to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardSummary {
    pub hazard: String,
    pub count: u64,
    pub generated_at: String,
}
