// Text extraction: streams the resolved field out of every document in a
// collection as text records.
//
// The stream pages through the store lazily. It is single-pass: once
// consumed, re-scanning means calling `text_records` again.

use anyhow::Result;
use futures::stream::{self, Stream, TryStreamExt};
use serde::Serialize;

use crate::store::models::Document;
use crate::store::DocumentStore;

/// Documents fetched per page during a full-collection scan.
pub const SCAN_PAGE_SIZE: usize = 500;

/// One piece of free text pulled out of a store document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRecord {
    /// Collection the document came from (catalog casing).
    pub collection: String,
    /// The field's value, trimmed.
    pub text: String,
    /// The document's identifier.
    pub source_id: String,
}

/// The trimmed value of `field`, if it is present, a string, and not blank.
pub fn extract_text(document: &Document, field: &str) -> Option<String> {
    let text = document.get(field)?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Lazily scan a whole collection, yielding a record for every document
/// whose `field` holds usable text. Order follows the store's scan order.
pub fn text_records<'a>(
    store: &'a dyn DocumentStore,
    collection: &'a str,
    field: &'a str,
) -> impl Stream<Item = Result<TextRecord>> + Send + 'a {
    stream::try_unfold(ScanState::Start, move |state| {
        next_page(store, collection, field, state)
    })
    .map_ok(|records| stream::iter(records.into_iter().map(Ok::<TextRecord, anyhow::Error>)))
    .try_flatten()
}

enum ScanState {
    Start,
    After(i64),
    Done,
}

async fn next_page(
    store: &dyn DocumentStore,
    collection: &str,
    field: &str,
    state: ScanState,
) -> Result<Option<(Vec<TextRecord>, ScanState)>> {
    let after = match state {
        ScanState::Done => return Ok(None),
        ScanState::Start => None,
        ScanState::After(cursor) => Some(cursor),
    };

    let page = store.fetch_page(collection, after, SCAN_PAGE_SIZE).await?;
    let next = match page.next_cursor {
        Some(cursor) => ScanState::After(cursor),
        None => ScanState::Done,
    };

    let records = page
        .documents
        .iter()
        .filter_map(|doc| {
            extract_text(doc, field).map(|text| TextRecord {
                collection: collection.to_string(),
                text,
                source_id: doc.id.clone(),
            })
        })
        .collect();

    Ok(Some((records, next)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        Document::from_value(value, "1").unwrap()
    }

    #[test]
    fn test_extract_trims() {
        let d = doc(json!({"description": "  flood near coast  "}));
        assert_eq!(
            extract_text(&d, "description"),
            Some("flood near coast".to_string())
        );
    }

    #[test]
    fn test_extract_rejects_blank_missing_and_non_string() {
        assert_eq!(extract_text(&doc(json!({"description": "   "})), "description"), None);
        assert_eq!(extract_text(&doc(json!({"description": 5})), "description"), None);
        assert_eq!(extract_text(&doc(json!({"description": null})), "description"), None);
        assert_eq!(extract_text(&doc(json!({"other": "x"})), "description"), None);
    }

    #[tokio::test]
    async fn test_stream_spans_multiple_pages() {
        let docs: Vec<Value> = (0..(SCAN_PAGE_SIZE + 3))
            .map(|i| {
                if i % 2 == 0 {
                    json!({ "_id": format!("d{i}"), "text": format!("report {i}") })
                } else {
                    json!({ "_id": format!("d{i}"), "text": " " })
                }
            })
            .collect();
        let store = MemoryStore::with_collections(vec![("reports".to_string(), docs)])
            .await
            .unwrap();

        let records: Vec<TextRecord> = text_records(&store, "reports", "text")
            .try_collect()
            .await
            .unwrap();

        let expected = (SCAN_PAGE_SIZE + 3).div_ceil(2);
        assert_eq!(records.len(), expected);
        assert_eq!(records[0].source_id, "d0");
        assert_eq!(records[1].text, "report 2");
        assert!(records.iter().all(|r| r.collection == "reports"));
    }
}
