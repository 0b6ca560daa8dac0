// MemoryStore: in-process DocumentStore.
//
// Holds collections in insertion order behind an RwLock. Used for tests and
// for `analytics --from-json`, where a JSON export is analyzed without
// touching the SQLite store. Cursors are positions in the collection's vector.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::models::{Document, DocumentPage};
use super::traits::DocumentStore;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Vec<(String, Vec<Document>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(collection, documents)` pairs, in order.
    pub async fn with_collections(seed: Vec<(String, Vec<Value>)>) -> Result<Self> {
        let store = Self::new();
        for (name, docs) in seed {
            store.insert_documents(&name, &docs).await?;
        }
        Ok(store)
    }
}

/// Convert raw values to documents, numbering the ones without `_id`
/// from `start` so ids stay unique within the collection.
fn to_documents(values: &[Value], start: usize) -> Result<Vec<Document>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| Document::from_value(v.clone(), &(start + i + 1).to_string()))
        .collect()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let collections = self.collections.read().await;
        Ok(collections.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn count_documents(&self, collection: &str) -> Result<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .iter()
            .find(|(name, _)| name == collection)
            .map(|(_, docs)| docs.len() as u64)
            .unwrap_or(0))
    }

    async fn sample_documents(&self, collection: &str, limit: usize) -> Result<Vec<Document>> {
        let page = self.fetch_page(collection, None, limit).await?;
        Ok(page.documents)
    }

    async fn fetch_page(
        &self,
        collection: &str,
        after: Option<i64>,
        limit: usize,
    ) -> Result<DocumentPage> {
        let collections = self.collections.read().await;
        let Some((_, docs)) = collections.iter().find(|(name, _)| name == collection) else {
            return Ok(DocumentPage::default());
        };

        let start = after.map(|a| a as usize + 1).unwrap_or(0);
        let documents: Vec<Document> = docs.iter().skip(start).take(limit).cloned().collect();
        let end = start + documents.len();
        let next_cursor = if documents.len() == limit && end < docs.len() {
            Some(end as i64 - 1)
        } else {
            None
        };

        Ok(DocumentPage {
            documents,
            next_cursor,
        })
    }

    async fn insert_documents(&self, collection: &str, documents: &[Value]) -> Result<usize> {
        let mut collections = self.collections.write().await;
        let position = collections.iter().position(|(name, _)| name == collection);
        let existing = position.map_or(0, |i| collections[i].1.len());
        // Convert before touching the catalog so a bad batch changes nothing
        let docs = to_documents(documents, existing)?;
        match position {
            Some(i) => collections[i].1.extend(docs),
            None => collections.push((collection.to_string(), docs)),
        }
        Ok(documents.len())
    }

    async fn replace_collection(&self, collection: &str, documents: &[Value]) -> Result<usize> {
        let docs = to_documents(documents, 0)?;
        let mut collections = self.collections.write().await;
        match collections.iter_mut().find(|(name, _)| name == collection) {
            Some((_, existing)) => *existing = docs,
            None => collections.push((collection.to_string(), docs)),
        }
        Ok(documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_paging_covers_every_document_once() {
        let docs: Vec<Value> = (0..7).map(|i| json!({ "n": i })).collect();
        let store = MemoryStore::with_collections(vec![("c".to_string(), docs)])
            .await
            .unwrap();

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = store.fetch_page("c", cursor, 3).await.unwrap();
            seen.extend(page.documents.iter().map(|d| d.fields["n"].as_i64().unwrap()));
            match page.next_cursor {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }
        assert_eq!(seen, (0..7).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_rejected_batch_leaves_catalog_unchanged() {
        let store = MemoryStore::new();
        assert!(store.insert_documents("c", &[json!({"a": 1}), json!("text")]).await.is_err());
        assert!(store.list_collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.sample_documents("nope", 5).await.unwrap().is_empty());
        assert_eq!(store.count_documents("nope").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_generated_ids_stay_unique_across_inserts() {
        let store = MemoryStore::new();
        store.insert_documents("c", &[json!({"a": 1})]).await.unwrap();
        store.insert_documents("c", &[json!({"a": 2})]).await.unwrap();
        let docs = store.sample_documents("c", 10).await.unwrap();
        assert_eq!(docs[0].id, "1");
        assert_eq!(docs[1].id, "2");
    }
}
