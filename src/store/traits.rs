// DocumentStore trait: backend-agnostic async interface to the document store.
//
// Implementors: SqliteStore (wraps rusqlite), MemoryStore (in-process).
// The analytics pipeline only needs to list collections, sample a bounded
// number of documents, and page through a whole collection. The write
// methods exist for seeding collections and for the summary write-back.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::models::{Document, DocumentPage};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    // --- Catalog ---

    /// Names of all collections, in creation order, original casing.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Number of documents currently in a collection (0 if it doesn't exist).
    async fn count_documents(&self, collection: &str) -> Result<u64>;

    // --- Reads ---

    /// The first `limit` documents of a collection in store order.
    async fn sample_documents(&self, collection: &str, limit: usize) -> Result<Vec<Document>>;

    /// One page of a full scan. Pass `None` to start, then the previous
    /// page's `next_cursor` until it comes back `None`.
    async fn fetch_page(
        &self,
        collection: &str,
        after: Option<i64>,
        limit: usize,
    ) -> Result<DocumentPage>;

    // --- Writes ---

    /// Append documents to a collection, creating it if needed.
    /// Returns the number of documents inserted.
    async fn insert_documents(&self, collection: &str, documents: &[Value]) -> Result<usize>;

    /// Delete everything in a collection, then insert `documents`.
    async fn replace_collection(&self, collection: &str, documents: &[Value]) -> Result<usize>;
}
