// SqliteStore: rusqlite backend implementing the DocumentStore trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use serde_json::Value;
use tokio::sync::Mutex;

use super::models::{Document, DocumentPage};
use super::traits::DocumentStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Count user tables (used by `hazardscope init` to confirm the schema).
    pub async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().await;
        super::queries::list_collections(&conn)
    }

    async fn count_documents(&self, collection: &str) -> Result<u64> {
        let conn = self.conn.lock().await;
        super::queries::count_documents(&conn, collection)
    }

    async fn sample_documents(&self, collection: &str, limit: usize) -> Result<Vec<Document>> {
        let conn = self.conn.lock().await;
        super::queries::sample_documents(&conn, collection, limit)
    }

    async fn fetch_page(
        &self,
        collection: &str,
        after: Option<i64>,
        limit: usize,
    ) -> Result<DocumentPage> {
        let conn = self.conn.lock().await;
        super::queries::fetch_page(&conn, collection, after, limit)
    }

    async fn insert_documents(&self, collection: &str, documents: &[Value]) -> Result<usize> {
        let conn = self.conn.lock().await;
        super::queries::insert_documents(&conn, collection, documents)
    }

    async fn replace_collection(&self, collection: &str, documents: &[Value]) -> Result<usize> {
        let mut conn = self.conn.lock().await;
        super::queries::replace_collection(&mut conn, collection, documents)
    }
}
