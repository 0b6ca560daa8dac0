// Store queries: every SQL statement the document store runs.
//
// Keeping SQL in one place gives the rest of the app clean Rust interfaces
// and lets tests exercise queries against an in-memory Connection directly.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde_json::Value;

use super::models::{id_from_value, Document, DocumentPage, ID_FIELD};

// --- Catalog ---

/// All collection names in creation order.
pub fn list_collections(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM collections ORDER BY rowid")?;
    let rows = stmt.query_map([], |row| row.get(0))?;

    let mut names = Vec::new();
    for row in rows {
        names.push(row?);
    }
    Ok(names)
}

/// Register a collection name (no-op if it already exists).
pub fn ensure_collection(conn: &Connection, collection: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO collections (name) VALUES (?1)",
        params![collection],
    )?;
    Ok(())
}

pub fn count_documents(conn: &Connection, collection: &str) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = ?1",
        params![collection],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

// --- Reads ---

/// The first `limit` documents of a collection, in insertion order.
pub fn sample_documents(conn: &Connection, collection: &str, limit: usize) -> Result<Vec<Document>> {
    let page = fetch_page(conn, collection, None, limit)?;
    Ok(page.documents)
}

/// Fetch up to `limit` documents with a row id greater than `after`.
pub fn fetch_page(
    conn: &Connection,
    collection: &str,
    after: Option<i64>,
    limit: usize,
) -> Result<DocumentPage> {
    let mut stmt = conn.prepare(
        "SELECT id, COALESCE(doc_id, CAST(id AS TEXT)), body
         FROM documents
         WHERE collection = ?1 AND id > ?2
         ORDER BY id
         LIMIT ?3",
    )?;

    let rows = stmt.query_map(
        params![collection, after.unwrap_or(0), limit as i64],
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        },
    )?;

    let mut documents = Vec::new();
    let mut last_id = None;
    for row in rows {
        let (row_id, doc_id, body) = row?;
        let value: Value = serde_json::from_str(&body)
            .with_context(|| format!("Corrupt document body (row {row_id}) in '{collection}'"))?;
        documents.push(Document::from_value(value, &doc_id)?);
        last_id = Some(row_id);
    }

    // A short page means the scan is done
    let next_cursor = if documents.len() == limit { last_id } else { None };

    Ok(DocumentPage {
        documents,
        next_cursor,
    })
}

// --- Writes ---

/// Insert documents into a collection, creating the collection if needed.
///
/// All or nothing: a failure partway through leaves the store as it was.
pub fn insert_documents(conn: &Connection, collection: &str, documents: &[Value]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let inserted = insert_rows(&tx, collection, documents)?;
    tx.commit()?;
    Ok(inserted)
}

/// Insert without opening a transaction; the caller owns it.
fn insert_rows(conn: &Connection, collection: &str, documents: &[Value]) -> Result<usize> {
    if documents.iter().any(|d| !d.is_object()) {
        anyhow::bail!("Documents must be JSON objects (collection '{collection}')");
    }
    ensure_collection(conn, collection)?;

    let mut stmt =
        conn.prepare("INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)")?;
    for doc in documents {
        let doc_id = doc.get(ID_FIELD).map(id_from_value);
        let body = serde_json::to_string(doc)?;
        stmt.execute(params![collection, doc_id, body])
            .with_context(|| format!("Failed to insert into '{collection}'"))?;
    }
    Ok(documents.len())
}

/// Delete every document in a collection (the collection itself stays listed).
pub fn clear_collection(conn: &Connection, collection: &str) -> Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM documents WHERE collection = ?1",
        params![collection],
    )?;
    Ok(deleted)
}

/// Replace a collection's contents in a single transaction.
pub fn replace_collection(
    conn: &mut Connection,
    collection: &str,
    documents: &[Value],
) -> Result<usize> {
    let tx = conn.transaction()?;
    clear_collection(&tx, collection)?;
    let inserted = insert_rows(&tx, collection, documents)?;
    tx.commit()?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::create_tables;
    use serde_json::json;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_collections_listed_in_creation_order() {
        let conn = test_conn();
        insert_documents(&conn, "Reports", &[json!({"a": 1})]).unwrap();
        insert_documents(&conn, "donations", &[json!({"a": 1})]).unwrap();
        insert_documents(&conn, "Reports", &[json!({"a": 2})]).unwrap();
        assert_eq!(list_collections(&conn).unwrap(), vec!["Reports", "donations"]);
    }

    #[test]
    fn test_documents_without_id_get_row_id() {
        let conn = test_conn();
        insert_documents(&conn, "c", &[json!({"text": "x"}), json!({"_id": "k", "text": "y"})])
            .unwrap();
        let docs = sample_documents(&conn, "c", 10).unwrap();
        assert_eq!(docs[0].id, "1");
        assert_eq!(docs[1].id, "k");
    }

    #[test]
    fn test_fetch_page_walks_whole_collection() {
        let conn = test_conn();
        let docs: Vec<Value> = (0..5).map(|i| json!({ "n": i })).collect();
        insert_documents(&conn, "c", &docs).unwrap();
        insert_documents(&conn, "other", &[json!({"n": 99})]).unwrap();

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = fetch_page(&conn, "c", cursor, 2).unwrap();
            seen.extend(page.documents.iter().map(|d| d.fields["n"].as_i64().unwrap()));
            match page.next_cursor {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_replace_collection_discards_previous_contents() {
        let mut conn = test_conn();
        insert_documents(&conn, "summary", &[json!({"hazard": "old"})]).unwrap();
        replace_collection(&mut conn, "summary", &[json!({"hazard": "new"})]).unwrap();

        let docs = sample_documents(&conn, "summary", 10).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["hazard"], "new");
    }

    #[test]
    fn test_insert_rejects_non_object() {
        let conn = test_conn();
        assert!(insert_documents(&conn, "c", &[json!(1)]).is_err());
    }

    #[test]
    fn test_failed_insert_leaves_nothing_behind() {
        let conn = test_conn();
        conn.execute_batch(
            "CREATE TRIGGER reject_boom BEFORE INSERT ON documents
             WHEN NEW.body LIKE '%boom%'
             BEGIN SELECT RAISE(ABORT, 'boom'); END;",
        )
        .unwrap();

        let docs = [json!({"text": "ok"}), json!({"text": "ok too"}), json!({"text": "boom"})];
        let err = insert_documents(&conn, "reports", &docs).unwrap_err();
        assert!(err.to_string().contains("reports"));

        assert_eq!(count_documents(&conn, "reports").unwrap(), 0);
        assert!(list_collections(&conn).unwrap().is_empty());

        // The connection is still usable afterwards
        insert_documents(&conn, "reports", &docs[..2]).unwrap();
        assert_eq!(count_documents(&conn, "reports").unwrap(), 2);
    }

    #[test]
    fn test_count_missing_collection_is_zero() {
        let conn = test_conn();
        assert_eq!(count_documents(&conn, "nope").unwrap(), 0);
    }
}
