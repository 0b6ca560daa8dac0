// Document store: the collections the analytics pipeline reads from and
// writes its summary back to.
//
// SQLite is the default backend (rusqlite, bundled). The file lives wherever
// HAZARDSCOPE_DB_PATH points (defaults to ./hazardscope.db). MemoryStore
// backs tests and one-off analysis of JSON exports.

pub mod memory;
pub mod models;
pub mod queries;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::DocumentStore;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open (or create) the SQLite store and run migrations.
///
/// Called by `hazardscope init` and by commands that write to the store.
pub fn initialize_sqlite(db_path: &str) -> Result<SqliteStore> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for store: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open store at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    schema::create_tables(&conn)?;

    Ok(SqliteStore::new(conn))
}

/// Open an existing SQLite store (fails if it doesn't exist yet).
pub fn open_sqlite(db_path: &str) -> Result<SqliteStore> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Store not found at {}. Run `hazardscope init` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open store at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    // Older files may predate a migration
    schema::create_tables(&conn)?;

    Ok(SqliteStore::new(conn))
}
