//! SQLite schema creation, reset, and connection setup.

use std::path::Path;
use std::time::Duration;

use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),
    #[error("Timed out waiting for the database: {0}")]
    Timeout(String),
    #[error("Schema version mismatch: this build supports version {expected}, database is at {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

impl From<rusqlite::Error> for SchemaError {
    fn from(e: rusqlite::Error) -> Self {
        if is_busy(&e) {
            SchemaError::Timeout(e.to_string())
        } else {
            SchemaError::Sqlite(e)
        }
    }
}

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// How long a statement waits on a locked database before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Tables in foreign-key-safe creation order. Drop in reverse.
pub const TABLES: [&str; 5] = ["publisher", "shop", "book", "stock", "sale"];

/// Name of the SQL function that lowercases text with full Unicode rules.
pub const CASEFOLD_FN: &str = "casefold";

/// Create all tables if they don't exist.
///
/// This is idempotent: safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Drop the five store tables, children first. Version bookkeeping is kept.
pub fn drop_schema(conn: &Connection) -> Result<(), SchemaError> {
    for table in TABLES.iter().rev() {
        conn.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
    }
    Ok(())
}

/// Drop and recreate every store table in one transaction.
///
/// Destroys all stored data. Callers must only run this against a store
/// they own.
pub fn reset_schema(conn: &Connection) -> Result<(), SchemaError> {
    let tx = conn.unchecked_transaction()?;
    drop_schema(&tx)?;
    create_schema(&tx)?;
    tx.commit()?;
    log::debug!("Store tables dropped and recreated");
    Ok(())
}

/// Open or create a store database at the given path.
///
/// `busy_timeout` bounds how long any statement on this connection waits
/// for a lock held by another process.
pub fn open_database(path: &Path, busy_timeout: Duration) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(busy_timeout)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    register_functions(&conn)?;

    let version = get_schema_version(&conn)?;
    if version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }
    create_schema(&conn)?;

    log::debug!(
        "Opened store at {} (schema v{}, busy timeout {:?})",
        path.display(),
        CURRENT_VERSION,
        busy_timeout,
    );
    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    register_functions(&conn)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Whether `e` is SQLite giving up on a lock after the busy timeout.
pub fn is_busy(e: &rusqlite::Error) -> bool {
    matches!(
        e.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked)
    )
}

/// Register `casefold(text)`. SQLite's own `lower()` and `LIKE` only fold
/// ASCII, which misses Cyrillic and accented titles.
fn register_functions(conn: &Connection) -> Result<(), SchemaError> {
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    Ok(())
}

/// Get the current schema version, or 0 if no schema exists.
fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Record a schema version once.
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version)
         SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM schema_version WHERE version = ?1)",
        [version],
    )?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS publisher (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS shop (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS book (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    publisher_id INTEGER NOT NULL REFERENCES publisher(id)
);
CREATE INDEX IF NOT EXISTS idx_book_publisher ON book(publisher_id);

-- Copies of a book held by a shop
CREATE TABLE IF NOT EXISTS stock (
    id INTEGER PRIMARY KEY,
    book_id INTEGER NOT NULL REFERENCES book(id),
    shop_id INTEGER NOT NULL REFERENCES shop(id),
    count INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_stock_book ON stock(book_id);
CREATE INDEX IF NOT EXISTS idx_stock_shop ON stock(shop_id);

CREATE TABLE IF NOT EXISTS sale (
    id INTEGER PRIMARY KEY,
    price REAL NOT NULL,
    date_sale TEXT NOT NULL,
    stock_id INTEGER NOT NULL REFERENCES stock(id),
    count INTEGER
);
CREATE INDEX IF NOT EXISTS idx_sale_stock ON sale(stock_id);
"#;
