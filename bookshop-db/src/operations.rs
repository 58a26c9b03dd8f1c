//! Insert operations and transactional seeding.

use std::path::Path;

use bookshop_catalog::seed::{load_seed_file, order_for_insert, SeedError};
use bookshop_catalog::types::*;
use rusqlite::{ffi, params, Connection};
use thiserror::Error;

use crate::schema::{create_schema, drop_schema, is_busy, SchemaError};

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),
    #[error("Timed out waiting for the database: {0}")]
    Timeout(String),
    #[error("Seed data error: {0}")]
    Seed(#[from] SeedError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("{entity} {id} references a {parent} that does not exist")]
    ForeignKey {
        entity: EntityKind,
        id: i64,
        parent: &'static str,
    },
    #[error("Duplicate {entity} with id {id}")]
    Duplicate { entity: EntityKind, id: i64 },
    #[error("{entity} {id} violates a constraint: {message}")]
    Constraint {
        entity: EntityKind,
        id: i64,
        message: String,
    },
}

impl From<rusqlite::Error> for OperationError {
    fn from(e: rusqlite::Error) -> Self {
        if is_busy(&e) {
            OperationError::Timeout(e.to_string())
        } else {
            OperationError::Sqlite(e)
        }
    }
}

// ── Inserts ─────────────────────────────────────────────────────────────────

/// Insert a publisher.
pub fn insert_publisher(conn: &Connection, publisher: &Publisher) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO publisher (id, name) VALUES (?1, ?2)",
        params![publisher.id, publisher.name],
    )
    .map_err(|e| constraint_error(e, EntityKind::Publisher, publisher.id, "parent"))?;
    Ok(())
}

/// Insert a shop.
pub fn insert_shop(conn: &Connection, shop: &Shop) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO shop (id, name) VALUES (?1, ?2)",
        params![shop.id, shop.name],
    )
    .map_err(|e| constraint_error(e, EntityKind::Shop, shop.id, "parent"))?;
    Ok(())
}

/// Insert a book. Its publisher must already exist.
pub fn insert_book(conn: &Connection, book: &Book) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO book (id, title, publisher_id) VALUES (?1, ?2, ?3)",
        params![book.id, book.title, book.publisher_id],
    )
    .map_err(|e| constraint_error(e, EntityKind::Book, book.id, "publisher"))?;
    Ok(())
}

/// Insert a stock entry. Its book and shop must already exist.
pub fn insert_stock(conn: &Connection, stock: &Stock) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO stock (id, book_id, shop_id, count) VALUES (?1, ?2, ?3, ?4)",
        params![stock.id, stock.book_id, stock.shop_id, stock.count],
    )
    .map_err(|e| constraint_error(e, EntityKind::Stock, stock.id, "book or shop"))?;
    Ok(())
}

/// Insert a sale. Its stock entry must already exist.
pub fn insert_sale(conn: &Connection, sale: &Sale) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO sale (id, price, date_sale, stock_id, count) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![sale.id, sale.price, sale.date_sale, sale.stock_id, sale.count],
    )
    .map_err(|e| constraint_error(e, EntityKind::Sale, sale.id, "stock"))?;
    Ok(())
}

/// Insert any seed record into its table.
pub fn insert_record(conn: &Connection, record: &SeedRecord) -> Result<(), OperationError> {
    match record {
        SeedRecord::Publisher(p) => insert_publisher(conn, p),
        SeedRecord::Shop(s) => insert_shop(conn, s),
        SeedRecord::Book(b) => insert_book(conn, b),
        SeedRecord::Stock(s) => insert_stock(conn, s),
        SeedRecord::Sale(s) => insert_sale(conn, s),
    }
}

// ── Seeding ─────────────────────────────────────────────────────────────────

/// Insert a batch of seed records as a single transaction.
///
/// Records are reordered so parents precede children. If any insert fails
/// the transaction is rolled back and nothing from the batch persists.
pub fn seed_records(
    conn: &Connection,
    records: Vec<SeedRecord>,
) -> Result<SeedStats, OperationError> {
    let tx = conn.unchecked_transaction()?;
    let stats = insert_all(&tx, records)?;
    tx.commit()?;
    log::debug!("Seeded {} records", stats.total());
    Ok(stats)
}

/// Load a seed file and insert its records as a single transaction.
pub fn seed_from_file(conn: &Connection, path: &Path) -> Result<SeedStats, OperationError> {
    let records = load_seed_file(path)?;
    log::debug!("Loaded {} seed records from {}", records.len(), path.display());
    seed_records(conn, records)
}

/// Replace the whole store with `records`.
///
/// Dropping, recreating and inserting share one transaction, so a failed
/// reload leaves the previous contents in place.
pub fn reseed(conn: &Connection, records: Vec<SeedRecord>) -> Result<SeedStats, OperationError> {
    let tx = conn.unchecked_transaction()?;
    drop_schema(&tx)?;
    create_schema(&tx)?;
    let stats = insert_all(&tx, records)?;
    tx.commit()?;
    log::debug!("Store replaced with {} records", stats.total());
    Ok(stats)
}

/// Load a seed file, then replace the store with its records.
///
/// The file is fully parsed before any table is touched.
pub fn reseed_from_file(conn: &Connection, path: &Path) -> Result<SeedStats, OperationError> {
    let records = load_seed_file(path)?;
    log::debug!("Loaded {} seed records from {}", records.len(), path.display());
    reseed(conn, records)
}

fn insert_all(conn: &Connection, records: Vec<SeedRecord>) -> Result<SeedStats, OperationError> {
    let mut stats = SeedStats::default();
    for record in order_for_insert(records) {
        insert_record(conn, &record)?;
        stats.record(record.kind());
    }
    Ok(stats)
}

/// Rows inserted per entity by a seeding run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedStats {
    pub publishers: usize,
    pub shops: usize,
    pub books: usize,
    pub stocks: usize,
    pub sales: usize,
}

impl SeedStats {
    fn record(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Publisher => self.publishers += 1,
            EntityKind::Shop => self.shops += 1,
            EntityKind::Book => self.books += 1,
            EntityKind::Stock => self.stocks += 1,
            EntityKind::Sale => self.sales += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.publishers + self.shops + self.books + self.stocks + self.sales
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Attach the offending entity to SQLite constraint failures.
fn constraint_error(
    e: rusqlite::Error,
    entity: EntityKind,
    id: i64,
    parent: &'static str,
) -> OperationError {
    let rusqlite::Error::SqliteFailure(ref failure, ref message) = e else {
        return e.into();
    };
    let code = failure.extended_code;
    match code {
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => OperationError::ForeignKey { entity, id, parent },
        ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
            OperationError::Duplicate { entity, id }
        }
        _ if code & 0xff == ffi::SQLITE_CONSTRAINT => OperationError::Constraint {
            entity,
            id,
            message: message.clone().unwrap_or_else(|| failure.to_string()),
        },
        _ => e.into(),
    }
}
