//! Read queries for the bookshop store.
//!
//! Provides the sale lookup, table counts, and the foreign-key integrity check.

use bookshop_catalog::search::SearchTerm;
use bookshop_catalog::types::{EntityKind, SaleRow};
use rusqlite::{params, Connection, Row};

use crate::operations::OperationError;
use crate::schema::CASEFOLD_FN;

/// Shop → Stock → Book → Publisher → Sale, inner joins throughout.
const SALE_JOIN: &str = "SELECT sale.id, book.title, shop.name, sale.price, sale.date_sale
     FROM shop
     JOIN stock ON shop.id = stock.shop_id
     JOIN book ON stock.book_id = book.id
     JOIN publisher ON book.publisher_id = publisher.id
     JOIN sale ON stock.id = sale.stock_id";

// ── Sale Lookups ────────────────────────────────────────────────────────────

/// List every sale matching `term`, ordered by sale id.
///
/// A publisher term matches books of exactly that publisher. A title term
/// matches books whose title contains it, ignoring case; `%` and `_` are
/// literal characters and an empty term matches every book.
pub fn search_sales(conn: &Connection, term: &SearchTerm) -> Result<Vec<SaleRow>, OperationError> {
    let rows = match term {
        SearchTerm::Publisher(id) => {
            let mut stmt = conn.prepare(&format!(
                "{SALE_JOIN} WHERE publisher.id = ?1 ORDER BY sale.id"
            ))?;
            let rows = stmt.query_map(params![id], row_to_sale)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
        SearchTerm::Title(fragment) => {
            let mut stmt = conn.prepare(&format!(
                "{SALE_JOIN} WHERE ?1 = '' OR instr({CASEFOLD_FN}(book.title), ?1) > 0
                 ORDER BY sale.id"
            ))?;
            let rows = stmt.query_map(params![fragment.to_lowercase()], row_to_sale)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
    };
    log::debug!("Lookup {:?} matched {} sales", term, rows.len());
    Ok(rows)
}

/// Classify raw user input and run [`search_sales`].
pub fn find_sales(conn: &Connection, input: &str) -> Result<Vec<SaleRow>, OperationError> {
    search_sales(conn, &SearchTerm::parse(input))
}

fn row_to_sale(row: &Row<'_>) -> rusqlite::Result<SaleRow> {
    Ok(SaleRow {
        sale_id: row.get(0)?,
        book_title: row.get(1)?,
        shop_name: row.get(2)?,
        price: row.get(3)?,
        date_sale: row.get(4)?,
    })
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Count rows in every store table.
pub fn store_stats(conn: &Connection) -> Result<StoreStats, OperationError> {
    let mut stats = StoreStats::default();
    for kind in EntityKind::ALL {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table_name());
        let count: i64 = conn.query_row(&sql, [], |r| r.get(0))?;
        match kind {
            EntityKind::Publisher => stats.publishers = count,
            EntityKind::Shop => stats.shops = count,
            EntityKind::Book => stats.books = count,
            EntityKind::Stock => stats.stocks = count,
            EntityKind::Sale => stats.sales = count,
        }
    }
    Ok(stats)
}

/// Row counts per store table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub publishers: i64,
    pub shops: i64,
    pub books: i64,
    pub stocks: i64,
    pub sales: i64,
}

impl StoreStats {
    /// True when no table holds any rows.
    pub fn is_empty(&self) -> bool {
        self.publishers == 0
            && self.shops == 0
            && self.books == 0
            && self.stocks == 0
            && self.sales == 0
    }
}

// ── Integrity ───────────────────────────────────────────────────────────────

/// A row whose foreign key points at a missing parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyViolation {
    pub table: String,
    pub rowid: Option<i64>,
    pub parent: String,
}

/// Report every dangling foreign key in the store. Empty means consistent.
pub fn foreign_key_violations(
    conn: &Connection,
) -> Result<Vec<ForeignKeyViolation>, OperationError> {
    let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
    let rows = stmt.query_map([], |row| {
        Ok(ForeignKeyViolation {
            table: row.get(0)?,
            rowid: row.get(1)?,
            parent: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
