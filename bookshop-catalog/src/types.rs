//! Data model types for the bookshop store.
//!
//! These types mirror the persistent schema: publishers, books, shops,
//! stock entries, and sales, plus the row shape returned by the sale lookup.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Entities ────────────────────────────────────────────────────────────────

/// A book publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
}

/// A book title, owned by exactly one publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub publisher_id: i64,
}

/// A shop that stocks books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
}

/// Copies of one book held by one shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: i64,
    pub book_id: i64,
    pub shop_id: i64,
    /// Expected to be non-negative; not enforced by the store.
    pub count: i64,
}

/// A sale drawn from a stock entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub price: f64,
    pub date_sale: NaiveDate,
    pub stock_id: i64,
    #[serde(default)]
    pub count: Option<i64>,
}

// ── Entity kinds ────────────────────────────────────────────────────────────

/// The closed set of entity types a seed record can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Publisher,
    Shop,
    Book,
    Stock,
    Sale,
}

impl EntityKind {
    /// All kinds, in foreign-key-safe insertion order.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Publisher,
        EntityKind::Shop,
        EntityKind::Book,
        EntityKind::Stock,
        EntityKind::Sale,
    ];

    /// Seed-file type tag and SQL table name (they are the same).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Publisher => "publisher",
            EntityKind::Shop => "shop",
            EntityKind::Book => "book",
            EntityKind::Stock => "stock",
            EntityKind::Sale => "sale",
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.as_str()
    }

    /// Depth in the foreign-key graph. Rows of a lower rank never reference
    /// rows of a higher one, so inserting by ascending rank is always safe.
    pub fn rank(&self) -> u8 {
        match self {
            EntityKind::Publisher | EntityKind::Shop => 0,
            EntityKind::Book => 1,
            EntityKind::Stock => 2,
            EntityKind::Sale => 3,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publisher" => Ok(EntityKind::Publisher),
            "shop" => Ok(EntityKind::Shop),
            "book" => Ok(EntityKind::Book),
            "stock" => Ok(EntityKind::Stock),
            "sale" => Ok(EntityKind::Sale),
            other => Err(format!("unknown entity type '{}'", other)),
        }
    }
}

// ── Seed records ────────────────────────────────────────────────────────────

/// One typed record from a seed file.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedRecord {
    Publisher(Publisher),
    Shop(Shop),
    Book(Book),
    Stock(Stock),
    Sale(Sale),
}

impl SeedRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            SeedRecord::Publisher(_) => EntityKind::Publisher,
            SeedRecord::Shop(_) => EntityKind::Shop,
            SeedRecord::Book(_) => EntityKind::Book,
            SeedRecord::Stock(_) => EntityKind::Stock,
            SeedRecord::Sale(_) => EntityKind::Sale,
        }
    }

    /// Primary key of the wrapped entity.
    pub fn id(&self) -> i64 {
        match self {
            SeedRecord::Publisher(p) => p.id,
            SeedRecord::Shop(s) => s.id,
            SeedRecord::Book(b) => b.id,
            SeedRecord::Stock(s) => s.id,
            SeedRecord::Sale(s) => s.id,
        }
    }
}

// ── Lookup results ──────────────────────────────────────────────────────────

/// One matched sale: book title, shop name, sale price, and sale date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRow {
    pub sale_id: i64,
    pub book_title: String,
    pub shop_name: String,
    pub price: f64,
    pub date_sale: NaiveDate,
}
