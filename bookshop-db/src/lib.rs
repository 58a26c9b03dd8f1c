//! SQLite persistence layer for the bookshop store.
//!
//! Provides schema creation and reset, transactional seeding, and the
//! sale lookup query, backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    insert_book, insert_publisher, insert_record, insert_sale, insert_shop, insert_stock,
    reseed, reseed_from_file, seed_from_file, seed_records, OperationError, SeedStats,
};
pub use queries::{
    find_sales, foreign_key_violations, search_sales, store_stats, ForeignKeyViolation,
    StoreStats,
};
pub use schema::{open_database, open_memory, reset_schema, DEFAULT_BUSY_TIMEOUT};
