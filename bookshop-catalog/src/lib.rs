//! Bookshop data model types, seed-file I/O, and result formatting.
//!
//! This crate defines the five bookshop entities and the lookup result row
//! without any database dependencies. Consumers pass these types to
//! `bookshop-db` for persistence.

pub mod display;
pub mod search;
pub mod seed;
pub mod types;

pub use display::{format_price, format_sale_line};
pub use search::SearchTerm;
pub use seed::{load_seed_file, order_for_insert, parse_seed, SeedError};
pub use types::*;
