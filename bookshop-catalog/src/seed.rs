//! JSON loading for seed data.
//!
//! A seed file is a JSON array of tagged records:
//!
//! ```text
//! [
//!   { "model": "publisher", "pk": 1, "fields": { "name": "O'Reilly" } },
//!   { "model": "book", "pk": 1, "fields": { "title": "Dune", "id_publisher": 1 } },
//!   ...
//! ]
//! ```
//!
//! `type` and `primary_key` are accepted in place of `model` and `pk`, and
//! foreign keys may be spelled `publisher_id` or `id_publisher` (likewise for
//! book, shop, and stock).

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::types::{Book, EntityKind, Publisher, Sale, SeedRecord, Shop, Stock};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Record #{index}: unknown type tag '{model}'")]
    UnknownModel { index: usize, model: String },
    #[error("Record #{index} ({model} {pk}): invalid fields: {source}")]
    InvalidFields {
        index: usize,
        model: EntityKind,
        pk: i64,
        source: serde_json::Error,
    },
}

/// The untyped envelope every seed record shares.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(alias = "type")]
    model: String,
    #[serde(alias = "primary_key")]
    pk: i64,
    #[serde(default)]
    fields: Value,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PublisherFields {
    name: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BookFields {
    title: String,
    #[serde(alias = "id_publisher")]
    publisher_id: i64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ShopFields {
    name: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StockFields {
    #[serde(alias = "id_book")]
    book_id: i64,
    #[serde(alias = "id_shop")]
    shop_id: i64,
    count: i64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SaleFields {
    #[serde(deserialize_with = "price_from_json")]
    price: f64,
    #[serde(deserialize_with = "date_from_json")]
    date_sale: NaiveDate,
    #[serde(alias = "id_stock")]
    stock_id: i64,
    #[serde(default)]
    count: Option<i64>,
}

/// Load and type-check every record in a seed file. File order is preserved.
pub fn load_seed_file(path: &Path) -> Result<Vec<SeedRecord>, SeedError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SeedError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_seed_at(&contents, &path.display().to_string())
}

/// Parse seed records from a JSON string. File order is preserved.
pub fn parse_seed(json: &str) -> Result<Vec<SeedRecord>, SeedError> {
    parse_seed_at(json, "<inline>")
}

fn parse_seed_at(json: &str, origin: &str) -> Result<Vec<SeedRecord>, SeedError> {
    let raw: Vec<RawRecord> = serde_json::from_str(json).map_err(|e| SeedError::Parse {
        path: origin.to_string(),
        source: e,
    })?;

    raw.into_iter()
        .enumerate()
        .map(|(index, record)| to_typed(index, record))
        .collect()
}

fn to_typed(index: usize, raw: RawRecord) -> Result<SeedRecord, SeedError> {
    let kind: EntityKind = raw.model.parse().map_err(|_| SeedError::UnknownModel {
        index,
        model: raw.model.clone(),
    })?;
    let id = raw.pk;
    let invalid = |source: serde_json::Error| SeedError::InvalidFields {
        index,
        model: kind,
        pk: id,
        source,
    };

    let record = match kind {
        EntityKind::Publisher => {
            let f: PublisherFields = serde_json::from_value(raw.fields).map_err(invalid)?;
            SeedRecord::Publisher(Publisher { id, name: f.name })
        }
        EntityKind::Shop => {
            let f: ShopFields = serde_json::from_value(raw.fields).map_err(invalid)?;
            SeedRecord::Shop(Shop { id, name: f.name })
        }
        EntityKind::Book => {
            let f: BookFields = serde_json::from_value(raw.fields).map_err(invalid)?;
            SeedRecord::Book(Book {
                id,
                title: f.title,
                publisher_id: f.publisher_id,
            })
        }
        EntityKind::Stock => {
            let f: StockFields = serde_json::from_value(raw.fields).map_err(invalid)?;
            SeedRecord::Stock(Stock {
                id,
                book_id: f.book_id,
                shop_id: f.shop_id,
                count: f.count,
            })
        }
        EntityKind::Sale => {
            let f: SaleFields = serde_json::from_value(raw.fields).map_err(invalid)?;
            SeedRecord::Sale(Sale {
                id,
                price: f.price,
                date_sale: f.date_sale,
                stock_id: f.stock_id,
                count: f.count,
            })
        }
    };
    Ok(record)
}

/// Reorder records so every parent row precedes the rows referencing it.
///
/// The sort is stable: records of the same rank keep their file order.
pub fn order_for_insert(mut records: Vec<SeedRecord>) -> Vec<SeedRecord> {
    records.sort_by_key(|r| r.kind().rank());
    records
}

// ── Field helpers ───────────────────────────────────────────────────────────

/// Prices appear both as JSON numbers and as decimal strings in exported data.
fn price_from_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("price out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid price '{}': {}", s, e))),
        other => Err(serde::de::Error::custom(format!(
            "expected a number for price, got {}",
            other
        ))),
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, or `YYYY-MM-DDTHH:MM:SS[.f]`.
/// The time-of-day part is discarded.
fn date_from_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_sale_date(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid sale date '{}'", s)))
}

fn parse_sale_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_dates_accept_plain_and_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2018, 10, 25).unwrap();
        assert_eq!(parse_sale_date("2018-10-25"), Some(expected));
        assert_eq!(parse_sale_date("2018-10-25T09:45:24.552Z"), Some(expected));
        assert_eq!(parse_sale_date("2018-10-25T09:45:24"), Some(expected));
        assert_eq!(parse_sale_date("25.10.2018"), None);
    }
}
