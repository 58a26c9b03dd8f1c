use bookshop_catalog::types::*;
use bookshop_catalog::parse_seed;
use bookshop_db::*;
use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn scenario_records() -> Vec<SeedRecord> {
    vec![
        SeedRecord::Publisher(Publisher { id: 1, name: "Penguin".into() }),
        SeedRecord::Book(Book { id: 1, title: "Dune".into(), publisher_id: 1 }),
        SeedRecord::Shop(Shop { id: 1, name: "CityBooks".into() }),
        SeedRecord::Stock(Stock { id: 1, book_id: 1, shop_id: 1, count: 5 }),
        SeedRecord::Sale(Sale {
            id: 1,
            price: 9.99,
            date_sale: date(2023, 5, 1),
            stock_id: 1,
            count: Some(1),
        }),
    ]
}

#[test]
fn insert_each_entity() {
    let conn = open_memory().unwrap();
    insert_publisher(&conn, &Publisher { id: 1, name: "Penguin".into() }).unwrap();
    insert_shop(&conn, &Shop { id: 1, name: "CityBooks".into() }).unwrap();
    insert_book(&conn, &Book { id: 1, title: "Dune".into(), publisher_id: 1 }).unwrap();
    insert_stock(&conn, &Stock { id: 1, book_id: 1, shop_id: 1, count: 5 }).unwrap();
    insert_sale(
        &conn,
        &Sale {
            id: 1,
            price: 9.99,
            date_sale: date(2023, 5, 1),
            stock_id: 1,
            count: None,
        },
    )
    .unwrap();

    let (price, stored_date, count): (f64, String, Option<i64>) = conn
        .query_row("SELECT price, date_sale, count FROM sale WHERE id = 1", [], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .unwrap();
    assert_eq!(price, 9.99);
    assert_eq!(stored_date, "2023-05-01");
    assert_eq!(count, None);
}

#[test]
fn book_with_missing_publisher_is_rejected() {
    let conn = open_memory().unwrap();
    let err = insert_book(&conn, &Book { id: 4, title: "Orphan".into(), publisher_id: 99 })
        .unwrap_err();
    match err {
        OperationError::ForeignKey { entity, id, parent } => {
            assert_eq!(entity, EntityKind::Book);
            assert_eq!(id, 4);
            assert_eq!(parent, "publisher");
        }
        other => panic!("expected ForeignKey, got {other}"),
    }
}

#[test]
fn duplicate_primary_key_is_rejected() {
    let conn = open_memory().unwrap();
    insert_shop(&conn, &Shop { id: 1, name: "A".into() }).unwrap();
    let err = insert_shop(&conn, &Shop { id: 1, name: "B".into() }).unwrap_err();
    assert!(matches!(
        err,
        OperationError::Duplicate { entity: EntityKind::Shop, id: 1 }
    ));
}

#[test]
fn seed_records_counts_each_entity() {
    let conn = open_memory().unwrap();
    let stats = seed_records(&conn, scenario_records()).unwrap();
    assert_eq!(
        stats,
        SeedStats {
            publishers: 1,
            shops: 1,
            books: 1,
            stocks: 1,
            sales: 1,
        }
    );
    assert_eq!(stats.total(), 5);
}

#[test]
fn seed_records_reorders_children_after_parents() {
    let conn = open_memory().unwrap();
    let mut records = scenario_records();
    records.reverse();
    seed_records(&conn, records).unwrap();

    let stats = store_stats(&conn).unwrap();
    assert_eq!(stats.sales, 1);
    assert!(foreign_key_violations(&conn).unwrap().is_empty());
}

#[test]
fn failed_seed_rolls_back_everything() {
    let conn = open_memory().unwrap();
    let mut records = scenario_records();
    // Stock pointing at a shop that is never defined
    records.push(SeedRecord::Stock(Stock { id: 2, book_id: 1, shop_id: 42, count: 1 }));

    let err = seed_records(&conn, records).unwrap_err();
    assert!(matches!(
        err,
        OperationError::ForeignKey { entity: EntityKind::Stock, id: 2, .. }
    ));

    let stats = store_stats(&conn).unwrap();
    assert_eq!(stats.publishers, 0);
    assert_eq!(stats.shops, 0);
    assert_eq!(stats.books, 0);
    assert_eq!(stats.stocks, 0);
    assert_eq!(stats.sales, 0);
}

#[test]
fn duplicate_in_batch_rolls_back_everything() {
    let conn = open_memory().unwrap();
    let mut records = scenario_records();
    records.push(SeedRecord::Publisher(Publisher { id: 1, name: "Penguin again".into() }));

    let err = seed_records(&conn, records).unwrap_err();
    assert!(matches!(err, OperationError::Duplicate { .. }));
    assert_eq!(store_stats(&conn).unwrap().publishers, 0);
}

#[test]
fn reset_then_seed_is_repeatable() {
    let conn = open_memory().unwrap();

    reset_schema(&conn).unwrap();
    seed_records(&conn, scenario_records()).unwrap();
    let first = store_stats(&conn).unwrap();

    reset_schema(&conn).unwrap();
    seed_records(&conn, scenario_records()).unwrap();
    let second = store_stats(&conn).unwrap();

    assert_eq!(first, second);
    assert!(foreign_key_violations(&conn).unwrap().is_empty());
}

#[test]
fn reseed_replaces_existing_contents() {
    let conn = open_memory().unwrap();
    seed_records(&conn, scenario_records()).unwrap();
    let first = store_stats(&conn).unwrap();

    // Same primary keys again: a plain seed would hit duplicates
    let stats = reseed(&conn, scenario_records()).unwrap();
    assert_eq!(stats.total(), 5);
    assert_eq!(store_stats(&conn).unwrap(), first);
    assert!(foreign_key_violations(&conn).unwrap().is_empty());
}

#[test]
fn failed_reseed_keeps_previous_data() {
    let conn = open_memory().unwrap();
    seed_records(&conn, scenario_records()).unwrap();
    let before = store_stats(&conn).unwrap();

    let bad = vec![SeedRecord::Book(Book { id: 1, title: "Orphan".into(), publisher_id: 77 })];
    let err = reseed(&conn, bad).unwrap_err();
    assert!(matches!(
        err,
        OperationError::ForeignKey { entity: EntityKind::Book, id: 1, .. }
    ));

    assert_eq!(store_stats(&conn).unwrap(), before);
    let rows = find_sales(&conn, "dune").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].shop_name, "CityBooks");
}

#[test]
fn reseed_from_malformed_file_touches_nothing() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.json");
    fs::write(&path, r#"[{ "model": "publisher", "pk": 1, "fields": "#).unwrap();

    let conn = open_memory().unwrap();
    seed_records(&conn, scenario_records()).unwrap();
    let before = store_stats(&conn).unwrap();

    let err = reseed_from_file(&conn, &path).unwrap_err();
    assert!(matches!(err, OperationError::Seed(_)));
    assert_eq!(store_stats(&conn).unwrap(), before);
}

#[test]
fn seed_from_file_loads_source_format() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tests_data.json");
    fs::write(
        &path,
        r#"[
          { "model": "sale", "pk": 1, "fields": { "price": "16.00", "date_sale": "2018-10-25T10:59:56.230Z", "count": 5, "id_stock": 1 } },
          { "model": "stock", "pk": 1, "fields": { "id_shop": 1, "id_book": 1, "count": 50 } },
          { "model": "book", "pk": 1, "fields": { "title": "Code Complete: Second Edition", "id_publisher": 1 } },
          { "model": "shop", "pk": 1, "fields": { "name": "OZON" } },
          { "model": "publisher", "pk": 1, "fields": { "name": "Microsoft Press" } }
        ]"#,
    )
    .unwrap();

    let conn = open_memory().unwrap();
    let stats = seed_from_file(&conn, &path).unwrap();
    assert_eq!(stats.total(), 5);

    let stored: String = conn
        .query_row("SELECT date_sale FROM sale WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(stored, "2018-10-25");
}

#[test]
fn seed_from_file_with_unknown_tag_inserts_nothing() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.json");
    fs::write(
        &path,
        r#"[
          { "model": "publisher", "pk": 1, "fields": { "name": "Pearson" } },
          { "model": "warehouse", "pk": 1, "fields": {} }
        ]"#,
    )
    .unwrap();

    let conn = open_memory().unwrap();
    let err = seed_from_file(&conn, &path).unwrap_err();
    assert!(matches!(err, OperationError::Seed(_)));
    assert_eq!(store_stats(&conn).unwrap().publishers, 0);
}

#[test]
fn shipped_sample_data_seeds_cleanly() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("data")
        .join("tests_data.json");
    let conn = open_memory().unwrap();
    let stats = seed_from_file(&conn, &path).unwrap();
    assert!(stats.sales > 0);
    assert!(foreign_key_violations(&conn).unwrap().is_empty());
}

#[test]
fn parsed_and_typed_records_seed_identically() {
    let parsed = parse_seed(
        r#"[
          { "type": "publisher", "primary_key": 1, "fields": { "name": "Penguin" } },
          { "type": "book", "primary_key": 1, "fields": { "title": "Dune", "publisher_id": 1 } },
          { "type": "shop", "primary_key": 1, "fields": { "name": "CityBooks" } },
          { "type": "stock", "primary_key": 1, "fields": { "book_id": 1, "shop_id": 1, "count": 5 } },
          { "type": "sale", "primary_key": 1, "fields": { "price": 9.99, "date_sale": "2023-05-01", "stock_id": 1, "count": 1 } }
        ]"#,
    )
    .unwrap();
    assert_eq!(parsed, scenario_records());
}
