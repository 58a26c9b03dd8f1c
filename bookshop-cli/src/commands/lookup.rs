use std::io::{self, Write};

use bookshop_catalog::{SaleRow, format_sale_line};
use rusqlite::Connection;

use crate::CliError;
use crate::config::AppConfig;

use super::{open_existing_store, prompt_term};

/// Entry point for `lookup`. Prompts for the term when none is given.
pub(crate) fn run_lookup(
    config: &AppConfig,
    term: Option<String>,
    show_count: bool,
) -> Result<(), CliError> {
    let conn = open_existing_store(config)?;
    let term = match term {
        Some(t) => t,
        None => prompt_term()?,
    };
    lookup_and_print(&conn, &term, show_count)
}

/// Run the lookup and print every row. Nothing is printed if the query fails.
pub(crate) fn lookup_and_print(
    conn: &Connection,
    term: &str,
    show_count: bool,
) -> Result<(), CliError> {
    let rows = bookshop_db::find_sales(conn, term)?;
    let mut out = io::stdout().lock();
    write_results(&mut out, &rows, show_count)?;
    Ok(())
}

fn write_results(out: &mut impl Write, rows: &[SaleRow], show_count: bool) -> io::Result<()> {
    if show_count {
        writeln!(out, "Sales found: {}", rows.len())?;
    }
    for row in rows {
        writeln!(out, "{}", format_sale_line(row))?;
    }
    out.flush()
}
