use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::config::AppConfig;

use super::open_existing_store;

pub(crate) fn run_stats(config: &AppConfig) -> Result<(), CliError> {
    let conn = open_existing_store(config)?;
    let stats = bookshop_db::store_stats(&conn)?;
    let violations = bookshop_db::foreign_key_violations(&conn)?;

    log::info!(
        "{}",
        "Bookshop Store Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", config.database_path()?.display());
    crate::log_blank();
    log::info!("  Publishers:  {:>8}", stats.publishers);
    log::info!("  Shops:       {:>8}", stats.shops);
    log::info!("  Books:       {:>8}", stats.books);
    log::info!("  Stock:       {:>8}", stats.stocks);
    log::info!("  Sales:       {:>8}", stats.sales);
    crate::log_blank();

    if violations.is_empty() {
        log::info!(
            "  Foreign keys: {}",
            "consistent".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::warn!("  Foreign keys: {} dangling references", violations.len());
        for v in &violations {
            let rowid = v.rowid.map_or_else(|| "?".to_string(), |id| id.to_string());
            log::warn!("    {} row {} -> missing {}", v.table, rowid, v.parent);
        }
    }

    Ok(())
}
