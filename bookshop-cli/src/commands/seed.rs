use std::path::Path;

use bookshop_db::{OperationError, SeedStats};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use rusqlite::Connection;

use crate::CliError;
use crate::cli_types::SeedArgs;
use crate::config::AppConfig;

use super::open_store;

/// Load the configured seed file, optionally resetting the store first.
pub(crate) fn run_seed(config: &AppConfig, args: &SeedArgs) -> Result<(), CliError> {
    if !reset_allowed(config, args)? {
        return Ok(());
    }

    let conn = open_store(config)?;
    let stats = if args.reset {
        replace_from_seed(&conn, config.seed_path())?
    } else {
        load_seed(&conn, config.seed_path())?
    };
    report_seed(&stats, config.seed_path());
    Ok(())
}

/// Returns false (after telling the user) when `--reset` lacks `--confirm`.
pub(crate) fn reset_allowed(config: &AppConfig, args: &SeedArgs) -> Result<bool, CliError> {
    if args.reset && !args.confirm {
        log::warn!(
            "--reset will permanently delete all bookshop data in:\n  {}",
            config.database_path()?.display(),
        );
        log::info!("Re-run with --reset --confirm to proceed.");
        return Ok(false);
    }
    Ok(true)
}

/// Seed from `path` in one transaction. Nothing is kept if any record fails.
pub(crate) fn load_seed(conn: &Connection, path: &Path) -> Result<SeedStats, CliError> {
    log::debug!("Seeding from {}", path.display());
    match bookshop_db::seed_from_file(conn, path) {
        Ok(stats) => Ok(stats),
        Err(e) => {
            if matches!(e, OperationError::Duplicate { .. }) {
                log::info!("The store already holds some of these rows; use --reset --confirm to reload.");
            }
            log::warn!("Seeding rolled back; no records from {} were kept.", path.display());
            Err(e.into())
        }
    }
}

/// Replace the whole store with the contents of `path`. On failure the
/// previous contents are kept.
pub(crate) fn replace_from_seed(conn: &Connection, path: &Path) -> Result<SeedStats, CliError> {
    log::debug!("Replacing store contents from {}", path.display());
    match bookshop_db::reseed_from_file(conn, path) {
        Ok(stats) => {
            log::info!("Store tables dropped and recreated.");
            Ok(stats)
        }
        Err(e) => {
            log::warn!("Reload rolled back; the store still holds its previous data.");
            Err(e.into())
        }
    }
}

pub(crate) fn report_seed(stats: &SeedStats, path: &Path) {
    log::info!(
        "{} {} records from {}",
        "Seeded".if_supports_color(Stdout, |t| t.green()),
        stats.total(),
        path.display(),
    );
    log::info!("  Publishers: {:>6}", stats.publishers);
    log::info!("  Shops:      {:>6}", stats.shops);
    log::info!("  Books:      {:>6}", stats.books);
    log::info!("  Stock:      {:>6}", stats.stocks);
    log::info!("  Sales:      {:>6}", stats.sales);
}
