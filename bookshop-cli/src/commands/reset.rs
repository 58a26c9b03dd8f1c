use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::config::AppConfig;

use super::open_existing_store;

/// Drop and recreate every store table.
pub(crate) fn run_reset(config: &AppConfig, confirm: bool) -> Result<(), CliError> {
    let db_path = config.database_path()?;

    if !confirm {
        log::warn!(
            "This will permanently delete all bookshop data in:\n  {}",
            db_path.display(),
        );
        log::info!("Re-run with --confirm to proceed:");
        log::info!("  bookshop reset --confirm");
        return Ok(());
    }

    let conn = open_existing_store(config)?;
    bookshop_db::reset_schema(&conn)?;

    log::info!(
        "{}",
        "Store tables dropped and recreated.".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Path: {}", db_path.display());
    crate::log_blank();
    log::info!("Run 'bookshop seed' to load data.");

    Ok(())
}
