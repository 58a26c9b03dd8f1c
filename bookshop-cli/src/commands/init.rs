use crate::CliError;
use crate::config::AppConfig;

use super::open_store;

/// Create the store tables if they don't exist. Existing data is untouched.
pub(crate) fn run_init(config: &AppConfig) -> Result<(), CliError> {
    open_store(config)?;
    log::info!("Store ready at {}", config.database_path()?.display());
    Ok(())
}
