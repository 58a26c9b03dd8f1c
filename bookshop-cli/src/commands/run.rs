use rusqlite::Connection;

use crate::CliError;
use crate::cli_types::SeedArgs;
use crate::config::AppConfig;

use super::lookup::lookup_and_print;
use super::seed::{load_seed, replace_from_seed, report_seed, reset_allowed};
use super::{open_store, prompt_term};

/// One-shot session: make sure the store has data, then prompt and look up.
pub(crate) fn run_session(config: &AppConfig, args: &SeedArgs) -> Result<(), CliError> {
    let Some(conn) = prepare_store(config, args)? else {
        return Ok(());
    };
    let term = prompt_term()?;
    lookup_and_print(&conn, &term, true)
}

/// Open the store and make sure it holds data.
///
/// An empty store is seeded automatically. A populated one is only reloaded
/// with `--reset --confirm`. Returns `None` when an unconfirmed reset was
/// refused.
fn prepare_store(config: &AppConfig, args: &SeedArgs) -> Result<Option<Connection>, CliError> {
    if !reset_allowed(config, args)? {
        return Ok(None);
    }

    let conn = open_store(config)?;
    if args.reset {
        let stats = replace_from_seed(&conn, config.seed_path())?;
        report_seed(&stats, config.seed_path());
        crate::log_blank();
        return Ok(Some(conn));
    }

    let existing = bookshop_db::store_stats(&conn)?;
    if existing.is_empty() {
        let stats = load_seed(&conn, config.seed_path())?;
        report_seed(&stats, config.seed_path());
        crate::log_blank();
    } else {
        log::debug!(
            "Store already holds {} sales; skipping seed (use --reset --confirm to reload)",
            existing.sales
        );
    }
    Ok(Some(conn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::config_for;

    #[test]
    fn empty_store_is_seeded_then_left_alone() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = config_for(&tmp.path().join("store.db"));

        let conn = prepare_store(&config, &SeedArgs::default()).unwrap().unwrap();
        let first = bookshop_db::store_stats(&conn).unwrap();
        assert_eq!(first.sales, 6);
        drop(conn);

        // A second run must not re-insert and fail on duplicate keys
        let conn = prepare_store(&config, &SeedArgs::default()).unwrap().unwrap();
        assert_eq!(bookshop_db::store_stats(&conn).unwrap(), first);
    }

    #[test]
    fn unconfirmed_reset_is_refused() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = config_for(&tmp.path().join("store.db"));
        let conn = prepare_store(&config, &SeedArgs::default()).unwrap().unwrap();
        let before = bookshop_db::store_stats(&conn).unwrap();

        let args = SeedArgs {
            reset: true,
            confirm: false,
            ..Default::default()
        };
        assert!(prepare_store(&config, &args).unwrap().is_none());
        assert_eq!(bookshop_db::store_stats(&conn).unwrap(), before);
    }

    #[test]
    fn confirmed_reset_reloads_populated_store() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = config_for(&tmp.path().join("store.db"));
        let first = {
            let conn = prepare_store(&config, &SeedArgs::default()).unwrap().unwrap();
            bookshop_db::store_stats(&conn).unwrap()
        };

        let args = SeedArgs {
            reset: true,
            confirm: true,
            ..Default::default()
        };
        let conn = prepare_store(&config, &args).unwrap().unwrap();
        assert_eq!(bookshop_db::store_stats(&conn).unwrap(), first);
    }
}
