//! bookshop CLI
//!
//! Loads publisher, book, shop, stock, and sale records into a SQLite store
//! and lists matching sales by publisher id or book title.

mod cli_types;
mod commands;
mod config;
mod error;
mod logging;

use clap::Parser;

use cli_types::{Cli, Commands};
use config::{AppConfig, Overrides};

pub(crate) use error::CliError;
pub(crate) use logging::log_blank;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let seed_file = match &cli.command {
        Commands::Seed { seed } | Commands::Run { seed } => seed.seed_file.clone(),
        _ => None,
    };
    let config = AppConfig::load(Overrides {
        database: cli.db,
        seed_file,
        timeout_secs: cli.timeout,
    })?;

    match cli.command {
        Commands::Init => commands::init::run_init(&config),
        Commands::Reset { confirm } => commands::reset::run_reset(&config, confirm),
        Commands::Seed { seed } => commands::seed::run_seed(&config, &seed),
        Commands::Lookup { term, no_count } => {
            commands::lookup::run_lookup(&config, term, !no_count)
        }
        Commands::Run { seed } => commands::run::run_session(&config, &seed),
        Commands::Stats => commands::stats::run_stats(&config),
        Commands::Config => commands::config::run_config_show(&config),
    }
}
