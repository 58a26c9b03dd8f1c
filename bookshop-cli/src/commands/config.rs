use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::config::{AppConfig, ValueSource};

/// Show the resolved configuration and where each value came from.
pub(crate) fn run_config_show(config: &AppConfig) -> Result<(), CliError> {
    log::info!(
        "{}",
        "Bookshop Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    match &config.settings_path {
        Some(p) if p.exists() => {
            log::info!(
                "  Settings file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Settings file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Settings file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    crate::log_blank();

    let database = config
        .database
        .value
        .as_ref()
        .map(|p| p.display().to_string());
    let seed_file = config
        .seed_file
        .value
        .as_ref()
        .map(|p| p.display().to_string());
    let timeout = config.timeout.value.map(|t| format!("{}s", t.as_secs()));

    let fields: [(&str, Option<String>, &ValueSource); 3] = [
        ("database", database, &config.database.source),
        ("seed_file", seed_file, &config.seed_file.source),
        ("timeout", timeout, &config.timeout.source),
    ];

    for (name, value, source) in fields {
        match value {
            Some(v) => log::info!(
                "  {:<10} {} {}",
                name,
                v,
                format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
            ),
            None => log::info!(
                "  {:<10} {}",
                name,
                "not set".if_supports_color(Stdout, |t| t.yellow()),
            ),
        }
    }

    if config.database.value.is_none() {
        crate::log_blank();
        log::warn!("No database configured; every store command will fail until one is set.");
    }

    Ok(())
}
