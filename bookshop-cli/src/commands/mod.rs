pub(crate) mod config;
pub(crate) mod init;
pub(crate) mod lookup;
pub(crate) mod reset;
pub(crate) mod run;
pub(crate) mod seed;
pub(crate) mod stats;

use std::io::{BufRead, Write};

use rusqlite::Connection;

use crate::CliError;
use crate::config::AppConfig;

/// Prompt shown when no lookup term is given on the command line.
pub(crate) const SEARCH_PROMPT: &str = "Enter a book title or publisher id: ";

/// Open (creating if needed) the configured store.
pub(crate) fn open_store(config: &AppConfig) -> Result<Connection, CliError> {
    let path = config.database_path()?;
    let conn = bookshop_db::open_database(path, config.busy_timeout())?;
    Ok(conn)
}

/// Open the configured store, failing if the file isn't there yet.
///
/// Read and reset commands use this so a mistyped path is reported instead
/// of silently creating an empty store.
pub(crate) fn open_existing_store(config: &AppConfig) -> Result<Connection, CliError> {
    let path = config.database_path()?;
    if !path.exists() {
        return Err(CliError::database(format!(
            "No store found at {}. Run 'bookshop init' or 'bookshop seed' to create one.",
            path.display()
        )));
    }
    open_store(config)
}

/// Print `prompt`, then read one line and return it without its line ending.
///
/// The rest of the line is kept verbatim, including surrounding spaces.
pub(crate) fn read_term(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
) -> Result<String, CliError> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CliError::other("No search term entered (end of input)"));
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

/// Prompt on the terminal for a lookup term.
pub(crate) fn prompt_term() -> Result<String, CliError> {
    let stdin = std::io::stdin();
    read_term(&mut stdin.lock(), &mut std::io::stdout(), SEARCH_PROMPT)
}
