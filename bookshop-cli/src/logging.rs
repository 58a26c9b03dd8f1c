//! Logger setup for the CLI.
//!
//! Normal output goes through `log::info!` as plain lines on stdout.
//! `--quiet` keeps warnings and errors only, `--verbose` adds debug
//! messages with timestamps, and `--logfile` mirrors everything to a file
//! with ANSI escapes stripped. `RUST_LOG` still applies on top.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

/// Install the global logger. Call once, before any command runs.
pub(crate) fn init_logging(
    quiet: bool,
    verbose: bool,
    logfile: Option<&Path>,
) -> Result<(), CliError> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.parse_default_env();

    builder.format(move |buf, record| {
        if verbose {
            write!(buf, "{} ", chrono::Local::now().format("%H:%M:%S%.3f"))?;
        }
        match record.level() {
            Level::Error => write!(
                buf,
                "{} ",
                "error:".if_supports_color(Stdout, |t| t.red())
            )?,
            Level::Warn => write!(
                buf,
                "{} ",
                "warning:".if_supports_color(Stdout, |t| t.yellow())
            )?,
            Level::Debug | Level::Trace => write!(
                buf,
                "{} ",
                "debug:".if_supports_color(Stdout, |t| t.dimmed())
            )?,
            Level::Info => {}
        }
        writeln!(buf, "{}", record.args())
    });

    match logfile {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::config(format!("Cannot open log file {}: {}", path.display(), e))
            })?;
            builder.target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
        }
        None => {
            builder.target(env_logger::Target::Stdout);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::other(format!("Logger already initialized: {}", e)))
}

/// Log an empty line (section spacing in command output).
pub(crate) fn log_blank() {
    log::info!("");
}

/// Writes to stdout unchanged and to a file without ANSI escapes.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(&strip_ansi_escapes::strip(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}
