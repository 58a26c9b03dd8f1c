//! Configuration resolution: CLI flags > environment > settings file > default.
//!
//! The settings file lives at `~/.config/bookshop/settings.toml`:
//!
//! ```toml
//! [database]
//! path = "/var/lib/bookshop/bookshop.db"
//! timeout_secs = 5
//!
//! [seed]
//! path = "data/tests_data.json"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::CliError;

pub(crate) const ENV_DATABASE: &str = "BOOKSHOP_DATABASE";
pub(crate) const ENV_SEED_FILE: &str = "BOOKSHOP_SEED_FILE";
pub(crate) const ENV_TIMEOUT: &str = "BOOKSHOP_TIMEOUT_SECS";

/// Seed file used when nothing else is configured, relative to the working directory.
pub(crate) const DEFAULT_SEED_FILE: &str = "data/tests_data.json";

/// Canonical path to the settings file.
pub(crate) fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bookshop").join("settings.toml"))
}

/// TOML settings file format.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Settings {
    #[serde(default)]
    database: DatabaseSettings,
    #[serde(default)]
    seed: SeedSettings,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSettings {
    path: Option<PathBuf>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SeedSettings {
    path: Option<PathBuf>,
}

impl Settings {
    /// Read the settings file. A missing file is not an error; a malformed one is.
    pub(crate) fn load(path: &Path) -> Result<Option<Self>, CliError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CliError::config(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        toml::from_str(&contents)
            .map(Some)
            .map_err(|e| CliError::config(format!("Invalid settings in {}: {}", path.display(), e)))
    }
}

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValueSource {
    /// Given on the command line.
    Flag,
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the settings file.
    SettingsFile,
    /// Built-in default.
    Default,
    /// Not set anywhere.
    Missing,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::SettingsFile => write!(f, "settings file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// A resolved value and its provenance.
#[derive(Debug, Clone)]
pub(crate) struct Resolved<T> {
    pub value: Option<T>,
    pub source: ValueSource,
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub(crate) struct Overrides {
    pub database: Option<PathBuf>,
    pub seed_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub(crate) struct AppConfig {
    pub database: Resolved<PathBuf>,
    pub seed_file: Resolved<PathBuf>,
    pub timeout: Resolved<Duration>,
    pub settings_path: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve from the real environment and settings file.
    pub(crate) fn load(overrides: Overrides) -> Result<Self, CliError> {
        let settings_path = settings_path();
        let settings = match &settings_path {
            Some(p) => Settings::load(p)?,
            None => None,
        };
        let mut config = Self::resolve(overrides, |var| std::env::var(var).ok(), settings)?;
        config.settings_path = settings_path;
        Ok(config)
    }

    /// Resolve each value by priority. `env` looks up an environment variable.
    pub(crate) fn resolve(
        overrides: Overrides,
        env: impl Fn(&str) -> Option<String>,
        settings: Option<Settings>,
    ) -> Result<Self, CliError> {
        let settings = settings.unwrap_or_default();
        let env_nonempty = |var: &str| env(var).filter(|v| !v.trim().is_empty());

        let database = pick(
            overrides.database,
            env_nonempty(ENV_DATABASE).map(PathBuf::from).map(|v| (ENV_DATABASE, v)),
            settings.database.path,
            None,
        );

        let seed_file = pick(
            overrides.seed_file,
            env_nonempty(ENV_SEED_FILE).map(PathBuf::from).map(|v| (ENV_SEED_FILE, v)),
            settings.seed.path,
            Some(PathBuf::from(DEFAULT_SEED_FILE)),
        );

        let env_timeout = match env_nonempty(ENV_TIMEOUT) {
            Some(raw) => Some((ENV_TIMEOUT, parse_timeout(&raw)?)),
            None => None,
        };
        let timeout = pick(
            overrides.timeout_secs,
            env_timeout,
            settings.database.timeout_secs,
            Some(bookshop_db::DEFAULT_BUSY_TIMEOUT.as_secs()),
        );
        let timeout = Resolved {
            value: timeout.value.map(Duration::from_secs),
            source: timeout.source,
        };

        Ok(Self {
            database,
            seed_file,
            timeout,
            settings_path: None,
        })
    }

    /// The database path, or a configuration error naming every way to set it.
    pub(crate) fn database_path(&self) -> Result<&Path, CliError> {
        self.database.value.as_deref().ok_or_else(|| {
            CliError::config(format!(
                "No database configured. Pass --db, set {} or add [database] path to the settings file",
                ENV_DATABASE
            ))
        })
    }

    pub(crate) fn seed_path(&self) -> &Path {
        self.seed_file
            .value
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SEED_FILE))
    }

    pub(crate) fn busy_timeout(&self) -> Duration {
        self.timeout
            .value
            .unwrap_or(bookshop_db::DEFAULT_BUSY_TIMEOUT)
    }
}

fn pick<T>(
    flag: Option<T>,
    env: Option<(&'static str, T)>,
    settings: Option<T>,
    default: Option<T>,
) -> Resolved<T> {
    if let Some(v) = flag {
        return Resolved { value: Some(v), source: ValueSource::Flag };
    }
    if let Some((var, v)) = env {
        return Resolved { value: Some(v), source: ValueSource::EnvVar(var) };
    }
    if let Some(v) = settings {
        return Resolved { value: Some(v), source: ValueSource::SettingsFile };
    }
    match default {
        Some(v) => Resolved { value: Some(v), source: ValueSource::Default },
        None => Resolved { value: None, source: ValueSource::Missing },
    }
}

fn parse_timeout(raw: &str) -> Result<u64, CliError> {
    raw.trim().parse::<u64>().map_err(|_| {
        CliError::config(format!(
            "{} must be a whole number of seconds, got '{}'",
            ENV_TIMEOUT, raw
        ))
    })
}
