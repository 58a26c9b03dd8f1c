use bookshop_db::operations::OperationError;
use bookshop_db::schema::SchemaError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Database could not be opened or a statement failed
    #[error("Database error: {0}")]
    Database(String),

    /// The database stayed locked past the busy timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Seed data is malformed or breaks a constraint
    #[error("Seed error: {0}")]
    Seed(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::Timeout(msg) => Self::Timeout(msg),
            other => Self::database(other.to_string()),
        }
    }
}

impl From<OperationError> for CliError {
    fn from(e: OperationError) -> Self {
        match e {
            OperationError::Timeout(msg) => Self::Timeout(msg),
            OperationError::Schema(inner) => inner.into(),
            OperationError::Sqlite(inner) => Self::database(inner.to_string()),
            seed_problem => Self::Seed(seed_problem.to_string()),
        }
    }
}
