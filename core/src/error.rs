use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("No connection pool available for driver")]
    NoPoolAvailable,
    /// Required construction parameter is missing or empty
    #[error("Missing construct parameter: {0}")]
    MissingParameter(&'static str),
    /// Generic error message for compatibility
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DbError>;
