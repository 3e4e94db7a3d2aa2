//! Startup and infrastructure errors
//!
//! Request-level failures are [`ApiError`](crate::handlers::ApiError)s; this
//! type covers what can go wrong while loading configuration, connecting to
//! the database and serving.

use thiserror::Error;

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Could not open a connection pool
    #[cfg(feature = "database")]
    #[error("Failed to connect to database at '{url}' ({category}): {source}")]
    Connect {
        url: String,
        category: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
