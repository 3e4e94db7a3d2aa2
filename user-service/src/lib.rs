//! # user-service
//!
//! User directory REST service with a dynamic filter and pagination engine.
//!
//! ## Features
//!
//! - **CRUD**: create, read, update, change status and delete users with addresses
//! - **Filter engine**: `field<op>value` expressions in two dialects, compiled to
//!   typed predicates evaluated in memory or rendered as SQL
//! - **Pagination**: normalized page index/size plus multi-field sorting
//! - **Storage**: PostgreSQL (sqlx) or an in-memory store
//! - **Middleware stack**: request IDs, CORS, compression, timeouts, body limits, panic recovery
//! - **Health checks**: liveness and readiness probes
//! - **Graceful shutdown**: Proper signal handling (SIGTERM, SIGINT)
//!
//! ## Example
//!
//! ```rust,no_run
//! use user_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::new(config.clone(), InMemoryUserRepository::new());
//!
//!     Server::new(config).serve(router(state)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod health;
pub mod models;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;

#[cfg(feature = "database")]
pub mod database;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::filter::{Dialect, FilterError, MalformedPolicy, Predicate};
    pub use crate::handlers::{ApiError, ApiErrorKind, ApiOperation};
    pub use crate::health::{health, readiness};
    pub use crate::models::{Gender, User, UserField, UserStatus, UserType};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::pagination::Page;
    pub use crate::repository::{InMemoryUserRepository, UserRepository};
    pub use crate::server::{router, Server};
    pub use crate::service::{Paging, UserService};
    pub use crate::state::AppState;

    #[cfg(feature = "database")]
    pub use crate::database::create_pool;

    #[cfg(feature = "database")]
    pub use crate::repository::PgUserRepository;
}
