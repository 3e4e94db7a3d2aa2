//! User persistence
//!
//! - [`UserRepository`]: the store interface the service depends on
//! - [`InMemoryUserRepository`]: map-backed store used without a database
//! - [`PgUserRepository`]: PostgreSQL store (requires the `database` feature)
//! - [`CustomizedQuery`]: the fixed-shape first name / last name / gender query

mod customized;
mod error;
mod memory;
#[cfg(feature = "database")]
mod postgres;
mod traits;

pub use customized::CustomizedQuery;
pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryUserRepository;
#[cfg(feature = "database")]
pub use postgres::PgUserRepository;
pub use traits::{RepositoryResult, UserRepository};

#[cfg(test)]
pub(crate) use memory::tests::seeded;
