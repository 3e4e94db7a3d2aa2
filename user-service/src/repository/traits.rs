//! Repository trait definitions
//!
//! The store is a single trait with RPITIT (Return Position Impl Trait In
//! Traits) methods, so handlers can be generic over the backing store
//! without `async_trait`.

use std::future::Future;

use super::error::RepositoryError;
use crate::filter::Predicate;
use crate::models::{NewUser, User, UserChanges, UserField};
use crate::pagination::{Page, PageRequest};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Queryable store of users
///
/// Implementations must evaluate a [`Predicate`] exactly like
/// [`Predicate::matches`] does and return pages in the order given by the
/// [`PageRequest`] sort keys, breaking ties by ascending `id`. Text compares
/// byte-wise, enums by name and absent values sort last in ascending order.
pub trait UserRepository: Send + Sync + 'static {
    /// Check that the store is reachable
    fn ping(&self) -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Find a user by ID
    fn find_by_id(&self, id: i64) -> impl Future<Output = RepositoryResult<Option<User>>> + Send;

    /// Find one page of users matching the predicate, plus the total match count
    fn find_page(
        &self,
        predicate: &Predicate<UserField>,
        page: &PageRequest<UserField>,
    ) -> impl Future<Output = RepositoryResult<Page<User>>> + Send;

    /// Insert a user and return the stored record
    ///
    /// Fails with `AlreadyExists` when the username or email is taken.
    fn create(&self, user: NewUser) -> impl Future<Output = RepositoryResult<User>> + Send;

    /// Apply changes to an existing user
    ///
    /// Fails with `NotFound` when the user does not exist.
    fn update(
        &self,
        id: i64,
        changes: UserChanges,
    ) -> impl Future<Output = RepositoryResult<User>> + Send;

    /// Delete a user; returns `false` if it did not exist
    fn delete(&self, id: i64) -> impl Future<Output = RepositoryResult<bool>> + Send;
}
