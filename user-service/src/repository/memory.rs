//! In-memory user store
//!
//! Used when no database is configured and by the handler tests. Filtering
//! goes through [`Predicate::matches`], so results agree with the SQL store.

use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{RepositoryResult, UserRepository};
use crate::filter::Predicate;
use crate::models::{NewUser, User, UserChanges, UserField};
use crate::pagination::{Page, PageRequest};

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

/// Users kept in a map behind an async `RwLock`, with sequential IDs
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<Inner>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn ensure_unique<'a>(
    mut others: impl Iterator<Item = &'a User>,
    username: Option<&str>,
    email: Option<&str>,
    operation: RepositoryOperation,
) -> RepositoryResult<()> {
    let clash = others.find_map(|u| {
        if username.is_some_and(|name| u.username == name) {
            Some(u.username.clone())
        } else if email.is_some_and(|email| u.email == email) {
            Some(u.email.clone())
        } else {
            None
        }
    });
    match clash {
        Some(value) => Err(RepositoryError::already_exists("User", value).with_operation(operation)),
        None => Ok(()),
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_page(
        &self,
        predicate: &Predicate<UserField>,
        page: &PageRequest<UserField>,
    ) -> RepositoryResult<Page<User>> {
        let inner = self.inner.read().await;
        let mut matched: Vec<&User> = inner
            .users
            .values()
            .filter(|user| predicate.matches(*user))
            .collect();
        // Stable sort keeps ascending id order for ties.
        matched.sort_by(|a, b| page.compare(*a, *b));

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(Page::new(items, page.page_index, page.page_size, total))
    }

    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let mut inner = self.inner.write().await;
        ensure_unique(
            inner.users.values(),
            Some(user.username.as_str()),
            Some(user.email.as_str()),
            RepositoryOperation::Create,
        )?;

        inner.last_id += 1;
        let now = Utc::now();
        let stored = User {
            id: inner.last_id,
            first_name: user.first_name,
            last_name: user.last_name,
            date_of_birth: user.date_of_birth,
            gender: user.gender,
            phone: user.phone,
            email: user.email,
            username: user.username,
            password: user.password,
            user_type: user.user_type,
            status: user.status,
            addresses: user.addresses,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> RepositoryResult<User> {
        let mut inner = self.inner.write().await;
        ensure_unique(
            inner.users.values().filter(|u| u.id != id),
            None,
            changes.email.as_deref(),
            RepositoryOperation::Update,
        )?;

        let user = inner.users.get_mut(&id).ok_or_else(|| {
            RepositoryError::not_found("User", id.to_string())
                .with_operation(RepositoryOperation::Update)
        })?;
        changes.apply(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.inner.write().await.users.remove(&id).is_some())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::filter::{Dialect, PredicateCompiler, SortAtom, SortDirection, Tokenizer};
    use crate::models::{Gender, UserStatus, UserType};
    use crate::pagination::{PageNormalizer, PageNumbering};
    use crate::repository::RepositoryErrorKind;

    fn new_user(first: &str, last: &str, gender: Gender) -> NewUser {
        let username = format!("{}.{}", first, last).to_lowercase();
        NewUser {
            first_name: first.to_string(),
            last_name: last.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender: Some(gender),
            phone: "0123456789".to_string(),
            email: format!("{}@example.com", username),
            username,
            password: "secret".to_string(),
            user_type: Some(UserType::User),
            status: UserStatus::None,
            addresses: Vec::new(),
        }
    }

    /// John Doe, Jane Doe, Alice Smith, Bob Stone (ids 1 to 4)
    pub(crate) async fn seeded() -> InMemoryUserRepository {
        let repo = InMemoryUserRepository::new();
        for user in [
            new_user("John", "Doe", Gender::Male),
            new_user("Jane", "Doe", Gender::Female),
            new_user("Alice", "Smith", Gender::Female),
            new_user("Bob", "Stone", Gender::Male),
        ] {
            repo.create(user).await.unwrap();
        }
        repo
    }

    fn request(size: i64, sort: &[SortAtom]) -> PageRequest<UserField> {
        PageNormalizer::new(PageNumbering::ZeroBased, 20, 100)
            .normalize(Some(0), Some(size), sort)
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = seeded().await;
        assert_eq!(repo.len().await, 4);
        let bob = repo.find_by_id(4).await.unwrap().unwrap();
        assert_eq!(bob.first_name, "Bob");
        assert_eq!(bob.status, UserStatus::None);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let repo = seeded().await;
        let err = repo
            .create(new_user("John", "Doe", Gender::Male))
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_find_page_filters_sorts_and_counts() {
        let repo = seeded().await;
        let atoms = Tokenizer::new(Dialect::Criteria).tokenize(["lastName~%o%"]);
        let predicate = PredicateCompiler::new(Dialect::Criteria).compile(&atoms).unwrap();
        let page = repo
            .find_page(
                &predicate,
                &request(2, &[SortAtom::new("firstName", SortDirection::Desc)]),
            )
            .await
            .unwrap();

        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages(), 2);
        let names: Vec<&str> = page.items.iter().map(|u| u.first_name.as_str()).collect();
        assert_eq!(names, vec!["John", "Jane"]);
    }

    #[tokio::test]
    async fn test_unsorted_page_is_in_id_order() {
        let repo = seeded().await;
        let page = repo
            .find_page(&Predicate::Always, &request(3, &[]))
            .await
            .unwrap();
        let ids: Vec<i64> = page.items.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = seeded().await;
        let updated = repo
            .update(2, UserChanges::status(UserStatus::Active))
            .await
            .unwrap();
        assert_eq!(updated.status, UserStatus::Active);

        let missing = repo.update(99, UserChanges::default()).await.unwrap_err();
        assert_eq!(missing.kind, RepositoryErrorKind::NotFound);

        assert!(repo.delete(2).await.unwrap());
        assert!(!repo.delete(2).await.unwrap());
        assert!(repo.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_taken_email() {
        let repo = seeded().await;
        let changes = UserChanges {
            email: Some("john.doe@example.com".to_string()),
            ..UserChanges::default()
        };
        let err = repo.update(2, changes).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::AlreadyExists);
    }
}
