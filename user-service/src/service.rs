//! User operations behind the HTTP handlers
//!
//! [`UserService`] owns the request cycle of every endpoint: validate the
//! input, run the filter pipeline where there is one (tokenize, compile,
//! normalize the page request), then call the store. Failures come back as
//! [`ApiError`] with the operation already attached.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::filter::{
    tokenize_sort_with, Dialect, MalformedPolicy, Predicate, PredicateCompiler, Tokenizer,
};
use crate::handlers::{ApiError, ApiOperation};
use crate::models::{
    CreateUserRequest, UpdateUserRequest, User, UserChanges, UserField, UserStatus,
};
use crate::pagination::{Page, PageNormalizer, PageNumbering, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::repository::{CustomizedQuery, UserRepository};

/// Paging and filter policy shared by every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub malformed: MalformedPolicy,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            malformed: MalformedPolicy::default(),
        }
    }
}

impl ServiceSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_page_size: config.pagination.default_page_size,
            max_page_size: config.pagination.max_page_size,
            malformed: config.filter.malformed,
        }
    }
}

/// Page number, page size and raw sort expressions of a list request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paging {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Vec<String>,
}

impl Paging {
    pub fn new(page: Option<i64>, size: Option<i64>) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Vec<String>) -> Self {
        self.sort = sort;
        self
    }
}

fn ensure_id(id: i64, operation: ApiOperation) -> Result<(), ApiError> {
    if id < 1 {
        return Err(
            ApiError::validation_failed("id must be greater than or equal to 1")
                .with_operation(operation),
        );
    }
    Ok(())
}

/// User operations over a [`UserRepository`]
pub struct UserService<R> {
    repository: Arc<R>,
    settings: ServiceSettings,
}

impl<R> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            settings: self.settings,
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>, settings: ServiceSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    fn normalizer(&self, numbering: PageNumbering) -> PageNormalizer {
        PageNormalizer::new(
            numbering,
            self.settings.default_page_size,
            self.settings.max_page_size,
        )
    }

    /// Validate and store a new user; returns the assigned ID
    pub async fn add_user(&self, request: CreateUserRequest) -> Result<i64, ApiError> {
        info!("Saving user");
        let new_user = request.validate()?;
        let user = self.repository.create(new_user).await?;
        info!(user_id = user.id, "User added");
        Ok(user.id)
    }

    pub async fn update_user(&self, request: UpdateUserRequest) -> Result<User, ApiError> {
        let (id, changes) = request
            .validate()
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Update))?;
        info!(user_id = id, "Updating user");
        self.repository
            .update(id, changes)
            .await
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Update))
    }

    /// Set the status from its textual name (`active`, `inactive`, `none`)
    pub async fn change_status(&self, id: i64, status: &str) -> Result<User, ApiError> {
        ensure_id(id, ApiOperation::ChangeStatus)?;
        let status: UserStatus = status
            .parse()
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::ChangeStatus))?;
        info!(user_id = id, status = %status, "Changing user status");
        self.repository
            .update(id, UserChanges::status(status))
            .await
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::ChangeStatus))
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        ensure_id(id, ApiOperation::Delete)?;
        info!(user_id = id, "Deleting user");
        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Delete))?;
        if !deleted {
            return Err(
                ApiError::not_found("User", id.to_string()).with_operation(ApiOperation::Delete)
            );
        }
        Ok(())
    }

    pub async fn get_user(&self, id: i64) -> Result<User, ApiError> {
        ensure_id(id, ApiOperation::Get)?;
        info!(user_id = id, "Getting user");
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User", id.to_string()))
    }

    /// Unfiltered page; `page` is 0-based
    pub async fn list_users(&self, paging: &Paging) -> Result<Page<User>, ApiError> {
        info!(page = ?paging.page, size = ?paging.size, "Listing users");
        self.find_page(PageNumbering::ZeroBased, &Predicate::Always, paging, ApiOperation::List)
            .await
    }

    /// Unfiltered page; `page` is 1-based
    pub async fn list_sorted_paged(&self, paging: &Paging) -> Result<Page<User>, ApiError> {
        info!(page_no = ?paging.page, page_size = ?paging.size, "Listing users sorted and paged");
        self.find_page(PageNumbering::OneBased, &Predicate::Always, paging, ApiOperation::List)
            .await
    }

    /// Search with the chained-AND dialect
    pub async fn search_with_criteria(
        &self,
        paging: &Paging,
        search: &[String],
    ) -> Result<Page<User>, ApiError> {
        self.search(Dialect::Criteria, paging, search).await
    }

    /// Search with the grouped OR/AND dialect
    pub async fn search_with_specifications(
        &self,
        paging: &Paging,
        search: &[String],
    ) -> Result<Page<User>, ApiError> {
        self.search(Dialect::Specification, paging, search).await
    }

    /// Search with either dialect; `page` is 0-based
    ///
    /// With the lenient policy, expressions that do not parse are dropped,
    /// so a request whose every expression is malformed lists all users.
    pub async fn search(
        &self,
        dialect: Dialect,
        paging: &Paging,
        search: &[String],
    ) -> Result<Page<User>, ApiError> {
        let atoms = Tokenizer::new(dialect).tokenize_with(search, self.settings.malformed)?;
        let predicate = PredicateCompiler::<UserField>::new(dialect).compile(&atoms)?;
        info!(
            dialect = ?dialect,
            expressions = search.len(),
            atoms = atoms.len(),
            "Searching users"
        );
        self.find_page(PageNumbering::ZeroBased, &predicate, paging, ApiOperation::Search)
            .await
    }

    /// Fixed-parameter query ordered by descending ID; `page` is 0-based
    pub async fn customized_query(
        &self,
        query: &CustomizedQuery,
        paging: &Paging,
    ) -> Result<Page<User>, ApiError> {
        info!(
            first_name = ?query.first_name,
            last_name = ?query.last_name,
            gender = ?query.gender,
            "Listing users by customized query"
        );
        let normalized = self
            .normalizer(PageNumbering::ZeroBased)
            .normalize::<UserField>(paging.page, paging.size, &[])?;
        let request = query.page_request(normalized.page_index, normalized.page_size);
        self.repository
            .find_page(&query.predicate(), &request)
            .await
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Search))
    }

    async fn find_page(
        &self,
        numbering: PageNumbering,
        predicate: &Predicate<UserField>,
        paging: &Paging,
        operation: ApiOperation,
    ) -> Result<Page<User>, ApiError> {
        let sort = tokenize_sort_with(&paging.sort, self.settings.malformed)
            .map_err(|e| ApiError::from(e).with_operation(operation))?;
        let request = self
            .normalizer(numbering)
            .normalize(paging.page, paging.size, &sort)
            .map_err(|e| ApiError::from(e).with_operation(operation))?;
        self.repository
            .find_page(predicate, &request)
            .await
            .map_err(|e| ApiError::from(e).with_operation(operation))
    }
}
