//! API error types for handler operations
//!
//! Every failure a handler can produce ends up as an [`ApiError`], which maps
//! itself to an HTTP status and a JSON body via `IntoResponse`.
//!
//! # Example
//!
//! ```rust
//! use user_service::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("User", "42");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.entity_id, Some("42".to_string()));
//! ```

use std::fmt;

use axum::{
    extract::{
        path::ErrorKind as PathErrorKind,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::filter::FilterError;
use crate::models::{UnknownVariant, ValidationError};
use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing users without filters
    List,
    /// Searching users with filter expressions
    Search,
    /// Getting a single user by ID
    Get,
    /// Creating a new user
    Create,
    /// Updating an existing user
    Update,
    /// Changing the status of a user
    ChangeStatus,
    /// Deleting a user
    Delete,
    /// Checking that the store is reachable
    Ready,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Search => write!(f, "search"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::ChangeStatus => write!(f, "change_status"),
            Self::Delete => write!(f, "delete"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Entity was not found
    NotFound,
    /// Entity already exists
    AlreadyExists,
    /// Request body validation failed
    ValidationFailed,
    /// Filter or sort expression could not be compiled
    InvalidFilter,
    /// Invalid request format or parameters
    BadRequest,
    /// Operation conflicts with current state
    Conflict,
    /// Internal server error
    InternalError,
    /// Service temporarily unavailable
    ServiceUnavailable,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::InvalidFilter => write!(f, "invalid_filter"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::Conflict => write!(f, "conflict"),
            Self::InternalError => write!(f, "internal_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::Conflict => StatusCode::CONFLICT,
            Self::ValidationFailed | Self::InvalidFilter | Self::BadRequest => {
                StatusCode::BAD_REQUEST
            }
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        format!("{}", self).to_uppercase()
    }
}

/// Structured API error with operation context
///
/// Besides the entity involved, filter failures carry the offending field
/// and raw value so the caller can correct the expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
    /// Field named by a rejected filter or sort expression
    pub field: Option<String>,
    /// Raw value or expression that was rejected
    pub value: Option<String>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
            field: None,
            value: None,
        }
    }

    /// Create a "not found" error with entity context
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::NotFound, "Entity not found")
            .with_entity(entity_type, entity_id)
    }

    /// Create an "already exists" error with entity context
    pub fn already_exists(entity_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::new(
            ApiOperation::Create,
            ApiErrorKind::AlreadyExists,
            "Entity already exists",
        )
        .with_entity(entity_type, identifier)
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Create, ApiErrorKind::ValidationFailed, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::List, ApiErrorKind::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::InternalError, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Ready, ApiErrorKind::ServiceUnavailable, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    pub fn is_retriable(&self) -> bool {
        matches!(self.kind, ApiErrorKind::ServiceUnavailable)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub(crate) error: String,
    pub(crate) code: String,
    pub(crate) status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let code = self.kind.error_code();

        if status.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                retriable = self.is_retriable(),
                "API error: {}", self.message
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                entity_id = ?self.entity_id,
                field = ?self.field,
                value = ?self.value,
                "API error: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            error: self.message,
            code,
            status: status.as_u16(),
            operation: Some(self.operation.to_string()),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            field: self.field,
            value: self.value,
        };

        (status, Json(response)).into_response()
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::Ping => ApiOperation::Ready,
        RepositoryOperation::FindById => ApiOperation::Get,
        RepositoryOperation::FindPage => ApiOperation::List,
        RepositoryOperation::Create => ApiOperation::Create,
        RepositoryOperation::Update => ApiOperation::Update,
        RepositoryOperation::Delete => ApiOperation::Delete,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);

        let kind = match err.kind {
            RepositoryErrorKind::NotFound => ApiErrorKind::NotFound,
            RepositoryErrorKind::AlreadyExists => ApiErrorKind::AlreadyExists,
            RepositoryErrorKind::ConstraintViolation => ApiErrorKind::Conflict,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout => {
                ApiErrorKind::ServiceUnavailable
            }
            RepositoryErrorKind::DatabaseError | RepositoryErrorKind::SerializationError => {
                ApiErrorKind::InternalError
            }
        };

        // Store internals stay out of the response body
        let message = match kind {
            ApiErrorKind::ServiceUnavailable => "Service temporarily unavailable".to_string(),
            ApiErrorKind::InternalError => "An internal error occurred".to_string(),
            _ => err.message,
        };

        Self {
            operation,
            kind,
            message,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
            field: None,
            value: None,
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        Self {
            field: err.field().map(str::to_string),
            value: err.value().map(str::to_string),
            ..Self::new(ApiOperation::Search, ApiErrorKind::InvalidFilter, err.to_string())
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::validation_failed(err.0)
    }
}

impl From<UnknownVariant> for ApiError {
    fn from(err: UnknownVariant) -> Self {
        let mut error = Self::bad_request(err.to_string());
        error.field = Some(err.field.to_string());
        error.value = Some(err.value);
        error
    }
}

/// Prefix axum puts in front of `serde_path_to_error` output
const JSON_DATA_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            // Well-formed JSON that does not fit the request type, e.g. an unknown enum name
            JsonRejection::JsonDataError(_) => {
                let mut error = Self::validation_failed(message.clone());
                error.field = json_error_path(&message).map(str::to_string);
                error
            }
            _ => Self::bad_request(message).with_operation(ApiOperation::Create),
        }
    }
}

/// Field path of a JSON data error, `None` for errors at the document root
fn json_error_path(message: &str) -> Option<&str> {
    let (path, _) = message.strip_prefix(JSON_DATA_PREFIX)?.split_once(": ")?;
    (path != "." && !path.contains(' ')).then_some(path)
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        let mut error = Self::bad_request(rejection.body_text()).with_operation(ApiOperation::Get);
        if let PathRejection::FailedToDeserializePathParams(inner) = &rejection {
            match inner.kind() {
                PathErrorKind::ParseErrorAtKey { key, value, .. } => {
                    error.field = Some(key.clone());
                    error.value = Some(value.clone());
                }
                PathErrorKind::ParseError { value, .. } => {
                    error.field = Some("id".to_string());
                    error.value = Some(value.clone());
                }
                _ => {}
            }
        }
        error
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
