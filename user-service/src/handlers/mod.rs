//! HTTP handlers for the `/user` resource
//!
//! Handlers only extract parameters and shape responses; the work happens in
//! [`UserService`](crate::service::UserService).
//!
//! # Endpoints
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | `POST` | `/user/add` | 201, new ID |
//! | `PUT` | `/user/upd` | 202 |
//! | `PATCH` | `/user/{id}/change-status?status=` | 202 |
//! | `DELETE` | `/user/del/{id}` | 204 |
//! | `GET` | `/user/{id}` | 200, [`UserDetailResponse`] |
//! | `GET` | `/user/list` | 200, [`UserListResponse`] |
//! | `GET` | `/user/list-sorted-paged` | 200, [`UserListResponse`] |
//! | `GET` | `/user/search-with-criteria` | 200, [`UserListResponse`] |
//! | `GET` | `/user/search-with-specifications` | 200, [`UserListResponse`] |
//! | `GET` | `/user/list-sorted-paged-by-customize-query` | 200, [`UserListResponse`] |
//!
//! Failures are returned as [`ApiError`] bodies:
//!
//! ```json
//! { "error": "unknown field 'salary'", "code": "INVALID_FILTER", "status": 400,
//!   "operation": "search", "field": "salary" }
//! ```

mod error;
mod query;
mod response;
mod users;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::repository::UserRepository;
use crate::state::AppState;

pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use query::ListQuery;
pub use response::{UserDetailResponse, UserListResponse};

/// Routes of the `/user` resource
pub fn user_routes<R: UserRepository>() -> Router<AppState<R>> {
    Router::new()
        .route("/user/add", post(users::add_user::<R>))
        .route("/user/upd", put(users::update_user::<R>))
        .route("/user/{id}/change-status", patch(users::change_status::<R>))
        .route("/user/del/{id}", delete(users::delete_user::<R>))
        .route("/user/{id}", get(users::get_user::<R>))
        .route("/user/list", get(users::list_users::<R>))
        .route("/user/list-sorted-paged", get(users::list_sorted_paged::<R>))
        .route("/user/search-with-criteria", get(users::search_with_criteria::<R>))
        .route(
            "/user/search-with-specifications",
            get(users::search_with_specifications::<R>),
        )
        .route(
            "/user/list-sorted-paged-by-customize-query",
            get(users::customized_query::<R>),
        )
}
