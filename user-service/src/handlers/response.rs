//! Response bodies
//!
//! [`UserListResponse`] is the page object every list endpoint returns:
//!
//! ```json
//! {
//!   "users": [{ "id": 1, "firstName": "John", "lastName": "Doe", ... }],
//!   "pageNo": 0,
//!   "pageSize": 20,
//!   "totalPage": 1
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Address, Gender, User, UserStatus, UserType};
use crate::pagination::Page;

/// Public view of a user; never carries the password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<Gender>,
    pub phone: String,
    pub email: String,
    pub username: String,
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Address>,
}

impl From<User> for UserDetailResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            date_of_birth: user.date_of_birth,
            gender: user.gender,
            phone: user.phone,
            email: user.email,
            username: user.username,
            user_type: user.user_type,
            status: user.status,
            addresses: user.addresses,
        }
    }
}

impl IntoResponse for UserDetailResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// One page of users; `pageNo` is the 0-based page that was served
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserDetailResponse>,
    pub page_no: u32,
    pub page_size: u32,
    pub total_page: u64,
}

impl From<Page<User>> for UserListResponse {
    fn from(page: Page<User>) -> Self {
        let total_page = page.total_pages();
        let page = page.map(UserDetailResponse::from);
        Self {
            users: page.items,
            page_no: page.page_index,
            page_size: page.page_size,
            total_page,
        }
    }
}

impl IntoResponse for UserListResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
