//! `/user` endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::error::{ApiError, ApiOperation};
use super::query::ListQuery;
use super::response::{UserDetailResponse, UserListResponse};
use crate::models::{CreateUserRequest, UpdateUserRequest};
use crate::repository::UserRepository;
use crate::state::AppState;

/// `POST /user/add`; responds with the new user ID
pub async fn add_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<i64>), ApiError> {
    let Json(request) = body?;
    let id = state.users().add_user(request).await?;
    Ok((StatusCode::CREATED, Json(id)))
}

/// `PUT /user/upd`
pub async fn update_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = body
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Update))?;
    state.users().update_user(request).await?;
    Ok(StatusCode::ACCEPTED)
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusParams {
    pub status: String,
}

/// `PATCH /user/{id}/change-status?status=`
pub async fn change_status<R: UserRepository>(
    State(state): State<AppState<R>>,
    path: Result<Path<i64>, PathRejection>,
    params: Result<Query<ChangeStatusParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let on_change_status = |e: ApiError| e.with_operation(ApiOperation::ChangeStatus);
    let Path(id) = path.map_err(|e| on_change_status(e.into()))?;
    let Query(params) = params.map_err(|e| on_change_status(e.into()))?;
    state.users().change_status(id, &params.status).await?;
    Ok(StatusCode::ACCEPTED)
}

/// `DELETE /user/del/{id}`
pub async fn delete_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Delete))?;
    state.users().delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /user/{id}`
pub async fn get_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<UserDetailResponse, ApiError> {
    let Path(id) = path?;
    let user = state.users().get_user(id).await?;
    Ok(user.into())
}

/// `GET /user/list?page=&size=&sort=`
pub async fn list_users<R: UserRepository>(
    State(state): State<AppState<R>>,
    query: ListQuery,
) -> Result<UserListResponse, ApiError> {
    let paging = query.paging("page", "size")?;
    let page = state.users().list_users(&paging).await?;
    Ok(page.into())
}

/// `GET /user/list-sorted-paged?pageNo=&pageSize=&sort=`; `pageNo` is 1-based
pub async fn list_sorted_paged<R: UserRepository>(
    State(state): State<AppState<R>>,
    query: ListQuery,
) -> Result<UserListResponse, ApiError> {
    let paging = query.paging("pageNo", "pageSize")?;
    let page = state.users().list_sorted_paged(&paging).await?;
    Ok(page.into())
}

/// `GET /user/search-with-criteria?search=...`
pub async fn search_with_criteria<R: UserRepository>(
    State(state): State<AppState<R>>,
    query: ListQuery,
) -> Result<UserListResponse, ApiError> {
    let paging = query.paging("page", "size")?;
    let page = state
        .users()
        .search_with_criteria(&paging, &query.all("search"))
        .await?;
    Ok(page.into())
}

/// `GET /user/search-with-specifications?search=...`
pub async fn search_with_specifications<R: UserRepository>(
    State(state): State<AppState<R>>,
    query: ListQuery,
) -> Result<UserListResponse, ApiError> {
    let paging = query.paging("page", "size")?;
    let page = state
        .users()
        .search_with_specifications(&paging, &query.all("search"))
        .await?;
    Ok(page.into())
}

/// `GET /user/list-sorted-paged-by-customize-query`; `pageNo` is 0-based
pub async fn customized_query<R: UserRepository>(
    State(state): State<AppState<R>>,
    query: ListQuery,
) -> Result<UserListResponse, ApiError> {
    let customized = query.customized()?;
    let paging = query.paging("pageNo", "pageSize")?;
    let page = state.users().customized_query(&customized, &paging).await?;
    Ok(page.into())
}
