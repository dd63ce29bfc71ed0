use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        activity::RecordActivityRequest,
        common::{ApiResponse, ListUsersParams},
        user::{CreateUserRequest, UpdateUserRequest},
    },
    models::UserProfile,
    services::ActivityOutcome,
};
use validator::Validate;

use crate::error::WebError;
use crate::extract::{ApiJson, ApiQuery};
use crate::features::now_millis;

use super::services;

#[utoipa::path(
    get,
    path = "/api/users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "Users ordered by id", body = ApiResponse<Vec<UserProfile>>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "users"
)]
pub async fn list_users(
    State(db): State<Database>,
    ApiQuery(params): ApiQuery<ListUsersParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let users = services::list_users(db.store(), &params).await?;

    Ok(Json(ApiResponse::ok(users)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found; the view is recorded as activity", body = ApiResponse<UserProfile>),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(db): State<Database>,
    Path(user_id): Path<String>,
) -> Result<Response, WebError> {
    let user = services::get_user(db.store(), &user_id, now_millis()).await?;

    Ok(Json(ApiResponse::ok(user)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserProfile>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User id already exists")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(db): State<Database>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = services::create_user(db.store(), &req, now_millis()).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User id")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated and rescored", body = ApiResponse<UserProfile>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(db): State<Database>,
    Path(user_id): Path<String>,
    ApiJson(update_req): ApiJson<UpdateUserRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_user(db.store(), &user_id, &update_req, now_millis()).await?;

    Ok(Json(ApiResponse::ok(updated)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/activity",
    params(
        ("user_id" = String, Path, description = "User id")
    ),
    request_body = RecordActivityRequest,
    responses(
        (status = 200, description = "Activity recorded", body = ApiResponse<ActivityOutcome>),
        (status = 400, description = "Missing or invalid activity type"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn record_activity(
    State(db): State<Database>,
    Path(user_id): Path<String>,
    ApiJson(req): ApiJson<RecordActivityRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let outcome =
        services::record_activity(db.store(), &user_id, &req.activity_type, now_millis()).await?;

    let message = format!(
        "Activity {} recorded for user {}",
        outcome.activity_type, outcome.user_id
    );

    Ok(Json(ApiResponse::ok(outcome).with_message(message)).into_response())
}
