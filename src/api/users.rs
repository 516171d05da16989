//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{CreateUser, LoginRequest, UpdateUser, User, UserSummary},
};

use super::JsonBody;

/// Confirmation message with the short user representation
#[derive(Serialize, ToSchema)]
pub struct UserSummaryResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Confirmation message with the full user representation
#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

/// List every user, passwords are never included
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "List of users", body = Vec<User>),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(State(state): State<crate::AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list_users().await?;
    Ok(Json(users))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_user(&id).await?;
    Ok(Json(user))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserSummaryResponse),
        (status = 400, description = "Missing fields or email already registered", body = crate::error::ErrorResponse),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    WithRejection(Json(user), _): JsonBody<CreateUser>,
) -> AppResult<(StatusCode, Json<UserSummaryResponse>)> {
    let created = state.services.users.create_user(user).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserSummaryResponse {
            message: "User created successfully".to_string(),
            user: created,
        }),
    ))
}

/// Update an existing user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Email already in use", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    WithRejection(Json(user), _): JsonBody<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let updated = state.services.users.update_user(&id, user).await?;
    Ok(Json(UserResponse {
        message: "User updated successfully".to_string(),
        user: updated,
    }))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = UserSummaryResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserSummaryResponse>> {
    let deleted = state.services.users.delete_user(&id).await?;
    Ok(Json(UserSummaryResponse {
        message: "User deleted successfully".to_string(),
        user: deleted,
    }))
}

/// Verify a user's password
///
/// Plain confirmation only, no token or session is created.
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserSummaryResponse),
        (status = 400, description = "Missing email or password", body = crate::error::ErrorResponse),
        (status = 401, description = "Incorrect password", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    WithRejection(Json(request), _): JsonBody<LoginRequest>,
) -> AppResult<Json<UserSummaryResponse>> {
    let user = state.services.users.login(request).await?;
    Ok(Json(UserSummaryResponse {
        message: "Login successful".to_string(),
        user,
    }))
}
