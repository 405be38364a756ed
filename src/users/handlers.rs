// HTTP handlers for user endpoints
// Every route here sits behind the auth gate installed in create_router

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::extract::{JsonBody, UserId};
use crate::users::models::{
    ChangePasswordRequest, CreateUserRequest, MessageResponse, UpdateUserRequest, UserEnvelope,
    UserListResponse, SUCCESS,
};
use crate::AppState;

/// Handler for GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = UserListResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse, example = json!({"message": "Unauthenticated."}))
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
) -> Result<Json<UserListResponse>, ApiError> {
    tracing::debug!("User {} listing users", caller.user_id);

    let users = state.user_service.list().await?;
    Ok(Json(UserListResponse {
        status: SUCCESS.to_string(),
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// Handler for GET /api/users/:id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserEnvelope),
        (status = 401, description = "Missing or invalid token", body = MessageResponse, example = json!({"message": "Unauthenticated."})),
        (status = 404, description = "User not found", body = MessageResponse, example = json!({"message": "User Not Found"}))
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    UserId(id): UserId,
) -> Result<Json<UserEnvelope>, ApiError> {
    tracing::debug!("User {} fetching user {}", caller.user_id, id);

    let user = state.user_service.get(id).await?;
    Ok(Json(UserEnvelope::new(user)))
}

/// Handler for POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 401, description = "Missing or invalid token", body = MessageResponse, example = json!({"message": "Unauthenticated."})),
        (status = 422, description = "Invalid input or email already taken", body = ValidationErrorResponse),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Server error"}))
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    tracing::debug!("User {} creating a user", caller.user_id);

    let user = state.user_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope::with_message(user, "User created successfully")),
    ))
}

/// Handler for PUT /api/users/:id
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 401, description = "Missing or invalid token", body = MessageResponse, example = json!({"message": "Unauthenticated."})),
        (status = 404, description = "User not found", body = MessageResponse, example = json!({"message": "User Not Found"})),
        (status = 422, description = "Invalid input", body = ValidationErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    UserId(id): UserId,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    tracing::debug!("User {} updating user {}", caller.user_id, id);

    let user = state.user_service.update(id, payload).await?;
    Ok(Json(UserEnvelope::with_message(
        user,
        "User updated successfully",
    )))
}

/// Handler for DELETE /api/users/:id
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted; body holds its last known values", body = UserEnvelope),
        (status = 401, description = "Missing or invalid token", body = MessageResponse, example = json!({"message": "Unauthenticated."})),
        (status = 404, description = "User not found", body = MessageResponse, example = json!({"message": "User Not Found"}))
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    UserId(id): UserId,
) -> Result<Json<UserEnvelope>, ApiError> {
    tracing::debug!("User {} deleting user {}", caller.user_id, id);

    let user = state.user_service.delete(id).await?;
    Ok(Json(UserEnvelope::with_message(
        user,
        "User deleted successfully",
    )))
}

/// Handler for POST /api/users/:id/change-password
#[utoipa::path(
    post,
    path = "/api/users/{id}/change-password",
    params(("id" = i64, Path, description = "User ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse, example = json!({"message": "Password Changed Successfully"})),
        (status = 401, description = "Missing or invalid token", body = MessageResponse, example = json!({"message": "Unauthenticated."})),
        (status = 404, description = "User not found", body = MessageResponse, example = json!({"message": "User Not Found"})),
        (status = 422, description = "Invalid input", body = ValidationErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn change_password(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    UserId(id): UserId,
    payload: Result<JsonBody<ChangePasswordRequest>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    tracing::debug!("User {} changing password of user {}", caller.user_id, id);

    // A missing user is reported before anything about the body
    let JsonBody(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            state.user_service.get(id).await?;
            return Err(rejection);
        }
    };

    state.user_service.change_password(id, payload).await?;
    Ok(Json(MessageResponse {
        message: "Password Changed Successfully".to_string(),
    }))
}
