// HTTP handlers for authentication endpoints

use axum::{extract::State, Json};

use crate::auth::models::{LoginRequest, LoginResponse};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;

/// Login a user
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 401, description = "Wrong email or password", body = String, example = json!({"error": "Email and Password dont match."})),
        (status = 422, description = "Missing or malformed fields", body = ValidationErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}
