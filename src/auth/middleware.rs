// Authentication gate for protected routes

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{error::AuthError, token::TokenService};
use crate::error::ApiError;
use crate::AppState;

/// Identity resolved from a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
}

/// Resolve the `Authorization: Bearer <token>` header to an identity
///
/// Fails closed: a missing header, a non-bearer scheme, an empty token and
/// any verification failure all produce an error.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> Result<AuthenticatedUser, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let (scheme, token) = auth_header
        .split_once(' ')
        .ok_or(AuthError::InvalidToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidToken);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    let claims = tokens.validate_token(token)?;
    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// Middleware placed in front of every protected handler
///
/// On success the resolved `AuthenticatedUser` is stored in the request
/// extensions; on failure the request never reaches the handler and a
/// uniform 401 is returned.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let endpoint = request.uri().path().to_string();

    let user = authenticate(request.headers(), &state.token_service).map_err(|e| {
        warn!("Rejected request to {}: {}", endpoint, e);
        ApiError::Unauthenticated
    })?;

    debug!("Authenticated user_id={} for {}", user.user_id, endpoint);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Extractor for the identity attached by `require_auth`
///
/// Used outside the gate it rejects, so a handler can never run
/// anonymously by accident.
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(ApiError::Unauthenticated)
    }
}
