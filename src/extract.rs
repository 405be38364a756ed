// Request extractors for the JSON API
// Body and path rejections are answered in the API's own error format

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;
use crate::validation;

/// A request DTO whose fields are all optional strings
pub trait RequestBody: DeserializeOwned + Validate + Send {
    /// Fields read from the body, in declaration order
    const FIELDS: &'static [&'static str];

    /// Trim text fields and treat empty values as missing
    fn normalized(self) -> Self;
}

/// JSON body extractor
///
/// A missing, empty or malformed body is read as `{}`, so every required
/// field is reported as missing. A known field holding a non-string value
/// is reported as `The <field> must be a string.` together with the other
/// field errors of the request. Neither case reaches the handler.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: RequestBody,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = match Bytes::from_request(req, state).await {
            Ok(bytes) => bytes,
            Err(rejection) => {
                warn!("Unreadable request body: {}", rejection);
                Bytes::new()
            }
        };

        parse_body(&bytes).map(JsonBody)
    }
}

fn parse_body<T: RequestBody>(bytes: &[u8]) -> Result<T, ApiError> {
    let mut object = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(object)) => object,
        Ok(_) | Err(_) => {
            debug!("Request body is not a JSON object; reading it as empty");
            Map::new()
        }
    };

    let mut mistyped = Vec::new();
    for &field in T::FIELDS {
        if matches!(object.get(field), Some(value) if !value.is_string() && !value.is_null()) {
            object.remove(field);
            mistyped.push(field);
        }
    }

    let body: T = serde_json::from_value(Value::Object(object))
        .map_err(|e| ApiError::Internal(format!("request body rebuild failed: {}", e)))?;
    if mistyped.is_empty() {
        return Ok(body);
    }

    // Type errors replace whatever else was found on the same field
    let mut errors = ValidationErrors::new();
    for &field in &mistyped {
        errors.add(field, validation::must_be_string(field));
    }
    if let Err(other) = body.normalized().validate() {
        for (field, field_errors) in other.field_errors() {
            if mistyped.contains(&field) {
                continue;
            }
            for error in field_errors.iter().cloned() {
                errors.add(field, error);
            }
        }
    }
    Err(ApiError::Validation(errors))
}

/// Numeric user id taken from the path
///
/// An id that does not parse cannot name a user, so it is reported as
/// not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<i64>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| UserId(id))
            .map_err(|rejection| {
                debug!("Unusable user id in {}: {}", parts.uri.path(), rejection);
                ApiError::NotFound
            })
    }
}
