//! Uniform response envelope for every `/api` endpoint.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response envelope.
///
/// `status_code` is the logical outcome. It matches the HTTP status except
/// for `204`, which is sent over HTTP 200 so the body survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub is_success: bool,
    pub errors: Vec<String>,
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(result: T) -> Self {
        Self::success(StatusCode::OK, Some(result))
    }

    pub fn created(result: T) -> Self {
        Self::success(StatusCode::CREATED, Some(result))
    }

    /// Successful mutation with nothing to return.
    pub fn no_content() -> Self {
        Self::success(StatusCode::NO_CONTENT, None)
    }

    /// Failure envelope; an empty `errors` list is replaced by the status reason.
    pub fn failure(status: StatusCode, mut errors: Vec<String>) -> Self {
        if errors.is_empty() {
            errors.push(
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
            );
        }
        Self {
            status_code: status.as_u16(),
            is_success: false,
            errors,
            result: None,
        }
    }

    fn success(status: StatusCode, result: Option<T>) -> Self {
        Self {
            status_code: status.as_u16(),
            is_success: true,
            errors: Vec::new(),
            result,
        }
    }

    fn http_status(&self) -> StatusCode {
        match StatusCode::from_u16(self.status_code) {
            Ok(StatusCode::NO_CONTENT) => StatusCode::OK,
            Ok(status) => status,
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self)).into_response()
    }
}

/// 201 response carrying a `Location` header next to the envelope.
#[derive(Debug)]
pub struct Created<T> {
    location: String,
    body: ApiResponse<T>,
}

impl<T> Created<T> {
    pub fn new(location: impl Into<String>, result: T) -> Self {
        Self {
            location: location.into(),
            body: ApiResponse::created(result),
        }
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = self.body.into_response();
        if let Ok(location) = HeaderValue::from_str(&self.location) {
            response.headers_mut().insert(header::LOCATION, location);
        }
        response
    }
}
