//! Error handling for the HTTP layer.
//!
//! `AppError` renders as a failure envelope, and `global_error_handler`
//! wraps framework-generated error responses (path rejections, 405s, 408s) in the
//! same envelope so clients only ever see one error shape.

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::ApiResponse;
use crate::error::AppError;

/// Framework error bodies are short plain-text messages.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);

        if status.is_server_error() {
            tracing::error!(error = ?self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        ApiResponse::<()>::failure(status, self.client_messages()).into_response()
    }
}

/// Maps an AppError variant to its HTTP status code.
///
/// # Status Code Mapping
/// - NotFound → 404
/// - Duplicate, Validation, ValidationErrors, BadRequest → 400
/// - Database, Configuration, Internal → 500
/// - ConnectionPool → 503
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. }
        | AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Rewrites non-JSON 4xx/5xx responses into the response envelope.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let original_message = to_bytes(body, MAX_ERROR_BODY_BYTES)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_default();

    // server-side text may carry internals
    let message = if original_message.is_empty() || status.is_server_error() {
        default_message(status).to_string()
    } else {
        original_message
    };

    let mut headers = parts.headers;
    headers.remove(header::CONTENT_TYPE);
    headers.remove(header::CONTENT_LENGTH);

    let mut rewritten = ApiResponse::<()>::failure(status, vec![message]).into_response();
    rewritten.headers_mut().extend(headers);
    rewritten
}

/// Envelope for requests that match no route.
pub async fn not_found_fallback() -> Response {
    ApiResponse::<()>::failure(
        StatusCode::NOT_FOUND,
        vec![default_message(StatusCode::NOT_FOUND).to_string()],
    )
    .into_response()
}

fn is_json(response: &Response<Body>) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Bad request - invalid or malformed request",
        StatusCode::NOT_FOUND => "The requested resource was not found",
        StatusCode::METHOD_NOT_ALLOWED => "HTTP method not allowed for this endpoint",
        StatusCode::REQUEST_TIMEOUT => "Request timed out",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "Unsupported media type",
        StatusCode::PAYLOAD_TOO_LARGE => "Request payload too large",
        StatusCode::SERVICE_UNAVAILABLE => "Service temporarily unavailable",
        status if status.is_server_error() => "An internal server error occurred",
        _ => "Request failed",
    }
}
