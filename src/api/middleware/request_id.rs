//! Request ID middleware for request tracing.
//!
//! Every request carries an identifier: the caller's `x-request-id` if it
//! sent a usable one, otherwise a fresh UUID v4.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID stored in request extensions for downstream access.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Stores the request ID in the request extensions and echoes it on the
/// response headers.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use axum::{Extension, Router, body::Body, middleware, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new()
            .route(
                "/echo",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .layer(middleware::from_fn(request_id_middleware))
    }

    async fn send(header: Option<&str>) -> (String, String) {
        let mut builder = Request::builder().uri("/echo");
        if let Some(value) = header {
            builder = builder.header(REQUEST_ID_HEADER, value);
        }
        let response = test_router()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (header, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_existing_id_is_echoed() {
        let (header, extension) = send(Some("req-123")).await;
        assert_eq!(header, "req-123");
        assert_eq!(extension, "req-123");
    }

    #[tokio::test]
    async fn test_missing_id_is_generated() {
        let (header, extension) = send(None).await;
        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(header, extension);
    }

    #[tokio::test]
    async fn test_blank_id_is_replaced() {
        let (header, _) = send(Some("  ")).await;
        assert!(Uuid::parse_str(&header).is_ok());
    }
}
