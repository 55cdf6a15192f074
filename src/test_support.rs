//! Router harness for handler tests, backed by the in-memory repository.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api::routes::create_router;
use crate::config::ServerConfig;
use crate::repositories::{InMemoryVillaRepository, Repositories};
use crate::state::AppState;

pub struct TestApp {
    pub state: AppState,
    pub repo: Arc<InMemoryVillaRepository>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_repo(Arc::new(InMemoryVillaRepository::new()))
    }

    pub fn with_repo(repo: Arc<InMemoryVillaRepository>) -> Self {
        let state = AppState::from_repositories(Repositories::with_villas(repo.clone()));
        let router = create_router(state.clone(), &ServerConfig::default());
        Self {
            state,
            repo,
            router,
        }
    }

    /// Sends a request; a `Some` body is sent as `application/json`.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        self.send(method, uri, body, "application/json").await
    }

    /// Sends a PATCH with the JSON Patch media type.
    pub async fn request_patch(&self, uri: &str, body: Option<Value>) -> (StatusCode, HeaderMap, Value) {
        self.send("PATCH", uri, body, "application/json-patch+json")
            .await
    }

    /// Creates a villa through the API and returns its id.
    pub async fn create(&self, name: &str) -> i32 {
        let (status, _, body) = self.request("POST", "/api/villas", Some(villa_json(name))).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["result"]["id"].as_i64().unwrap() as i32
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        content_type: &str,
    ) -> (StatusCode, HeaderMap, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, headers, body)
    }
}

/// A valid create body with the given name.
pub fn villa_json(name: &str) -> Value {
    json!({
        "name": name,
        "details": "Sea-facing villa",
        "rate": 250.0,
        "occupancy": 4,
        "squareMeters": 120.0,
        "imageUrl": "https://example.com/villa.jpg",
        "amenity": "Pool"
    })
}
