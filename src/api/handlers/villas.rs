//! Villa API handlers.
//!
//! Every response, success or failure, is an `ApiResponse` envelope.

use axum::extract::{Path, State};
use json_patch::Patch;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use validator::Validate;

use crate::api::doc::VILLA_TAG;
use crate::api::dto::{
    ApiResponse, Created, JsonPatchOperation, VillaCreateDto, VillaDto, VillaUpdateDto,
};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::patch::apply_patch;
use crate::utils::validate::{JsonBody, ValidatedJson};

pub const VILLAS_PATH: &str = "/api/villas";

/// Creates villa routes.
///
/// Routes:
/// - GET    /api/villas       - List villas
/// - POST   /api/villas       - Create villa
/// - GET    /api/villas/{id}  - Get villa by id
/// - PUT    /api/villas/{id}  - Replace villa
/// - PATCH  /api/villas/{id}  - Apply a JSON Patch
/// - DELETE /api/villas/{id}  - Delete villa
pub fn villa_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_villas, create_villa))
        .routes(routes!(get_villa, update_villa, patch_villa, delete_villa))
}

/// Id 0 is never assigned by the store and is rejected up front.
fn ensure_valid_id(id: i32) -> AppResult<()> {
    if id == 0 {
        return Err(AppError::bad_request("Villa id must not be 0"));
    }
    Ok(())
}

/// GET /api/villas - List villas
#[utoipa::path(
    get,
    path = "/api/villas",
    tag = VILLA_TAG,
    responses(
        (status = 200, description = "All villas ordered by id", body = ApiResponse<Vec<VillaDto>>),
        (status = 500, description = "Store failure", body = ApiResponse<VillaDto>)
    )
)]
async fn list_villas(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<VillaDto>>> {
    let villas = state.services.villas.list_villas().await?;
    Ok(ApiResponse::ok(villas.into_iter().map(VillaDto::from).collect()))
}

/// GET /api/villas/{id} - Get villa by id
#[utoipa::path(
    get,
    path = "/api/villas/{id}",
    tag = VILLA_TAG,
    params(("id" = i32, Path, description = "Villa id")),
    responses(
        (status = 200, description = "Villa found", body = ApiResponse<VillaDto>),
        (status = 400, description = "Invalid id", body = ApiResponse<VillaDto>),
        (status = 404, description = "Villa not found", body = ApiResponse<VillaDto>)
    )
)]
async fn get_villa(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<VillaDto>> {
    ensure_valid_id(id)?;

    let villa = state.services.villas.get_villa(id).await?;
    Ok(ApiResponse::ok(VillaDto::from(villa)))
}

/// POST /api/villas - Create villa
///
/// Names are unique ignoring case.
#[utoipa::path(
    post,
    path = "/api/villas",
    tag = VILLA_TAG,
    request_body = VillaCreateDto,
    responses(
        (status = 201, description = "Villa created", body = ApiResponse<VillaDto>,
            headers(("Location" = String, description = "URL of the new villa"))),
        (status = 400, description = "Invalid body or duplicate name", body = ApiResponse<VillaDto>)
    )
)]
async fn create_villa(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VillaCreateDto>,
) -> AppResult<Created<VillaDto>> {
    let villa = state.services.villas.create_villa(payload.into()).await?;

    let location = format!("{}/{}", VILLAS_PATH, villa.id);
    Ok(Created::new(location, VillaDto::from(villa)))
}

/// DELETE /api/villas/{id} - Delete villa
#[utoipa::path(
    delete,
    path = "/api/villas/{id}",
    tag = VILLA_TAG,
    params(("id" = i32, Path, description = "Villa id")),
    responses(
        (status = 200, description = "Villa deleted; envelope statusCode is 204", body = ApiResponse<VillaDto>),
        (status = 400, description = "Invalid id", body = ApiResponse<VillaDto>),
        (status = 404, description = "Villa not found", body = ApiResponse<VillaDto>)
    )
)]
async fn delete_villa(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    ensure_valid_id(id)?;

    state.services.villas.delete_villa(id).await?;
    Ok(ApiResponse::no_content())
}

/// PUT /api/villas/{id} - Replace villa
///
/// The body id must equal the path id.
#[utoipa::path(
    put,
    path = "/api/villas/{id}",
    tag = VILLA_TAG,
    params(("id" = i32, Path, description = "Villa id")),
    request_body = VillaUpdateDto,
    responses(
        (status = 200, description = "Villa updated; envelope statusCode is 204", body = ApiResponse<VillaDto>),
        (status = 400, description = "Invalid body, id mismatch or duplicate name", body = ApiResponse<VillaDto>),
        (status = 404, description = "Villa not found", body = ApiResponse<VillaDto>)
    )
)]
async fn update_villa(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<VillaUpdateDto>,
) -> AppResult<ApiResponse<()>> {
    ensure_valid_id(id)?;
    if payload.id != id {
        return Err(AppError::bad_request(format!(
            "Villa id {} in the body does not match id {} in the path",
            payload.id, id
        )));
    }

    state.services.villas.update_villa(id, payload.into()).await?;
    Ok(ApiResponse::no_content())
}

/// PATCH /api/villas/{id} - Apply a JSON Patch
///
/// Operations target the `VillaUpdateDto` shape and may not change `id`.
#[utoipa::path(
    patch,
    path = "/api/villas/{id}",
    tag = VILLA_TAG,
    params(("id" = i32, Path, description = "Villa id")),
    request_body(
        content = Vec<JsonPatchOperation>,
        content_type = "application/json-patch+json",
        description = "RFC 6902 operations applied in order"
    ),
    responses(
        (status = 200, description = "Villa patched; envelope statusCode is 204", body = ApiResponse<VillaDto>),
        (status = 400, description = "Missing patch, failed operation or invalid result", body = ApiResponse<VillaDto>),
        (status = 404, description = "Villa not found", body = ApiResponse<VillaDto>)
    )
)]
async fn patch_villa(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(patch): JsonBody<Option<Patch>>,
) -> AppResult<ApiResponse<()>> {
    ensure_valid_id(id)?;
    let patch = patch.ok_or_else(|| AppError::bad_request("A JSON Patch document is required"))?;

    let current = VillaUpdateDto::from(state.services.villas.get_villa(id).await?);
    let patched = apply_patch(&current, &patch)?;
    patched.validate()?;

    if patched.id != id {
        return Err(AppError::bad_request("Villa id cannot be changed by a patch"));
    }

    state.services.villas.update_villa(id, patched.into()).await?;
    Ok(ApiResponse::no_content())
}

#[cfg(test)]
mod tests {
    use crate::repositories::InMemoryVillaRepository;
    use crate::test_support::{TestApp, villa_json};
    use axum::http::{StatusCode, header};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_is_empty_envelope() {
        let app = TestApp::new();

        let (status, _, body) = app.request("GET", "/api/villas", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "statusCode": 200, "isSuccess": true, "errors": [], "result": [] })
        );
    }

    #[tokio::test]
    async fn test_list_store_failure_is_500() {
        let repo = std::sync::Arc::new(InMemoryVillaRepository::new());
        let app = TestApp::with_repo(repo.clone());
        repo.set_unavailable(true);

        let (status, _, body) = app.request("GET", "/api/villas", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["statusCode"], json!(500));
        assert_eq!(body["isSuccess"], json!(false));
    }

    #[tokio::test]
    async fn test_create_returns_201_with_location_and_timestamps() {
        let app = TestApp::new();

        let (status, headers, body) = app
            .request("POST", "/api/villas", Some(villa_json("Beach House")))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["statusCode"], json!(201));
        let id = body["result"]["id"].as_i64().unwrap();
        assert!(id > 0);
        assert_eq!(headers[header::LOCATION], format!("/api/villas/{}", id));

        let stored = app.state.services.villas.get_villa(id as i32).await.unwrap();
        assert_eq!(stored.created_at(), stored.updated_at());
        assert_eq!(app.repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_end_to_end_create_get_and_duplicate() {
        let app = TestApp::new();

        let (_, _, created) = app
            .request("POST", "/api/villas", Some(villa_json("Beach House")))
            .await;
        let id = created["result"]["id"].as_i64().unwrap();

        let (status, _, fetched) = app.request("GET", &format!("/api/villas/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["result"], created["result"]);

        let (status, _, duplicate) = app
            .request("POST", "/api/villas", Some(villa_json("beach house")))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(duplicate["isSuccess"], json!(false));
        assert!(!duplicate["errors"].as_array().unwrap().is_empty());
        assert_eq!(app.repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_body() {
        let app = TestApp::new();

        let (status, _, body) = app
            .request("POST", "/api/villas", Some(json!({ "name": "x".repeat(31), "rate": -5.0 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"],
            json!([
                "name: Name must be between 1 and 30 characters",
                "rate: Rate cannot be negative"
            ])
        );

        let (status, _, _) = app.request("POST", "/api/villas", Some(json!(null))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = app.request("POST", "/api/villas", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(app.repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_zero_id_is_bad_request() {
        let app = TestApp::new();

        for method in ["GET", "DELETE"] {
            let (status, _, body) = app.request(method, "/api/villas/0", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", method);
            assert_eq!(body["statusCode"], json!(400));
        }
    }

    #[tokio::test]
    async fn test_zero_id_is_bad_request_for_updates() {
        let app = TestApp::new();
        app.create("Beach House").await;

        let mut body = villa_json("Beach House");
        body["id"] = json!(0);
        let put = app.request("PUT", "/api/villas/0", Some(body)).await;
        let patch = app.request_patch("/api/villas/0", Some(json!([]))).await;

        for (method, (status, _, body)) in [("PUT", put), ("PATCH", patch)] {
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", method);
            assert_eq!(
                body,
                json!({
                    "statusCode": 400,
                    "isSuccess": false,
                    "errors": ["Villa id must not be 0"],
                    "result": null
                }),
                "{}",
                method
            );
        }
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let app = TestApp::new();

        for method in ["GET", "DELETE"] {
            let (status, _, body) = app.request(method, "/api/villas/42", None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", method);
            assert_eq!(body["statusCode"], json!(404));
        }
    }

    #[tokio::test]
    async fn test_non_integer_id_is_enveloped_400() {
        let app = TestApp::new();

        let (status, _, body) = app.request("GET", "/api/villas/abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusCode"], json!(400));
        assert_eq!(body["isSuccess"], json!(false));
    }

    #[tokio::test]
    async fn test_delete_returns_204_in_envelope() {
        let app = TestApp::new();
        let id = app.create("Beach House").await;

        let (status, _, body) = app.request("DELETE", &format!("/api/villas/{}", id), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["statusCode"], json!(204));
        assert_eq!(body["isSuccess"], json!(true));
        assert_eq!(app.repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_put_replaces_villa() {
        let app = TestApp::new();
        let id = app.create("Beach House").await;

        let mut body = villa_json("Sea View");
        body["id"] = json!(id);
        body["occupancy"] = json!(12);
        let (status, _, envelope) = app
            .request("PUT", &format!("/api/villas/{}", id), Some(body))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(envelope["statusCode"], json!(204));
        let stored = app.state.services.villas.get_villa(id).await.unwrap();
        assert_eq!(stored.name, "Sea View");
        assert_eq!(stored.occupancy, 12);
    }

    #[tokio::test]
    async fn test_put_id_mismatch_leaves_store_untouched() {
        let app = TestApp::new();
        let id = app.create("Beach House").await;

        let mut body = villa_json("Sea View");
        body["id"] = json!(id + 1);
        let (status, _, _) = app
            .request("PUT", &format!("/api/villas/{}", id), Some(body))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let stored = app.state.services.villas.get_villa(id).await.unwrap();
        assert_eq!(stored.name, "Beach House");
    }

    #[tokio::test]
    async fn test_put_missing_villa_is_not_found() {
        let app = TestApp::new();

        let mut body = villa_json("Ghost");
        body["id"] = json!(77);
        let (status, _, _) = app.request("PUT", "/api/villas/77", Some(body)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_put_rename_onto_existing_name_is_bad_request() {
        let app = TestApp::new();
        app.create("Beach House").await;
        let id = app.create("Mountain Lodge").await;

        let mut body = villa_json("BEACH HOUSE");
        body["id"] = json!(id);
        let (status, _, _) = app
            .request("PUT", &format!("/api/villas/{}", id), Some(body))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_applies_operations() {
        let app = TestApp::new();
        let id = app.create("Beach House").await;

        let ops = json!([
            { "op": "replace", "path": "/name", "value": "Sea View" },
            { "op": "replace", "path": "/squareMeters", "value": 300.0 }
        ]);
        let (status, _, body) = app
            .request_patch(&format!("/api/villas/{}", id), Some(ops))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["statusCode"], json!(204));
        let stored = app.state.services.villas.get_villa(id).await.unwrap();
        assert_eq!(stored.name, "Sea View");
        assert_eq!(stored.square_meters, 300.0);
    }

    #[tokio::test]
    async fn test_empty_patch_succeeds() {
        let app = TestApp::new();
        let id = app.create("Beach House").await;

        let (status, _, _) = app
            .request_patch(&format!("/api/villas/{}", id), Some(json!([])))
            .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_absent_patch_is_bad_request() {
        let app = TestApp::new();
        let id = app.create("Beach House").await;
        let uri = format!("/api/villas/{}", id);

        let (status, _, _) = app.request_patch(&uri, Some(json!(null))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = app.request_patch(&uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_cannot_change_id() {
        let app = TestApp::new();
        let id = app.create("Beach House").await;

        let ops = json!([{ "op": "replace", "path": "/id", "value": id + 100 }]);
        let (status, _, _) = app
            .request_patch(&format!("/api/villas/{}", id), Some(ops))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.state.services.villas.get_villa(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_patch_producing_invalid_villa_is_bad_request() {
        let app = TestApp::new();
        let id = app.create("Beach House").await;

        let ops = json!([{ "op": "replace", "path": "/occupancy", "value": -3 }]);
        let (status, _, body) = app
            .request_patch(&format!("/api/villas/{}", id), Some(ops))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"][0].as_str().unwrap().starts_with("occupancy"));
    }

    #[tokio::test]
    async fn test_patch_failed_operation_is_bad_request() {
        let app = TestApp::new();
        let id = app.create("Beach House").await;

        let ops = json!([{ "op": "remove", "path": "/nonexistent" }]);
        let (status, _, _) = app
            .request_patch(&format!("/api/villas/{}", id), Some(ops))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_missing_villa_is_not_found() {
        let app = TestApp::new();

        let (status, _, _) = app.request_patch("/api/villas/5", Some(json!([]))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
