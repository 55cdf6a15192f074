use utoipa::OpenApi;

pub const VILLA_TAG: &str = "Villa";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Magic Villa",
        description = "Villa catalogue API",
    ),
    tags(
        (name = VILLA_TAG, description = "Villa CRUD and JSON Patch endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
