//! OpenAPI description of RFC 6902 JSON Patch documents.
//!
//! Request bodies are parsed with `json_patch::Patch`; this type only
//! documents the wire shape.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single JSON Patch operation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "op": "replace", "path": "/name", "value": "Sea View" }))]
pub struct JsonPatchOperation {
    /// One of add, remove, replace, move, copy, test
    pub op: String,
    /// JSON Pointer into the villa document, e.g. `/squareMeters`
    pub path: String,
    /// Source pointer for move and copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub value: Option<serde_json::Value>,
}
