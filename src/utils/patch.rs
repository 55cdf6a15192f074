//! RFC 6902 JSON Patch support for partial updates.

use json_patch::Patch;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{AppError, AppResult};

/// Applies `patch` to the JSON form of `target` and reads the result back.
///
/// Operations run in order; if any fails, or the patched document no longer
/// fits `T`, the whole patch is rejected as a bad request.
pub fn apply_patch<T>(target: &T, patch: &Patch) -> AppResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut document = serde_json::to_value(target).map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })?;

    json_patch::patch(&mut document, &patch.0)
        .map_err(|e| AppError::bad_request(format!("Invalid patch: {}", e)))?;

    serde_json::from_value(document)
        .map_err(|e| AppError::bad_request(format!("Patched document is invalid: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Doc {
        id: i32,
        name: String,
        square_meters: f64,
    }

    fn doc() -> Doc {
        Doc {
            id: 1,
            name: "Lodge".to_string(),
            square_meters: 40.0,
        }
    }

    fn patch(ops: serde_json::Value) -> Patch {
        serde_json::from_value(ops).unwrap()
    }

    #[test]
    fn test_empty_patch_is_identity() {
        assert_eq!(apply_patch(&doc(), &patch(json!([]))).unwrap(), doc());
    }

    #[test]
    fn test_operations_apply_in_order() {
        let ops = patch(json!([
            { "op": "replace", "path": "/name", "value": "Chalet" },
            { "op": "test", "path": "/name", "value": "Chalet" },
            { "op": "replace", "path": "/squareMeters", "value": 55.5 }
        ]));

        let patched = apply_patch(&doc(), &ops).unwrap();

        assert_eq!(patched.name, "Chalet");
        assert_eq!(patched.square_meters, 55.5);
    }

    #[test]
    fn test_failed_operation_is_bad_request() {
        let ops = patch(json!([{ "op": "replace", "path": "/missing", "value": 1 }]));

        assert!(matches!(
            apply_patch(&doc(), &ops),
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_type_mismatch_is_bad_request() {
        let ops = patch(json!([{ "op": "replace", "path": "/id", "value": "seven" }]));

        match apply_patch(&doc(), &ops) {
            Err(AppError::BadRequest { message }) => {
                assert!(message.starts_with("Patched document is invalid"))
            }
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }
}
