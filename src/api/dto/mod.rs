//! Data Transfer Objects for API requests and responses.
//!
//! - `envelope` - the response wrapper shared by every endpoint
//! - `villa` - villa request/response DTOs
//! - `patch` - documented shape of JSON Patch request bodies

mod envelope;
mod patch;
mod villa;

pub use envelope::{ApiResponse, Created};
pub use patch::JsonPatchOperation;
pub use villa::{VillaCreateDto, VillaDto, VillaUpdateDto};
