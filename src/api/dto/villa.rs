//! Villa DTOs for API requests and responses.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{Villa, VillaInput};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::from("Name cannot be blank")));
    }
    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a villa.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VillaCreateDto {
    #[validate(
        length(min = 1, max = 30, message = "Name must be between 1 and 30 characters"),
        custom(function = "not_blank")
    )]
    #[schema(min_length = 1, max_length = 30, example = "Beach House")]
    pub name: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Rate cannot be negative"))]
    #[schema(minimum = 0)]
    pub rate: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Occupancy cannot be negative"))]
    #[schema(minimum = 0)]
    pub occupancy: i32,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Square meters cannot be negative"))]
    #[schema(minimum = 0)]
    pub square_meters: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub amenity: String,
}

/// Request body for a full update, and the document a JSON Patch is applied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VillaUpdateDto {
    pub id: i32,
    #[validate(
        length(min = 1, max = 30, message = "Name must be between 1 and 30 characters"),
        custom(function = "not_blank")
    )]
    #[schema(min_length = 1, max_length = 30)]
    pub name: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Rate cannot be negative"))]
    #[schema(minimum = 0)]
    pub rate: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Occupancy cannot be negative"))]
    #[schema(minimum = 0)]
    pub occupancy: i32,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Square meters cannot be negative"))]
    #[schema(minimum = 0)]
    pub square_meters: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub amenity: String,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Villa as returned to clients; timestamps stay internal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VillaDto {
    pub id: i32,
    pub name: String,
    pub details: String,
    pub rate: f64,
    pub occupancy: i32,
    pub square_meters: f64,
    pub image_url: String,
    pub amenity: String,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<Villa> for VillaDto {
    fn from(villa: Villa) -> Self {
        Self {
            id: villa.id,
            name: villa.name,
            details: villa.details,
            rate: villa.rate,
            occupancy: villa.occupancy,
            square_meters: villa.square_meters,
            image_url: villa.image_url,
            amenity: villa.amenity,
        }
    }
}

impl From<Villa> for VillaUpdateDto {
    fn from(villa: Villa) -> Self {
        Self {
            id: villa.id,
            name: villa.name,
            details: villa.details,
            rate: villa.rate,
            occupancy: villa.occupancy,
            square_meters: villa.square_meters,
            image_url: villa.image_url,
            amenity: villa.amenity,
        }
    }
}

impl From<VillaCreateDto> for VillaInput {
    fn from(dto: VillaCreateDto) -> Self {
        Self {
            name: dto.name,
            details: dto.details,
            rate: dto.rate,
            occupancy: dto.occupancy,
            square_meters: dto.square_meters,
            image_url: dto.image_url,
            amenity: dto.amenity,
        }
    }
}

impl From<VillaUpdateDto> for VillaInput {
    fn from(dto: VillaUpdateDto) -> Self {
        Self {
            name: dto.name,
            details: dto.details,
            rate: dto.rate,
            occupancy: dto.occupancy,
            square_meters: dto.square_meters,
            image_url: dto.image_url,
            amenity: dto.amenity,
        }
    }
}
