use diesel::prelude::*;
use jiff::Timestamp;
use jiff_diesel::ToDiesel;

/// Villa model for reading from database
/// Derives Queryable for SELECT operations and Selectable for type-safe column selection
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::villas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Villa {
    pub id: i32,
    pub name: String,
    pub details: String,
    pub rate: f64,
    pub occupancy: i32,
    pub square_meters: f64,
    pub image_url: String,
    pub amenity: String,
    pub created_at: jiff_diesel::Timestamp,
    pub updated_at: jiff_diesel::Timestamp,
}

impl Villa {
    pub fn created_at(&self) -> Timestamp {
        self.created_at.to_jiff()
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at.to_jiff()
    }
}

/// Descriptive villa fields shared by create and update paths.
///
/// Carries no identifier and no timestamps; the service layer stamps those.
#[derive(Debug, Clone, PartialEq)]
pub struct VillaInput {
    pub name: String,
    pub details: String,
    pub rate: f64,
    pub occupancy: i32,
    pub square_meters: f64,
    pub image_url: String,
    pub amenity: String,
}

/// NewVilla model for inserting new records
/// Derives Insertable for INSERT operations
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::villas)]
pub struct NewVilla {
    pub name: String,
    pub details: String,
    pub rate: f64,
    pub occupancy: i32,
    pub square_meters: f64,
    pub image_url: String,
    pub amenity: String,
    pub created_at: jiff_diesel::Timestamp,
    pub updated_at: jiff_diesel::Timestamp,
}

impl NewVilla {
    /// Builds an insertable row with both timestamps set to `now`.
    pub fn new(input: VillaInput, now: Timestamp) -> Self {
        Self {
            name: input.name,
            details: input.details,
            rate: input.rate,
            occupancy: input.occupancy,
            square_meters: input.square_meters,
            image_url: input.image_url,
            amenity: input.amenity,
            created_at: now.to_diesel(),
            updated_at: now.to_diesel(),
        }
    }
}

/// VillaChanges model for full replacement updates
/// Every column except `id` and `created_at` is overwritten.
#[derive(Debug, AsChangeset, Clone)]
#[diesel(table_name = crate::schema::villas)]
pub struct VillaChanges {
    pub name: String,
    pub details: String,
    pub rate: f64,
    pub occupancy: i32,
    pub square_meters: f64,
    pub image_url: String,
    pub amenity: String,
    pub updated_at: jiff_diesel::Timestamp,
}

impl VillaChanges {
    pub fn new(input: VillaInput, now: Timestamp) -> Self {
        Self {
            name: input.name,
            details: input.details,
            rate: input.rate,
            occupancy: input.occupancy,
            square_meters: input.square_meters,
            image_url: input.image_url,
            amenity: input.amenity,
            updated_at: now.to_diesel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> VillaInput {
        VillaInput {
            name: "Beach House".to_string(),
            details: "Ocean front".to_string(),
            rate: 250.0,
            occupancy: 6,
            square_meters: 180.5,
            image_url: "/images/beach.jpg".to_string(),
            amenity: "Pool".to_string(),
        }
    }

    #[test]
    fn test_new_villa_stamps_both_timestamps() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let new_villa = NewVilla::new(sample_input(), now);

        assert_eq!(new_villa.name, "Beach House");
        assert_eq!(new_villa.created_at.to_jiff(), now);
        assert_eq!(new_villa.updated_at.to_jiff(), now);
    }

    #[test]
    fn test_villa_changes_carries_all_fields() {
        let now = Timestamp::from_second(1_700_000_100).unwrap();
        let changes = VillaChanges::new(sample_input(), now);

        assert_eq!(changes.occupancy, 6);
        assert_eq!(changes.square_meters, 180.5);
        assert_eq!(changes.amenity, "Pool");
        assert_eq!(changes.updated_at.to_jiff(), now);
    }
}
