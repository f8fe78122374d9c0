//! Collection point model
//!
//! Maps to the `collection_points` table. The list view also aggregates the
//! names of the drivers that have a route to the point.

use sqlx::FromRow;

use crate::models::assignment::AssignmentReport;

/// A physical address serviced by one or more drivers
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CollectionPoint {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Distinct names of the assigned drivers, filled by the list query only
    #[sqlx(default)]
    pub drivers: Vec<String>,
}

/// Attributes written on point creation and update
#[derive(Debug, Clone, PartialEq)]
pub struct PointDraft {
    pub name: String,
    pub address: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PointDraft {
    /// Materializes the draft under the given id
    pub fn into_point(self, id: i32) -> CollectionPoint {
        CollectionPoint {
            id,
            name: self.name,
            address: self.address,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
            drivers: Vec::new(),
        }
    }
}

/// Outcome of creating or updating a point together with its driver set
#[derive(Debug, Clone)]
pub struct PointWrite {
    pub point: CollectionPoint,
    pub report: AssignmentReport,
}
