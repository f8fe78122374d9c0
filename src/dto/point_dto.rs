use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::{AssignmentFailure, CollectionPoint, PointDraft, PointWrite};

// Request to create or update a point together with its drivers
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PointRequest {
    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub name: String,
    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub address: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(deserialize_with = "null_as_empty")]
    pub driver_ids: Vec<i32>,
}

// `"driver_ids": null` means no drivers
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<i32>>::deserialize(deserializer)?.unwrap_or_default())
}

impl PointRequest {
    pub fn into_parts(self) -> (PointDraft, Vec<i32>) {
        let draft = PointDraft {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
        };
        (draft, self.driver_ids)
    }
}

// Point response, `drivers` only appears in listings
#[derive(Debug, Serialize)]
pub struct PointResponse {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub drivers: Vec<String>,
}

impl From<CollectionPoint> for PointResponse {
    fn from(point: CollectionPoint) -> Self {
        Self {
            id: point.id,
            name: point.name,
            address: point.address,
            latitude: point.latitude,
            longitude: point.longitude,
            city: point.city,
            drivers: point.drivers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentFailureResponse {
    pub driver_id: i32,
    pub reason: String,
}

impl From<AssignmentFailure> for AssignmentFailureResponse {
    fn from(failure: AssignmentFailure) -> Self {
        Self {
            driver_id: failure.driver_id,
            reason: failure.reason,
        }
    }
}

// Response to point create/update; lists the drivers that could not be assigned
#[derive(Debug, Serialize)]
pub struct PointWriteResponse {
    #[serde(flatten)]
    pub point: PointResponse,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_assignments: Vec<AssignmentFailureResponse>,
}

impl From<PointWrite> for PointWriteResponse {
    fn from(write: PointWrite) -> Self {
        Self {
            point: write.point.into(),
            failed_assignments: write.report.failed.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssignmentReport;
    use serde_json::json;

    #[test]
    fn test_missing_fields_default() {
        let request: PointRequest =
            serde_json::from_value(json!({ "name": "Yard", "address": "Lenina 1" })).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.driver_ids.is_empty());
        assert_eq!(request.city, "");
    }

    #[test]
    fn test_null_driver_ids_is_empty() {
        let request: PointRequest = serde_json::from_value(
            json!({ "name": "Yard", "address": "Lenina 1", "driver_ids": null }),
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.driver_ids.is_empty());
    }

    #[test]
    fn test_name_and_address_required() {
        let request: PointRequest =
            serde_json::from_value(json!({ "name": " ", "latitude": 55.7 })).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("address"));
    }

    #[test]
    fn test_into_parts_trims() {
        let request = PointRequest {
            name: "  Yard ".to_string(),
            address: "Lenina 1 ".to_string(),
            city: " Kazan".to_string(),
            latitude: 1.5,
            longitude: 2.5,
            driver_ids: vec![4, 2],
        };
        let (draft, drivers) = request.into_parts();
        assert_eq!(draft.name, "Yard");
        assert_eq!(draft.address, "Lenina 1");
        assert_eq!(draft.city, "Kazan");
        assert_eq!(drivers, vec![4, 2]);
    }

    #[test]
    fn test_write_response_shape() {
        let mut report = AssignmentReport::default();
        report.record_failure(9, "Driver with id '9' not found");
        let point = CollectionPoint {
            id: 3,
            name: "Yard".to_string(),
            address: "Lenina 1".to_string(),
            city: "Kazan".to_string(),
            latitude: 55.79,
            longitude: 49.12,
            drivers: Vec::new(),
        };

        let body = serde_json::to_value(PointWriteResponse::from(PointWrite { point, report })).unwrap();

        assert_eq!(body["id"], 3);
        assert_eq!(body["name"], "Yard");
        assert!(body.get("drivers").is_none());
        assert_eq!(body["failed_assignments"][0]["driver_id"], 9);
    }
}
