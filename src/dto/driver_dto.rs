use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Driver;

// Request to create or rename a driver
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct DriverRequest {
    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub name: String,
}

// Driver response
#[derive(Debug, Serialize)]
pub struct DriverResponse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Driver> for DriverResponse {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            name: driver.name,
            created_at: driver.created_at,
        }
    }
}
