//! Request and response shapes of the HTTP API

pub mod driver_dto;
pub mod point_dto;
pub mod route_dto;

use serde::Serialize;

// `{"status": "success"}` returned by deletions and status updates
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub status: &'static str,
}

impl SuccessResponse {
    pub fn new() -> Self {
        Self { status: "success" }
    }
}

impl Default for SuccessResponse {
    fn default() -> Self {
        Self::new()
    }
}
