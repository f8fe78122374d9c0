use std::sync::Arc;

use validator::Validate;

use crate::dto::point_dto::{PointRequest, PointResponse, PointWriteResponse};
use crate::models::PointWrite;
use crate::repositories::PointRepository;
use crate::utils::errors::{not_found_error, AppError};

pub struct PointController {
    repository: Arc<dyn PointRepository>,
}

/// Partial assignment still counts as success, the failures travel in the
/// response body.
fn log_partial_assignment(write: &PointWrite) {
    if !write.report.is_complete() {
        let failed: Vec<i32> = write.report.failed.iter().map(|f| f.driver_id).collect();
        tracing::warn!(point_id = write.point.id, ?failed, "some drivers were not assigned");
    }
}

impl PointController {
    pub fn new(repository: Arc<dyn PointRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<PointResponse>, AppError> {
        let points = self.repository.list_with_drivers().await?;
        Ok(points.into_iter().map(PointResponse::from).collect())
    }

    pub async fn create(&self, request: PointRequest) -> Result<PointWriteResponse, AppError> {
        request.validate()?;

        let (draft, driver_ids) = request.into_parts();
        tracing::info!(name = %draft.name, ?driver_ids, "creating point");

        let write = self.repository.create_with_drivers(draft, &driver_ids).await?;
        log_partial_assignment(&write);
        Ok(write.into())
    }

    pub async fn update(&self, id: i32, request: PointRequest) -> Result<PointWriteResponse, AppError> {
        request.validate()?;

        let (draft, driver_ids) = request.into_parts();
        tracing::info!(point_id = id, ?driver_ids, "updating point");

        let write = self
            .repository
            .update_with_drivers(id, draft, &driver_ids)
            .await?
            .ok_or_else(|| not_found_error("Collection point", id))?;
        log_partial_assignment(&write);
        Ok(write.into())
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Collection point", id));
        }
        tracing::info!(point_id = id, "point deleted");
        Ok(())
    }
}
