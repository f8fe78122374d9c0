use std::sync::Arc;

use validator::Validate;

use crate::dto::driver_dto::{DriverRequest, DriverResponse};
use crate::repositories::DriverRepository;
use crate::utils::errors::{not_found_error, AppError};

pub struct DriverController {
    repository: Arc<dyn DriverRepository>,
}

impl DriverController {
    pub fn new(repository: Arc<dyn DriverRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<DriverResponse>, AppError> {
        let drivers = self.repository.list().await?;
        Ok(drivers.into_iter().map(DriverResponse::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<DriverResponse, AppError> {
        let driver = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Driver", id))?;
        Ok(driver.into())
    }

    pub async fn create(&self, request: DriverRequest) -> Result<DriverResponse, AppError> {
        request.validate()?;

        let driver = self.repository.create(request.name.trim()).await?;
        Ok(driver.into())
    }

    pub async fn update(&self, id: i32, request: DriverRequest) -> Result<DriverResponse, AppError> {
        request.validate()?;

        let driver = self
            .repository
            .update(id, request.name.trim())
            .await?
            .ok_or_else(|| not_found_error("Driver", id))?;
        Ok(driver.into())
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Driver", id));
        }
        tracing::info!(driver_id = id, "driver deleted");
        Ok(())
    }
}
