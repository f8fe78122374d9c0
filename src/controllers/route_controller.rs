use std::sync::Arc;

use crate::dto::route_dto::{DriverRoutesResponse, RouteResponse};
use crate::models::RouteStatus;
use crate::repositories::{DriverRepository, RouteRepository};
use crate::utils::errors::{not_found_error, AppError};

pub struct RouteController {
    drivers: Arc<dyn DriverRepository>,
    routes: Arc<dyn RouteRepository>,
}

impl RouteController {
    pub fn new(drivers: Arc<dyn DriverRepository>, routes: Arc<dyn RouteRepository>) -> Self {
        Self { drivers, routes }
    }

    pub async fn for_driver(&self, driver_id: i32) -> Result<DriverRoutesResponse, AppError> {
        let driver = self
            .drivers
            .find_by_id(driver_id)
            .await?
            .ok_or_else(|| not_found_error("Driver", driver_id))?;
        let routes = self.routes.list_by_driver(driver_id).await?;

        Ok(DriverRoutesResponse {
            driver: driver.into(),
            routes: routes.into_iter().map(RouteResponse::from).collect(),
        })
    }

    pub async fn for_point(&self, point_id: i32) -> Result<Vec<RouteResponse>, AppError> {
        let routes = self.routes.list_by_point(point_id).await?;
        Ok(routes.into_iter().map(RouteResponse::from).collect())
    }

    pub async fn update_status(&self, route_id: i32, status: RouteStatus) -> Result<(), AppError> {
        let rows = self.routes.update_status(route_id, status).await?;
        if rows == 0 {
            tracing::warn!(route_id, %status, "status update matched no route");
            return Err(not_found_error("Route", route_id));
        }

        tracing::info!(route_id, %status, "route status updated");
        Ok(())
    }
}
