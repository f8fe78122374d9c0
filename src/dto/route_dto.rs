use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::driver_dto::DriverResponse;
use crate::models::{Route, RoutePoint, RouteStatus};
use crate::utils::errors::{bad_request_error, AppError, AppResult};
use crate::utils::validation::{parse_id, parse_optional_id};

// Query of GET /api/routes
#[derive(Debug, Default, Deserialize)]
pub struct RoutesQuery {
    pub driver_id: Option<String>,
    pub point_id: Option<String>,
}

/// Which routes a listing asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSelector {
    Driver(i32),
    Point(i32),
}

impl RoutesQuery {
    /// `driver_id` takes precedence when both ids are given
    pub fn selector(&self) -> AppResult<RouteSelector> {
        if let Some(driver_id) = parse_optional_id("driver_id", self.driver_id.as_deref())? {
            return Ok(RouteSelector::Driver(driver_id));
        }
        if let Some(point_id) = parse_optional_id("point_id", self.point_id.as_deref())? {
            return Ok(RouteSelector::Point(point_id));
        }
        Err(bad_request_error("driver_id or point_id is required"))
    }
}

// Query of POST|PATCH /api/routes/status
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub route_id: Option<String>,
    pub status: Option<String>,
}

impl StatusQuery {
    pub fn parse(&self) -> AppResult<(i32, RouteStatus)> {
        let route_id = self.route_id.as_deref().map(str::trim).filter(|v| !v.is_empty());
        let status = self.status.as_deref().map(str::trim).filter(|v| !v.is_empty());

        let (Some(route_id), Some(status)) = (route_id, status) else {
            return Err(bad_request_error("route_id and status are required"));
        };

        let route_id = parse_id("route_id", route_id)?;
        let status = status
            .parse::<RouteStatus>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok((route_id, status))
    }
}

#[derive(Debug, Serialize)]
pub struct RoutePointResponse {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
}

impl From<RoutePoint> for RoutePointResponse {
    fn from(point: RoutePoint) -> Self {
        Self {
            id: point.id,
            name: point.name,
            address: point.address,
            latitude: point.latitude,
            longitude: point.longitude,
            city: point.city,
        }
    }
}

// Route response; `point` is only filled in a driver's listing
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: i32,
    pub driver_id: i32,
    pub point_id: i32,
    pub order_number: i32,
    pub scheduled_at: NaiveDateTime,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visited_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub point: Option<RoutePointResponse>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            id: route.id,
            driver_id: route.driver_id,
            point_id: route.point_id,
            order_number: route.order_number,
            scheduled_at: route.scheduled_at,
            status: route.status.as_str(),
            completed_at: route.completed_at,
            visited_at: route.visited_at,
            comment: route.comment,
            point: route.point.map(Into::into),
        }
    }
}

// Response of GET /api/routes?driver_id=N
#[derive(Debug, Serialize)]
pub struct DriverRoutesResponse {
    pub driver: DriverResponse,
    pub routes: Vec<RouteResponse>,
}
