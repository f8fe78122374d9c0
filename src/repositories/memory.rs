//! In-memory store
//!
//! Implements every repository contract over a set of maps behind one lock.
//! Holding the write lock for a whole operation gives the same all-or-nothing
//! behavior as the Postgres transactions, and the scheduling and status rules
//! are the shared ones from `models::route`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::models::assignment::{dedupe_driver_ids, DriverSetDiff};
use crate::models::route::{next_order_number, schedule_day, scheduled_at};
use crate::models::{
    AssignmentReport, CollectionPoint, Driver, PointDraft, PointWrite, Route, RoutePoint,
    RouteStatus,
};
use crate::repositories::{DriverRepository, PointRepository, RouteRepository};
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Debug, Default)]
struct Tables {
    drivers: BTreeMap<i32, Driver>,
    points: BTreeMap<i32, CollectionPoint>,
    routes: BTreeMap<i32, Route>,
    last_driver_id: i32,
    last_point_id: i32,
    last_route_id: i32,
}

impl Tables {
    fn assign(&mut self, driver_id: i32, point_id: i32, day: NaiveDate) -> AppResult<Route> {
        if !self.drivers.contains_key(&driver_id) {
            return Err(not_found_error("Driver", driver_id));
        }

        let current_max = self
            .routes
            .values()
            .filter(|r| r.driver_id == driver_id)
            .map(|r| r.order_number)
            .max();
        let order_number = next_order_number(current_max);

        self.last_route_id += 1;
        let route = Route {
            id: self.last_route_id,
            driver_id,
            point_id,
            order_number,
            scheduled_at: scheduled_at(order_number, day),
            status: RouteStatus::Pending,
            completed_at: None,
            visited_at: None,
            comment: None,
            point: None,
        };
        self.routes.insert(route.id, route.clone());
        Ok(route)
    }

    fn assign_all(&mut self, point_id: i32, driver_ids: &[i32]) -> AssignmentReport {
        let day = schedule_day();
        let mut report = AssignmentReport::default();
        for &driver_id in driver_ids {
            match self.assign(driver_id, point_id, day) {
                Ok(route) => report.record_success(route),
                Err(e) => {
                    tracing::warn!(driver_id, point_id, error = %e, "driver assignment skipped");
                    report.record_error(driver_id, &e);
                }
            }
        }
        report
    }

    fn drivers_of(&self, point_id: i32) -> Vec<i32> {
        let ids: BTreeSet<i32> = self
            .routes
            .values()
            .filter(|r| r.point_id == point_id)
            .map(|r| r.driver_id)
            .collect();
        ids.into_iter().collect()
    }

    fn route_point(&self, point_id: i32) -> Option<RoutePoint> {
        self.points.get(&point_id).map(|p| RoutePoint {
            id: p.id,
            name: p.name.clone(),
            address: p.address.clone(),
            city: p.city.clone(),
            latitude: p.latitude,
            longitude: p.longitude,
        })
    }
}

/// Substitute store keeping all entities in process memory
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status, completion and visit stamps of a route
    pub async fn route(&self, route_id: i32) -> Option<Route> {
        self.tables.read().await.routes.get(&route_id).cloned()
    }
}

#[async_trait]
impl DriverRepository for InMemoryStore {
    async fn list(&self) -> AppResult<Vec<Driver>> {
        Ok(self.tables.read().await.drivers.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Driver>> {
        Ok(self.tables.read().await.drivers.get(&id).cloned())
    }

    async fn create(&self, name: &str) -> AppResult<Driver> {
        let mut tables = self.tables.write().await;
        tables.last_driver_id += 1;
        let driver = Driver {
            id: tables.last_driver_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.drivers.insert(driver.id, driver.clone());
        Ok(driver)
    }

    async fn update(&self, id: i32, name: &str) -> AppResult<Option<Driver>> {
        let mut tables = self.tables.write().await;
        Ok(tables.drivers.get_mut(&id).map(|driver| {
            driver.name = name.to_string();
            driver.clone()
        }))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.drivers.remove(&id).is_none() {
            return Ok(false);
        }
        tables.routes.retain(|_, r| r.driver_id != id);
        Ok(true)
    }
}

#[async_trait]
impl PointRepository for InMemoryStore {
    async fn list_with_drivers(&self) -> AppResult<Vec<CollectionPoint>> {
        let tables = self.tables.read().await;
        let points = tables
            .points
            .values()
            .map(|point| {
                let names: BTreeSet<String> = tables
                    .routes
                    .values()
                    .filter(|r| r.point_id == point.id)
                    .filter_map(|r| tables.drivers.get(&r.driver_id))
                    .map(|d| d.name.clone())
                    .collect();
                CollectionPoint {
                    drivers: names.into_iter().collect(),
                    ..point.clone()
                }
            })
            .collect();
        Ok(points)
    }

    async fn create_with_drivers(
        &self,
        draft: PointDraft,
        driver_ids: &[i32],
    ) -> AppResult<PointWrite> {
        let mut tables = self.tables.write().await;
        tables.last_point_id += 1;
        let point = draft.into_point(tables.last_point_id);
        tables.points.insert(point.id, point.clone());

        let report = tables.assign_all(point.id, &dedupe_driver_ids(driver_ids));
        Ok(PointWrite { point, report })
    }

    async fn update_with_drivers(
        &self,
        id: i32,
        draft: PointDraft,
        driver_ids: &[i32],
    ) -> AppResult<Option<PointWrite>> {
        let mut tables = self.tables.write().await;
        if !tables.points.contains_key(&id) {
            return Ok(None);
        }
        let point = draft.into_point(id);
        tables.points.insert(id, point.clone());

        let diff = DriverSetDiff::between(&tables.drivers_of(id), driver_ids);
        tables
            .routes
            .retain(|_, r| !(r.point_id == id && diff.removed.contains(&r.driver_id)));

        let report = tables.assign_all(id, &diff.added);
        Ok(Some(PointWrite { point, report }))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.points.remove(&id).is_none() {
            return Ok(false);
        }
        tables.routes.retain(|_, r| r.point_id != id);
        Ok(true)
    }
}

#[async_trait]
impl RouteRepository for InMemoryStore {
    async fn list_by_driver(&self, driver_id: i32) -> AppResult<Vec<Route>> {
        let tables = self.tables.read().await;
        let mut routes: Vec<Route> = tables
            .routes
            .values()
            .filter(|r| r.driver_id == driver_id)
            .filter_map(|r| {
                tables.route_point(r.point_id).map(|point| Route {
                    point: Some(point),
                    ..r.clone()
                })
            })
            .collect();
        routes.sort_by_key(|r| r.order_number);
        Ok(routes)
    }

    async fn list_by_point(&self, point_id: i32) -> AppResult<Vec<Route>> {
        let tables = self.tables.read().await;
        let mut routes: Vec<Route> = tables
            .routes
            .values()
            .filter(|r| r.point_id == point_id)
            .cloned()
            .collect();
        routes.sort_by_key(|r| (r.driver_id, r.id));
        Ok(routes)
    }

    async fn update_status(&self, route_id: i32, status: RouteStatus) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        match tables.routes.get_mut(&route_id) {
            Some(route) => {
                route.apply_status(status, Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
