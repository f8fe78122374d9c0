//! Repositories
//!
//! Store contracts for drivers, collection points and routes. Each contract
//! has a Postgres implementation working on an injected `PgPool` and an
//! in-memory implementation (`memory`) used as a substitute store in tests and
//! local runs.

pub mod driver_repository;
pub mod memory;
pub mod point_repository;
pub mod route_repository;

use async_trait::async_trait;

use crate::models::{CollectionPoint, Driver, PointDraft, PointWrite, Route, RouteStatus};
use crate::utils::errors::AppResult;

pub use driver_repository::PgDriverRepository;
pub use memory::InMemoryStore;
pub use point_repository::PgPointRepository;
pub use route_repository::PgRouteRepository;

#[async_trait]
pub trait DriverRepository: Send + Sync {
    /// All drivers ordered by id
    async fn list(&self) -> AppResult<Vec<Driver>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Driver>>;

    async fn create(&self, name: &str) -> AppResult<Driver>;

    /// Renames a driver, `None` when it does not exist
    async fn update(&self, id: i32, name: &str) -> AppResult<Option<Driver>>;

    /// Deletes a driver and its routes, `false` when it does not exist
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait PointRepository: Send + Sync {
    /// All points ordered by id, each with the names of its drivers
    async fn list_with_drivers(&self) -> AppResult<Vec<CollectionPoint>>;

    /// Inserts a point and assigns each listed driver a route to it.
    ///
    /// Assignment is best-effort per driver; failures end up in the report.
    async fn create_with_drivers(&self, draft: PointDraft, driver_ids: &[i32])
        -> AppResult<PointWrite>;

    /// Updates a point and reconciles its routes with `driver_ids`: routes
    /// of drivers no longer listed are deleted, retained drivers keep their
    /// routes untouched and new drivers are assigned. `None` when the point
    /// does not exist.
    async fn update_with_drivers(
        &self,
        id: i32,
        draft: PointDraft,
        driver_ids: &[i32],
    ) -> AppResult<Option<PointWrite>>;

    /// Deletes a point and its routes, `false` when it does not exist
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Routes of a driver in visiting order, each with its point embedded
    async fn list_by_driver(&self, driver_id: i32) -> AppResult<Vec<Route>>;

    /// Routes to a point ordered by driver id
    async fn list_by_point(&self, point_id: i32) -> AppResult<Vec<Route>>;

    /// Sets the status of a route and stamps `completed_at` / `visited_at`
    /// in a single statement. Returns the number of rows affected.
    async fn update_status(&self, route_id: i32, status: RouteStatus) -> AppResult<u64>;
}
