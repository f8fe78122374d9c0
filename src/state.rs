//! Shared application state
//!
//! Handlers reach the store only through these repository handles, so the
//! Postgres implementation can be swapped for the in-memory one.

use std::sync::Arc;

use sqlx::PgPool;

use crate::repositories::{
    DriverRepository, InMemoryStore, PgDriverRepository, PgPointRepository, PgRouteRepository,
    PointRepository, RouteRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub drivers: Arc<dyn DriverRepository>,
    pub points: Arc<dyn PointRepository>,
    pub routes: Arc<dyn RouteRepository>,
}

impl AppState {
    pub fn new(
        drivers: Arc<dyn DriverRepository>,
        points: Arc<dyn PointRepository>,
        routes: Arc<dyn RouteRepository>,
    ) -> Self {
        Self { drivers, points, routes }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgDriverRepository::new(pool.clone())),
            Arc::new(PgPointRepository::new(pool.clone())),
            Arc::new(PgRouteRepository::new(pool)),
        )
    }

    pub fn in_memory(store: InMemoryStore) -> Self {
        Self::new(Arc::new(store.clone()), Arc::new(store.clone()), Arc::new(store))
    }
}
