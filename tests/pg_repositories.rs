//! Repository tests against a live PostgreSQL.
//!
//! They run only when `DATABASE_URL` points at a database the tests may
//! migrate and write to; otherwise each test returns early. Every test works
//! on drivers and points it creates itself, so they can share one database.

use std::sync::Arc;

use chrono::Timelike;
use sqlx::postgres::{PgPool, PgPoolOptions};

use collection_dispatch::models::{PointDraft, Route, RouteStatus};
use collection_dispatch::repositories::{
    DriverRepository, PgDriverRepository, PgPointRepository, PgRouteRepository, PointRepository,
    RouteRepository,
};

async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres repository test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    Some(pool)
}

struct Repos {
    drivers: PgDriverRepository,
    points: Arc<PgPointRepository>,
    routes: PgRouteRepository,
}

impl Repos {
    fn new(pool: &PgPool) -> Self {
        Self {
            drivers: PgDriverRepository::new(pool.clone()),
            points: Arc::new(PgPointRepository::new(pool.clone())),
            routes: PgRouteRepository::new(pool.clone()),
        }
    }

    async fn driver(&self, name: &str) -> i32 {
        self.drivers.create(name).await.unwrap().id
    }

    async fn route(&self, point_id: i32, route_id: i32) -> Route {
        self.routes
            .list_by_point(point_id)
            .await
            .unwrap()
            .into_iter()
            .find(|r| r.id == route_id)
            .unwrap()
    }
}

fn draft(name: &str) -> PointDraft {
    PointDraft {
        name: name.to_string(),
        address: "Lenina 1".to_string(),
        city: "Kazan".to_string(),
        latitude: 55.79,
        longitude: 49.12,
    }
}

fn slot(route: &Route) -> (u32, u32) {
    (route.scheduled_at.hour(), route.scheduled_at.minute())
}

#[tokio::test]
async fn test_first_route_is_pending_at_eight() {
    let Some(pool) = test_pool().await else { return };
    let repos = Repos::new(&pool);
    let driver = repos.driver("Ivan").await;

    let write = repos.points.create_with_drivers(draft("Yard"), &[driver]).await.unwrap();

    assert!(write.report.is_complete());
    let route = &write.report.assigned[0];
    assert_eq!(route.order_number, 1);
    assert_eq!(route.status, RouteStatus::Pending);
    assert_eq!(slot(route), (8, 0));
    assert!(route.visited_at.is_none());
    assert!(route.completed_at.is_none());
}

#[tokio::test]
async fn test_order_number_follows_driver_maximum() {
    let Some(pool) = test_pool().await else { return };
    let repos = Repos::new(&pool);
    let driver = repos.driver("Petr").await;

    repos.points.create_with_drivers(draft("P1"), &[driver]).await.unwrap();
    repos.points.create_with_drivers(draft("P2"), &[driver]).await.unwrap();
    let third = repos.points.create_with_drivers(draft("P3"), &[driver]).await.unwrap();

    let route = &third.report.assigned[0];
    assert_eq!(route.order_number, 3);
    assert_eq!(slot(route), (8, 20));

    let listed = repos.routes.list_by_driver(driver).await.unwrap();
    let orders: Vec<i32> = listed.iter().map(|r| r.order_number).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let point = listed[2].point.as_ref().unwrap();
    assert_eq!(point.id, third.point.id);
    assert_eq!(point.name, "P3");
    assert_eq!(point.city, "Kazan");
}

#[tokio::test]
async fn test_status_transitions_stamp_timestamps() {
    let Some(pool) = test_pool().await else { return };
    let repos = Repos::new(&pool);
    let driver = repos.driver("Olga").await;
    let write = repos.points.create_with_drivers(draft("Yard"), &[driver]).await.unwrap();
    let point_id = write.point.id;
    let route_id = write.report.assigned[0].id;

    assert_eq!(repos.routes.update_status(route_id, RouteStatus::Problem).await.unwrap(), 1);
    let route = repos.route(point_id, route_id).await;
    assert_eq!(route.status, RouteStatus::Problem);
    assert!(route.completed_at.is_none());
    let visited = route.visited_at.unwrap();

    repos.routes.update_status(route_id, RouteStatus::InProgress).await.unwrap();
    assert_eq!(repos.route(point_id, route_id).await.visited_at, Some(visited));

    repos.routes.update_status(route_id, RouteStatus::Completed).await.unwrap();
    let route = repos.route(point_id, route_id).await;
    assert!(route.completed_at.is_some());
    assert_eq!(route.visited_at, Some(visited));

    repos.routes.update_status(route_id, RouteStatus::Pending).await.unwrap();
    let route = repos.route(point_id, route_id).await;
    assert_eq!(route.status, RouteStatus::Pending);
    assert!(route.completed_at.is_some());
}

#[tokio::test]
async fn test_pending_and_skipped_never_stamp() {
    let Some(pool) = test_pool().await else { return };
    let repos = Repos::new(&pool);
    let driver = repos.driver("Anna").await;
    let write = repos.points.create_with_drivers(draft("Yard"), &[driver]).await.unwrap();
    let route_id = write.report.assigned[0].id;

    for status in [RouteStatus::Pending, RouteStatus::Skipped] {
        repos.routes.update_status(route_id, status).await.unwrap();
        let route = repos.route(write.point.id, route_id).await;
        assert_eq!(route.status, status);
        assert!(route.visited_at.is_none());
        assert!(route.completed_at.is_none());
    }
}

#[tokio::test]
async fn test_status_update_of_missing_route() {
    let Some(pool) = test_pool().await else { return };
    let repos = Repos::new(&pool);

    assert_eq!(repos.routes.update_status(-1, RouteStatus::Completed).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_replaces_removed_drivers() {
    let Some(pool) = test_pool().await else { return };
    let repos = Repos::new(&pool);
    let first = repos.driver("Ivan").await;
    let second = repos.driver("Petr").await;
    let third = repos.driver("Olga").await;

    repos.points.create_with_drivers(draft("Depot"), &[third]).await.unwrap();
    let created = repos.points.create_with_drivers(draft("Yard"), &[first, second]).await.unwrap();
    let point_id = created.point.id;

    let updated = repos
        .points
        .update_with_drivers(point_id, draft("Yard North"), &[third])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.point.name, "Yard North");
    assert!(updated.report.is_complete());

    let routes = repos.routes.list_by_point(point_id).await.unwrap();
    let pairs: Vec<(i32, i32)> = routes.iter().map(|r| (r.driver_id, r.order_number)).collect();
    assert_eq!(pairs, vec![(third, 2)]);

    // an unchanged driver set keeps the existing route
    let kept_id = routes[0].id;
    repos
        .points
        .update_with_drivers(point_id, draft("Yard North"), &[third])
        .await
        .unwrap()
        .unwrap();
    let routes = repos.routes.list_by_point(point_id).await.unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].id, kept_id);

    assert!(repos.routes.list_by_driver(first).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_of_missing_point() {
    let Some(pool) = test_pool().await else { return };
    let repos = Repos::new(&pool);

    let result = repos.points.update_with_drivers(-1, draft("Nowhere"), &[]).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_unknown_driver_in_batch_is_isolated() {
    let Some(pool) = test_pool().await else { return };
    let repos = Repos::new(&pool);
    let first = repos.driver("Ivan").await;
    let second = repos.driver("Petr").await;

    let write = repos
        .points
        .create_with_drivers(draft("Yard"), &[first, -1, second])
        .await
        .unwrap();

    assert_eq!(write.report.failed.len(), 1);
    assert_eq!(write.report.failed[0].driver_id, -1);
    assert_eq!(write.report.failed[0].reason, "Driver with id '-1' not found");

    let mut assigned: Vec<i32> = repos
        .routes
        .list_by_point(write.point.id)
        .await
        .unwrap()
        .iter()
        .map(|r| r.driver_id)
        .collect();
    assigned.sort_unstable();
    assert_eq!(assigned, vec![first, second]);
}

#[tokio::test]
async fn test_points_listing_aggregates_driver_names() {
    let Some(pool) = test_pool().await else { return };
    let repos = Repos::new(&pool);
    let boris = repos.driver("Boris").await;
    let anna = repos.driver("Anna").await;

    let with_drivers = repos.points.create_with_drivers(draft("Yard"), &[boris, anna]).await.unwrap();
    let empty = repos.points.create_with_drivers(draft("Empty"), &[]).await.unwrap();

    let points = repos.points.list_with_drivers().await.unwrap();
    let find = |id: i32| points.iter().find(|p| p.id == id).unwrap();

    assert_eq!(find(with_drivers.point.id).drivers, vec!["Anna", "Boris"]);
    assert!(find(empty.point.id).drivers.is_empty());
}

#[tokio::test]
async fn test_deletes_cascade_to_routes() {
    let Some(pool) = test_pool().await else { return };
    let repos = Repos::new(&pool);
    let driver = repos.driver("Ivan").await;
    let other = repos.driver("Petr").await;
    let yard = repos.points.create_with_drivers(draft("Yard"), &[driver, other]).await.unwrap();

    assert!(repos.drivers.delete(driver).await.unwrap());
    let routes = repos.routes.list_by_point(yard.point.id).await.unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].driver_id, other);

    assert!(repos.points.delete(yard.point.id).await.unwrap());
    assert!(repos.routes.list_by_driver(other).await.unwrap().is_empty());
    assert!(!repos.points.delete(yard.point.id).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_in_opposite_driver_order() {
    let Some(pool) = test_pool().await else { return };
    let repos = Repos::new(&pool);
    let a = repos.driver("Ivan").await;
    let b = repos.driver("Petr").await;

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..40 {
        let points = repos.points.clone();
        let drivers = if i % 2 == 0 { [a, b] } else { [b, a] };
        tasks.spawn(async move { points.create_with_drivers(draft(&format!("P{i}")), &drivers).await });
    }

    while let Some(joined) = tasks.join_next().await {
        let write = joined.unwrap().unwrap();
        assert!(
            write.report.is_complete(),
            "drivers dropped: {:?}",
            write.report.failed
        );
    }

    for driver in [a, b] {
        let orders: Vec<i32> = repos
            .routes
            .list_by_driver(driver)
            .await
            .unwrap()
            .iter()
            .map(|r| r.order_number)
            .collect();
        assert_eq!(orders, (1..=40).collect::<Vec<i32>>());
    }
}
