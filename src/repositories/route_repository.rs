use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::models::route::{next_order_number, scheduled_at};
use crate::models::{Route, RoutePoint, RouteStatus};
use crate::repositories::RouteRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Debug, FromRow)]
pub(crate) struct RouteRecord {
    id: i32,
    driver_id: i32,
    point_id: i32,
    order_number: i32,
    scheduled_at: NaiveDateTime,
    status: String,
    completed_at: Option<DateTime<Utc>>,
    visited_at: Option<DateTime<Utc>>,
    comment: Option<String>,
}

impl RouteRecord {
    fn into_domain(self, point: Option<RoutePoint>) -> AppResult<Route> {
        let status = self
            .status
            .parse::<RouteStatus>()
            .map_err(|e| AppError::Internal(format!("route {}: {}", self.id, e)))?;

        Ok(Route {
            id: self.id,
            driver_id: self.driver_id,
            point_id: self.point_id,
            order_number: self.order_number,
            scheduled_at: self.scheduled_at,
            status,
            completed_at: self.completed_at,
            visited_at: self.visited_at,
            comment: self.comment,
            point,
        })
    }
}

#[derive(Debug, FromRow)]
struct RouteWithPointRecord {
    #[sqlx(flatten)]
    route: RouteRecord,
    point_name: String,
    point_address: String,
    point_city: String,
    point_latitude: f64,
    point_longitude: f64,
}

impl RouteWithPointRecord {
    fn into_domain(self) -> AppResult<Route> {
        let point = RoutePoint {
            id: self.route.point_id,
            name: self.point_name,
            address: self.point_address,
            city: self.point_city,
            latitude: self.point_latitude,
            longitude: self.point_longitude,
        };
        self.route.into_domain(Some(point))
    }
}

pub struct PgRouteRepository {
    pool: PgPool,
}

impl PgRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends a route to the end of a driver's visiting order.
///
/// The driver row is locked for the rest of the surrounding transaction so
/// concurrent assignments to the same driver read distinct maxima. Batch
/// callers take these locks beforehand in id order; re-locking a held row
/// does not block.
pub(crate) async fn assign_route(
    conn: &mut PgConnection,
    driver_id: i32,
    point_id: i32,
    day: NaiveDate,
) -> AppResult<Route> {
    let driver: Option<i32> = sqlx::query_scalar("SELECT id FROM drivers WHERE id = $1 FOR UPDATE")
        .bind(driver_id)
        .fetch_optional(&mut *conn)
        .await?;
    if driver.is_none() {
        return Err(not_found_error("Driver", driver_id));
    }

    let current_max: Option<i32> =
        sqlx::query_scalar("SELECT MAX(order_number) FROM routes WHERE driver_id = $1")
            .bind(driver_id)
            .fetch_one(&mut *conn)
            .await?;
    let order_number = next_order_number(current_max);

    let record = sqlx::query_as::<_, RouteRecord>(
        r#"
        INSERT INTO routes (driver_id, point_id, order_number, scheduled_at, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, driver_id, point_id, order_number, scheduled_at, status,
                  completed_at, visited_at, comment
        "#,
    )
    .bind(driver_id)
    .bind(point_id)
    .bind(order_number)
    .bind(scheduled_at(order_number, day))
    .bind(RouteStatus::Pending.as_str())
    .fetch_one(&mut *conn)
    .await?;

    tracing::info!(driver_id, point_id, order_number, "route assigned");
    record.into_domain(None)
}

#[async_trait]
impl RouteRepository for PgRouteRepository {
    async fn list_by_driver(&self, driver_id: i32) -> AppResult<Vec<Route>> {
        let records = sqlx::query_as::<_, RouteWithPointRecord>(
            r#"
            SELECT
                r.id, r.driver_id, r.point_id, r.order_number, r.scheduled_at,
                r.status, r.completed_at, r.visited_at, r.comment,
                cp.name AS point_name, cp.address AS point_address, cp.city AS point_city,
                cp.latitude AS point_latitude, cp.longitude AS point_longitude
            FROM routes r
            JOIN collection_points cp ON r.point_id = cp.id
            WHERE r.driver_id = $1
            ORDER BY r.order_number
            "#,
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(RouteWithPointRecord::into_domain).collect()
    }

    async fn list_by_point(&self, point_id: i32) -> AppResult<Vec<Route>> {
        let records = sqlx::query_as::<_, RouteRecord>(
            r#"
            SELECT id, driver_id, point_id, order_number, scheduled_at, status,
                   completed_at, visited_at, comment
            FROM routes
            WHERE point_id = $1
            ORDER BY driver_id
            "#,
        )
        .bind(point_id)
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(|r| r.into_domain(None)).collect()
    }

    async fn update_status(&self, route_id: i32, status: RouteStatus) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE routes
            SET status = $1,
                completed_at = CASE WHEN $2 THEN NOW() ELSE completed_at END,
                visited_at = CASE WHEN $3 THEN COALESCE(visited_at, NOW()) ELSE visited_at END
            WHERE id = $4
            "#,
        )
        .bind(status.as_str())
        .bind(status.is_completion())
        .bind(status.is_visit())
        .bind(route_id)
        .execute(&self.pool)
        .await?;

        let rows = result.rows_affected();
        tracing::debug!(route_id, %status, rows, "route status updated");
        Ok(rows)
    }
}
