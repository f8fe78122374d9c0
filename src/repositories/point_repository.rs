use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Connection, PgConnection, PgPool};

use crate::models::assignment::{dedupe_driver_ids, DriverSetDiff};
use crate::models::route::schedule_day;
use crate::models::{AssignmentReport, CollectionPoint, PointDraft, PointWrite};
use crate::repositories::route_repository::assign_route;
use crate::repositories::PointRepository;
use crate::utils::errors::AppResult;

pub struct PgPointRepository {
    pool: PgPool,
}

impl PgPointRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Assigns each driver to the point inside its own savepoint, so a failing
/// driver rolls back only its own statements and the caller's transaction
/// stays usable.
///
/// All driver rows are locked up front in ascending id order. Concurrent
/// writes naming the same drivers in a different order then queue behind
/// each other instead of deadlocking.
async fn assign_drivers(
    conn: &mut PgConnection,
    point_id: i32,
    driver_ids: &[i32],
    day: NaiveDate,
) -> AppResult<AssignmentReport> {
    let mut report = AssignmentReport::default();
    if driver_ids.is_empty() {
        return Ok(report);
    }

    let locked: Vec<i32> =
        sqlx::query_scalar("SELECT id FROM drivers WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(driver_ids)
            .fetch_all(&mut *conn)
            .await?;
    tracing::debug!(point_id, ?locked, "driver rows locked");

    for &driver_id in driver_ids {
        let mut savepoint = conn.begin().await?;
        match assign_route(&mut savepoint, driver_id, point_id, day).await {
            Ok(route) => {
                savepoint.commit().await?;
                report.record_success(route);
            }
            Err(e) => {
                savepoint.rollback().await?;
                tracing::warn!(driver_id, point_id, error = %e, "driver assignment skipped");
                report.record_error(driver_id, &e);
            }
        }
    }

    Ok(report)
}

#[async_trait]
impl PointRepository for PgPointRepository {
    async fn list_with_drivers(&self) -> AppResult<Vec<CollectionPoint>> {
        let points = sqlx::query_as::<_, CollectionPoint>(
            r#"
            SELECT
                cp.id, cp.name, cp.address, cp.city, cp.latitude, cp.longitude,
                COALESCE(ARRAY_AGG(DISTINCT d.name) FILTER (WHERE d.name IS NOT NULL), '{}') AS drivers
            FROM collection_points cp
            LEFT JOIN routes r ON cp.id = r.point_id
            LEFT JOIN drivers d ON r.driver_id = d.id
            GROUP BY cp.id, cp.name, cp.address, cp.city, cp.latitude, cp.longitude
            ORDER BY cp.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    async fn create_with_drivers(
        &self,
        draft: PointDraft,
        driver_ids: &[i32],
    ) -> AppResult<PointWrite> {
        let mut tx = self.pool.begin().await?;

        let point = sqlx::query_as::<_, CollectionPoint>(
            r#"
            INSERT INTO collection_points (name, address, city, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, address, city, latitude, longitude
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.address)
        .bind(&draft.city)
        .bind(draft.latitude)
        .bind(draft.longitude)
        .fetch_one(&mut *tx)
        .await?;

        let driver_ids = dedupe_driver_ids(driver_ids);
        let report = assign_drivers(&mut tx, point.id, &driver_ids, schedule_day()).await?;
        tx.commit().await?;

        tracing::info!(
            point_id = point.id,
            assigned = report.assigned.len(),
            failed = report.failed.len(),
            "point created"
        );
        Ok(PointWrite { point, report })
    }

    async fn update_with_drivers(
        &self,
        id: i32,
        draft: PointDraft,
        driver_ids: &[i32],
    ) -> AppResult<Option<PointWrite>> {
        let mut tx = self.pool.begin().await?;

        let point = sqlx::query_as::<_, CollectionPoint>(
            r#"
            UPDATE collection_points
            SET name = $1, address = $2, city = $3, latitude = $4, longitude = $5
            WHERE id = $6
            RETURNING id, name, address, city, latitude, longitude
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.address)
        .bind(&draft.city)
        .bind(draft.latitude)
        .bind(draft.longitude)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction rolls it back.
        let Some(point) = point else {
            return Ok(None);
        };

        let current: Vec<i32> =
            sqlx::query_scalar("SELECT DISTINCT driver_id FROM routes WHERE point_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        let diff = DriverSetDiff::between(&current, driver_ids);
        if diff.is_empty() {
            tx.commit().await?;
            tracing::info!(point_id = id, "point updated, driver set unchanged");
            return Ok(Some(PointWrite {
                point,
                report: AssignmentReport::default(),
            }));
        }

        if !diff.removed.is_empty() {
            let deleted = sqlx::query("DELETE FROM routes WHERE point_id = $1 AND driver_id = ANY($2)")
                .bind(id)
                .bind(&diff.removed)
                .execute(&mut *tx)
                .await?;
            tracing::info!(point_id = id, routes = deleted.rows_affected(), "routes removed");
        }

        let report = assign_drivers(&mut tx, id, &diff.added, schedule_day()).await?;
        tx.commit().await?;

        tracing::info!(
            point_id = id,
            removed = diff.removed.len(),
            assigned = report.assigned.len(),
            failed = report.failed.len(),
            "point updated"
        );
        Ok(Some(PointWrite { point, report }))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM collection_points WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
