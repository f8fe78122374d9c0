use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::Driver;
use crate::repositories::DriverRepository;
use crate::utils::errors::AppResult;

pub struct PgDriverRepository {
    pool: PgPool,
}

impl PgDriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DriverRepository for PgDriverRepository {
    async fn list(&self) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(
            "SELECT id, name, created_at FROM drivers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(
            "SELECT id, name, created_at FROM drivers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    async fn create(&self, name: &str) -> AppResult<Driver> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(driver_id = driver.id, "driver created");
        Ok(driver)
    }

    async fn update(&self, id: i32, name: &str) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET name = $1
            WHERE id = $2
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
