use sqlx::PgPool;

use crate::config::DatabaseConfig;

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Opens the pool and checks the server answers.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        tracing::info!(url = %mask_database_url(&config.url), "connecting to database");

        let pool = config.create_pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;

        tracing::info!(max_connections = config.max_connections, "✅ database connected");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("✅ migrations applied");
        Ok(())
    }
}

/// Hides credentials before a URL is logged
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    if scheme_end > at_pos {
        return url.to_string();
    }

    let credentials = &url[scheme_end..at_pos];
    let user = credentials.split(':').next().unwrap_or_default();
    format!("{}{}:***@{}", &url[..scheme_end], user, &url[at_pos + 1..])
}
