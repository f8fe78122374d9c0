use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use collection_dispatch::config::{DatabaseConfig, EnvironmentConfig};
use collection_dispatch::database::DatabaseConnection;
use collection_dispatch::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚛 Collection dispatch API");

    let env_config = EnvironmentConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    if env_config.is_production() && env_config.allowed_origins.iter().any(|o| o == "*") {
        warn!("⚠️ CORS accepts any origin in production");
    }

    let db = DatabaseConnection::connect(&db_config)
        .await
        .context("could not connect to the database")?;
    db.run_migrations().await.context("could not apply migrations")?;

    let app = create_app(AppState::postgres(db.pool().clone()), &env_config);

    let addr = env_config.server_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;

    info!(environment = %env_config.environment, origins = ?env_config.allowed_origins, "🌐 listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down");
        },
        _ = terminate => {
            info!("🛑 SIGTERM received, shutting down");
        },
    }
}
