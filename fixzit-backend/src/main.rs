// src/main.rs
use fixzit_backend::api::{create_app, AppState};
use fixzit_backend::config::AppConfig;
use fixzit_backend::db::create_db_pool;
use migration::{Migrator, MigratorTrait};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// レート制限ウィンドウの掃除間隔
const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fixzit_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Fixzit backend...");

    let app_config = AppConfig::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        address = %app_config.bind_address(),
        "Configuration loaded"
    );

    let db_pool = create_db_pool(&app_config).await?;
    tracing::info!("Database pool created successfully.");

    Migrator::up(&db_pool, None).await?;
    tracing::info!("Database migrations applied.");

    let app_state = AppState::build(db_pool, &app_config)?;
    app_state
        .bootstrap_service
        .run(app_config.superadmin.as_ref())
        .await?;

    // 期限切れのレート制限ウィンドウを定期的に削除
    let limiter = app_state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = limiter.prune_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "Pruned expired rate limit windows");
            }
        }
    });

    let app = create_app(app_state);

    let listener = TcpListener::bind(app_config.bind_address()).await?;
    tracing::info!("Server listening on {}", app_config.bind_address());
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
