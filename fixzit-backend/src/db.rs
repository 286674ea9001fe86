// src/db.rs
use crate::config::AppConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_db_pool(config: &AppConfig) -> Result<DbPool, DbErr> {
    connect_with_options(&config.database_url, 20).await
}

pub async fn connect_with_options(url: &str, max_connections: u32) -> Result<DbPool, DbErr> {
    let mut opt = ConnectOptions::new(url.to_string());

    // インメモリSQLiteは接続ごとに別DBになるため1本に固定
    let max_connections = if url.starts_with("sqlite::memory:") {
        1
    } else {
        max_connections
    };

    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(30 * 60))
        .sqlx_logging(false);

    Database::connect(opt).await
}

/// ヘルスチェック用の疎通確認
pub async fn ping(conn: &DbPool) -> bool {
    let backend = conn.get_database_backend();
    conn.execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok()
}
