use std::sync::Arc;

use axum::Router;

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::{connection, seed},
    routes::app,
    state::AppState,
};

pub const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// Settings for a private in-memory database; nothing is read from the
/// environment.
pub fn test_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: IN_MEMORY_DATABASE_URL.to_string(),
            max_connections: 1,
            min_idle: 1,
            seed_sample_data: true,
        },
        ..AppConfig::default()
    }
}

/// Fresh schema with the sample users and tickets.
pub async fn test_state() -> Arc<AppState> {
    let cfg = test_config();
    let db = connection::connect(&cfg.database)
        .await
        .expect("connect to in-memory database");
    seed::ensure_seed_data(&db).await.expect("seed sample data");
    AppState::new(cfg, db)
}

/// Fresh schema with no rows at all.
pub async fn empty_test_state() -> Arc<AppState> {
    let cfg = test_config();
    let db = connection::connect(&cfg.database)
        .await
        .expect("connect to in-memory database");
    AppState::new(cfg, db)
}

pub fn test_router(state: &Arc<AppState>) -> Router {
    app(Arc::clone(state))
}
