use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection};

use super::{
    pool_options,
    registry::{DbProvider, DbProviderId},
};
use crate::config::DatabaseConfig;

/// sqlx opens every SQLite connection with `foreign_keys = ON` and a five
/// second busy timeout, so the pool needs no further session setup.
pub struct SqliteDbProvider;

#[async_trait]
impl DbProvider for SqliteDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Sqlite
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut options = pool_options(cfg);
        // Every pooled connection to an in-memory database is a separate
        // database, so the pool must hold exactly one.
        if is_in_memory(&cfg.url) {
            options.max_connections(1).min_connections(1);
        }
        Ok(Database::connect(options).await?)
    }
}

fn is_in_memory(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    url.contains(":memory:") || url.contains("mode=memory")
}
