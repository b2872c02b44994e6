use anyhow::Context;
use sea_orm::DatabaseConnection;
use tracing::info;

use super::providers::default_registry;
use crate::config::DatabaseConfig;

/// Opens the pool for `cfg.url` and brings the schema up to date with the
/// registered entities. Missing tables are created; nothing is dropped.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let registry = default_registry()?;
    let provider = registry.resolve(&cfg.url)?;
    info!(provider = provider.id().as_str(), "connecting to database");

    let db = provider
        .connect(cfg)
        .await
        .context("failed to connect to database")?;

    info!("syncing database schema from entities");
    db.get_schema_registry("helpdesk::db::entities::*")
        .sync(&db)
        .await
        .context("failed to sync database schema")?;
    Ok(db)
}
