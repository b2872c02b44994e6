use std::sync::Arc;

use anyhow::{Result, anyhow, ensure};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::config::DatabaseConfig;

/// Storage engines the server can run on, named by URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbProviderId {
    Postgres,
    Sqlite,
}

impl DbProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            DbProviderId::Postgres => "postgres",
            DbProviderId::Sqlite => "sqlite",
        }
    }

    /// `postgres://`, `postgresql://` and `sqlite:` (including
    /// `sqlite::memory:`) are recognised; the scheme is case-insensitive.
    pub fn from_url(url: &str) -> Option<Self> {
        let (scheme, _) = url.trim().split_once(':')?;
        match scheme.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(DbProviderId::Postgres),
            "sqlite" => Some(DbProviderId::Sqlite),
            _ => None,
        }
    }
}

#[async_trait]
pub trait DbProvider: Send + Sync {
    fn id(&self) -> DbProviderId;
    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection>;
}

#[derive(Default)]
pub struct DbProviders {
    providers: Vec<Arc<dyn DbProvider>>,
}

impl DbProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, provider: Arc<dyn DbProvider>) -> Result<Self> {
        let id = provider.id();
        ensure!(
            !self.providers.iter().any(|existing| existing.id() == id),
            "database provider registered twice: {}",
            id.as_str()
        );
        self.providers.push(provider);
        Ok(self)
    }

    pub fn resolve(&self, url: &str) -> Result<Arc<dyn DbProvider>> {
        let id = DbProviderId::from_url(url).ok_or_else(|| {
            anyhow!(
                "unsupported database url '{}'; expected postgres://, postgresql:// or sqlite:",
                redact_url(url)
            )
        })?;
        self.providers
            .iter()
            .find(|provider| provider.id() == id)
            .cloned()
            .ok_or_else(|| anyhow!("no database provider registered for {}", id.as_str()))
    }
}

/// Keeps only the scheme so credentials never reach the logs.
fn redact_url(url: &str) -> String {
    match url.trim().split_once(':') {
        Some((scheme, _)) if !scheme.is_empty() => format!("{scheme}:<redacted>"),
        _ => "<invalid-url>".to_string(),
    }
}
