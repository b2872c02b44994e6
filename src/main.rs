use std::sync::Arc;

use anyhow::Context;

use helpdesk::{
    config::AppConfig,
    db::{connection, seed},
    logging::{init_tracing, report_fatal},
    routes::app,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        report_fatal(&err);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load config")?;
    init_tracing(&cfg.logging);

    let db = connection::connect(&cfg.database).await?;
    if cfg.database.seed_sample_data {
        seed::ensure_seed_data(&db)
            .await
            .context("failed to seed sample data")?;
    }

    let addr = cfg.socket_addr()?;
    let state = AppState::new(cfg, db);
    let app = app(Arc::clone(&state));

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
