use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pawcare_api::{build_router, state::AppState};
use pawcare_config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().context("Failed to load settings")?;

    let db = pawcare_db::connect(&settings.mongo).await?;
    pawcare_db::indexes::ensure_indexes(&db).await?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState::new(&db, settings);
    let router = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "API server listening");

    axum::serve(listener, router).await?;

    Ok(())
}
