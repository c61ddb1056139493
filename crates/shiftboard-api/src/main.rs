mod config;
mod error;
mod extra_info;
mod routes;

use std::sync::Arc;

use config::AppConfig;
use routes::{app_router, AppState};
use shiftboard_core::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shiftboard_api=info".parse().expect("valid directive")),
        )
        .init();

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!("Starting shiftboard-api with config: {:?}", config);

    let db = Database::open(&config.database_path)?;
    tracing::info!(path = %config.database_path, "Opened scheduler database");

    let state = AppState::new(config, db);
    let bind_addr = state.config.bind_addr.clone();
    let router = app_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("shiftboard-api listening on {}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
