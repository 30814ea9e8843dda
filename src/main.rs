//! Blogging hypermedia server.
//!
//! `cargo run --bin blogging-server`; settings come from the environment or `.env`
//! (`BIND_ADDR`, `SERVICE_MODEL_PATH`, `MAX_BODY_BYTES`, `RUST_LOG`).

use blogging_jsonapi::{app, blogging_service_model, load_from_path, resolve, AppState, BloggingRepository, ServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blogging_jsonapi=info,blogging_server=info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let model = match &config.service_model_path {
        Some(path) => resolve(&load_from_path(path).await?)?,
        None => blogging_service_model()?,
    };
    tracing::info!(resource_types = model.types().len(), "service model resolved");

    let state = AppState::new(model, BloggingRepository::seeded());
    let app = app(state, config.max_body_bytes);
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Blogging API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
