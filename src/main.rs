//! QA-T chat service
//!
//! Drives test case and Selenium script generation conversations against the
//! QA-T generation backend and exposes the chat state to the browser UI.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod backend;
mod config;
mod conversation;
mod core;
mod routes;
mod selection;

use backend::HttpTransport;
use config::Config;
use crate::core::{Orchestrator, REQUEST_TIMEOUT};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: Arc<Orchestrator>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qat_chat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let transport = Arc::new(HttpTransport::new(config.backend_url.clone()));
    let orchestrator = Arc::new(Orchestrator::new(transport));

    tracing::info!(
        backend = %config.backend_url,
        timeout_secs = REQUEST_TIMEOUT.as_secs(),
        "Generation backend configured"
    );

    let max_upload_bytes = config.client.upload.max_file_bytes;
    let state = AppState {
        config,
        orchestrator,
    };

    let app = Router::new()
        .merge(routes::router(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("QA-T chat API running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
