//! HTTP server implementation using Axum.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::response::Html;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use chorewheel_db::ChoreStore;

/// Shared state for the gateway.
pub struct AppState {
    pub store: Arc<ChoreStore>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<ChoreStore>) -> Self {
        Self { store, start_time: Instant::now() }
    }
}

/// Serve the dashboard HTML page.
async fn dashboard_page() -> Html<&'static str> {
    Html(super::dashboard::DASHBOARD_HTML)
}

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(dashboard_page))
        .route("/api/health", get(super::routes::health_check))
        .route("/api/chores", get(super::routes::list_chores))
        .route("/api/chores/{id}", post(super::routes::complete_chore))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<()> {
    let router = build_router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Gateway listening on http://{addr}");
    axum::serve(listener, router).await?;
    Ok(())
}
