pub mod handlers;
pub mod routes;
pub mod state;

pub use handlers::*;
pub use routes::*;
pub use state::*;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use harness_control::Dispatcher;
use harness_metrics::MetricsService;
use harness_models::Config;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub async fn start_server(
    bind: String,
    port: u16,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<MetricsService>,
    config: Config,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let body_limit = (config.server.max_request_body_size_mb * 1024 * 1024) as usize;
    let app_state = AppState {
        config,
        dispatcher,
        metrics,
    };

    let app = Router::new()
        .merge(build_router(app_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .layer(DefaultBodyLimit::max(body_limit));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind, port)).await?;
    info!("Execution server listening on {}:{}", bind, port);

    axum::serve(listener, app).await?;
    Ok(())
}
