use crate::{handlers::*, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Function management
        .route("/functions", post(register_function))
        .route("/functions", get(list_functions))
        .route("/functions/:name", get(get_function))
        .route("/functions/:name", delete(delete_function))
        // Invocation
        .route("/functions/:name/invocations", post(invoke_function))
        // Health and metrics
        .route("/healthz", get(health_check))
        .route("/metrics", get(metrics))
}

pub fn build_router(state: AppState) -> Router {
    create_router().with_state(state)
}
