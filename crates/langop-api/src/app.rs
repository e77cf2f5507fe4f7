use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use langop_cache::CapabilityCache;
use langop_client::OrchestratorClient;
use tower_http::trace::TraceLayer;

use crate::auth::require_bearer_token;
use crate::handlers;
use crate::state::AppState;

pub fn build_app(
    client: Arc<dyn OrchestratorClient>,
    cache: Arc<CapabilityCache>,
    auth_token: Arc<String>,
) -> Router {
    let state = AppState { client, cache, auth_token };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/status", get(handlers::status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
