use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use langop_domain::Kind;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

const PARENT_KINDS: [Kind; 4] = [Kind::Cluster, Kind::Tool, Kind::Agent, Kind::Persona];

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Ready once the orchestrator client answers a trivial list call.
pub async fn ready(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.client.list(Kind::Cluster, None).await?;
    Ok(StatusCode::OK)
}

/// Per-kind resource counts plus the capability cache snapshot, without
/// forcing a fresh probe of any group/version.
pub async fn status(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let mut counts = serde_json::Map::new();
    for kind in PARENT_KINDS {
        let objects = state.client.list(kind, None).await?;
        counts.insert(kind.to_string(), json!(objects.len()));
    }

    let capabilities: Vec<Value> = state
        .cache
        .snapshot()
        .into_iter()
        .map(|(group_version, available)| json!({ "group_version": group_version, "available": available }))
        .collect();

    Ok(Json(json!({
        "resource_counts": counts,
        "capabilities": capabilities,
    })))
}
