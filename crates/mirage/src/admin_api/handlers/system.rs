//! System handlers: health and metrics.

use crate::admin_api::server::AppState;
use crate::admin_api::types::*;
use crate::metrics;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// GET /health - Health check
pub fn handle_health(state: &AppState) -> Response<Full<Bytes>> {
    let snapshot = state.manager.store().snapshot();
    json_response(
        StatusCode::OK,
        &serde_json::json!({
            "status": "ok",
            "backend": state.manager.store().backend_name(),
            "workspacesEnabled": state.workspaces_enabled,
            "nodes": snapshot.tree.len(),
            "bindings": snapshot.bindings.len(),
        }),
    )
}

/// GET /metrics - Prometheus metrics
pub fn handle_metrics() -> Response<Full<Bytes>> {
    build_response_with_headers(
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4")],
        metrics::collect_metrics(),
    )
}
