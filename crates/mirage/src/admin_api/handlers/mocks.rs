//! Mock management handlers.

use super::run_blocking;
use crate::admin_api::router::mock_location;
use crate::admin_api::server::AppState;
use crate::admin_api::types::{created, json_response, mock_error_response, parse_json_body};
use crate::mocks::{NewMock, NewOverride};
use crate::tree::NodeId;
use crate::workspace::WorkspaceId;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tracing::warn;

/// POST /api/mocks - Register a mock
pub async fn handle_register(
    workspace_id: WorkspaceId,
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let mock: NewMock = match parse_json_body(req).await {
        Ok(m) => m,
        Err(resp) => return resp,
    };

    let manager = state.manager.clone();
    match run_blocking(move || manager.register(workspace_id, &mock)).await {
        Ok(registered) => created(
            &mock_location(state.workspaces_enabled, workspace_id, registered.leaf_id),
            &registered,
        ),
        Err(e) => mock_error_response(&e),
    }
}

/// POST /api/mocks/:leafId - Add a parameter-specific response
pub async fn handle_add_override(
    workspace_id: WorkspaceId,
    leaf_id: NodeId,
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let request: NewOverride = match parse_json_body(req).await {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let manager = state.manager.clone();
    match run_blocking(move || manager.add_specific_override(workspace_id, leaf_id, &request))
        .await
    {
        Ok(binding_id) => created(
            &mock_location(state.workspaces_enabled, workspace_id, leaf_id),
            &serde_json::json!({ "binding_id": binding_id, "leaf_id": leaf_id }),
        ),
        Err(e) => mock_error_response(&e),
    }
}

/// GET /api/mocks - List generic mocks
pub fn handle_list(workspace_id: WorkspaceId, state: &AppState) -> Response<Full<Bytes>> {
    match state.manager.list_mocks(workspace_id) {
        Ok(mocks) => json_response(StatusCode::OK, &mocks),
        Err(e) => {
            warn!(workspace = %workspace_id, "Listing mocks failed: {}", e);
            mock_error_response(&e)
        }
    }
}
