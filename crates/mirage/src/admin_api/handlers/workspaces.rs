//! Workspace handlers.

use super::run_blocking;
use crate::admin_api::server::AppState;
use crate::admin_api::types::{
    created, error_response, json_response, mock_error_response, parse_json_body,
    CreateWorkspaceRequest, PageQuery,
};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;

/// POST /api/workspaces - Create a workspace
pub async fn handle_create(req: Request<Incoming>, state: Arc<AppState>) -> Response<Full<Bytes>> {
    let request: CreateWorkspaceRequest = match parse_json_body(req).await {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let manager = state.manager.clone();
    match run_blocking(move || manager.create_workspace(&request.name, &request.description))
        .await
    {
        Ok(id) => created(
            &format!("/api/workspaces/{id}"),
            &serde_json::json!({ "id": id }),
        ),
        Err(e) => mock_error_response(&e),
    }
}

/// GET /api/workspaces?page=&size= - Page through workspaces
pub fn handle_list(query: Option<&str>, state: &AppState) -> Response<Full<Bytes>> {
    let params = match PageQuery::parse(query) {
        Ok(p) => p,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, &message),
    };

    match state.manager.list_workspaces(params.page, params.size) {
        Ok(page) => json_response(StatusCode::OK, &page),
        Err(e) => mock_error_response(&e),
    }
}
