//! Route dispatch logic for the HTTP API.
//!
//! With workspaces disabled every mock lives in the default workspace and
//! the API is flat (`/api/mocks`, `/sarab/...`). With workspaces enabled the
//! workspace id is part of every mock and dispatch path.

use crate::admin_api::handlers::{mocks, replay, system, workspaces};
use crate::admin_api::server::AppState;
use crate::admin_api::types::{error_response, not_found};
use crate::metrics;
use crate::tree::NodeId;
use crate::workspace::{WorkspaceId, DEFAULT_WORKSPACE_ID};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use std::sync::Arc;
use tracing::debug;

/// Prefix under which registered mocks are served
pub const DISPATCH_PREFIX: &str = "/sarab";

/// Parsed route for `/api/...` endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiRoute {
    /// GET/POST /api/workspaces
    Workspaces,
    /// GET/POST /api/mocks or /api/workspaces/:ws/mocks
    Mocks(WorkspaceId),
    /// POST /api/mocks/:leafId or /api/workspaces/:ws/mocks/:leafId
    MockById(WorkspaceId, NodeId),
}

impl ApiRoute {
    /// Parse route from path segments after `/api`
    fn parse(segments: &[&str], workspaces_enabled: bool) -> Option<Self> {
        if workspaces_enabled {
            match segments {
                ["workspaces"] => Some(ApiRoute::Workspaces),
                ["workspaces", ws, "mocks"] => ws
                    .parse()
                    .ok()
                    .map(|id| ApiRoute::Mocks(WorkspaceId(id))),
                ["workspaces", ws, "mocks", leaf] => {
                    let ws = ws.parse().ok()?;
                    let leaf = leaf.parse().ok()?;
                    Some(ApiRoute::MockById(WorkspaceId(ws), NodeId(leaf)))
                }
                _ => None,
            }
        } else {
            match segments {
                ["mocks"] => Some(ApiRoute::Mocks(DEFAULT_WORKSPACE_ID)),
                ["mocks", leaf] => leaf
                    .parse()
                    .ok()
                    .map(|id| ApiRoute::MockById(DEFAULT_WORKSPACE_ID, NodeId(id))),
                _ => None,
            }
        }
    }

    fn workspace(&self) -> Option<WorkspaceId> {
        match self {
            ApiRoute::Workspaces => None,
            ApiRoute::Mocks(ws) | ApiRoute::MockById(ws, _) => Some(*ws),
        }
    }
}

/// Main request router
pub async fn route_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(|s| s.to_string());

    debug!("{} {}", method, path);

    let (surface, response) = route_by_path(&method, &path, query.as_deref(), req, state).await;
    metrics::record_request(surface, response.status().as_u16());
    Ok(response)
}

/// Route based on path
async fn route_by_path(
    method: &Method,
    path: &str,
    query: Option<&str>,
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> (&'static str, Response<Full<Bytes>>) {
    match (method, path) {
        (&Method::GET, "/health") => return ("system", system::handle_health(&state)),
        (&Method::GET, "/metrics") => return ("system", system::handle_metrics()),
        _ => {}
    }

    if path == DISPATCH_PREFIX || path.starts_with("/sarab/") {
        let rest = &path[DISPATCH_PREFIX.len()..];
        return ("dispatch", replay::handle_dispatch(method, rest, &state));
    }

    if let Some(rest) = path.strip_prefix("/api/") {
        return ("api", route_api(method, rest, query, req, state).await);
    }

    ("api", not_found())
}

/// Route `/api/...` requests
async fn route_api(
    method: &Method,
    path: &str,
    query: Option<&str>,
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();

    let route = match ApiRoute::parse(&segments, state.workspaces_enabled) {
        Some(r) => r,
        None => return not_found(),
    };

    if let Some(ws) = route.workspace() {
        if state.workspaces_enabled && !state.manager.workspace_exists(ws) {
            return error_response(
                StatusCode::NOT_FOUND,
                &format!("workspace [{ws}] is not found"),
            );
        }
    }

    match (method, route) {
        (&Method::GET, ApiRoute::Workspaces) => workspaces::handle_list(query, &state),
        (&Method::POST, ApiRoute::Workspaces) => workspaces::handle_create(req, state).await,

        (&Method::GET, ApiRoute::Mocks(ws)) => mocks::handle_list(ws, &state),
        (&Method::POST, ApiRoute::Mocks(ws)) => mocks::handle_register(ws, req, state).await,

        (&Method::POST, ApiRoute::MockById(ws, leaf)) => {
            mocks::handle_add_override(ws, leaf, req, state).await
        }

        _ => error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &format!("method [{method}] is not supported on [/api/{path}]"),
        ),
    }
}

/// Path of the management endpoint for a mock
pub fn mock_location(workspaces_enabled: bool, workspace_id: WorkspaceId, leaf: NodeId) -> String {
    if workspaces_enabled {
        format!("/api/workspaces/{workspace_id}/mocks/{leaf}")
    } else {
        format!("/api/mocks/{leaf}")
    }
}
