//! Replay handler: answers `/sarab/...` requests with the matched mock.

use crate::admin_api::server::AppState;
use crate::admin_api::types::{build_response, build_response_with_headers, error_response, mock_error_response};
use crate::dispatch::MockResponse;
use crate::error::MockError;
use crate::workspace::{WorkspaceId, DEFAULT_WORKSPACE_ID};
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Response, StatusCode};
use tracing::warn;

/// Split the workspace id off the dispatch path when workspaces are on.
fn split_workspace(path: &str, workspaces_enabled: bool) -> Result<(WorkspaceId, &str), MockError> {
    if !workspaces_enabled {
        return Ok((DEFAULT_WORKSPACE_ID, path));
    }

    let trimmed = path.trim_start_matches('/');
    let (id, rest) = match trimmed.find('/') {
        Some(i) => (&trimmed[..i], &trimmed[i..]),
        None => (trimmed, ""),
    };
    let id: i64 = id
        .parse()
        .map_err(|_| MockError::invalid("workspaceId must be valid integer"))?;
    Ok((WorkspaceId(id), rest))
}

fn replay(response: MockResponse) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match response.body {
        Some(body) => build_response_with_headers(
            status,
            [("Content-Type", "text/plain; charset=utf-8")],
            body,
        ),
        None => build_response(status, Bytes::new()),
    }
}

/// ANY /sarab/... - Dispatch to the registered mock
pub fn handle_dispatch(method: &Method, path: &str, state: &AppState) -> Response<Full<Bytes>> {
    let (workspace_id, path) = match split_workspace(path, state.workspaces_enabled) {
        Ok(parts) => parts,
        Err(e) => return mock_error_response(&e),
    };

    if state.workspaces_enabled && !state.manager.workspace_exists(workspace_id) {
        return error_response(
            StatusCode::NOT_FOUND,
            &format!("workspace [{workspace_id}] is not found"),
        );
    }

    match state.dispatcher.dispatch(workspace_id, path, method.as_str()) {
        Ok(response) => replay(response),
        Err(e @ MockError::Storage(_)) => {
            warn!(workspace = %workspace_id, path, "Dispatch failed: {:#}", e);
            mock_error_response(&e)
        }
        Err(e) => mock_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_workspace_disabled() {
        let (ws, rest) = split_workspace("/items/1", false).unwrap();
        assert_eq!(ws, DEFAULT_WORKSPACE_ID);
        assert_eq!(rest, "/items/1");
    }

    #[test]
    fn test_split_workspace_enabled() {
        assert_eq!(
            split_workspace("/12/items/1", true).unwrap(),
            (WorkspaceId(12), "/items/1")
        );
        assert_eq!(split_workspace("/12", true).unwrap(), (WorkspaceId(12), ""));
        assert!(matches!(
            split_workspace("/abc/items", true),
            Err(MockError::InvalidInput(_))
        ));
        assert!(split_workspace("", true).is_err());
    }

    #[test]
    fn test_replay_without_body_is_empty() {
        let resp = replay(MockResponse {
            status: 204,
            body: None,
        });
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().get("Content-Type").is_none());
    }

    #[test]
    fn test_replay_with_body() {
        let resp = replay(MockResponse {
            status: 418,
            body: Some("teapot".to_string()),
        });
        assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/plain; charset=utf-8"
        );
    }
}
