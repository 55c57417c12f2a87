//! Request/response types and response helpers for the HTTP API.

use crate::error::MockError;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// Error body: `{"error": "<reason>", "message": "<detail>"}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Request to create a workspace
#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Paging query for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: i64,
    pub size: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

impl PageQuery {
    /// Parse `page` and `size` from a query string; other keys are ignored.
    pub fn parse(query: Option<&str>) -> Result<Self, String> {
        let mut params = Self::default();
        let Some(q) = query else {
            return Ok(params);
        };

        for pair in q.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = urlencoding::decode(value).unwrap_or_default();
            let target = match key {
                "page" => &mut params.page,
                "size" => &mut params.size,
                _ => continue,
            };
            *target = value
                .trim()
                .parse()
                .map_err(|_| format!("{key} must be a valid integer"))?;
        }
        Ok(params)
    }
}

// =============================================================================
// Response helper functions
// =============================================================================

/// Create a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string());
    build_response_with_headers(status, [("Content-Type", "application/json")], json)
}

/// Build an HTTP response with the given status and body.
///
/// Falls back to a bare response if the builder rejects its input.
pub fn build_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(body.into()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Internal Server Error"))))
}

/// Build an HTTP response with headers.
pub fn build_response_with_headers(
    status: StatusCode,
    headers: impl IntoIterator<Item = (impl AsRef<str>, impl AsRef<str>)>,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(status);
    for (key, value) in headers {
        builder = builder.header(key.as_ref(), value.as_ref());
    }
    builder
        .body(Full::new(body.into()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Internal Server Error"))))
}

/// `201 Created` pointing at the new resource.
pub fn created<T: Serialize>(location: &str, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string());
    build_response_with_headers(
        StatusCode::CREATED,
        [("Content-Type", "application/json"), ("Location", location)],
        json,
    )
}

/// Create an error response
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let error = ErrorResponse {
        error: status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string(),
        message: message.to_string(),
    };
    json_response(status, &error)
}

/// Status code for a domain error.
pub fn status_for(error: &MockError) -> StatusCode {
    match error {
        MockError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        MockError::NotFound(_) => StatusCode::NOT_FOUND,
        MockError::Conflict(_) => StatusCode::CONFLICT,
        MockError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error to its JSON error response. Storage details stay in
/// the logs.
pub fn mock_error_response(error: &MockError) -> Response<Full<Bytes>> {
    match error {
        MockError::InvalidInput(message)
        | MockError::NotFound(message)
        | MockError::Conflict(message) => error_response(status_for(error), message),
        MockError::Storage(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "storage error, see server logs",
        ),
    }
}

/// Create a not found response
pub fn not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// Collect request body into bytes
pub async fn collect_body(req: Request<Incoming>) -> Result<Bytes, String> {
    use http_body_util::BodyExt;
    req.collect()
        .await
        .map(|c| c.to_bytes())
        .map_err(|e| format!("Failed to read request body: {e}"))
}

/// Read and deserialize a JSON request body, or produce the 400 to send.
pub async fn parse_json_body<T: serde::de::DeserializeOwned>(
    req: Request<Incoming>,
) -> Result<T, Response<Full<Bytes>>> {
    let body = collect_body(req)
        .await
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e))?;
    serde_json::from_slice(&body).map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            &format!("request body is invalid: {e}"),
        )
    })
}
