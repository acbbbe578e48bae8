//! API passthrough proxy.
//!
//! # Responsibilities
//! - Forward `/api/*` requests verbatim to the upstream API
//! - Stream the upstream response back without buffering
//! - Map upstream failures to a structured JSON error, never a hung
//!   connection
//!
//! # Design Decisions
//! - The `/api` prefix is stripped before forwarding, so the upstream
//!   sees its own paths
//! - Connection resets are expected churn and logged at debug; every
//!   other proxy failure is logged as an error

use std::str::FromStr;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Forward one request to the upstream API.
pub async fn proxy_handler(State(state): State<AppState>, req: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = req.request_id().to_string();

    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let stripped = match path_and_query.strip_prefix("/api") {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('?') => format!("/{rest}"),
        Some(rest) => rest.to_string(),
        None => path_and_query.to_string(),
    };

    let target = format!("{}{}", state.config.api.base_url(), stripped);
    let uri = match Uri::from_str(&target) {
        Ok(uri) => uri,
        Err(_) => return bad_target(&request_id, &target),
    };

    tracing::debug!(request_id = %request_id, target = %target, "Proxying API request");

    let (mut parts, body) = req.into_parts();
    parts.uri = uri;
    let upstream_req = Request::from_parts(parts, body);

    match state.upstream.request(upstream_req).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_proxy_request(status.as_u16(), start);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(error) => {
            if is_connection_reset(&error) {
                tracing::debug!(request_id = %request_id, %error, "Upstream connection reset");
            } else {
                tracing::error!(request_id = %request_id, %error, "Proxy error");
            }
            metrics::record_proxy_request(500, start);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({ "error": "proxy_error", "reason": error.to_string() })),
            )
                .into_response()
        }
    }
}

fn bad_target(request_id: &str, target: &str) -> Response {
    tracing::error!(request_id = %request_id, target = %target, "Unparseable proxy target");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({ "error": "proxy_error", "reason": "invalid upstream target" })),
    )
        .into_response()
}

/// Walk the error chain looking for an OS-level connection reset.
fn is_connection_reset(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            return io.kind() == std::io::ErrorKind::ConnectionReset;
        }
        source = err.source();
    }
    false
}
