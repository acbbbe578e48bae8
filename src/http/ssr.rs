//! Server-side rendering request handler.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → fresh Store (one per request) + route-change dispatch
//!     → request-scoped ApiClient (cookies + request ID forwarded)
//!     → SSR disabled? → shell response, loaders left to the client
//!     → Router::resolve → Redirect (302) | NoMatch (404) | Matched
//!     → load_route_data (readiness signal)
//!     → Ok  → render views + document, 200
//!     → Err → log reason, degraded shell, 500
//! ```
//!
//! # Design Decisions
//! - The store never outlives the request; nothing leaks across requests
//! - Loader failure degrades to client hydration instead of a blank
//!   error: the shell still carries whatever state already landed
//! - The server-level timeout layer is the external deadline around the
//!   eager join; the coordinator itself never times out

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::api::ApiClient;
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::loader::{load_route_data, LoaderContext};
use crate::observability::metrics;
use crate::routing::MatchOutcome;
use crate::state::{route_changed, Store};

/// Handle one page request.
pub async fn ssr_handler(State(state): State<AppState>, req: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = req.request_id().to_string();
    let location = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let path = req.uri().path().to_string();

    // Fresh store per request; the routing slice tracks the location.
    let store = Arc::new(Store::new(state.base_registry.clone(), None));
    store.dispatch(route_changed(&location));

    let client = match ApiClient::for_request(&state.config.api, req.headers()) {
        Ok(client) => Arc::new(client),
        Err(error) => {
            tracing::error!(request_id = %request_id, %error, "Failed to build upstream client");
            metrics::record_ssr_request(500, "error", start);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };

    if state.config.ssr.disabled {
        tracing::debug!(request_id = %request_id, path = %path, "SSR disabled; serving shell");
        let page = state.document.render(None, None, &store.snapshot());
        metrics::record_ssr_request(200, "shell", start);
        return Html(page).into_response();
    }

    match state.router.resolve(&path) {
        MatchOutcome::Redirect(to) => {
            tracing::debug!(request_id = %request_id, path = %path, to = %to, "Route redirect");
            metrics::record_ssr_request(302, "redirect", start);
            redirect(&to)
        }
        MatchOutcome::NoMatch => {
            tracing::debug!(request_id = %request_id, path = %path, "No route matched");
            metrics::record_ssr_request(404, "not_found", start);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
        MatchOutcome::Matched(matched) => {
            let ctx = LoaderContext::new(store.clone(), matched.params.clone(), client);
            match load_route_data(&matched, &ctx).await {
                Ok(()) => {
                    let snapshot = store.snapshot();
                    let markup = crate::render::render_routes(&matched, &snapshot);
                    let page = state
                        .document
                        .render(matched.title(), Some(&markup), &snapshot);
                    metrics::record_ssr_request(200, "rendered", start);
                    Html(page).into_response()
                }
                Err(error) => {
                    tracing::error!(
                        request_id = %request_id,
                        path = %path,
                        %error,
                        "Route data loading failed; degrading to client hydration"
                    );
                    let page = state.document.render(None, None, &store.snapshot());
                    metrics::record_ssr_request(500, "degraded", start);
                    (StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response()
                }
            }
        }
    }
}

fn redirect(to: &str) -> Response {
    match header::HeaderValue::from_str(to) {
        Ok(location) => {
            let mut response = StatusCode::FOUND.into_response();
            response.headers_mut().insert(header::LOCATION, location);
            response
        }
        Err(_) => {
            tracing::error!(to = %to, "Redirect target is not a valid header value");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
