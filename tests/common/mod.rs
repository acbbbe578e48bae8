//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use isoserve::config::AppConfig;
use isoserve::lifecycle::Shutdown;
use isoserve::{pages, HttpServer};

/// Counts requests the mock upstream has served.
#[derive(Clone, Default)]
pub struct ApiCalls(Arc<AtomicU32>);

impl ApiCalls {
    pub fn count(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Start a mock upstream API on an ephemeral port.
///
/// `failing` makes every endpoint reply 500, for loader-failure tests.
pub async fn start_mock_api(failing: bool) -> (SocketAddr, ApiCalls) {
    let calls = ApiCalls::default();

    let info_calls = calls.clone();
    let widgets_calls = calls.clone();
    let users_calls = calls.clone();

    let app = Router::new()
        .route(
            "/info",
            get(move || {
                let calls = info_calls.clone();
                async move {
                    calls.bump();
                    respond(failing, json!({ "message": "hello from upstream" }))
                }
            }),
        )
        .route(
            "/widgets",
            get(move || {
                let calls = widgets_calls.clone();
                async move {
                    calls.bump();
                    respond(failing, json!([{ "id": 1, "name": "sprocket" }]))
                }
            }),
        )
        .route(
            "/users/{id}",
            get(move |Path(id): Path<String>| {
                let calls = users_calls.clone();
                async move {
                    calls.bump();
                    respond(failing, json!({ "id": id, "name": "Ann" }))
                }
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, calls)
}

fn respond(failing: bool, body: serde_json::Value) -> (StatusCode, Json<serde_json::Value>) {
    if failing {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "upstream_down" })))
    } else {
        (StatusCode::OK, Json(body))
    }
}

/// Boot the app server wired to the given upstream, on an ephemeral
/// port. Returns the base URL and the shutdown handle.
pub async fn start_app(mut config: AppConfig, api_addr: SocketAddr) -> (String, Shutdown) {
    config.api.host = api_addr.ip().to_string();
    config.api.port = api_addr.port();

    let listener = TcpListener::bind(format!("{}:0", config.server.host))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, pages::routes(), pages::registry());
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    (format!("http://{addr}"), shutdown)
}
