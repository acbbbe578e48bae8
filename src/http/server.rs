//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve static assets and the API passthrough
//! - Dispatch everything else to the SSR handler
//! - Run with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::routing::any;
use axum::Router as AxumRouter;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::proxy::proxy_handler;
use crate::http::request::RequestIdLayer;
use crate::http::ssr::ssr_handler;
use crate::render::Document;
use crate::routing::{Route, Router};
use crate::state::ReducerRegistry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub router: Arc<Router>,

    /// Cloned into a fresh store for every request.
    pub base_registry: ReducerRegistry,

    pub document: Arc<Document>,

    /// Shared connection pool for the API passthrough.
    pub upstream: Client<HttpConnector, Body>,
}

/// HTTP server for the universal app.
pub struct HttpServer {
    app: AxumRouter,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new server from configuration, a route tree, and the
    /// registry of slice reducers.
    pub fn new(config: AppConfig, routes: Vec<Route>, registry: ReducerRegistry) -> Self {
        let upstream = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            config: Arc::new(config.clone()),
            router: Arc::new(Router::new(routes)),
            base_registry: registry,
            document: Arc::new(Document::new(config.site.clone())),
            upstream,
        };

        let app = Self::build_router(&config, state);
        Self { app, config }
    }

    /// Build the axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> AxumRouter {
        AxumRouter::new()
            .route("/api", any(proxy_handler))
            .route("/api/{*path}", any(proxy_handler))
            .nest_service("/static", ServeDir::new(&config.server.static_dir))
            .fallback(ssr_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown signal received");
                    }
                    result = tokio::signal::ctrl_c() => {
                        if let Err(error) = result {
                            tracing::error!(%error, "Failed to listen for Ctrl-C");
                        } else {
                            tracing::info!("Ctrl-C received");
                        }
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
