//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware, graceful shutdown)
//!     → request.rs (request ID injection)
//!     → /static/*  → file service
//!     → /api/*     → proxy.rs (upstream passthrough)
//!     → everything else → ssr.rs (match → load → render)
//! ```

pub mod proxy;
pub mod request;
pub mod server;
pub mod ssr;

pub use request::{RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
