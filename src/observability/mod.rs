//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handlers produce:
//!     → logging.rs (structured tracing events, request_id on every line)
//!     → metrics.rs (counters + histograms, Prometheus scrape endpoint)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; the request ID flows through the
//!   SSR handler, the proxy, and upstream calls
//! - Metric updates are cheap atomic operations; the exporter is opt-in
//!   via config

pub mod logging;
pub mod metrics;
