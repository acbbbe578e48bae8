//! Universal SPA starter kit: server-rendered, client-hydrated.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                  APP SERVER                   │
//!                        │                                               │
//!   Page Request         │  ┌─────────┐   ┌──────────┐   ┌──────────┐   │
//!   ─────────────────────┼─▶│  http   │──▶│ routing  │──▶│  loader  │   │
//!                        │  │ server  │   │ matcher  │   │fan-out/in│   │
//!                        │  └─────────┘   └──────────┘   └────┬─────┘   │
//!                        │        │                           │          │
//!                        │        │ /api/*                    ▼          │
//!                        │        ▼                     ┌──────────┐    │
//!   API Request          │  ┌─────────┐    dispatch     │  state   │    │
//!   ─────────────────────┼─▶│  proxy  │───────────────▶ │  store   │    │
//!                        │  └────┬────┘                 └────┬─────┘    │
//!                        │       │                           │ snapshot │
//!                        │       ▼                           ▼          │
//!   Response             │  ┌─────────┐                ┌──────────┐    │
//!   ◀────────────────────┼──│upstream │                │  render  │    │
//!                        │  │   API   │                │ document │    │
//!                        │  └─────────┘                └──────────┘    │
//!                        │                                               │
//!                        │  Cross-cutting: config, observability,        │
//!                        │  lifecycle                                    │
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! One store per request on the server, one per session on a client.
//! Eager loaders gate the render; deferred loaders backfill state
//! best-effort.

// Core subsystems
pub mod api;
pub mod config;
pub mod http;
pub mod loader;
pub mod render;
pub mod routing;
pub mod state;

// Starter content
pub mod pages;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
