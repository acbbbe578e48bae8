//! Upstream API access subsystem.
//!
//! # Design Decisions
//! - One client per incoming request on the server, built from that
//!   request's headers; no client instance crosses requests
//! - Cookies are forwarded so the upstream sees the browser's session
//! - The request ID travels along for cross-service correlation

pub mod client;

pub use client::{ApiClient, ApiError};
