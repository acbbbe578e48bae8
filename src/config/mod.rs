//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs, --config flag)
//!     → environment overrides (HOST, PORT, APIHOST, APIPORT, DISABLE_SSR)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc to the request handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults so a bare `web` invocation works
//! - Environment variables win over the file, matching the original
//!   twelve-factor deployment style
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, MetaTag, ObservabilityConfig, ServerConfig, SiteConfig, SsrConfig, UpstreamConfig,
};
