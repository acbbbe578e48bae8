//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the app
//! server. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration for the universal app server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration (bind address, static assets).
    pub server: ServerConfig,

    /// Upstream API the loaders and the `/api` proxy talk to.
    pub api: UpstreamConfig,

    /// Server-side rendering switches.
    pub ssr: SsrConfig,

    /// Site metadata rendered into the document head.
    pub site: SiteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind (e.g., "127.0.0.1").
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Directory served under `/static`.
    pub static_dir: String,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: "static".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Bind address in `host:port` form.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream API configuration.
///
/// Route loaders fetch from this host during server rendering, and the
/// `/api` passthrough proxies browser requests to it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// API host (e.g., "127.0.0.1").
    pub host: String,

    /// API port.
    pub port: u16,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

impl UpstreamConfig {
    /// Base URL of the upstream API.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Server-side rendering switches.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SsrConfig {
    /// When true the server skips matching and loading entirely and always
    /// replies with the bare shell; the client runs the loaders after mount.
    pub disabled: bool,
}

/// Site metadata rendered into the document head.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Default document title.
    pub title: String,

    /// Template applied when a matched route supplies its own title.
    /// `%s` is replaced with the route title.
    pub title_template: String,

    /// Description meta tag content.
    pub description: String,

    /// Additional meta tags.
    pub meta: Vec<MetaTag>,

    /// Path of the client bundle script referenced from the shell.
    pub bundle: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "isoserve".to_string(),
            title_template: "isoserve: %s".to_string(),
            description: "Universal single-page-application starter kit.".to_string(),
            meta: Vec::new(),
            bundle: "/static/main.js".to_string(),
        }
    }
}

/// A single `<meta name content>` tag.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetaTag {
    pub name: String,
    pub content: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
