//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → matcher.rs (walk the route tree, segment by segment)
//!     → route.rs (descriptor data: pattern, view, loading policy)
//!     → MatchOutcome: Matched { descriptors, params } | Redirect | NoMatch
//! ```
//!
//! # Design Decisions
//! - Route tree built once at startup, immutable at runtime
//! - No regex: segment splitting and `:param` capture only
//! - Explicit NoMatch rather than a silent default route
//! - A redirect route short-circuits before any loader is considered
//! - First matching sibling wins (declaration order)

pub mod matcher;
pub mod route;

pub use matcher::Router;
pub use route::{MatchOutcome, MatchedRoute, Route, RouteMatch, RouteParams};
