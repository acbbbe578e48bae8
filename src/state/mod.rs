//! Application state subsystem.
//!
//! # Data Flow
//! ```text
//! Action (action.rs)
//!     → store.rs (dispatch: lock, apply every slice reducer, unlock)
//!     → registry.rs (slice name → reducer lookup)
//!     → new slice state replaces old under the same name
//!
//! Late-bound slices:
//!     store.inject(name, reducer)
//!     → registry insert (last registration wins)
//!     → missing slice initialized to the reducer's default
//!     → existing slice state preserved verbatim
//! ```
//!
//! # Design Decisions
//! - One store per incoming request on the server; state never crosses
//!   requests
//! - Slice state is JSON (`serde_json::Value`): the state shape is
//!   late-bound by design, and the snapshot serializes straight into the
//!   hydration payload
//! - All mutation goes through `dispatch`; a dispatch is atomic from the
//!   container's perspective
//! - The registry is owned by the store instance, never a process-wide
//!   singleton

pub mod action;
pub mod registry;
pub mod store;

use serde_json::{json, Value};
use std::collections::BTreeMap;

pub use action::Action;
pub use registry::{FnReducer, Reducer, ReducerRegistry};
pub use store::Store;

/// A synchronous copy of all slice state at one instant.
pub type StateSnapshot = BTreeMap<String, Value>;

/// Action kind dispatched on every request to synchronize the `routing`
/// slice with the current location.
pub const ROUTE_CHANGED: &str = "routing/changed";

/// Build the route-change action for a location.
pub fn route_changed(location: &str) -> Action {
    Action::with_payload(ROUTE_CHANGED, json!({ "location": location }))
}

/// Registry with the cross-cutting slices every store carries: currently
/// just `routing`, which mirrors the request location into state.
pub fn base_registry() -> ReducerRegistry {
    let mut registry = ReducerRegistry::new();
    registry.insert("routing", std::sync::Arc::new(RoutingReducer));
    registry
}

/// Reducer for the built-in `routing` slice.
struct RoutingReducer;

impl Reducer for RoutingReducer {
    fn initial(&self) -> Value {
        json!({ "location": Value::Null })
    }

    fn reduce(&self, state: &Value, action: &Action) -> Value {
        if action.kind == ROUTE_CHANGED {
            action.payload.clone().unwrap_or_else(|| self.initial())
        } else {
            state.clone()
        }
    }
}
