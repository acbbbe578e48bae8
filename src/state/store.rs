//! The state container.
//!
//! # Responsibilities
//! - Hold all slice state behind one lock
//! - Apply dispatched actions through the registered reducers
//! - Hand out synchronous snapshots for guards, rendering, and hydration
//! - Accept late-bound slices without discarding existing state
//!
//! # Design Decisions
//! - Dispatch holds the lock for the full reducer pass: one transition
//!   completes before the next is applied, so concurrent loaders cannot
//!   corrupt the state structure
//! - Read-modify-write races between loaders that derive values from
//!   stale snapshots remain possible at the application level; that is
//!   the documented model, not a bug here

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::state::action::Action;
use crate::state::registry::{Reducer, ReducerRegistry};
use crate::state::StateSnapshot;

struct Inner {
    state: BTreeMap<String, Value>,
    registry: ReducerRegistry,
}

/// Container for application state, mutated only via [`Store::dispatch`].
pub struct Store {
    inner: Mutex<Inner>,
}

impl Store {
    /// Build a fresh container.
    ///
    /// Every registered slice starts at its preloaded value when one is
    /// supplied, otherwise at the reducer's declared default. Preloaded
    /// slices without a reducer are kept as-is so hydration round-trips.
    pub fn new(registry: ReducerRegistry, preloaded: Option<StateSnapshot>) -> Self {
        let mut state = preloaded.unwrap_or_default();
        for (name, reducer) in registry.iter() {
            state
                .entry(name.clone())
                .or_insert_with(|| reducer.initial());
        }
        Self {
            inner: Mutex::new(Inner { state, registry }),
        }
    }

    /// Apply an action through every registered reducer.
    pub fn dispatch(&self, action: Action) {
        let mut inner = self.inner.lock().expect("state lock poisoned");
        let Inner { state, registry } = &mut *inner;
        for (name, reducer) in registry.iter() {
            let current = state
                .get(name)
                .cloned()
                .unwrap_or_else(|| reducer.initial());
            let next = reducer.reduce(&current, &action);
            state.insert(name.clone(), next);
        }
    }

    /// Synchronous copy of all slice state.
    pub fn snapshot(&self) -> StateSnapshot {
        self.inner.lock().expect("state lock poisoned").state.clone()
    }

    /// Copy of a single slice, if present.
    pub fn slice(&self, name: &str) -> Option<Value> {
        self.inner
            .lock()
            .expect("state lock poisoned")
            .state
            .get(name)
            .cloned()
    }

    /// Register a reducer for `slice` and rebuild the combined transition
    /// set.
    ///
    /// State for a slice not previously present is initialized to the
    /// reducer's default; state for an already-present slice is preserved
    /// verbatim. A duplicate name silently replaces the prior reducer
    /// (last registration wins).
    pub fn inject(&self, slice: impl Into<String>, reducer: Arc<dyn Reducer>) {
        let slice = slice.into();
        let mut inner = self.inner.lock().expect("state lock poisoned");
        if !inner.state.contains_key(&slice) {
            inner.state.insert(slice.clone(), reducer.initial());
        }
        inner.registry.insert(slice, reducer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::registry::FnReducer;
    use serde_json::json;

    fn counter_reducer() -> Arc<dyn Reducer> {
        Arc::new(FnReducer::new(json!(0), |state, action| {
            if action.kind == "counter/increment" {
                json!(state.as_i64().unwrap_or(0) + 1)
            } else {
                state.clone()
            }
        }))
    }

    #[test]
    fn dispatch_applies_registered_reducers() {
        let registry = ReducerRegistry::new().with_slice("counter", counter_reducer());
        let store = Store::new(registry, None);

        store.dispatch(Action::new("counter/increment"));
        store.dispatch(Action::new("counter/increment"));

        assert_eq!(store.slice("counter"), Some(json!(2)));
    }

    #[test]
    fn preloaded_state_wins_over_initial() {
        let registry = ReducerRegistry::new().with_slice("counter", counter_reducer());
        let mut preloaded = StateSnapshot::new();
        preloaded.insert("counter".to_string(), json!(40));

        let store = Store::new(registry, Some(preloaded));
        store.dispatch(Action::new("counter/increment"));

        assert_eq!(store.slice("counter"), Some(json!(41)));
    }

    #[test]
    fn inject_initializes_new_slice_to_default() {
        let store = Store::new(ReducerRegistry::new(), None);
        store.inject("counter", counter_reducer());

        assert_eq!(store.slice("counter"), Some(json!(0)));
        store.dispatch(Action::new("counter/increment"));
        assert_eq!(store.slice("counter"), Some(json!(1)));
    }

    #[test]
    fn inject_preserves_existing_slice_state() {
        let registry = ReducerRegistry::new().with_slice("counter", counter_reducer());
        let store = Store::new(registry, None);
        store.dispatch(Action::new("counter/increment"));

        // Replace the reducer: decrement instead of increment.
        store.inject(
            "counter",
            Arc::new(FnReducer::new(json!(99), |state, action| {
                if action.kind == "counter/increment" {
                    json!(state.as_i64().unwrap_or(0) - 1)
                } else {
                    state.clone()
                }
            })),
        );

        // Existing state preserved, not reset to the new default.
        assert_eq!(store.slice("counter"), Some(json!(1)));

        // The replacement reducer now handles dispatches.
        store.dispatch(Action::new("counter/increment"));
        assert_eq!(store.slice("counter"), Some(json!(0)));
    }

    #[test]
    fn inject_twice_second_reducer_wins_and_other_slices_unchanged() {
        let registry = ReducerRegistry::new().with_slice("counter", counter_reducer());
        let store = Store::new(registry, None);
        store.dispatch(Action::new("counter/increment"));
        let counter_before = store.slice("counter");

        store.inject(
            "tag",
            Arc::new(FnReducer::new(json!("a"), |s, _| s.clone())),
        );
        store.inject(
            "tag",
            Arc::new(FnReducer::new(json!("b"), |_, action| {
                if action.kind == "tag/set" {
                    json!("second")
                } else {
                    json!("second-default")
                }
            })),
        );

        store.dispatch(Action::new("tag/set"));
        assert_eq!(store.slice("tag"), Some(json!("second")));
        assert_eq!(store.slice("counter"), counter_before);
    }
}
