//! Slice reducer registry.
//!
//! # Responsibilities
//! - Map slice names to transition functions
//! - Support late-bound insertion (a new slice registered at runtime)
//! - Keep keys unique: inserting a duplicate replaces the prior reducer,
//!   never the slice state
//!
//! # Design Decisions
//! - Owned by the store instance, passed explicitly through the call
//!   chain; no global registry
//! - BTreeMap so snapshot and hydration output have a stable slice order

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::state::action::Action;

/// A pure transition function for one named slice of application state.
pub trait Reducer: Send + Sync {
    /// The slice's declared default, used when the slice first appears.
    fn initial(&self) -> Value;

    /// Fold an action into the current slice state, producing the next.
    fn reduce(&self, state: &Value, action: &Action) -> Value;
}

/// Reducer built from an initial value and a closure.
pub struct FnReducer {
    initial: Value,
    apply: Box<dyn Fn(&Value, &Action) -> Value + Send + Sync>,
}

impl FnReducer {
    pub fn new(
        initial: Value,
        apply: impl Fn(&Value, &Action) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            initial,
            apply: Box::new(apply),
        }
    }
}

impl Reducer for FnReducer {
    fn initial(&self) -> Value {
        self.initial.clone()
    }

    fn reduce(&self, state: &Value, action: &Action) -> Value {
        (self.apply)(state, action)
    }
}

/// Mapping from slice name to transition function.
#[derive(Clone, Default)]
pub struct ReducerRegistry {
    slices: BTreeMap<String, Arc<dyn Reducer>>,
}

impl ReducerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reducer under a slice name.
    ///
    /// Last registration wins: a duplicate name replaces the prior
    /// reducer and returns `true`. This is a documented overwrite, not a
    /// collision error.
    pub fn insert(&mut self, name: impl Into<String>, reducer: Arc<dyn Reducer>) -> bool {
        let name = name.into();
        let replaced = self.slices.insert(name.clone(), reducer).is_some();
        if replaced {
            tracing::debug!(slice = %name, "reducer replaced (last registration wins)");
        }
        replaced
    }

    /// Builder-style insert for constructing registries inline.
    pub fn with_slice(mut self, name: impl Into<String>, reducer: Arc<dyn Reducer>) -> Self {
        self.insert(name, reducer);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slices.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Arc<dyn Reducer>)> {
        self.slices.iter()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}
