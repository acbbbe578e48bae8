//! Route data loading subsystem.
//!
//! # Data Flow
//! ```text
//! RouteMatch (ordered descriptors)
//!     → one state snapshot, taken before anything starts
//!     → policy.rs (guard evaluated against that snapshot)
//!     → partition: eager (deferred=false) vs deferred (deferred=true)
//!     → every passing loader spawned immediately (fan-out)
//!     → eager set joined, first settled failure wins (fan-in)
//!     → Ok(()) / Err(LoadError) gates rendering
//! ```
//!
//! # Design Decisions
//! - A descriptor's loader runs at most once per request
//! - Eager siblings observe no mutual ordering; the join strictly
//!   precedes the render decision
//! - On the first eager failure the join returns without waiting for
//!   stragglers; their spawned tasks settle detached and their results
//!   are discarded
//! - Deferred loaders never block or fail the render decision; their
//!   failures are logged and dropped
//! - No retries, no internal deadline, no cancellation propagation into
//!   loaders; callers wrap the join in an external timeout when they
//!   need one

pub mod context;
pub mod policy;

use std::time::Instant;

use futures_util::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;

use crate::observability::metrics;
use crate::routing::RouteMatch;

pub use context::LoaderContext;
pub use policy::{Guard, LoadPolicy, LoaderError, LoaderFn, LoaderFuture};

/// Failure of the eager loading phase.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An eager loader rejected; carries the first-settled reason.
    #[error("loader for route `{route}` failed: {reason}")]
    Loader { route: String, reason: String },

    /// An eager loader task panicked.
    #[error("loader for route `{route}` panicked")]
    Panicked { route: String },
}

/// Run every applicable loader for a matched route set and wait for the
/// eager ones.
///
/// Resolves immediately when no descriptor passes its guard. The returned
/// result is the readiness signal: `Ok` permits rendering with the loaded
/// state, `Err` carries exactly one failure reason even when several
/// eager loaders fail concurrently.
pub async fn load_route_data(matched: &RouteMatch, ctx: &LoaderContext) -> Result<(), LoadError> {
    let start = Instant::now();
    let snapshot = ctx.store.snapshot();

    let mut eager = FuturesUnordered::new();
    let mut eager_count = 0usize;
    let mut deferred_count = 0usize;

    for route in &matched.routes {
        let Some(policy) = &route.policy else { continue };

        // Guards see the snapshot from before any sibling started, never
        // state mutated mid-flight.
        if let Some(guard) = &policy.guard {
            if !guard(&snapshot) {
                tracing::debug!(route = %route.name, "guard declined load");
                continue;
            }
        }

        let future = (policy.loader)(ctx.clone());
        let name = route.name.clone();

        if policy.deferred {
            deferred_count += 1;
            tokio::spawn(async move {
                if let Err(error) = future.await {
                    tracing::warn!(route = %name, %error, "deferred loader failed; result dropped");
                }
            });
        } else {
            eager_count += 1;
            let handle = tokio::spawn(future);
            eager.push(async move { (name, handle.await) });
        }
    }

    tracing::debug!(eager = eager_count, deferred = deferred_count, "route data loading started");

    while let Some((route, joined)) = eager.next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(reason)) => {
                // Dropping the remaining join handles detaches the tasks:
                // stragglers settle on their own and their results are
                // discarded.
                metrics::record_load(eager_count, "failed", start);
                return Err(LoadError::Loader {
                    route,
                    reason: reason.to_string(),
                });
            }
            Err(join_error) => {
                tracing::error!(route = %route, %join_error, "loader task aborted");
                metrics::record_load(eager_count, "panicked", start);
                return Err(LoadError::Panicked { route });
            }
        }
    }

    metrics::record_load(eager_count, "ok", start);
    Ok(())
}
