//! Coordinator semantics: fan-out/fan-in timing, failure ordering, guard
//! snapshots. Runs under virtual time so the timing assertions are exact.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use isoserve::api::ApiClient;
use isoserve::config::UpstreamConfig;
use isoserve::loader::{load_route_data, LoadError, LoadPolicy, LoaderContext, LoaderFuture};
use isoserve::render::{RenderContext, View};
use isoserve::routing::{MatchedRoute, RouteMatch, RouteParams};
use isoserve::state::{Action, FnReducer, Reducer, ReducerRegistry, Store};

struct NullView;

impl View for NullView {
    fn render(&self, _ctx: &RenderContext<'_>) -> String {
        String::new()
    }
}

/// Reducer keeping the last `<slice>/loaded` payload.
fn payload_reducer(slice: &'static str) -> Arc<dyn Reducer> {
    Arc::new(FnReducer::new(Value::Null, move |state, action| {
        if action.kind == format!("{slice}/loaded") {
            action.payload.clone().unwrap_or(Value::Null)
        } else {
            state.clone()
        }
    }))
}

fn store_with(slices: &[&'static str]) -> Arc<Store> {
    let mut registry = ReducerRegistry::new();
    for slice in slices {
        registry.insert(*slice, payload_reducer(slice));
    }
    Arc::new(Store::new(registry, None))
}

fn ctx(store: &Arc<Store>) -> LoaderContext {
    LoaderContext::new(
        store.clone(),
        RouteParams::new(),
        Arc::new(ApiClient::new(&UpstreamConfig::default()).unwrap()),
    )
}

fn matched(routes: Vec<(&str, Option<LoadPolicy>)>) -> RouteMatch {
    RouteMatch {
        routes: routes
            .into_iter()
            .map(|(name, policy)| MatchedRoute {
                name: name.to_string(),
                title: None,
                view: Arc::new(NullView),
                policy,
            })
            .collect(),
        params: RouteParams::new(),
    }
}

/// Loader that sleeps, bumps a counter, then succeeds.
fn sleeping_loader(
    delay: Duration,
    counter: Arc<AtomicU32>,
) -> impl Fn(LoaderContext) -> LoaderFuture + Send + Sync + 'static {
    move |_ctx| {
        let counter = counter.clone();
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }) as LoaderFuture
    }
}

#[tokio::test(start_paused = true)]
async fn zero_loaders_resolve_immediately_without_dispatch() {
    let store = store_with(&["a"]);
    let before = store.snapshot();

    let m = matched(vec![("plain", None), ("also-plain", None)]);
    let started = tokio::time::Instant::now();
    load_route_data(&m, &ctx(&store)).await.unwrap();

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(store.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn eager_loaders_run_concurrently_not_sequentially() {
    let store = store_with(&[]);
    let counter = Arc::new(AtomicU32::new(0));

    let m = matched(vec![
        (
            "a",
            Some(LoadPolicy::eager(sleeping_loader(
                Duration::from_millis(50),
                counter.clone(),
            ))),
        ),
        (
            "b",
            Some(LoadPolicy::eager(sleeping_loader(
                Duration::from_millis(50),
                counter.clone(),
            ))),
        ),
        (
            "c",
            Some(LoadPolicy::eager(sleeping_loader(
                Duration::from_millis(30),
                counter.clone(),
            ))),
        ),
    ]);

    let started = tokio::time::Instant::now();
    load_route_data(&m, &ctx(&store)).await.unwrap();

    // max(T), not sum(T): the join finishes with the slowest loader.
    assert_eq!(started.elapsed(), Duration::from_millis(50));
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn first_settled_failure_wins_and_stragglers_settle_detached() {
    let store = store_with(&[]);
    let straggler = Arc::new(AtomicU32::new(0));

    let slow = sleeping_loader(Duration::from_millis(500), straggler.clone());
    let m = matched(vec![
        (
            "failing",
            Some(LoadPolicy::eager(|_ctx| {
                Box::pin(async {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Err("boom".into())
                }) as LoaderFuture
            })),
        ),
        ("slow", Some(LoadPolicy::eager(slow))),
    ]);

    let started = tokio::time::Instant::now();
    let error = load_route_data(&m, &ctx(&store)).await.unwrap_err();

    // The join rejects at the first failure, without waiting for the
    // 500ms sibling.
    assert_eq!(started.elapsed(), Duration::from_millis(10));
    match &error {
        LoadError::Loader { route, reason } => {
            assert_eq!(route, "failing");
            assert!(reason.contains("boom"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(straggler.load(Ordering::SeqCst), 0);

    // The straggler keeps running detached and settles on its own.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(straggler.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn deferred_rejection_never_rejects_readiness() {
    let store = store_with(&["widgets"]);

    let m = matched(vec![(
        "widgets",
        Some(LoadPolicy::deferred(|_ctx| {
            Box::pin(async { Err("timeout".into()) }) as LoaderFuture
        })),
    )]);

    load_route_data(&m, &ctx(&store)).await.unwrap();

    // The slice keeps its default.
    assert_eq!(store.slice("widgets"), Some(Value::Null));
}

#[tokio::test(start_paused = true)]
async fn deferred_completion_backfills_state_after_the_render_decision() {
    let store = store_with(&["widgets"]);

    let m = matched(vec![(
        "widgets",
        Some(LoadPolicy::deferred(|ctx: LoaderContext| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                ctx.store
                    .dispatch(Action::with_payload("widgets/loaded", json!([1, 2])));
                Ok(())
            }) as LoaderFuture
        })),
    )]);

    let started = tokio::time::Instant::now();
    load_route_data(&m, &ctx(&store)).await.unwrap();
    assert_eq!(started.elapsed(), Duration::ZERO, "deferred never blocks the join");
    assert_eq!(store.slice("widgets"), Some(Value::Null));

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(store.slice("widgets"), Some(json!([1, 2])));
}

#[tokio::test(start_paused = true)]
async fn guard_decides_against_the_starting_snapshot() {
    let store = store_with(&["shared"]);
    let invocations = Arc::new(AtomicU32::new(0));

    // Both loaders target the same slice behind the same "not yet
    // populated" guard. Guards are evaluated against the snapshot taken
    // before anything starts, so both run; last write wins at the
    // reducer level.
    let guarded = |invocations: Arc<AtomicU32>, value: i64| {
        LoadPolicy::eager(move |ctx: LoaderContext| {
            let invocations = invocations.clone();
            Box::pin(async move {
                invocations.fetch_add(1, Ordering::SeqCst);
                ctx.store
                    .dispatch(Action::with_payload("shared/loaded", json!(value)));
                Ok(())
            }) as LoaderFuture
        })
        .with_guard(|snapshot| snapshot.get("shared") == Some(&Value::Null))
    };

    let m = matched(vec![
        ("first", Some(guarded(invocations.clone(), 1))),
        ("second", Some(guarded(invocations.clone(), 2))),
    ]);

    load_route_data(&m, &ctx(&store)).await.unwrap();
    assert_eq!(invocations.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn populated_slice_suppresses_the_loader() {
    let store = store_with(&["shared"]);
    store.dispatch(Action::with_payload("shared/loaded", json!("present")));
    let invocations = Arc::new(AtomicU32::new(0));

    let m = matched(vec![(
        "guarded",
        Some(
            LoadPolicy::eager(sleeping_loader(Duration::ZERO, invocations.clone()))
                .with_guard(|snapshot| snapshot.get("shared") == Some(&Value::Null)),
        ),
    )]);

    load_route_data(&m, &ctx(&store)).await.unwrap();
    assert_eq!(invocations.load(Ordering::SeqCst), 0, "guard declined; loader never invoked");
}

#[tokio::test(start_paused = true)]
async fn profile_scenario_resolves_with_loaded_name() {
    let store = store_with(&["profile"]);

    let m = matched(vec![
        ("home", None),
        (
            "profile",
            Some(LoadPolicy::eager(|ctx: LoaderContext| {
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    ctx.store
                        .dispatch(Action::with_payload("profile/loaded", json!({ "name": "Ann" })));
                    Ok(())
                }) as LoaderFuture
            })),
        ),
    ]);

    let started = tokio::time::Instant::now();
    load_route_data(&m, &ctx(&store)).await.unwrap();

    assert_eq!(started.elapsed(), Duration::from_millis(50));
    assert_eq!(store.snapshot()["profile"]["name"], "Ann");
}
