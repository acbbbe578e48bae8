//! Starter pages.
//!
//! The kit ships with a small set of pages exercising every loading
//! policy: a plain page, an eager page with an "already loaded" guard, a
//! deferred page, a parameterized page, and a redirect.
//!
//! Each remote slice keeps the same shape:
//! `{ loaded: bool, data: ..., error: ... }`, driven by a
//! `<slice>/loaded` / `<slice>/failed` action pair.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::loader::{LoadPolicy, LoaderContext, LoaderFuture};
use crate::render::{escape_html, RenderContext, View};
use crate::routing::{Route, RouteParams};
use crate::state::{base_registry, Action, Reducer, ReducerRegistry, StateSnapshot};

/// Registry for the starter app: the built-in slices plus one remote
/// slice per loading page.
pub fn registry() -> ReducerRegistry {
    base_registry()
        .with_slice("info", Arc::new(RemoteDataReducer { slice: "info" }))
        .with_slice("profile", Arc::new(RemoteDataReducer { slice: "profile" }))
        .with_slice("widgets", Arc::new(RemoteDataReducer { slice: "widgets" }))
}

/// Route tree for the starter app.
pub fn routes() -> Vec<Route> {
    vec![Route::new("app", "", Arc::new(LayoutView)).with_children(vec![
        Route::new("home", "", Arc::new(HomeView)).with_title("Home"),
        Route::new("about", "about", Arc::new(AboutView))
            .with_title("About")
            .with_policy(
                LoadPolicy::eager(load_remote("info", |_| "/info".to_string()))
                    .with_guard(not_loaded("info")),
            ),
        Route::new("widgets", "widgets", Arc::new(WidgetsView))
            .with_title("Widgets")
            .with_policy(
                LoadPolicy::deferred(load_remote("widgets", |_| "/widgets".to_string()))
                    .with_guard(not_loaded("widgets")),
            ),
        Route::new("profile", "users/:id", Arc::new(ProfileView))
            .with_title("Profile")
            .with_policy(
                LoadPolicy::eager(load_remote("profile", |params| {
                    format!(
                        "/users/{}",
                        params.get("id").map(String::as_str).unwrap_or("unknown")
                    )
                }))
                .with_guard(not_loaded("profile")),
            ),
        Route::new("docs", "docs", Arc::new(HomeView)).with_redirect("/about"),
    ])]
}

/// Loader fetching one upstream document into a slice.
///
/// Success and failure both land in state so a hydrating client can see
/// what happened; the failure is also returned so eager policies reject
/// the readiness signal.
fn load_remote(
    slice: &'static str,
    path: fn(&RouteParams) -> String,
) -> impl Fn(LoaderContext) -> LoaderFuture + Send + Sync + 'static {
    move |ctx: LoaderContext| {
        Box::pin(async move {
            let path = path(&ctx.params);
            match ctx.client.get_json(&path).await {
                Ok(data) => {
                    ctx.store
                        .dispatch(Action::with_payload(format!("{slice}/loaded"), data));
                    Ok(())
                }
                Err(error) => {
                    ctx.store.dispatch(Action::with_payload(
                        format!("{slice}/failed"),
                        json!(error.to_string()),
                    ));
                    Err(error.into())
                }
            }
        }) as LoaderFuture
    }
}

/// Guard passing only while the slice has not been populated yet.
fn not_loaded(slice: &'static str) -> impl Fn(&StateSnapshot) -> bool + Send + Sync + 'static {
    move |snapshot| {
        !snapshot
            .get(slice)
            .and_then(|s| s.get("loaded"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Reducer for a `{ loaded, data, error }` remote slice.
struct RemoteDataReducer {
    slice: &'static str,
}

impl Reducer for RemoteDataReducer {
    fn initial(&self) -> Value {
        json!({ "loaded": false, "data": Value::Null, "error": Value::Null })
    }

    fn reduce(&self, state: &Value, action: &Action) -> Value {
        let payload = || action.payload.clone().unwrap_or(Value::Null);
        if action.kind == format!("{}/loaded", self.slice) {
            json!({ "loaded": true, "data": payload(), "error": Value::Null })
        } else if action.kind == format!("{}/failed", self.slice) {
            json!({ "loaded": false, "data": Value::Null, "error": payload() })
        } else {
            state.clone()
        }
    }
}

fn slice_data<'a>(state: &'a StateSnapshot, slice: &str) -> Option<&'a Value> {
    state.get(slice).map(|s| &s["data"]).filter(|d| !d.is_null())
}

struct LayoutView;

impl View for LayoutView {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        format!(
            "<nav><a href=\"/\">Home</a> <a href=\"/about\">About</a> \
             <a href=\"/widgets\">Widgets</a></nav>\n<main>{}</main>",
            ctx.children
        )
    }
}

struct HomeView;

impl View for HomeView {
    fn render(&self, _ctx: &RenderContext<'_>) -> String {
        "<h1>Home</h1><p>Rendered on the server, hydrated on the client.</p>".to_string()
    }
}

struct AboutView;

impl View for AboutView {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let message = slice_data(ctx.state, "info")
            .and_then(|d| d["message"].as_str())
            .unwrap_or("…");
        format!("<h1>About</h1><p>{}</p>", escape_html(message))
    }
}

struct WidgetsView;

impl View for WidgetsView {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = String::from("<h1>Widgets</h1>");
        match slice_data(ctx.state, "widgets").and_then(Value::as_array) {
            Some(widgets) => {
                out.push_str("<ul>");
                for widget in widgets {
                    let label = widget["name"].as_str().unwrap_or("widget");
                    out.push_str(&format!("<li>{}</li>", escape_html(label)));
                }
                out.push_str("</ul>");
            }
            // Deferred slice: usually still loading at render time.
            None => out.push_str("<p>Loading widgets…</p>"),
        }
        out
    }
}

struct ProfileView;

impl View for ProfileView {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let id = ctx.params.get("id").map(String::as_str).unwrap_or("?");
        let name = slice_data(ctx.state, "profile")
            .and_then(|d| d["name"].as_str())
            .unwrap_or("unknown");
        format!(
            "<h1>Profile {}</h1><p>{}</p>",
            escape_html(id),
            escape_html(name)
        )
    }
}
