//! Rendering subsystem.
//!
//! # Data Flow
//! ```text
//! RouteMatch + final state snapshot
//!     → render_routes (nested views, innermost-out)
//!     → Document (head from site metadata, mount point, hydration state)
//!     → markup string for the response body
//! ```
//!
//! # Design Decisions
//! - Views are synchronous and side-effect-free: all data is already in
//!   the snapshot by the time rendering starts
//! - The snapshot is serialized into `window.__data` so a client can
//!   hydrate without refetching
//! - The degraded shell is the same document with an empty mount point;
//!   the client re-runs the loaders after mount

use serde_json::Value;

use crate::config::SiteConfig;
use crate::routing::{RouteMatch, RouteParams};
use crate::state::StateSnapshot;

/// Context handed to a view while rendering one matched segment.
pub struct RenderContext<'a> {
    /// Final state snapshot for this request.
    pub state: &'a StateSnapshot,

    /// Parameters matched for this request.
    pub params: &'a RouteParams,

    /// Markup of the nested child route; empty at the innermost segment.
    pub children: String,
}

/// An opaque rendering capability for one segment of the route tree.
pub trait View: Send + Sync {
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

/// Render the matched chain, innermost-out: each view receives its
/// child's markup through the context.
pub fn render_routes(matched: &RouteMatch, state: &StateSnapshot) -> String {
    matched.routes.iter().rev().fold(String::new(), |children, route| {
        route.view.render(&RenderContext {
            state,
            params: &matched.params,
            children,
        })
    })
}

/// The HTML document shell.
pub struct Document {
    site: SiteConfig,
}

impl Document {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    /// Produce the full page.
    ///
    /// `markup` is the rendered route chain, or `None` for the bare shell
    /// (SSR disabled or degraded error path). `title` comes from the
    /// innermost matched route and goes through the title template.
    pub fn render(&self, title: Option<&str>, markup: Option<&str>, state: &StateSnapshot) -> String {
        let title = match title {
            Some(t) => self.site.title_template.replacen("%s", t, 1),
            None => self.site.title.clone(),
        };

        let mut head = String::new();
        head.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
        head.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_html(&self.site.description)
        ));
        for tag in &self.site.meta {
            head.push_str(&format!(
                "<meta name=\"{}\" content=\"{}\">\n",
                escape_html(&tag.name),
                escape_html(&tag.content)
            ));
        }

        format!(
            "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n{head}</head>\n<body>\n<div id=\"root\">{body}</div>\n<script>window.__data={data};</script>\n<script src=\"{bundle}\"></script>\n</body>\n</html>\n",
            head = head,
            body = markup.unwrap_or(""),
            data = serialize_state(state),
            bundle = escape_html(&self.site.bundle),
        )
    }
}

/// Serialize the snapshot for embedding in an inline script tag.
///
/// `<` is escaped so state containing `</script>` cannot break out of
/// the tag.
fn serialize_state(state: &StateSnapshot) -> String {
    serde_json::to_string(&Value::Object(
        state.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
    ))
    .unwrap_or_else(|_| "{}".to_string())
    .replace('<', "\\u003c")
}

/// Minimal HTML escaping for text interpolated into markup.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot_with(slice: &str, value: Value) -> StateSnapshot {
        let mut snapshot = StateSnapshot::new();
        snapshot.insert(slice.to_string(), value);
        snapshot
    }

    #[test]
    fn document_contains_title_and_state() {
        let document = Document::new(SiteConfig::default());
        let page = document.render(None, Some("<p>hi</p>"), &snapshot_with("a", json!(1)));

        assert!(page.starts_with("<!doctype html>"));
        assert!(page.contains("<title>isoserve</title>"));
        assert!(page.contains("<div id=\"root\"><p>hi</p></div>"));
        assert!(page.contains("window.__data={\"a\":1};"));
    }

    #[test]
    fn route_title_goes_through_template() {
        let document = Document::new(SiteConfig::default());
        let page = document.render(Some("About"), None, &StateSnapshot::new());
        assert!(page.contains("<title>isoserve: About</title>"));
    }

    #[test]
    fn state_cannot_escape_the_script_tag() {
        let document = Document::new(SiteConfig::default());
        let page = document.render(
            None,
            None,
            &snapshot_with("x", json!("</script><script>alert(1)</script>")),
        );
        assert!(!page.contains("</script><script>alert(1)"));
    }

    #[test]
    fn shell_has_empty_mount_point() {
        let document = Document::new(SiteConfig::default());
        let page = document.render(None, None, &StateSnapshot::new());
        assert!(page.contains("<div id=\"root\"></div>"));
    }
}
