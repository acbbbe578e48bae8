//! Route descriptors and match results.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::loader::LoadPolicy;
use crate::render::View;

/// Parameters captured from `:name` pattern segments.
pub type RouteParams = BTreeMap<String, String>;

/// One node of the route tree.
///
/// The loading policy is an explicit data field on the descriptor, not a
/// decoration of the view: the view stays an opaque rendering capability.
#[derive(Clone)]
pub struct Route {
    /// Identifier used in logs and failure reports.
    pub name: String,

    /// Pattern relative to the parent: `""` (index/layout), `"about"`,
    /// `"users/:id"`.
    pub pattern: String,

    /// Optional page title, fed through the site title template.
    pub title: Option<String>,

    /// Rendering capability for this segment.
    pub view: Arc<dyn View>,

    /// Data-loading policy (loader + guard + deferred flag).
    pub policy: Option<LoadPolicy>,

    /// When set, matching this route redirects instead of rendering.
    pub redirect: Option<String>,

    /// Nested child routes.
    pub children: Vec<Route>,
}

impl Route {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, view: Arc<dyn View>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            title: None,
            view,
            policy: None,
            redirect: None,
            children: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_redirect(mut self, to: impl Into<String>) -> Self {
        self.redirect = Some(to.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }
}

/// One matched segment, detached from the tree.
#[derive(Clone)]
pub struct MatchedRoute {
    pub name: String,
    pub title: Option<String>,
    pub view: Arc<dyn View>,
    pub policy: Option<LoadPolicy>,
}

impl From<&Route> for MatchedRoute {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name.clone(),
            title: route.title.clone(),
            view: route.view.clone(),
            policy: route.policy.clone(),
        }
    }
}

/// A successful resolution: matched descriptors outermost→innermost plus
/// the merged parameters (innermost wins on a name clash).
#[derive(Clone)]
pub struct RouteMatch {
    pub routes: Vec<MatchedRoute>,
    pub params: RouteParams,
}

impl RouteMatch {
    /// Innermost route title, if any matched segment declares one.
    pub fn title(&self) -> Option<&str> {
        self.routes.iter().rev().find_map(|r| r.title.as_deref())
    }
}

/// Outcome of resolving a request path against the route tree.
pub enum MatchOutcome {
    Matched(RouteMatch),
    Redirect(String),
    NoMatch,
}
