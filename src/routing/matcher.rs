//! Route resolution logic.
//!
//! # Responsibilities
//! - Split the request path into segments
//! - Walk the route tree, matching patterns and capturing `:param` values
//! - Produce the ordered matched chain (outermost→innermost)
//!
//! # Design Decisions
//! - A pattern may span several segments (`"users/:id"`)
//! - An empty pattern consumes nothing: it is a layout wrapper, or an
//!   index route when the path is exhausted
//! - Redirect routes only fire on an exact (fully consumed) match
//! - Backtracking builds fresh chains per branch instead of mutating
//!   shared accumulators

use crate::routing::route::{MatchOutcome, MatchedRoute, Route, RouteMatch, RouteParams};

/// Immutable compiled route set.
pub struct Router {
    routes: Vec<Route>,
}

enum Descent {
    Matched(Vec<MatchedRoute>, RouteParams),
    Redirect(String),
    Miss,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Resolve a request path against the tree.
    pub fn resolve(&self, path: &str) -> MatchOutcome {
        let segments: Vec<&str> = path
            .split('?')
            .next()
            .unwrap_or("")
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match descend(&self.routes, &segments) {
            Descent::Matched(routes, params) => MatchOutcome::Matched(RouteMatch { routes, params }),
            Descent::Redirect(to) => MatchOutcome::Redirect(to),
            Descent::Miss => MatchOutcome::NoMatch,
        }
    }
}

fn descend(routes: &[Route], segments: &[&str]) -> Descent {
    for route in routes {
        let Some((consumed, captured)) = match_pattern(&route.pattern, segments) else {
            continue;
        };
        let rest = &segments[consumed..];

        if rest.is_empty() {
            if let Some(to) = &route.redirect {
                return Descent::Redirect(to.clone());
            }
            let mut chain = vec![MatchedRoute::from(route)];
            if let Some(index) = route
                .children
                .iter()
                .find(|c| c.pattern.is_empty() && c.redirect.is_none())
            {
                chain.push(MatchedRoute::from(index));
            }
            return Descent::Matched(chain, captured);
        }

        if route.redirect.is_none() && !route.children.is_empty() {
            match descend(&route.children, rest) {
                Descent::Matched(inner_chain, inner_params) => {
                    let mut chain = vec![MatchedRoute::from(route)];
                    chain.extend(inner_chain);
                    // Innermost captures win on a name clash.
                    let mut params = captured;
                    params.extend(inner_params);
                    return Descent::Matched(chain, params);
                }
                Descent::Redirect(to) => return Descent::Redirect(to),
                Descent::Miss => continue,
            }
        }
    }
    Descent::Miss
}

/// Match a pattern against the head of the remaining segments.
///
/// Returns the number of segments consumed plus any captured parameters,
/// or `None` when the pattern does not fit.
fn match_pattern(pattern: &str, segments: &[&str]) -> Option<(usize, RouteParams)> {
    if pattern.is_empty() {
        return Some((0, RouteParams::new()));
    }

    let pattern_segments: Vec<&str> = pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    if pattern_segments.len() > segments.len() {
        return None;
    }

    let mut params = RouteParams::new();
    for (pat, seg) in pattern_segments.iter().zip(segments) {
        if let Some(name) = pat.strip_prefix(':') {
            params.insert(name.to_string(), (*seg).to_string());
        } else if pat != seg {
            return None;
        }
    }
    Some((pattern_segments.len(), params))
}
