//! Request-scoped context handed to each loader invocation.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::routing::RouteParams;
use crate::state::Store;

/// Everything a loader may touch: the per-request store (dispatch +
/// snapshot), the parameters matched for this request, and the
/// request-scoped upstream client.
#[derive(Clone)]
pub struct LoaderContext {
    pub store: Arc<Store>,
    pub params: RouteParams,
    pub client: Arc<ApiClient>,
}

impl LoaderContext {
    pub fn new(store: Arc<Store>, params: RouteParams, client: Arc<ApiClient>) -> Self {
        Self { store, params, client }
    }
}
