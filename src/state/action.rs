//! State-transition requests.

use serde_json::Value;

/// A dispatched state-transition request.
///
/// `kind` selects which reducers react; `payload` carries the data they
/// fold into their slice.
#[derive(Debug, Clone)]
pub struct Action {
    pub kind: String,
    pub payload: Option<Value>,
}

impl Action {
    /// Action with no payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    /// Action carrying a JSON payload.
    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
        }
    }
}
