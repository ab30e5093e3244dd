//! JSON rendering.
//!
//! The state is emitted as-is, so consumers see exactly what the terminal
//! view is built from. Article fields keep the provider's names.

use crate::models::QueryState;
use tracing::error;

/// Serialize `state` as pretty-printed JSON.
pub fn render(state: &QueryState) -> String {
    match serde_json::to_string_pretty(state) {
        Ok(json) => json,
        Err(e) => {
            // Plain strings, bools and vectors of them.
            error!(error = %e, "Failed to serialize state");
            String::from("{}")
        }
    }
}
