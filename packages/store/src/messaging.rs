//! Typed cross-document messages for the embedded visualizers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message posted to an embedded visualizer window once it has loaded.
/// Delivery is fire-and-forget; there is no acknowledgment protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViewerMessage {
    /// Hand the visualizer its previously saved state.
    #[serde(rename = "LOAD_STATE")]
    LoadState { state: Value },
}

impl ViewerMessage {
    /// The JSON wire form understood by the embedded documents.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wire_format() {
        let message = ViewerMessage::LoadState {
            state: json!({ "zoom": 2 }),
        };
        let wire: Value = serde_json::from_str(&message.to_json()).unwrap();
        assert_eq!(wire["type"], "LOAD_STATE");
        assert_eq!(wire["state"]["zoom"], 2);
    }
}
