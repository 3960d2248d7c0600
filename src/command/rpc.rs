// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gen2+ JSON-RPC requests.

use serde::Serialize;
use uuid::Uuid;

/// A JSON-RPC request for Gen2+ devices.
///
/// The device publishes its reply on `<src>`, which is the request topic
/// followed by `/response`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    /// Request id, unique per request.
    pub id: Uuid,
    /// Topic the response is published on.
    pub src: String,
    /// RPC method, e.g. `Switch.Set`.
    pub method: String,
    /// Method parameters.
    pub params: serde_json::Value,
}

impl RpcRequest {
    /// Creates a request with a fresh id.
    #[must_use]
    pub fn new(topic: &str, method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            src: format!("{topic}/response"),
            method: method.into(),
            params,
        }
    }

    /// Creates a `Switch.Set` request for switch `id`.
    #[must_use]
    pub fn switch_set(topic: &str, id: u8, on: bool) -> Self {
        Self::new(topic, "Switch.Set", serde_json::json!({ "id": id, "on": on }))
    }

    /// Serializes the request.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_set_request() {
        let request = RpcRequest::switch_set("shellies/shelly1minig3-X/rpc", 0, true);
        assert_eq!(request.method, "Switch.Set");
        assert_eq!(request.src, "shellies/shelly1minig3-X/rpc/response");

        let body: serde_json::Value = serde_json::from_str(&request.to_json()).unwrap();
        assert_eq!(body["id"], request.id.to_string());
        assert_eq!(body["params"], serde_json::json!({ "id": 0, "on": true }));
    }

    #[test]
    fn ids_are_unique() {
        let first = RpcRequest::switch_set("t", 0, true);
        let second = RpcRequest::switch_set("t", 0, true);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn wire_format() {
        let request = RpcRequest::switch_set("t", 0, false);
        let body: serde_json::Value = serde_json::from_str(&request.to_json()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "id": request.id.to_string(),
                "src": "t/response",
                "method": "Switch.Set",
                "params": { "id": 0, "on": false },
            })
        );
    }
}
