// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gen3 RPC notifications of the Shelly 1 Mini.
//!
//! Gen2+ devices publish JSON-RPC notifications on `<device>/events/rpc`:
//!
//! ```json
//! {
//!   "src": "shelly1minig3-543204547d88",
//!   "dst": "shelly1minig3-543204547d88/events",
//!   "method": "NotifyStatus",
//!   "params": {"ts": 1700000000.12, "switch:0": {"id": 0, "output": true}}
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ParseError;
use crate::state::{ValueKind, ValueUpdate};
use crate::topic::{ParsedTopic, TopicForm};
use crate::types::ShellyDeviceType;

use super::MessageProcessor;

/// Notification method carrying component status changes.
const NOTIFY_STATUS: &str = "NotifyStatus";

/// Property key of the single switch.
const SWITCH_KEY: &str = "0";

#[derive(Debug, Deserialize)]
struct RpcNotification {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct NotifyStatusParams {
    #[serde(default)]
    ts: Option<f64>,
    #[serde(rename = "switch:0", default)]
    switch: Option<SwitchStatus>,
}

#[derive(Debug, Deserialize)]
struct SwitchStatus {
    #[serde(default)]
    output: Option<bool>,
}

/// Decodes `NotifyStatus` notifications of `switch:0`.
///
/// The update carries the device's own timestamp (`params.ts`, fractional
/// Unix seconds) rounded to the millisecond. Notifications without a switch
/// output, and all other methods, are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcProcessor;

impl MessageProcessor for RpcProcessor {
    fn name(&self) -> &'static str {
        "rpc"
    }

    fn supported_device_types(&self) -> &'static [ShellyDeviceType] {
        &[ShellyDeviceType::Shelly1MiniGen3]
    }

    fn process_message(
        &self,
        topic: &ParsedTopic,
        payload: &str,
    ) -> Result<Vec<ValueUpdate>, ParseError> {
        if *topic.form() != TopicForm::Rpc {
            return Ok(Vec::new());
        }

        let notification: RpcNotification = serde_json::from_str(payload)?;
        if notification.method.as_deref() != Some(NOTIFY_STATUS) {
            return Ok(Vec::new());
        }
        let Some(params) = notification.params else {
            return Ok(Vec::new());
        };
        let params: NotifyStatusParams = serde_json::from_value(params)?;
        let Some(is_on) = params.switch.and_then(|switch| switch.output) else {
            return Ok(Vec::new());
        };

        let ts = params
            .ts
            .ok_or_else(|| ParseError::MissingField("params.ts".to_string()))?;
        let timestamp = timestamp_from_seconds(ts)?;

        Ok(vec![ValueUpdate::at(
            topic.device_id().property(SWITCH_KEY),
            ValueKind::RelayState,
            is_on,
            timestamp,
            "Relay",
        )])
    }
}

/// Converts fractional Unix seconds to a UTC timestamp, rounding to the
/// nearest millisecond.
fn timestamp_from_seconds(seconds: f64) -> Result<DateTime<Utc>, ParseError> {
    let millis = (seconds * 1000.0).round();
    // Beyond ±2^53 ms the conversion is lossy and far outside chrono's range
    if !millis.is_finite() || millis.abs() > 9_007_199_254_740_992.0 {
        return Err(ParseError::invalid_value(
            "params.ts",
            format!("timestamp out of range: {seconds}"),
        ));
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = millis as i64;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        ParseError::invalid_value("params.ts", format!("timestamp out of range: {seconds}"))
    })
}
