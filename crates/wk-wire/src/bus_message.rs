// SPDX-License-Identifier: MIT

//! Wire shapes carried over the bus [`Transport`][crate::envelope] (port or
//! channel strategy) between a renderer and the `MessageBus`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wk_core::WindowId;

/// A message exchanged between a renderer and the `MessageBus`.
///
/// Any payload that does not match one of these tags is logged and ignored
/// by the dispatcher rather than rejected — the wire is forward-tolerant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum BusMessage {
    #[serde(rename = "GET")]
    Get { key: String, #[serde(rename = "requestId")] request_id: String },

    #[serde(rename = "GET_RESPONSE")]
    GetResponse {
        #[serde(rename = "requestId")]
        request_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },

    #[serde(rename = "SET")]
    Set { key: String, value: Value },

    #[serde(rename = "DELETE")]
    Delete { key: String },

    #[serde(rename = "SUBSCRIBE")]
    Subscribe { key: String },

    #[serde(rename = "UNSUBSCRIBE")]
    Unsubscribe { key: String },

    #[serde(rename = "SET_PERMISSION")]
    SetPermission { key: String, #[serde(rename = "windowId")] window_id: WindowId, modify: bool },

    #[serde(rename = "TRANSACTION_START")]
    TransactionStart,

    #[serde(rename = "COMMIT")]
    Commit,

    #[serde(rename = "ROLLBACK")]
    Rollback,

    #[serde(rename = "SEND_TO_WINDOW")]
    SendToWindow { #[serde(rename = "windowId")] window_id: WindowId, payload: Value },

    #[serde(rename = "SEND_TO_GROUP")]
    SendToGroup { group: String, payload: Value },

    /// Server-to-client broadcast of a store mutation (`SET`/`DELETE`).
    #[serde(rename = "UPDATE")]
    Update {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        #[serde(rename = "oldValue")]
        old_value: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        #[serde(rename = "windowId")]
        window_id: Option<WindowId>,
        timestamp: i64,
    },
}

impl BusMessage {
    /// Best-effort tag name, used for logging unknown/malformed messages.
    pub fn kind(&self) -> &'static str {
        match self {
            BusMessage::Get { .. } => "GET",
            BusMessage::GetResponse { .. } => "GET_RESPONSE",
            BusMessage::Set { .. } => "SET",
            BusMessage::Delete { .. } => "DELETE",
            BusMessage::Subscribe { .. } => "SUBSCRIBE",
            BusMessage::Unsubscribe { .. } => "UNSUBSCRIBE",
            BusMessage::SetPermission { .. } => "SET_PERMISSION",
            BusMessage::TransactionStart => "TRANSACTION_START",
            BusMessage::Commit => "COMMIT",
            BusMessage::Rollback => "ROLLBACK",
            BusMessage::SendToWindow { .. } => "SEND_TO_WINDOW",
            BusMessage::SendToGroup { .. } => "SEND_TO_GROUP",
            BusMessage::Update { .. } => "UPDATE",
        }
    }
}

#[cfg(test)]
#[path = "bus_message_tests.rs"]
mod tests;
