//! Notifications pushed from the backend to the frontend.
//!
//! ## Event names
//!
//! | Notification | Event | Payload |
//! |-------|---------|---------|
//! | `ConnectionEstablished` | `"onConnectionEstablished"` | `{port, baudRate}` |
//! | `ConnectionLost` | `"onConnectionLost"` | `null` |
//! | `DataReceived` | `"onDataReceived"` | `{data}` |
//! | `NfcTagDetected` | `"onNfcTagDetected"` | `{uid, techList}` |
//!
//! Notifications are not tied to a pending request and carry no ordering
//! guarantee relative to responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CONNECTION_ESTABLISHED: &str = "onConnectionEstablished";
pub const CONNECTION_LOST: &str = "onConnectionLost";
pub const DATA_RECEIVED: &str = "onDataReceived";
pub const NFC_TAG_DETECTED: &str = "onNfcTagDetected";

/// An unsolicited backend → frontend message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    ConnectionEstablished(ConnectionEstablishedEvent),
    ConnectionLost,
    DataReceived(DataReceivedEvent),
    NfcTagDetected(NfcTagEvent),
}

impl Notification {
    /// Event name as seen by the frontend.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ConnectionEstablished(_) => CONNECTION_ESTABLISHED,
            Self::ConnectionLost => CONNECTION_LOST,
            Self::DataReceived(_) => DATA_RECEIVED,
            Self::NfcTagDetected(_) => NFC_TAG_DETECTED,
        }
    }

    /// Event payload as a JSON value (`null` for payload-less events).
    pub fn payload(&self) -> Value {
        let encoded = match self {
            Self::ConnectionEstablished(ev) => serde_json::to_value(ev),
            Self::ConnectionLost => Ok(Value::Null),
            Self::DataReceived(ev) => serde_json::to_value(ev),
            Self::NfcTagDetected(ev) => serde_json::to_value(ev),
        };
        // Payload structs contain only strings, integers and string lists.
        encoded.unwrap_or(Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Connection events
// ---------------------------------------------------------------------------

/// Emitted after a successful `connect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEstablishedEvent {
    /// Port exactly as requested by the caller (may be `"auto"`).
    pub port: String,
    pub baud_rate: u32,
}

// ---------------------------------------------------------------------------
// Data events
// ---------------------------------------------------------------------------

/// Emitted after a successful `sendCommand` with the device's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataReceivedEvent {
    pub data: String,
}

// ---------------------------------------------------------------------------
// NFC events
// ---------------------------------------------------------------------------

/// Emitted when an NFC tag is presented to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfcTagEvent {
    /// Tag identifier as lowercase hex, no separators.
    pub uid: String,
    /// Technologies reported for the tag.
    pub tech_list: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_established_payload_uses_camel_case() {
        let note = Notification::ConnectionEstablished(ConnectionEstablishedEvent {
            port: "auto".into(),
            baud_rate: 115_200,
        });

        assert_eq!(note.event_name(), "onConnectionEstablished");
        let payload = note.payload();
        assert_eq!(payload["port"], "auto");
        assert_eq!(payload["baudRate"], 115_200);
        assert!(payload.get("baud_rate").is_none());
    }

    #[test]
    fn connection_lost_has_null_payload() {
        let note = Notification::ConnectionLost;
        assert_eq!(note.event_name(), "onConnectionLost");
        assert!(note.payload().is_null());
    }

    #[test]
    fn nfc_tag_payload_carries_tech_list() {
        let note = Notification::NfcTagDetected(NfcTagEvent {
            uid: "04a1b2".into(),
            tech_list: vec!["android.nfc.tech.NfcA".into()],
        });

        let payload = note.payload();
        assert_eq!(payload["uid"], "04a1b2");
        assert_eq!(payload["techList"][0], "android.nfc.tech.NfcA");

        let decoded: NfcTagEvent =
            serde_json::from_value(payload).expect("deserialize nfc tag event");
        assert_eq!(decoded.tech_list.len(), 1);
    }

    #[test]
    fn data_received_payload_has_single_data_field() {
        let note = Notification::DataReceived(DataReceivedEvent {
            data: "EM410x ID: 1234567890".into(),
        });
        let payload = note.payload();
        assert_eq!(payload["data"], "EM410x ID: 1234567890");
        assert_eq!(payload.as_object().map(|m| m.len()), Some(1));
    }
}
