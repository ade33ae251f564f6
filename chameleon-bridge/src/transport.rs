//! JSON-lines framing for the stdio platform channel.
//!
//! ## Frames
//!
//! | Direction | Shape |
//! |-----------|-------|
//! | in  | `{"id": 7, "method": "connect", "arguments": {"port": "auto"}}` |
//! | out | `{"id": 7, "response": {"status": "success", "result": true}}` |
//! | out | `{"event": "onConnectionEstablished", "payload": {...}}` |
//!
//! One JSON object per line in each direction. Malformed input lines
//! (including bytes that are not UTF-8) are answered with an
//! `INVALID_ARGUMENT` response whose `id` is recovered when the line is valid
//! JSON carrying a numeric `id`, and `null` otherwise.

use chameleon_core::{ErrorCode, MethodCall, MethodResponse, Notification};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A request line from the frontend.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
}

impl InboundFrame {
    pub fn into_call(self) -> (u64, MethodCall) {
        (
            self.id,
            MethodCall {
                method: self.method,
                arguments: self.arguments.unwrap_or_default(),
            },
        )
    }
}

/// A line written to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundFrame {
    Response {
        id: Option<u64>,
        response: MethodResponse,
    },
    Notification {
        event: &'static str,
        payload: Value,
    },
}

impl From<&Notification> for OutboundFrame {
    fn from(note: &Notification) -> Self {
        Self::Notification {
            event: note.event_name(),
            payload: note.payload(),
        }
    }
}

/// Parse one raw input line (trailing newline optional).
///
/// Returns `Ok(None)` for blank lines and `Err(frame)` with a ready-to-send
/// error response for malformed ones, including lines that are not UTF-8.
pub fn parse_line(line: &[u8]) -> Result<Option<(u64, MethodCall)>, OutboundFrame> {
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let raw: Value = serde_json::from_slice(line).map_err(|e| malformed(None, e))?;
    let id = raw.get("id").and_then(Value::as_u64);
    let frame: InboundFrame = serde_json::from_value(raw).map_err(|e| malformed(id, e))?;
    Ok(Some(frame.into_call()))
}

fn malformed(id: Option<u64>, err: serde_json::Error) -> OutboundFrame {
    OutboundFrame::Response {
        id,
        response: MethodResponse::error(ErrorCode::InvalidArgument, format!("malformed frame: {err}")),
    }
}

/// Encode a frame as a single line (without the trailing newline).
pub fn encode(frame: &OutboundFrame) -> serde_json::Result<String> {
    serde_json::to_string(frame)
}
