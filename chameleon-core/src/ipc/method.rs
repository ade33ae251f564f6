//! Request and response types crossing the platform channel.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{BridgeError, Result};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A named request from the frontend. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arguments: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    /// Builder-style helper used by hosts and tests.
    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Typed lookup of an optional argument.
    ///
    /// An absent key and an explicit `null` both yield `Ok(None)`.
    ///
    /// # Errors
    /// `BridgeError::InvalidArgument` if the value does not decode as `T`.
    pub fn argument<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.arguments.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => serde_json::from_value(raw.clone())
                .map(Some)
                .map_err(|e| BridgeError::invalid_argument(key, format!("has wrong type: {e}"))),
        }
    }

    /// Typed lookup of a required argument.
    ///
    /// # Errors
    /// `BridgeError::InvalidArgument` naming `key` when it is missing, `null`,
    /// or of the wrong type.
    pub fn required<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.argument(key)?
            .ok_or_else(|| BridgeError::missing_argument(key))
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Fixed error codes reported to the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArgument,
    ConnectionFailed,
    DisconnectionFailed,
    CommandFailed,
    PortEnumerationFailed,
    AutoDetectFailed,
    StatusFailed,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::ConnectionFailed => "CONNECTION_FAILED",
            Self::DisconnectionFailed => "DISCONNECTION_FAILED",
            Self::CommandFailed => "COMMAND_FAILED",
            Self::PortEnumerationFailed => "PORT_ENUMERATION_FAILED",
            Self::AutoDetectFailed => "AUTO_DETECT_FAILED",
            Self::StatusFailed => "STATUS_FAILED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error half of a [`MethodResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Outcome of exactly one [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResponse {
    /// Handler completed; `result` has the method's declared payload type.
    Success { result: Value },
    /// Handler failed at its boundary.
    Error(MethodError),
    /// The method name is not recognised.
    NotImplemented,
}

impl MethodResponse {
    pub fn success(result: impl Into<Value>) -> Self {
        Self::Success {
            result: result.into(),
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error(MethodError {
            code,
            message: message.into(),
            details: None,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Success payload, if any.
    pub fn result(&self) -> Option<&Value> {
        match self {
            Self::Success { result } => Some(result),
            _ => None,
        }
    }

    /// Error code, if this is an error response.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Error(err) => Some(err.code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_arguments_decode_as_empty_map() {
        let call: MethodCall =
            serde_json::from_value(json!({ "method": "disconnect", "arguments": null }))
                .expect("deserialize call with null arguments");
        assert!(call.arguments.is_empty());

        let call: MethodCall = serde_json::from_value(json!({ "method": "disconnect" }))
            .expect("deserialize call without arguments");
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn explicit_null_argument_is_absent() {
        let call = MethodCall::new("connect").with_argument("port", Value::Null);
        let port: Option<String> = call.argument("port").expect("null is not an error");
        assert!(port.is_none());
    }

    #[test]
    fn required_argument_error_names_the_field() {
        let call = MethodCall::new("sendCommand");
        let err = call.required::<String>("command").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument { .. }));
        assert_eq!(err.to_string(), "command cannot be null");
    }

    #[test]
    fn wrong_argument_type_is_invalid_argument() {
        let call = MethodCall::new("connect").with_argument("baudRate", "fast");
        let err = call.argument::<u32>("baudRate").unwrap_err();
        match err {
            BridgeError::InvalidArgument { field, .. } => assert_eq!(field, "baudRate"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_codes_serialize_screaming_snake_case() {
        for code in [
            ErrorCode::InvalidArgument,
            ErrorCode::ConnectionFailed,
            ErrorCode::DisconnectionFailed,
            ErrorCode::CommandFailed,
            ErrorCode::PortEnumerationFailed,
            ErrorCode::AutoDetectFailed,
            ErrorCode::StatusFailed,
        ] {
            let json = serde_json::to_value(code).expect("serialize code");
            assert_eq!(json, code.as_str());
        }
    }

    #[test]
    fn responses_are_tagged_by_status() {
        let ok = serde_json::to_value(MethodResponse::success(true)).expect("serialize");
        assert_eq!(ok, json!({ "status": "success", "result": true }));

        let err = serde_json::to_value(MethodResponse::error(
            ErrorCode::CommandFailed,
            "device error: unplugged",
        ))
        .expect("serialize");
        assert_eq!(
            err,
            json!({
                "status": "error",
                "code": "COMMAND_FAILED",
                "message": "device error: unplugged"
            })
        );

        let missing = serde_json::to_value(MethodResponse::NotImplemented).expect("serialize");
        assert_eq!(missing, json!({ "status": "notImplemented" }));
    }
}
