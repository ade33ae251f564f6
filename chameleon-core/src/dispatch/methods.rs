//! Recognised method names and their fixed failure codes.

use crate::ipc::method::ErrorCode;

/// Every method the dispatcher handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Initialize,
    Connect,
    Disconnect,
    SendCommand,
    GetAvailablePorts,
    AutoDetectDevice,
    GetDeviceStatus,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Initialize,
        Method::Connect,
        Method::Disconnect,
        Method::SendCommand,
        Method::GetAvailablePorts,
        Method::AutoDetectDevice,
        Method::GetDeviceStatus,
    ];

    /// Parses a method name. Matching is exact (method names are case-sensitive).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    /// Canonical wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::SendCommand => "sendCommand",
            Self::GetAvailablePorts => "getAvailablePorts",
            Self::AutoDetectDevice => "autoDetectDevice",
            Self::GetDeviceStatus => "getDeviceStatus",
        }
    }

    /// Code reported when this method's handler fails for a reason other
    /// than a bad argument. `initialize` never reports an error.
    pub fn failure_code(self) -> Option<ErrorCode> {
        match self {
            Self::Initialize => None,
            Self::Connect => Some(ErrorCode::ConnectionFailed),
            Self::Disconnect => Some(ErrorCode::DisconnectionFailed),
            Self::SendCommand => Some(ErrorCode::CommandFailed),
            Self::GetAvailablePorts => Some(ErrorCode::PortEnumerationFailed),
            Self::AutoDetectDevice => Some(ErrorCode::AutoDetectFailed),
            Self::GetDeviceStatus => Some(ErrorCode::StatusFailed),
        }
    }
}
