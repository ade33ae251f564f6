//! # chameleon-core
//!
//! Platform-channel bridge between a GUI front-end and a Chameleon Ultra
//! device-control backend.
//!
//! ## Architecture
//!
//! ```text
//! GUI ──MethodCall──► Dispatcher::dispatch ──► DeviceHandle ──► DeviceBackend
//!  ▲                        │                                   (MockDevice)
//!  │◄──MethodResponse───────┤
//!  │                        ▼
//!  └──Notification── broadcast::Sender<Notification>
//! ```
//!
//! Exactly one response per call; notifications travel on a separate
//! bounded channel and are unordered relative to responses.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod device;
pub mod dispatch;
pub mod error;
pub mod ipc;
pub mod nfc;

// Convenience re-exports for downstream crates
pub use device::{DeviceBackend, DeviceHandle, DeviceStatus, MockConfig, MockDevice};
pub use dispatch::{BridgeConfig, ConnectionInfo, Dispatcher, Method};
pub use error::BridgeError;
pub use ipc::events::Notification;
pub use ipc::method::{ErrorCode, MethodCall, MethodError, MethodResponse};
pub use nfc::NfcTag;
