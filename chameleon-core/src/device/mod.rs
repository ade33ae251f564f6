//! Device backend abstraction.
//!
//! The `DeviceBackend` trait decouples the dispatcher from any specific
//! transport (the in-process mock, a serial link, BLE, etc.).
//!
//! Every method takes `&mut self`: a backend owns exactly one transport and
//! commands on it must not interleave. All access is therefore serialised
//! through `DeviceHandle`'s `parking_lot::Mutex`.

pub mod mock;
pub mod status;

pub use mock::{MockConfig, MockDevice};
pub use status::DeviceStatus;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::Result;

/// Contract for device-control backends.
pub trait DeviceBackend: Send + 'static {
    /// Acquire host resources (adapters, managers). Called once at startup
    /// and again on every `initialize` request.
    fn initialize(&mut self) -> Result<()>;

    /// Open a connection to `port` at `baud_rate`. `port` may be `"auto"`.
    fn connect(&mut self, port: &str, baud_rate: u32) -> Result<()>;

    /// Close the current connection, if any.
    fn disconnect(&mut self) -> Result<()>;

    /// Send a textual command and return the device's reply.
    ///
    /// # Errors
    /// `BridgeError::Timeout` if no reply arrives within `timeout`.
    fn send_command(&mut self, command: &str, timeout: Duration) -> Result<String>;

    /// Enumerate candidate ports, most specific first.
    fn available_ports(&mut self) -> Result<Vec<String>>;

    /// Search for an attached device and return the port it was found on.
    fn auto_detect(&mut self) -> Result<String>;

    /// Snapshot of device state.
    fn status(&mut self) -> Result<DeviceStatus>;
}

/// Thread-safe reference-counted handle to any `DeviceBackend` implementor.
///
/// The handle is the single owner of the device connection; cloning it
/// shares that owner rather than opening a second transport.
#[derive(Clone)]
pub struct DeviceHandle(pub Arc<Mutex<dyn DeviceBackend>>);

impl DeviceHandle {
    /// Wrap any `DeviceBackend` in a `DeviceHandle`.
    pub fn new<B: DeviceBackend>(backend: B) -> Self {
        Self(Arc::new(Mutex::new(backend)))
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle").finish_non_exhaustive()
    }
}
