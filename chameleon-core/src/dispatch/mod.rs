//! `Dispatcher` — maps named method calls onto the device backend.
//!
//! ## Flow
//!
//! ```text
//! MethodCall ──► Method::parse ──► handler ──► DeviceHandle (mutex)
//!                    │                 │
//!              NotImplemented     Ok / BridgeError ──► MethodResponse
//!                                      │
//!                       broadcast::Sender<Notification>
//! ```
//!
//! `dispatch()` is synchronous: it blocks the calling thread for as long as
//! the backend takes. Hosts running on an async runtime should call it from
//! `spawn_blocking`.
//!
//! Every call yields exactly one `MethodResponse`. Handler failures never
//! escape as panics or `Err`; they are converted at the handler boundary into
//! an error response carrying the method's fixed code.

pub mod methods;

use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::{
    device::DeviceHandle,
    error::{BridgeError, Result},
    ipc::{
        events::{ConnectionEstablishedEvent, DataReceivedEvent, Notification},
        method::{ErrorCode, MethodCall, MethodResponse},
    },
    nfc::NfcTag,
};

pub use methods::Method;

/// Notification channel capacity: events buffered for slow subscribers.
pub const NOTIFICATION_CAP: usize = 256;

/// Configuration for `Dispatcher`.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Name of the platform channel this dispatcher serves.
    /// Default: `"chameleon_ultra"`.
    pub channel_name: String,
    /// Port used by `connect` when none is given. Default: `"auto"`.
    pub default_port: String,
    /// Baud rate used by `connect` when none is given. Default: 115200.
    pub default_baud_rate: u32,
    /// Per-command timeout used by `sendCommand` when none is given.
    /// Default: 5000 ms.
    pub default_timeout_ms: u64,
    /// Capacity of the notification broadcast channel. Default: 256.
    pub notification_capacity: usize,
    /// Reject `sendCommand` / `getDeviceStatus` while no connection is open.
    /// Default: `false`.
    pub require_connection: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_name: "chameleon_ultra".into(),
            default_port: "auto".into(),
            default_baud_rate: 115_200,
            default_timeout_ms: 5_000,
            notification_capacity: NOTIFICATION_CAP,
            require_connection: false,
        }
    }
}

/// The connection the dispatcher currently believes is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub port: String,
    pub baud_rate: u32,
}

/// Request/response front of the device backend.
///
/// `Dispatcher` is `Send + Sync`. Wrap in `Arc<Dispatcher>` to share between
/// the host's request workers and its notification forwarder.
pub struct Dispatcher {
    config: BridgeConfig,
    device: DeviceHandle,
    connection: Mutex<Option<ConnectionInfo>>,
    notify_tx: broadcast::Sender<Notification>,
}

impl Dispatcher {
    /// Create a dispatcher that owns `device`. Does not initialize the
    /// backend; call `initialize()` once the host is ready.
    pub fn new(config: BridgeConfig, device: DeviceHandle) -> Self {
        let (notify_tx, _) = broadcast::channel(config.notification_capacity.max(1));
        Self {
            config,
            device,
            connection: Mutex::new(None),
            notify_tx,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Subscribe to notifications emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notify_tx.subscribe()
    }

    /// Snapshot of the tracked connection.
    pub fn connection(&self) -> Option<ConnectionInfo> {
        self.connection.lock().clone()
    }

    /// Initialize the backend. Failures are logged and reported as `false`.
    pub fn initialize(&self) -> bool {
        match self.device.0.lock().initialize() {
            Ok(()) => {
                info!(channel = %self.config.channel_name, "device backend initialized");
                true
            }
            Err(e) => {
                error!("failed to initialize device backend: {e}");
                false
            }
        }
    }

    /// Handle one method call. Always returns exactly one response.
    pub fn dispatch(&self, call: &MethodCall) -> MethodResponse {
        let Some(method) = Method::parse(&call.method) else {
            debug!(method = %call.method, "method not implemented");
            return MethodResponse::NotImplemented;
        };
        debug!(method = method.as_str(), "dispatching");

        match self.handle(method, call) {
            Ok(result) => MethodResponse::Success { result },
            Err(err) => {
                let code = match (&err, method.failure_code()) {
                    (BridgeError::InvalidArgument { .. }, _) | (_, None) => {
                        ErrorCode::InvalidArgument
                    }
                    (_, Some(code)) => code,
                };
                warn!(method = method.as_str(), %code, "{err}");
                MethodResponse::error(code, err.to_string())
            }
        }
    }

    /// Report an NFC tag presented to the host. Tags without an id are ignored.
    pub fn report_tag(&self, tag: &NfcTag) {
        if tag.id.is_empty() {
            debug!("ignoring NFC tag without identifier");
            return;
        }
        let event = tag.to_event();
        debug!(uid = %event.uid, "NFC tag detected");
        self.notify(Notification::NfcTagDetected(event));
    }

    // ── Handlers ─────────────────────────────────────────────────────────

    fn handle(&self, method: Method, call: &MethodCall) -> Result<Value> {
        match method {
            Method::Initialize => Ok(Value::Bool(self.initialize())),
            Method::Connect => self.connect(call),
            Method::Disconnect => self.disconnect(),
            Method::SendCommand => self.send_command(call),
            Method::GetAvailablePorts => {
                let ports = self.device.0.lock().available_ports()?;
                Ok(Value::from(ports))
            }
            Method::AutoDetectDevice => {
                info!("auto-detecting device");
                let port = self.device.0.lock().auto_detect()?;
                info!(port = %port, "device detected");
                Ok(Value::String(port))
            }
            Method::GetDeviceStatus => {
                self.ensure_connected()?;
                let status = self.device.0.lock().status()?;
                serde_json::to_value(status).map_err(|e| BridgeError::Other(e.into()))
            }
        }
    }

    fn connect(&self, call: &MethodCall) -> Result<Value> {
        let port = call
            .argument::<String>("port")?
            .unwrap_or_else(|| self.config.default_port.clone());
        if port.trim().is_empty() {
            return Err(BridgeError::invalid_argument("port", "cannot be empty"));
        }
        let baud_rate = call
            .argument::<u32>("baudRate")?
            .unwrap_or(self.config.default_baud_rate);
        if baud_rate == 0 {
            return Err(BridgeError::invalid_argument("baudRate", "must be positive"));
        }

        info!(port = %port, baud_rate, "connecting to device");
        // Lock order: device, then connection.
        let mut device = self.device.0.lock();
        device.connect(&port, baud_rate)?;
        let previous = self.connection.lock().replace(ConnectionInfo {
            port: port.clone(),
            baud_rate,
        });
        drop(device);
        if let Some(prev) = previous {
            debug!(port = %prev.port, "replaced existing connection");
        }
        info!(port = %port, baud_rate, "connection established");

        self.notify(Notification::ConnectionEstablished(
            ConnectionEstablishedEvent { port, baud_rate },
        ));
        Ok(Value::Bool(true))
    }

    fn disconnect(&self) -> Result<Value> {
        info!("disconnecting from device");
        let mut device = self.device.0.lock();
        device.disconnect()?;
        let previous = self.connection.lock().take();
        drop(device);
        if previous.is_none() {
            debug!("disconnect requested with no open connection");
        }
        self.notify(Notification::ConnectionLost);
        Ok(Value::Null)
    }

    fn send_command(&self, call: &MethodCall) -> Result<Value> {
        let command: String = call.required("command")?;
        if command.trim().is_empty() {
            return Err(BridgeError::invalid_argument("command", "cannot be empty"));
        }
        let timeout_ms = call
            .argument::<u64>("timeout")?
            .unwrap_or(self.config.default_timeout_ms);
        if timeout_ms == 0 {
            return Err(BridgeError::invalid_argument("timeout", "must be positive"));
        }
        self.ensure_connected()?;

        debug!(command = %command, timeout_ms, "sending command");
        let reply = self
            .device
            .0
            .lock()
            .send_command(&command, Duration::from_millis(timeout_ms))?;

        self.notify(Notification::DataReceived(DataReceivedEvent {
            data: reply.clone(),
        }));
        Ok(Value::String(reply))
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    fn ensure_connected(&self) -> Result<()> {
        if self.config.require_connection && self.connection.lock().is_none() {
            return Err(BridgeError::NotConnected);
        }
        Ok(())
    }

    fn notify(&self, notification: Notification) {
        // No subscribers is not an error: delivery is best-effort.
        if self.notify_tx.send(notification).is_err() {
            debug!("notification dropped: no subscribers");
        }
    }
}
