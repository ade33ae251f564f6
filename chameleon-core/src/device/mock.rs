//! `MockDevice` — in-process backend with canned replies and simulated latency.
//!
//! Used until a real transport is wired in. Replies come from a static
//! prefix table so the full GUI ↔ dispatcher contract can be exercised
//! end-to-end without hardware.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::device::{DeviceBackend, DeviceStatus};
use crate::error::{BridgeError, Result};

/// Serial ports always offered after any attached USB devices.
pub const COMMON_SERIAL_PORTS: &[&str] = &[
    "/dev/ttyUSB0",
    "/dev/ttyUSB1",
    "/dev/ttyACM0",
    "/dev/ttyACM1",
];

/// Reply for commands that match no table entry.
pub const DEFAULT_REPLY: &str = "Command executed successfully";

/// Command prefix → canned reply.
const REPLY_TABLE: &[(&str, &str)] = &[
    ("hw version", "Chameleon Ultra firmware 2.0.0"),
    ("hf search", "14a card found! UID: 04689571fa5c64"),
    ("lf search", "EM410x ID: 1234567890"),
];

/// Configuration for `MockDevice`.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Simulated time to open a connection. Default: 1000 ms.
    pub connect_latency: Duration,
    /// Simulated round-trip per command. Default: 200 ms.
    pub command_latency: Duration,
    /// Simulated search time for auto-detection. Default: 2000 ms.
    pub detect_latency: Duration,
    /// Names of attached USB devices, listed as `USB:<name>` ports.
    pub usb_devices: Vec<String>,
    /// Port reported by auto-detection. Default: `/dev/ttyUSB0`.
    pub detected_port: String,
    /// Snapshot returned by `status()`.
    pub status: DeviceStatus,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            connect_latency: Duration::from_millis(1_000),
            command_latency: Duration::from_millis(200),
            detect_latency: Duration::from_millis(2_000),
            usb_devices: Vec::new(),
            detected_port: COMMON_SERIAL_PORTS[0].to_string(),
            status: DeviceStatus::default(),
        }
    }
}

impl MockConfig {
    /// Default replies with every latency set to zero.
    pub fn instant() -> Self {
        Self {
            connect_latency: Duration::ZERO,
            command_latency: Duration::ZERO,
            detect_latency: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Canned-reply device backend.
pub struct MockDevice {
    config: MockConfig,
    commands_sent: u64,
}

impl MockDevice {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            commands_sent: 0,
        }
    }

    /// Reply the mock gives for `command`, without latency.
    pub fn reply_for(command: &str) -> &'static str {
        REPLY_TABLE
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix))
            .map(|(_, reply)| *reply)
            .unwrap_or(DEFAULT_REPLY)
    }

    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

fn simulate(latency: Duration) {
    if !latency.is_zero() {
        thread::sleep(latency);
    }
}

impl DeviceBackend for MockDevice {
    fn initialize(&mut self) -> Result<()> {
        debug!("MockDevice::initialize — no-op");
        Ok(())
    }

    fn connect(&mut self, port: &str, baud_rate: u32) -> Result<()> {
        debug!(port, baud_rate, "MockDevice::connect");
        simulate(self.config.connect_latency);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        debug!("MockDevice::disconnect");
        Ok(())
    }

    fn send_command(&mut self, command: &str, timeout: Duration) -> Result<String> {
        if self.config.command_latency > timeout {
            // A real link would block until the deadline before giving up.
            thread::sleep(timeout);
            return Err(BridgeError::Timeout {
                command: command.to_string(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            });
        }

        let reply = Self::reply_for(command);
        simulate(self.config.command_latency);
        self.commands_sent += 1;
        Ok(reply.to_string())
    }

    fn available_ports(&mut self) -> Result<Vec<String>> {
        let mut ports: Vec<String> = self
            .config
            .usb_devices
            .iter()
            .map(|name| format!("USB:{name}"))
            .collect();
        ports.extend(COMMON_SERIAL_PORTS.iter().map(|p| p.to_string()));
        Ok(ports)
    }

    fn auto_detect(&mut self) -> Result<String> {
        simulate(self.config.detect_latency);
        Ok(self.config.detected_port.clone())
    }

    fn status(&mut self) -> Result<DeviceStatus> {
        Ok(self.config.status.clone())
    }
}
