//! Bridge settings (read-only JSON file in the app data directory).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chameleon_core::{device::mock::COMMON_SERIAL_PORTS, BridgeConfig, MockConfig};
use serde::{Deserialize, Serialize};

/// Overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "CHAMELEON_BRIDGE_SETTINGS";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct BridgeSettings {
    pub channel_name: String,
    pub default_port: String,
    pub default_baud_rate: u32,
    pub default_timeout_ms: u64,
    pub notification_capacity: usize,
    pub require_connection: bool,
    pub simulate_latency: bool,
    pub usb_devices: Vec<String>,
    pub detected_port: String,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        let BridgeConfig {
            channel_name,
            default_port,
            default_baud_rate,
            default_timeout_ms,
            notification_capacity,
            require_connection,
        } = BridgeConfig::default();
        Self {
            channel_name,
            default_port,
            default_baud_rate,
            default_timeout_ms,
            notification_capacity,
            require_connection,
            simulate_latency: true,
            usb_devices: Vec::new(),
            detected_port: COMMON_SERIAL_PORTS[0].into(),
        }
    }
}

impl BridgeSettings {
    pub fn normalize(&mut self) {
        self.channel_name = normalize_channel_name(&self.channel_name);
        self.default_port = normalize_port(&self.default_port);
        self.default_baud_rate = self.default_baud_rate.clamp(300, 4_000_000);
        self.default_timeout_ms = self.default_timeout_ms.clamp(1, 600_000);
        self.notification_capacity = self.notification_capacity.clamp(1, 65_536);
        self.usb_devices = normalize_usb_devices(&self.usb_devices);
        self.detected_port = match self.detected_port.trim() {
            "" => COMMON_SERIAL_PORTS[0].into(),
            port => port.into(),
        };
    }

    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            channel_name: self.channel_name.clone(),
            default_port: self.default_port.clone(),
            default_baud_rate: self.default_baud_rate,
            default_timeout_ms: self.default_timeout_ms,
            notification_capacity: self.notification_capacity,
            require_connection: self.require_connection,
        }
    }

    pub fn mock_config(&self) -> MockConfig {
        let base = if self.simulate_latency {
            MockConfig::default()
        } else {
            MockConfig::instant()
        };
        MockConfig {
            usb_devices: self.usb_devices.clone(),
            detected_port: self.detected_port.clone(),
            ..base
        }
    }

    /// Latencies the mock will apply, for startup logging.
    pub fn latency_summary(&self) -> (Duration, Duration, Duration) {
        let mock = self.mock_config();
        (
            mock.connect_latency,
            mock.command_latency,
            mock.detect_latency,
        )
    }
}

pub fn normalize_channel_name(raw: &str) -> String {
    let name = raw.trim();
    if name.is_empty() {
        "chameleon_ultra".into()
    } else {
        name.into()
    }
}

pub fn normalize_port(raw: &str) -> String {
    let port = raw.trim();
    if port.is_empty() || port.eq_ignore_ascii_case("auto") {
        "auto".into()
    } else {
        port.into()
    }
}

fn normalize_usb_devices(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in raw {
        let normalized = name.trim();
        if normalized.is_empty() || out.iter().any(|n| n == normalized) {
            continue;
        }
        out.push(normalized.to_string());
        if out.len() >= 32 {
            break;
        }
    }
    out
}

pub fn default_settings_path() -> PathBuf {
    if let Some(path) = std::env::var_os(SETTINGS_PATH_ENV) {
        return PathBuf::from(path);
    }
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Chameleon Bridge")
            .join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".local")
                    .join("share")
            })
            .join("chameleon-bridge")
            .join("settings.json")
    }
}

/// Load settings from `path`. A missing file yields defaults; a malformed one
/// is logged and also yields defaults.
pub fn load_settings(path: &Path) -> BridgeSettings {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str::<BridgeSettings>(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = ?path, "ignoring malformed settings file: {e}");
            BridgeSettings::default()
        }),
        Err(_) => BridgeSettings::default(),
    };
    settings.normalize();
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let settings: BridgeSettings =
            serde_json::from_str(r#"{ "defaultBaudRate": 9600, "requireConnection": true }"#)
                .expect("deserialize partial settings");
        assert_eq!(settings.default_baud_rate, 9_600);
        assert!(settings.require_connection);
        assert_eq!(settings.default_port, "auto");
        assert_eq!(settings.default_timeout_ms, 5_000);
    }

    #[test]
    fn normalize_clamps_and_trims() {
        let mut settings = BridgeSettings {
            channel_name: "   ".into(),
            default_port: " AUTO ".into(),
            default_baud_rate: 0,
            default_timeout_ms: 0,
            notification_capacity: 0,
            usb_devices: vec![" dev-a ".into(), "dev-a".into(), "".into(), "dev-b".into()],
            detected_port: "".into(),
            ..BridgeSettings::default()
        };
        settings.normalize();

        assert_eq!(settings.channel_name, "chameleon_ultra");
        assert_eq!(settings.default_port, "auto");
        assert_eq!(settings.default_baud_rate, 300);
        assert_eq!(settings.default_timeout_ms, 1);
        assert_eq!(settings.notification_capacity, 1);
        assert_eq!(settings.usb_devices, vec!["dev-a", "dev-b"]);
        assert_eq!(settings.detected_port, "/dev/ttyUSB0");
    }

    #[test]
    fn disabling_latency_yields_instant_mock() {
        let settings = BridgeSettings {
            simulate_latency: false,
            usb_devices: vec!["dev-a".into()],
            ..BridgeSettings::default()
        };
        let mock = settings.mock_config();
        assert!(mock.connect_latency.is_zero());
        assert!(mock.command_latency.is_zero());
        assert!(mock.detect_latency.is_zero());
        assert_eq!(mock.usb_devices, vec!["dev-a"]);
    }

    #[test]
    fn bridge_config_mirrors_settings() {
        let settings = BridgeSettings {
            default_port: "/dev/ttyACM1".into(),
            require_connection: true,
            ..BridgeSettings::default()
        };
        let config = settings.bridge_config();
        assert_eq!(config.default_port, "/dev/ttyACM1");
        assert!(config.require_connection);
        assert_eq!(config.channel_name, "chameleon_ultra");
    }

    #[test]
    fn defaults_follow_dispatcher_config() {
        let config = BridgeSettings::default().bridge_config();
        let expected = BridgeConfig::default();
        assert_eq!(config.channel_name, expected.channel_name);
        assert_eq!(config.default_port, expected.default_port);
        assert_eq!(config.default_baud_rate, expected.default_baud_rate);
        assert_eq!(config.default_timeout_ms, expected.default_timeout_ms);
        assert_eq!(config.notification_capacity, expected.notification_capacity);
        assert_eq!(config.require_connection, expected.require_connection);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("chameleon-bridge-settings-does-not-exist.json");
        let settings = load_settings(&path);
        assert_eq!(settings.default_baud_rate, 115_200);
        assert!(settings.simulate_latency);
    }
}
