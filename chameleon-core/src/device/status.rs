//! Device status snapshot returned by `getDeviceStatus`.

use serde::{Deserialize, Serialize};

/// Eleven-field status mapping. Keys stay snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub firmware_version: String,
    pub hardware_version: String,
    pub device_serial: String,
    /// Percent, 0–100.
    pub battery_level: u8,
    pub charging: bool,
    pub usb_connected: bool,
    pub ble_available: bool,
    pub ble_connected: bool,
    /// 1-based index of the active emulation slot.
    pub active_slot: u8,
    pub slots_used: u8,
    pub total_slots: u8,
}

impl Default for DeviceStatus {
    fn default() -> Self {
        Self {
            firmware_version: "2.0.0".into(),
            hardware_version: "2.0".into(),
            device_serial: "CU-123456789ABC".into(),
            battery_level: 85,
            charging: false,
            usb_connected: true,
            ble_available: true,
            ble_connected: false,
            active_slot: 1,
            slots_used: 3,
            total_slots: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_all_eleven_snake_case_keys() {
        let json = serde_json::to_value(DeviceStatus::default()).expect("serialize status");
        let map = json.as_object().expect("status is a mapping");

        assert_eq!(map.len(), 11);
        for key in [
            "firmware_version",
            "hardware_version",
            "device_serial",
            "battery_level",
            "charging",
            "usb_connected",
            "ble_available",
            "ble_connected",
            "active_slot",
            "slots_used",
            "total_slots",
        ] {
            assert!(map.contains_key(key), "missing key {key}");
        }
        assert_eq!(json["battery_level"], 85);
        assert_eq!(json["device_serial"], "CU-123456789ABC");
    }

    #[test]
    fn default_slot_counts_are_consistent() {
        let status = DeviceStatus::default();
        assert!(status.active_slot >= 1 && status.active_slot <= status.total_slots);
        assert!(status.slots_used <= status.total_slots);
        assert!(status.battery_level <= 100);
    }
}
