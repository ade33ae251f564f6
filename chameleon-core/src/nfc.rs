//! NFC tags presented to the host device.

use std::fmt::Write;

use crate::ipc::events::NfcTagEvent;

/// A tag as reported by the host's NFC stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfcTag {
    /// Raw identifier bytes.
    pub id: Vec<u8>,
    /// Technologies the tag supports, as named by the host stack.
    pub tech_list: Vec<String>,
}

impl NfcTag {
    pub fn new(id: Vec<u8>, tech_list: Vec<String>) -> Self {
        Self { id, tech_list }
    }

    /// Identifier as lowercase hex, two digits per byte, no separators.
    pub fn uid_hex(&self) -> String {
        self.id
            .iter()
            .fold(String::with_capacity(self.id.len() * 2), |mut out, b| {
                let _ = write!(out, "{b:02x}");
                out
            })
    }

    pub fn to_event(&self) -> NfcTagEvent {
        NfcTagEvent {
            uid: self.uid_hex(),
            tech_list: self.tech_list.clone(),
        }
    }
}
