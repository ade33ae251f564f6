//! Types exchanged over the platform channel.
//!
//! Requests, responses and event payloads derive `serde::Serialize` +
//! `serde::Deserialize` so a host can frame them as JSON for whatever
//! transport sits between it and the GUI. `Notification` itself is split
//! into `event_name()` + `payload()` at the host boundary.

pub mod events;
pub mod method;
