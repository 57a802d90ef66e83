//! HID actuation backends.
//!
//! - [`gadget`] — the production backend: writes boot-protocol reports to
//!   USB HID gadget character devices, so the machine hosting this daemon
//!   appears to its USB host as an ordinary keyboard and mouse.
//! - [`mock`] — in-memory recorder used by unit and integration tests.
//! - [`usage`] — wire key-code to USB HID usage translation table.

pub mod gadget;
pub mod mock;
pub mod usage;
