//! Infrastructure adapters: serial port, HID backends, configuration.

pub mod config;
pub mod hid;
pub mod serial;
