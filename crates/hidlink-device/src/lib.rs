//! hidlink-device library entry point.
//!
//! Re-exports the module tree so that integration tests in `tests/` and the
//! binary entry point in `main.rs` share the same code.
//!
//! # What does hidlink-device do?
//!
//! The *device* end of hidlink plays the role of a physically separate input
//! peripheral.  It reads the undelimited command stream the host relay
//! writes to the serial link, decodes one command per iteration, and drives
//! real keyboard and pointer actuations:
//!
//! 1. Block until an opcode byte arrives.
//! 2. Look up the opcode's fixed argument length in the shared schema.
//! 3. Read exactly that many argument bytes (bounded wait).
//! 4. Execute the command against the HID actuator, decomposing large
//!    motion vectors into hardware-limited steps.
//! 5. Loop.
//!
//! Nothing is ever written back: the link is consumed fire-and-forget, and
//! the host has no acknowledgment channel to wait on.

/// Application layer: the dispatch loop and the actuation contract.
pub mod application;

/// Infrastructure layer: serial port, HID backends, and configuration.
pub mod infrastructure;
