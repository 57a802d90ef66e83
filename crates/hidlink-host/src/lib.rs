//! hidlink-host library entry point.
//!
//! Re-exports the module tree so that integration tests in `tests/` and the
//! binary entry point in `main.rs` share the same code.
//!
//! # What does hidlink-host do?
//!
//! The *host* end of hidlink exposes a small gRPC request surface
//! (`Init`, `Send`, `SendDown`, `SendUp`, `SendMouse`) and translates each
//! accepted request deterministically into one or more framed commands
//! written, in order, to the serial link.  The device at the other end of
//! the link replays them as physical input.
//!
//! Correctness hinges on two disciplines enforced here:
//!
//! - **Single-writer link.**  Command frames carry no delimiter, so any
//!   byte-level interleaving of two callers' writes corrupts the stream
//!   irrecoverably.  Every frame goes through one mutex-guarded writer.
//! - **Guaranteed key release.**  A timed key press is a host-side
//!   composition (key-down, wait, key-up).  The release write runs in a
//!   detached task, so a caller cancelled mid-wait can never leave a key
//!   stuck down on the device.

/// Application layer: the relay use case and the command sink contract.
pub mod application;

/// Infrastructure layer: serial link, gRPC surface, and configuration.
pub mod infrastructure;
