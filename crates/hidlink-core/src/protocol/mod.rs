//! Serial wire protocol: command schema, codec, and motion decomposition.
//!
//! Wire format:
//! ```text
//! [opcode: 1 byte][argument bytes: opcode-determined count]
//! ```
//! No terminator, no checksum, no length prefix.  Multi-byte arguments are
//! signed 16-bit little-endian two's-complement integers, low byte first.

pub mod chunk;
pub mod command;

use serde::{Deserialize, Serialize};

/// How the host interprets mouse coordinates handed to it by callers.
///
/// Reported by the relay's `Init` operation; the wire protocol itself only
/// ever carries relative motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateMode {
    /// Caller supplies absolute screen coordinates; the relay converts them
    /// to relative deltas against its tracked pointer position.
    Screen,
    /// Caller supplies ready-to-send relative deltas.
    Relative,
}

/// Which physical action a mouse request maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseAction {
    Move,
    Click,
    ScrollDown,
}
