//! # hidlink-core
//!
//! Shared library for hidlink containing the serial command schema, the wire
//! codec, and the key translation tables.
//!
//! This crate is used by both the host relay and the device dispatcher.
//! It has zero dependencies on serial ports, gRPC, or OS input APIs.
//!
//! # Architecture overview
//!
//! hidlink relays synthetic keyboard and mouse input from a controlling host
//! to a separate input-emulating device over a plain byte-oriented serial
//! link.  The device replays the commands as physical HID actuations, so the
//! injected input is indistinguishable from a locally attached peripheral.
//!
//! This crate is the shared foundation.  It defines:
//!
//! - **`protocol`** – How bytes travel over the link.  Each command is a
//!   single opcode byte followed by a fixed, opcode-determined number of
//!   argument bytes.  There is no length prefix and no delimiter: both ends
//!   must agree on the same opcode→length table or the stream desynchronises
//!   permanently, which is why the table lives here and nowhere else.
//!
//! - **`keymap`** – The symbolic key enumeration used by the host request
//!   surface and its mapping to the single-byte key-code space carried on
//!   the wire.

pub mod keymap;
pub mod protocol;

pub use keymap::Key;
pub use protocol::chunk::{StepIter, MAX_STEP};
pub use protocol::command::{Command, Opcode, WireError, PROTOCOL_VERSION};
pub use protocol::{CoordinateMode, MouseAction};
