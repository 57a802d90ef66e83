//! The command schema: opcodes, argument shapes, and the byte codec.
//!
//! A command is the atomic unit on the wire.  The argument length for a given
//! opcode is constant and known to both ends before any bytes are read; the
//! [`Opcode::arg_len`] table below is the single source of truth shared by
//! the host encoder and the device decoder.  Divergence between the two ends
//! is the most serious failure mode in the system — there is no
//! resynchronisation marker, so a disagreement corrupts the stream
//! permanently.
//!
//! # Canonical numbering
//!
//! Two incompatible opcode numberings exist in historical firmware: this
//! 0x00–0x05 table and a legacy 0x01–0x06 variant with a different argument
//! count table.  The link is write-only from the host, so the two cannot be
//! negotiated in-band.  This crate supports exactly the canonical table;
//! [`PROTOCOL_VERSION`] is surfaced through the relay's `Init` response so a
//! mismatched deployment can be rejected out of band instead of guessed at.

use thiserror::Error;

/// Version byte of the canonical command numbering.
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Errors produced while decoding command bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// The candidate opcode byte is outside the canonical enumeration.
    #[error("unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),

    /// Fewer argument bytes were supplied than the opcode requires.
    #[error("truncated arguments for {opcode:?}: expected {expected} bytes, got {actual}")]
    TruncatedArguments {
        opcode: Opcode,
        expected: usize,
        actual: usize,
    },
}

// ── Opcode table ──────────────────────────────────────────────────────────────

/// Single-byte command discriminator.
///
/// The numeric value of each variant is the byte sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Emit one key, pressed and released immediately.  Args: key code (1).
    KeyPulse = 0x00,
    /// Press and hold a key.  Args: key code (1).
    KeyDown = 0x01,
    /// Release a held key.  Args: key code (1).
    KeyUp = 0x02,
    /// Relative pointer motion.  Args: dx i16 LE, dy i16 LE (4).
    MouseMove = 0x03,
    /// Primary-button click.  No args.
    MouseClick = 0x04,
    /// Vertical scroll.  Args: delta i16 LE (2).
    MouseScroll = 0x05,
}

impl Opcode {
    /// Exact argument byte count for this opcode.
    ///
    /// Encoder and decoder both derive their framing from this table.
    pub const fn arg_len(self) -> usize {
        match self {
            Opcode::KeyPulse | Opcode::KeyDown | Opcode::KeyUp => 1,
            Opcode::MouseMove => 4,
            Opcode::MouseClick => 0,
            Opcode::MouseScroll => 2,
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, WireError> {
        match value {
            0x00 => Ok(Opcode::KeyPulse),
            0x01 => Ok(Opcode::KeyDown),
            0x02 => Ok(Opcode::KeyUp),
            0x03 => Ok(Opcode::MouseMove),
            0x04 => Ok(Opcode::MouseClick),
            0x05 => Ok(Opcode::MouseScroll),
            other => Err(WireError::UnknownOpcode(other)),
        }
    }
}

// ── Command ───────────────────────────────────────────────────────────────────

/// A fully decoded command with typed arguments.
///
/// A `Command` value is built, serialised, and discarded immediately after
/// the write; it carries no identity beyond its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Momentary key actuation.
    KeyPulse { key: u8 },
    /// Assert a key's held state.
    KeyDown { key: u8 },
    /// Clear a key's held state.
    KeyUp { key: u8 },
    /// Relative pointer motion; decomposed into bounded steps on the device.
    MouseMove { dx: i16, dy: i16 },
    /// Primary-button click.
    MouseClick,
    /// Vertical scroll delta (positive scrolls down in the reference device).
    MouseScroll { delta: i16 },
}

impl Command {
    /// Returns the [`Opcode`] discriminant for this command.
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::KeyPulse { .. } => Opcode::KeyPulse,
            Command::KeyDown { .. } => Opcode::KeyDown,
            Command::KeyUp { .. } => Opcode::KeyUp,
            Command::MouseMove { .. } => Opcode::MouseMove,
            Command::MouseClick => Opcode::MouseClick,
            Command::MouseScroll { .. } => Opcode::MouseScroll,
        }
    }

    /// Appends the framed command (opcode byte plus arguments) to `buf`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.push(self.opcode() as u8);
        match *self {
            Command::KeyPulse { key } | Command::KeyDown { key } | Command::KeyUp { key } => {
                buf.push(key);
            }
            Command::MouseMove { dx, dy } => {
                buf.extend_from_slice(&dx.to_le_bytes());
                buf.extend_from_slice(&dy.to_le_bytes());
            }
            Command::MouseClick => {}
            Command::MouseScroll { delta } => {
                buf.extend_from_slice(&delta.to_le_bytes());
            }
        }
    }

    /// Encodes the framed command into a fresh byte vector.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + self.opcode().arg_len());
        self.encode_into(&mut buf);
        buf
    }

    /// Decodes the argument bytes for an already-validated opcode.
    ///
    /// `args` must contain exactly [`Opcode::arg_len`] bytes; extra bytes are
    /// rejected by the caller's framing, so only truncation is checked here.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::TruncatedArguments`] when `args` is too short.
    pub fn decode_args(opcode: Opcode, args: &[u8]) -> Result<Command, WireError> {
        let expected = opcode.arg_len();
        if args.len() < expected {
            return Err(WireError::TruncatedArguments {
                opcode,
                expected,
                actual: args.len(),
            });
        }
        Ok(match opcode {
            Opcode::KeyPulse => Command::KeyPulse { key: args[0] },
            Opcode::KeyDown => Command::KeyDown { key: args[0] },
            Opcode::KeyUp => Command::KeyUp { key: args[0] },
            Opcode::MouseMove => Command::MouseMove {
                dx: i16::from_le_bytes([args[0], args[1]]),
                dy: i16::from_le_bytes([args[2], args[3]]),
            },
            Opcode::MouseClick => Command::MouseClick,
            Opcode::MouseScroll => Command::MouseScroll {
                delta: i16::from_le_bytes([args[0], args[1]]),
            },
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
