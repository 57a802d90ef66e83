//! Symbolic key names and their single-byte on-wire codes.
//!
//! The host request surface speaks in symbolic key names; the wire carries a
//! single opaque key-code byte.  The code space is the one the reference
//! input-emulating firmware understands: printable keys are their ASCII
//! byte, modifiers start at 0x80, and function/navigation keys sit in the
//! 0xB0–0xE0 range.
//!
//! The protocol layer never interprets these bytes — [`Key::wire_code`] is
//! used by the host just before encoding, and [`Key::from_wire_code`] by
//! device actuators that need to map the byte back to a platform key.

use serde::{Deserialize, Serialize};

/// Symbolic key names accepted by the host request surface.
///
/// The set matches the `Key` enumeration of the gRPC request schema
/// one-for-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    // Digits
    Zero, One, Two, Three, Four, Five, Six, Seven, Eight, Nine,
    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    // Navigation and controls
    Up, Down, Left, Right,
    Home, End, PageUp, PageDown, Insert, Delete,
    Esc, Enter, Space,
    // Modifiers (left-hand variants)
    Ctrl, Shift, Alt,
    // Punctuation
    Tilde, Quote, Semicolon, Comma, Period, Slash,
}

impl Key {
    /// The single key-code byte carried on the wire for this key.
    pub fn wire_code(self) -> u8 {
        match self {
            Key::A => b'a',
            Key::B => b'b',
            Key::C => b'c',
            Key::D => b'd',
            Key::E => b'e',
            Key::F => b'f',
            Key::G => b'g',
            Key::H => b'h',
            Key::I => b'i',
            Key::J => b'j',
            Key::K => b'k',
            Key::L => b'l',
            Key::M => b'm',
            Key::N => b'n',
            Key::O => b'o',
            Key::P => b'p',
            Key::Q => b'q',
            Key::R => b'r',
            Key::S => b's',
            Key::T => b't',
            Key::U => b'u',
            Key::V => b'v',
            Key::W => b'w',
            Key::X => b'x',
            Key::Y => b'y',
            Key::Z => b'z',
            Key::Zero => b'0',
            Key::One => b'1',
            Key::Two => b'2',
            Key::Three => b'3',
            Key::Four => b'4',
            Key::Five => b'5',
            Key::Six => b'6',
            Key::Seven => b'7',
            Key::Eight => b'8',
            Key::Nine => b'9',
            Key::F1 => 0xC2,
            Key::F2 => 0xC3,
            Key::F3 => 0xC4,
            Key::F4 => 0xC5,
            Key::F5 => 0xC6,
            Key::F6 => 0xC7,
            Key::F7 => 0xC8,
            Key::F8 => 0xC9,
            Key::F9 => 0xCA,
            Key::F10 => 0xCB,
            Key::F11 => 0xCC,
            Key::F12 => 0xCD,
            Key::Up => 0xDA,
            Key::Down => 0xD9,
            Key::Left => 0xD8,
            Key::Right => 0xD7,
            Key::Home => 0xD2,
            Key::End => 0xD5,
            Key::PageUp => 0xD3,
            Key::PageDown => 0xD6,
            Key::Insert => 0xD1,
            Key::Delete => 0xD4,
            Key::Esc => 0xB1,
            Key::Enter => 0xE0,
            Key::Space => b' ',
            Key::Ctrl => 0x80,
            Key::Shift => 0x81,
            Key::Alt => 0x82,
            Key::Tilde => b'`',
            Key::Quote => b'\'',
            Key::Semicolon => b';',
            Key::Comma => b',',
            Key::Period => b'.',
            Key::Slash => b'/',
        }
    }

    /// Reverse lookup from an on-wire key-code byte.
    ///
    /// Returns `None` for bytes outside the known code space; the device
    /// still consumed the command's bytes, so framing is unaffected.
    pub fn from_wire_code(code: u8) -> Option<Key> {
        ALL_KEYS.iter().copied().find(|k| k.wire_code() == code)
    }
}

/// Every symbolic key, in declaration order.
pub const ALL_KEYS: [Key; 70] = [
    Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
    Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
    Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
    Key::Zero, Key::One, Key::Two, Key::Three, Key::Four, Key::Five, Key::Six,
    Key::Seven, Key::Eight, Key::Nine,
    Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6, Key::F7, Key::F8,
    Key::F9, Key::F10, Key::F11, Key::F12,
    Key::Up, Key::Down, Key::Left, Key::Right,
    Key::Home, Key::End, Key::PageUp, Key::PageDown, Key::Insert, Key::Delete,
    Key::Esc, Key::Enter, Key::Space,
    Key::Ctrl, Key::Shift, Key::Alt,
    Key::Tilde, Key::Quote, Key::Semicolon, Key::Comma, Key::Period, Key::Slash,
];

// ── Tests ─────────────────────────────────────────────────────────────────────
