//! Wire key-code to USB HID usage translation.
//!
//! The wire carries the reference firmware's single-byte key codes
//! (printable keys as ASCII, modifiers from 0x80, function/navigation keys
//! in 0xB0–0xE0).  A USB HID keyboard report instead wants a usage ID from
//! the Keyboard/Keypad page (0x07) — or, for modifier keys, a bit in the
//! report's modifier byte.  This module is the bridge.
//!
//! Reference: USB HID Usage Tables 1.3, Section 10.

use hidlink_core::Key;

/// How a wire key code lands in a keyboard boot report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HidUsage {
    /// A bit in the report's modifier byte (bit 0 = Left Ctrl, bit 1 =
    /// Left Shift, bit 2 = Left Alt, per the boot protocol layout).
    Modifier(u8),
    /// A usage ID occupying one of the report's six key slots.
    Key(u8),
}

/// Modifier byte bits (boot protocol, left-hand variants).
pub const MOD_LEFT_CTRL: u8 = 1 << 0;
pub const MOD_LEFT_SHIFT: u8 = 1 << 1;
pub const MOD_LEFT_ALT: u8 = 1 << 2;

/// Translates an on-wire key-code byte to its HID report representation.
///
/// Returns `None` for bytes outside the known code space.
pub fn usage_for_wire_code(code: u8) -> Option<HidUsage> {
    let key = Key::from_wire_code(code)?;
    Some(match key {
        Key::Ctrl => HidUsage::Modifier(MOD_LEFT_CTRL),
        Key::Shift => HidUsage::Modifier(MOD_LEFT_SHIFT),
        Key::Alt => HidUsage::Modifier(MOD_LEFT_ALT),
        other => HidUsage::Key(usage_id(other)),
    })
}

/// HID Keyboard/Keypad page usage ID for a non-modifier key.
fn usage_id(key: Key) -> u8 {
    match key {
        Key::A => 0x04,
        Key::B => 0x05,
        Key::C => 0x06,
        Key::D => 0x07,
        Key::E => 0x08,
        Key::F => 0x09,
        Key::G => 0x0A,
        Key::H => 0x0B,
        Key::I => 0x0C,
        Key::J => 0x0D,
        Key::K => 0x0E,
        Key::L => 0x0F,
        Key::M => 0x10,
        Key::N => 0x11,
        Key::O => 0x12,
        Key::P => 0x13,
        Key::Q => 0x14,
        Key::R => 0x15,
        Key::S => 0x16,
        Key::T => 0x17,
        Key::U => 0x18,
        Key::V => 0x19,
        Key::W => 0x1A,
        Key::X => 0x1B,
        Key::Y => 0x1C,
        Key::Z => 0x1D,
        Key::One => 0x1E,
        Key::Two => 0x1F,
        Key::Three => 0x20,
        Key::Four => 0x21,
        Key::Five => 0x22,
        Key::Six => 0x23,
        Key::Seven => 0x24,
        Key::Eight => 0x25,
        Key::Nine => 0x26,
        Key::Zero => 0x27,
        Key::Enter => 0x28,
        Key::Esc => 0x29,
        Key::Space => 0x2C,
        Key::Semicolon => 0x33,
        Key::Quote => 0x34,
        Key::Tilde => 0x35,
        Key::Comma => 0x36,
        Key::Period => 0x37,
        Key::Slash => 0x38,
        Key::F1 => 0x3A,
        Key::F2 => 0x3B,
        Key::F3 => 0x3C,
        Key::F4 => 0x3D,
        Key::F5 => 0x3E,
        Key::F6 => 0x3F,
        Key::F7 => 0x40,
        Key::F8 => 0x41,
        Key::F9 => 0x42,
        Key::F10 => 0x43,
        Key::F11 => 0x44,
        Key::F12 => 0x45,
        Key::Insert => 0x49,
        Key::Home => 0x4A,
        Key::PageUp => 0x4B,
        Key::Delete => 0x4C,
        Key::End => 0x4D,
        Key::PageDown => 0x4E,
        Key::Right => 0x4F,
        Key::Left => 0x50,
        Key::Down => 0x51,
        Key::Up => 0x52,
        // Modifiers are handled in usage_for_wire_code.
        Key::Ctrl | Key::Shift | Key::Alt => 0x00,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hidlink_core::keymap::ALL_KEYS;

    #[test]
    fn every_wire_code_has_a_report_representation() {
        for key in ALL_KEYS {
            assert!(
                usage_for_wire_code(key.wire_code()).is_some(),
                "{key:?} must map"
            );
        }
    }

    #[test]
    fn modifiers_map_to_modifier_bits() {
        assert_eq!(usage_for_wire_code(0x80), Some(HidUsage::Modifier(MOD_LEFT_CTRL)));
        assert_eq!(usage_for_wire_code(0x81), Some(HidUsage::Modifier(MOD_LEFT_SHIFT)));
        assert_eq!(usage_for_wire_code(0x82), Some(HidUsage::Modifier(MOD_LEFT_ALT)));
    }

    #[test]
    fn letters_map_to_the_keyboard_page() {
        assert_eq!(usage_for_wire_code(b'a'), Some(HidUsage::Key(0x04)));
        assert_eq!(usage_for_wire_code(b'z'), Some(HidUsage::Key(0x1D)));
        assert_eq!(usage_for_wire_code(b'0'), Some(HidUsage::Key(0x27)));
    }

    #[test]
    fn unknown_codes_do_not_map() {
        assert_eq!(usage_for_wire_code(0x00), None);
        assert_eq!(usage_for_wire_code(0xFF), None);
    }
}
