//! USB HID gadget backend.
//!
//! On hardware with a USB device controller, the Linux gadget subsystem can
//! expose this machine to its USB host as a composite keyboard + mouse. Each
//! function appears locally as a character device (`/dev/hidg0`,
//! `/dev/hidg1`); writing a boot-protocol report to the device file delivers
//! it to the USB host exactly as a physical peripheral would.
//!
//! Report layouts (boot protocol):
//!
//! ```text
//! keyboard: [modifier bits][reserved 0x00][slot 1]..[slot 6]   (8 bytes)
//! mouse:    [button bits][dx i8][dy i8][wheel i8]              (4 bytes)
//! ```
//!
//! The keyboard report is *stateful*: it describes every key currently held,
//! so the backend tracks the live modifier byte and the six key slots and
//! rewrites the whole report on every transition.  The pointer report is
//! relative and fire-and-forget.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use hidlink_core::StepIter;
use tracing::debug;

use crate::application::actuate::{ActuationError, HidActuator};
use crate::infrastructure::hid::usage::{usage_for_wire_code, HidUsage};

/// Primary button bit in the mouse report.
const BUTTON_PRIMARY: u8 = 1 << 0;

// ── Keyboard report state ─────────────────────────────────────────────────────

/// Live contents of the 8-byte keyboard boot report.
///
/// Pure state transitions, kept separate from the device file so they can be
/// unit-tested without hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardReport {
    modifiers: u8,
    slots: [u8; 6],
}

impl KeyboardReport {
    /// Asserts a usage; returns `false` when the report is unchanged
    /// (already held, or all six slots occupied).
    pub fn press(&mut self, usage: HidUsage) -> bool {
        match usage {
            HidUsage::Modifier(bit) => {
                if self.modifiers & bit != 0 {
                    return false;
                }
                self.modifiers |= bit;
                true
            }
            HidUsage::Key(id) => {
                if self.slots.contains(&id) {
                    return false;
                }
                match self.slots.iter_mut().find(|slot| **slot == 0) {
                    Some(slot) => {
                        *slot = id;
                        true
                    }
                    // Rollover: six keys already held. Real keyboards drop
                    // the extra key too.
                    None => false,
                }
            }
        }
    }

    /// Clears a usage; returns `false` when it was not held.
    pub fn release(&mut self, usage: HidUsage) -> bool {
        match usage {
            HidUsage::Modifier(bit) => {
                if self.modifiers & bit == 0 {
                    return false;
                }
                self.modifiers &= !bit;
                true
            }
            HidUsage::Key(id) => match self.slots.iter_mut().find(|slot| **slot == id) {
                Some(slot) => {
                    *slot = 0;
                    true
                }
                None => false,
            },
        }
    }

    /// The 8 bytes written to the gadget device.
    pub fn bytes(&self) -> [u8; 8] {
        let mut report = [0u8; 8];
        report[0] = self.modifiers;
        report[2..8].copy_from_slice(&self.slots);
        report
    }
}

// ── Gadget actuator ───────────────────────────────────────────────────────────

struct Keyboard {
    dev: File,
    report: KeyboardReport,
}

/// HID actuator writing boot reports to gadget character devices.
pub struct GadgetActuator {
    keyboard: Mutex<Keyboard>,
    mouse: Mutex<File>,
}

impl GadgetActuator {
    /// Opens both gadget function devices.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if either device cannot be opened —
    /// typically because the gadget has not been configured through configfs
    /// or the daemon lacks permission on the device nodes.
    pub fn open(keyboard_dev: &Path, mouse_dev: &Path) -> std::io::Result<Self> {
        let keyboard = OpenOptions::new().write(true).open(keyboard_dev)?;
        let mouse = OpenOptions::new().write(true).open(mouse_dev)?;
        debug!(
            "opened HID gadget devices {} and {}",
            keyboard_dev.display(),
            mouse_dev.display()
        );
        Ok(Self {
            keyboard: Mutex::new(Keyboard {
                dev: keyboard,
                report: KeyboardReport::default(),
            }),
            mouse: Mutex::new(mouse),
        })
    }

    fn with_usage(&self, key: u8) -> Result<HidUsage, ActuationError> {
        usage_for_wire_code(key).ok_or(ActuationError::UnknownKeyCode(key))
    }

    fn flush_keyboard(keyboard: &mut Keyboard) -> Result<(), ActuationError> {
        keyboard.dev.write_all(&keyboard.report.bytes())?;
        Ok(())
    }

    fn write_mouse(&self, buttons: u8, dx: i8, dy: i8, wheel: i8) -> Result<(), ActuationError> {
        let report = [buttons, dx as u8, dy as u8, wheel as u8];
        self.mouse.lock().unwrap().write_all(&report)?;
        Ok(())
    }
}

impl HidActuator for GadgetActuator {
    fn key_press(&self, key: u8) -> Result<(), ActuationError> {
        let usage = self.with_usage(key)?;
        let mut keyboard = self.keyboard.lock().unwrap();
        if keyboard.report.press(usage) {
            Self::flush_keyboard(&mut keyboard)?;
        }
        if keyboard.report.release(usage) {
            Self::flush_keyboard(&mut keyboard)?;
        }
        Ok(())
    }

    fn key_down(&self, key: u8) -> Result<(), ActuationError> {
        let usage = self.with_usage(key)?;
        let mut keyboard = self.keyboard.lock().unwrap();
        if keyboard.report.press(usage) {
            Self::flush_keyboard(&mut keyboard)?;
        }
        Ok(())
    }

    fn key_up(&self, key: u8) -> Result<(), ActuationError> {
        let usage = self.with_usage(key)?;
        let mut keyboard = self.keyboard.lock().unwrap();
        if keyboard.report.release(usage) {
            Self::flush_keyboard(&mut keyboard)?;
        }
        Ok(())
    }

    fn mouse_move_step(&self, dx: i8, dy: i8) -> Result<(), ActuationError> {
        self.write_mouse(0, dx, dy, 0)
    }

    fn mouse_click(&self) -> Result<(), ActuationError> {
        self.write_mouse(BUTTON_PRIMARY, 0, 0, 0)?;
        self.write_mouse(0, 0, 0, 0)
    }

    fn mouse_scroll(&self, delta: i16) -> Result<(), ActuationError> {
        // The wheel field is a single signed byte; larger deltas become
        // repeated reports whose wheel bytes sum exactly to the request.
        for (wheel, _) in StepIter::new(delta, 0) {
            self.write_mouse(0, 0, 0, wheel)?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::hid::usage::{HidUsage, MOD_LEFT_SHIFT};

    #[test]
    fn press_and_release_round_trip_a_key_slot() {
        let mut report = KeyboardReport::default();
        assert!(report.press(HidUsage::Key(0x04)));
        assert_eq!(report.bytes(), [0, 0, 0x04, 0, 0, 0, 0, 0]);
        assert!(report.release(HidUsage::Key(0x04)));
        assert_eq!(report.bytes(), [0u8; 8]);
    }

    #[test]
    fn modifiers_set_bits_not_slots() {
        let mut report = KeyboardReport::default();
        assert!(report.press(HidUsage::Modifier(MOD_LEFT_SHIFT)));
        assert_eq!(report.bytes(), [MOD_LEFT_SHIFT, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn duplicate_press_does_not_change_the_report() {
        let mut report = KeyboardReport::default();
        assert!(report.press(HidUsage::Key(0x05)));
        assert!(!report.press(HidUsage::Key(0x05)));
    }

    #[test]
    fn releasing_an_unheld_key_is_a_no_op() {
        let mut report = KeyboardReport::default();
        assert!(!report.release(HidUsage::Key(0x06)));
        assert_eq!(report, KeyboardReport::default());
    }

    #[test]
    fn seventh_simultaneous_key_is_dropped() {
        let mut report = KeyboardReport::default();
        for id in 0x04..0x0A {
            assert!(report.press(HidUsage::Key(id)));
        }
        assert!(!report.press(HidUsage::Key(0x0A)));
    }

    #[test]
    fn slots_are_reusable_after_release() {
        let mut report = KeyboardReport::default();
        for id in 0x04..0x0A {
            report.press(HidUsage::Key(id));
        }
        assert!(report.release(HidUsage::Key(0x07)));
        assert!(report.press(HidUsage::Key(0x0A)));
    }

    /// Temp-file stand-ins for the gadget device nodes, so the exact report
    /// bytes the actuator emits can be read back.
    struct FakeDevices {
        keyboard: std::path::PathBuf,
        mouse: std::path::PathBuf,
    }

    impl FakeDevices {
        fn create(tag: &str) -> Self {
            let dir = std::env::temp_dir();
            let pid = std::process::id();
            let keyboard = dir.join(format!("hidlink-{pid}-{tag}-kbd"));
            let mouse = dir.join(format!("hidlink-{pid}-{tag}-mouse"));
            std::fs::write(&keyboard, b"").unwrap();
            std::fs::write(&mouse, b"").unwrap();
            Self { keyboard, mouse }
        }

        fn mouse_reports(&self) -> Vec<[u8; 4]> {
            let bytes = std::fs::read(&self.mouse).unwrap();
            assert_eq!(bytes.len() % 4, 0, "torn mouse report");
            bytes
                .chunks(4)
                .map(|chunk| <[u8; 4]>::try_from(chunk).unwrap())
                .collect()
        }
    }

    impl Drop for FakeDevices {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.keyboard);
            let _ = std::fs::remove_file(&self.mouse);
        }
    }

    #[test]
    fn scroll_reports_sum_exactly_to_the_requested_delta() {
        let devices = FakeDevices::create("scroll");
        let actuator = GadgetActuator::open(&devices.keyboard, &devices.mouse).unwrap();
        actuator.mouse_scroll(1000).unwrap();

        let reports = devices.mouse_reports();
        let total: i32 = reports.iter().map(|r| i32::from(r[3] as i8)).sum();
        assert_eq!(total, 1000);
        for report in &reports {
            assert_eq!(&report[..3], &[0, 0, 0], "buttons and motion stay zero");
            let wheel = report[3] as i8;
            assert!(wheel != 0 && wheel as i16 <= 127);
        }
    }

    #[test]
    fn negative_scroll_reports_sum_exactly() {
        let devices = FakeDevices::create("scroll-neg");
        let actuator = GadgetActuator::open(&devices.keyboard, &devices.mouse).unwrap();
        actuator.mouse_scroll(-300).unwrap();

        let total: i32 = devices
            .mouse_reports()
            .iter()
            .map(|r| i32::from(r[3] as i8))
            .sum();
        assert_eq!(total, -300);
    }
}
