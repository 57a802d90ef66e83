//! Command execution against the physical HID interface.
//!
//! This sits at the application layer and delegates to a [`HidActuator`]
//! trait object for the actual key and pointer actuations.  The backend
//! implementations live in the infrastructure layer (USB gadget device files
//! in production, an in-memory recorder in tests).

use hidlink_core::{Command, StepIter};
use thiserror::Error;

/// Error type for HID actuation.
#[derive(Debug, Error)]
pub enum ActuationError {
    /// The key-code byte is outside the known on-wire code space.
    #[error("unknown key code on wire: 0x{0:02X}")]
    UnknownKeyCode(u8),

    /// Writing the HID report to the output device failed.
    #[error("HID device I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Physical actuation interface the dispatcher drives.
///
/// All methods are synchronous: a HID report write is a single small
/// `write(2)` on a character device, and the dispatch loop is strictly
/// sequential anyway.
pub trait HidActuator: Send + Sync {
    /// Emits one momentary key actuation (press immediately followed by
    /// release) for the given wire key code.
    fn key_press(&self, key: u8) -> Result<(), ActuationError>;

    /// Asserts the held state of the given wire key code.
    fn key_down(&self, key: u8) -> Result<(), ActuationError>;

    /// Clears the held state of the given wire key code.
    ///
    /// Releasing a key that is not held is accepted and has no effect; the
    /// host deliberately over-releases to prevent stuck keys.
    fn key_up(&self, key: u8) -> Result<(), ActuationError>;

    /// Issues one relative pointer motion of at most ±127 per axis.
    fn mouse_move_step(&self, dx: i8, dy: i8) -> Result<(), ActuationError>;

    /// Issues one primary-button click (press and release).
    fn mouse_click(&self) -> Result<(), ActuationError>;

    /// Applies the full relative scroll delta.  Backends whose wheel field
    /// is narrower than 16 bits emit it in bounded increments that sum to
    /// `delta` exactly.
    fn mouse_scroll(&self, delta: i16) -> Result<(), ActuationError>;
}

/// Executes one decoded command against the actuator.
///
/// `MouseMove` is decomposed into interleaved bounded steps that sum exactly
/// to the requested vector; scroll deltas are passed through whole, matching
/// the reference device behaviour.
///
/// # Errors
///
/// Returns [`ActuationError`] if the backend rejects an actuation.
pub fn execute(command: &Command, hid: &dyn HidActuator) -> Result<(), ActuationError> {
    match *command {
        Command::KeyPulse { key } => hid.key_press(key),
        Command::KeyDown { key } => hid.key_down(key),
        Command::KeyUp { key } => hid.key_up(key),
        Command::MouseMove { dx, dy } => {
            for (step_x, step_y) in StepIter::new(dx, dy) {
                hid.mouse_move_step(step_x, step_y)?;
            }
            Ok(())
        }
        Command::MouseClick => hid.mouse_click(),
        Command::MouseScroll { delta } => hid.mouse_scroll(delta),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
