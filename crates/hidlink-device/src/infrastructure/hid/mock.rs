//! Mock HID actuator for unit testing.
//!
//! The real backend writes reports to USB gadget character devices that
//! only exist on configured hardware and whose effects cannot be observed
//! from test code.  The mock replaces every device write with in-memory
//! recording: each actuation is pushed onto a single ordered event log so
//! assertions can check exactly what was actuated and in what order —
//! ordering across kinds matters when testing framing recovery.

use std::sync::Mutex;

use hidlink_core::Key;

use crate::application::actuate::{ActuationError, HidActuator};

/// One recorded actuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEvent {
    KeyPress(u8),
    KeyDown(u8),
    KeyUp(u8),
    MoveStep(i8, i8),
    Click,
    Scroll(i16),
}

/// Operating mode of the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Record every call unconditionally.
    Record,
    /// Reject key codes the real backend would reject (no wire mapping),
    /// record everything else.
    Strict,
    /// Fail every call with an I/O error, for error-path tests.
    Failing,
}

/// An actuator that records calls instead of writing HID reports.
pub struct MockActuator {
    events: Mutex<Vec<MockEvent>>,
    mode: Mode,
}

impl MockActuator {
    /// Records every actuation.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            mode: Mode::Record,
        }
    }

    /// Like [`MockActuator::new`], but key codes without a wire mapping
    /// produce [`ActuationError::UnknownKeyCode`], as the gadget backend
    /// does.
    pub fn strict() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            mode: Mode::Strict,
        }
    }

    /// Fails every actuation with an I/O error.
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            mode: Mode::Failing,
        }
    }

    /// Snapshot of the recorded events, in actuation order.
    pub fn events(&self) -> Vec<MockEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: MockEvent) -> Result<(), ActuationError> {
        if self.mode == Mode::Failing {
            return Err(ActuationError::Io(std::io::Error::other("mock failure")));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }

    fn check_key(&self, key: u8) -> Result<(), ActuationError> {
        if self.mode == Mode::Strict && Key::from_wire_code(key).is_none() {
            return Err(ActuationError::UnknownKeyCode(key));
        }
        Ok(())
    }
}

impl Default for MockActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl HidActuator for MockActuator {
    fn key_press(&self, key: u8) -> Result<(), ActuationError> {
        self.check_key(key)?;
        self.record(MockEvent::KeyPress(key))
    }

    fn key_down(&self, key: u8) -> Result<(), ActuationError> {
        self.check_key(key)?;
        self.record(MockEvent::KeyDown(key))
    }

    fn key_up(&self, key: u8) -> Result<(), ActuationError> {
        self.check_key(key)?;
        self.record(MockEvent::KeyUp(key))
    }

    fn mouse_move_step(&self, dx: i8, dy: i8) -> Result<(), ActuationError> {
        self.record(MockEvent::MoveStep(dx, dy))
    }

    fn mouse_click(&self) -> Result<(), ActuationError> {
        self.record(MockEvent::Click)
    }

    fn mouse_scroll(&self, delta: i16) -> Result<(), ActuationError> {
        self.record(MockEvent::Scroll(delta))
    }
}
