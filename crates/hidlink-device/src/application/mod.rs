//! Use cases for the device dispatcher.

pub mod actuate;
pub mod dispatch;

pub use actuate::{execute, ActuationError, HidActuator};
pub use dispatch::{Dispatcher, DispatcherConfig};
