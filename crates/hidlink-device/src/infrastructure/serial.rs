//! Serial port opening.
//!
//! The core receives an already-open byte stream and is agnostic to how it
//! was found; discovery heuristics live outside this repository, so the
//! device path comes straight from configuration.

use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::info;

/// Opens the serial link at the configured path and baud rate.
///
/// # Errors
///
/// Returns the `tokio_serial` error when the device is absent or cannot be
/// configured.
pub fn open(path: &str, baud: u32) -> tokio_serial::Result<SerialStream> {
    let stream = tokio_serial::new(path, baud).open_native_async()?;
    info!("opened serial link {path} at {baud} baud");
    Ok(stream)
}
