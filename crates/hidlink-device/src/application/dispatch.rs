//! The device dispatch loop: read, decode, execute, repeat.
//!
//! The serial stream carries undelimited frames — one opcode byte followed
//! by an opcode-determined argument count — so the loop's only defence
//! against a malformed stream is the shared opcode table plus best-effort
//! resynchronisation: an unknown opcode byte is discarded and the loop
//! resumes at the next byte, and an argument read that does not complete
//! within the configured bound discards the partial command entirely.
//!
//! The loop is strictly single-threaded and sequential: one full
//! decode-and-execute cycle finishes before the next opcode byte is read,
//! so physical actions are totally ordered in the order the host wrote the
//! commands.  While idle, the opcode read blocks indefinitely by design.

use std::time::Duration;

use hidlink_core::{Command, Opcode};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;
use tracing::{debug, error, trace, warn};

use crate::application::actuate::{execute, ActuationError, HidActuator};

/// Tuning knobs for the dispatch loop.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// How long to wait for a command's argument bytes before discarding the
    /// partial command.  Bounds how long a truncated frame can stall the
    /// loop; it does not apply to the idle opcode wait.
    pub arg_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            arg_timeout: Duration::from_millis(250),
        }
    }
}

/// The device-side decode/dispatch loop.
///
/// Generic over the byte source so tests can drive it from an in-memory
/// stream while production reads from the serial port.
pub struct Dispatcher<R> {
    reader: R,
    config: DispatcherConfig,
}

impl<R: AsyncRead + Unpin> Dispatcher<R> {
    /// Creates a dispatcher over the given byte source.
    pub fn new(reader: R, config: DispatcherConfig) -> Self {
        Self { reader, config }
    }

    /// Runs the dispatch loop until the stream ends.
    ///
    /// Framing errors (unknown opcode, argument timeout) are logged and
    /// skipped; actuation failures for individual commands are logged and
    /// the loop continues, except for backend I/O errors, which are fatal —
    /// a dead HID device cannot make progress.
    ///
    /// # Errors
    ///
    /// Returns the serial read error or the fatal actuation error that
    /// stopped the loop.
    pub async fn run(mut self, hid: &dyn HidActuator) -> anyhow::Result<()> {
        loop {
            let mut opcode_byte = [0u8; 1];
            // Blocks forever while idle; EOF means the link is gone.
            if self.reader.read(&mut opcode_byte).await? == 0 {
                debug!("serial stream closed, dispatcher stopping");
                return Ok(());
            }

            let opcode = match Opcode::try_from(opcode_byte[0]) {
                Ok(opcode) => opcode,
                Err(err) => {
                    // Best-effort resync: drop the byte, try the next one.
                    warn!("{err}, discarding byte");
                    continue;
                }
            };

            // Stack-local argument buffer, sized for the largest opcode.
            // One fresh buffer per decode cycle; the loop has no shared
            // mutable decode state.
            let mut args = [0u8; 4];
            let arg_len = opcode.arg_len();
            if arg_len > 0 {
                let read = timeout(
                    self.config.arg_timeout,
                    self.reader.read_exact(&mut args[..arg_len]),
                )
                .await;
                match read {
                    Ok(Ok(_)) => {}
                    Ok(Err(err)) => {
                        // Stream ended inside a frame: discard the partial
                        // command, then the next opcode read observes EOF.
                        warn!("short read for {opcode:?} arguments: {err}");
                        continue;
                    }
                    Err(_) => {
                        warn!(
                            "timed out waiting for {arg_len} argument byte(s) of {opcode:?}, \
                             discarding partial command"
                        );
                        continue;
                    }
                }
            }

            let command = match Command::decode_args(opcode, &args[..arg_len]) {
                Ok(command) => command,
                Err(err) => {
                    warn!("undecodable command: {err}");
                    continue;
                }
            };

            trace!("executing {command:?}");
            match execute(&command, hid) {
                Ok(()) => {}
                Err(ActuationError::UnknownKeyCode(code)) => {
                    // The frame was well-formed, the payload just names a key
                    // this device cannot produce.  Framing is intact.
                    warn!("ignoring command for unknown key code 0x{code:02X}");
                }
                Err(err @ ActuationError::Io(_)) => {
                    error!("HID backend failed, stopping dispatcher: {err}");
                    return Err(err.into());
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
