//! RelayService: translates input requests into framed serial commands.
//!
//! This use case is the heart of the host application.  It owns the
//! request-level rules — initialisation gating, coordinate conversion,
//! timed-press composition, stuck-key prevention — and delegates the actual
//! byte writes to a [`CommandSink`] injected at construction time, so the
//! whole use case is unit-testable against a recording sink.
//!
//! # Timed presses
//!
//! "Hold key K for D milliseconds" has no wire primitive; it is composed as
//! `KeyDown`, a host-side wait, `KeyUp`.  The wait and the release run in a
//! task detached from the caller: cancelling the request mid-wait must still
//! emit the release, because the device's held state can only be cleared by
//! a `KeyUp` frame.  While such a hold is in flight, further key operations
//! for the same key are accepted and skipped, mirroring the reference
//! relay's timer-per-key behaviour.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hidlink_core::{Command, CoordinateMode, Key, MouseAction};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Error type for relay operations.
///
/// `Link` is deliberately distinct from `NotInitialized`: a vanished serial
/// device is fatal to the automation session, while a premature request is a
/// caller bug.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A request arrived before `Init` completed.
    #[error("relay not initialized: call Init first")]
    NotInitialized,

    /// Writing to the serial link failed (device absent or disconnected).
    #[error("serial link failure: {0}")]
    Link(#[from] std::io::Error),
}

/// Destination for fully framed commands.
///
/// One call writes one whole frame atomically with respect to every other
/// call; implementations must never let two frames' bytes interleave.
/// Infrastructure provides the serial implementation; tests record calls.
#[async_trait]
pub trait CommandSink: Send + Sync + 'static {
    /// Writes one framed command to the link.
    async fn write_command(&self, command: Command) -> std::io::Result<()>;
}

/// Tuning knobs for the relay, read from the host configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Coordinate convention reported to callers by `Init`.
    pub coordinate_mode: CoordinateMode,
    /// Pause between the positioning move and the click/scroll that follows.
    pub click_settle: Duration,
    /// Wire delta emitted for a `ScrollDown` action.
    pub scroll_delta: i16,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            coordinate_mode: CoordinateMode::Screen,
            click_settle: Duration::from_millis(80),
            scroll_delta: 1000,
        }
    }
}

/// Mutable relay state behind one lock: the initialisation flag, the tracked
/// pointer position, and the timed holds in flight.
struct RelayState {
    initialized: bool,
    /// Last commanded absolute pointer position (Screen mode only).
    pointer: Option<(i32, i32)>,
    /// Detached release tasks for timed holds, keyed by key.
    timed_holds: HashMap<Key, JoinHandle<()>>,
}

impl RelayState {
    /// Drops handles of release tasks that have already run.
    fn prune_finished_holds(&mut self) {
        self.timed_holds.retain(|_, handle| !handle.is_finished());
    }
}

/// The host relay use case.
pub struct RelayService<S: CommandSink> {
    sink: Arc<S>,
    config: RelayConfig,
    state: Mutex<RelayState>,
}

impl<S: CommandSink> RelayService<S> {
    /// Creates a relay writing to the given sink.
    pub fn new(sink: Arc<S>, config: RelayConfig) -> Self {
        Self {
            sink,
            config,
            state: Mutex::new(RelayState {
                initialized: false,
                pointer: None,
                timed_holds: HashMap::new(),
            }),
        }
    }

    /// One-time handshake.  Reports the coordinate convention callers should
    /// use for mouse requests.  Idempotent; must precede every other
    /// operation.
    ///
    /// The seed is accepted for forward compatibility and currently unused.
    pub async fn init(&self, seed: &[u8]) -> Result<CoordinateMode, RelayError> {
        let mut state = self.state.lock().await;
        if !state.initialized {
            info!(
                seed_len = seed.len(),
                mode = ?self.config.coordinate_mode,
                "relay initialized"
            );
            state.initialized = true;
        }
        Ok(self.config.coordinate_mode)
    }

    /// Sends a key pulse, or a timed hold when `down_ms` is a positive
    /// finite number of milliseconds (non-finite values degrade to a pulse,
    /// holds are capped at [`MAX_HOLD`]).
    ///
    /// Returns once the request is accepted: for a timed hold that is after
    /// the `KeyDown` frame is written and the release is scheduled.  The
    /// release is guaranteed on every exit path, including caller
    /// cancellation.
    ///
    /// # Errors
    ///
    /// [`RelayError::NotInitialized`] before `Init`; [`RelayError::Link`] if
    /// the write fails.
    pub async fn send_key(&self, key: Key, down_ms: f32) -> Result<(), RelayError> {
        let mut state = self.state.lock().await;
        if !state.initialized {
            return Err(RelayError::NotInitialized);
        }
        state.prune_finished_holds();
        if state.timed_holds.contains_key(&key) {
            debug!("hold for {key:?} still in flight, skipping");
            return Ok(());
        }

        let code = key.wire_code();
        let Some(hold) = hold_duration(down_ms) else {
            self.sink.write_command(Command::KeyPulse { key: code }).await?;
            return Ok(());
        };

        self.sink.write_command(Command::KeyDown { key: code }).await?;
        let sink = Arc::clone(&self.sink);
        let release = tokio::spawn(async move {
            tokio::time::sleep(hold).await;
            if let Err(err) = sink.write_command(Command::KeyUp { key: code }).await {
                // Nothing more can be done from here; the link error will
                // also surface on the caller's next request.
                error!("failed to release key 0x{code:02X}: {err}");
            }
        });
        state.timed_holds.insert(key, release);
        Ok(())
    }

    /// Presses and holds a key.  Skipped while a timed hold for the same
    /// key is in flight.
    pub async fn send_key_down(&self, key: Key) -> Result<(), RelayError> {
        self.send_key_edge(key, true).await
    }

    /// Releases a key.  A release for a key never pressed is forwarded
    /// as-is: the device, not the relay, owns the held-state truth.
    pub async fn send_key_up(&self, key: Key) -> Result<(), RelayError> {
        self.send_key_edge(key, false).await
    }

    async fn send_key_edge(&self, key: Key, down: bool) -> Result<(), RelayError> {
        let mut state = self.state.lock().await;
        if !state.initialized {
            return Err(RelayError::NotInitialized);
        }
        state.prune_finished_holds();
        if state.timed_holds.contains_key(&key) {
            debug!("hold for {key:?} still in flight, skipping");
            return Ok(());
        }
        let code = key.wire_code();
        let command = if down {
            Command::KeyDown { key: code }
        } else {
            Command::KeyUp { key: code }
        };
        self.sink.write_command(command).await?;
        Ok(())
    }

    /// Translates a mouse request into wire commands.
    ///
    /// In Screen mode the `(x, y)` target is clamped to
    /// `[0, width) × [0, height)` and converted to a relative delta against
    /// the tracked pointer position (seeded at the centre of the target
    /// dimensions on first use).  In Relative mode `(x, y)` already is the
    /// delta and passes through.
    ///
    /// `Click` and `ScrollDown` first position the pointer, let it settle,
    /// then emit the button or scroll frame; the settle wait blocks only
    /// this caller, not the link.
    pub async fn send_mouse(
        &self,
        width: i32,
        height: i32,
        x: i32,
        y: i32,
        action: MouseAction,
    ) -> Result<(), RelayError> {
        let (dx, dy) = {
            let mut state = self.state.lock().await;
            if !state.initialized {
                return Err(RelayError::NotInitialized);
            }
            match self.config.coordinate_mode {
                CoordinateMode::Relative => (clamp_delta(x), clamp_delta(y)),
                CoordinateMode::Screen => {
                    let target = (
                        x.clamp(0, width.max(1) - 1),
                        y.clamp(0, height.max(1) - 1),
                    );
                    let current = state.pointer.unwrap_or((width / 2, height / 2));
                    state.pointer = Some(target);
                    (
                        clamp_delta(target.0 - current.0),
                        clamp_delta(target.1 - current.1),
                    )
                }
            }
        };

        self.sink
            .write_command(Command::MouseMove { dx, dy })
            .await?;
        match action {
            MouseAction::Move => {}
            MouseAction::Click => {
                tokio::time::sleep(self.config.click_settle).await;
                self.sink.write_command(Command::MouseClick).await?;
            }
            MouseAction::ScrollDown => {
                tokio::time::sleep(self.config.click_settle).await;
                self.sink
                    .write_command(Command::MouseScroll {
                        delta: self.config.scroll_delta,
                    })
                    .await?;
            }
        }
        Ok(())
    }

    /// Best-effort release of every key in the symbolic set.
    ///
    /// Used at shutdown so an interrupted session cannot leave the device
    /// holding keys.  Write failures are logged and ignored — the link may
    /// already be gone.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        for handle in state.timed_holds.values() {
            handle.abort();
        }
        state.timed_holds.clear();
        for key in hidlink_core::keymap::ALL_KEYS {
            let command = Command::KeyUp {
                key: key.wire_code(),
            };
            if let Err(err) = self.sink.write_command(command).await {
                warn!("reset: failed to release {key:?}: {err}");
                return;
            }
        }
    }
}

/// Saturates an i32 pixel delta into the wire's signed 16-bit range.
fn clamp_delta(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Longest hold a single `send_key` request may schedule.
const MAX_HOLD: Duration = Duration::from_secs(60);

/// Converts the caller-supplied hold request to a timer value.
///
/// `None` means no hold — emit a single pulse.  The field arrives as an
/// arbitrary float from the request surface, so it must be sanitized before
/// a `Duration` is built from it: non-finite values carry no usable duration
/// and degrade to a pulse, finite ones are rounded up to whole milliseconds
/// and capped at [`MAX_HOLD`].  A `KeyDown` may only be written once this
/// has produced a value, otherwise a conversion failure would leave the key
/// held with no release scheduled.
fn hold_duration(down_ms: f32) -> Option<Duration> {
    if !down_ms.is_finite() || down_ms <= 0.0 {
        return None;
    }
    // The float-to-integer cast saturates, so oversized requests land on
    // the cap rather than overflowing.
    let ms = (down_ms.ceil() as u64).clamp(1, MAX_HOLD.as_millis() as u64);
    Some(Duration::from_millis(ms))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
