//! Serial command link.
//!
//! The wire format has no frame delimiters, so a torn write desynchronises
//! the device until its argument timeout fires.  [`SerialLink`] therefore
//! serialises all writers behind one async mutex and writes each frame with
//! a single `write_all` call, making every frame atomic with respect to
//! concurrent requests.

use std::sync::Arc;

use async_trait::async_trait;
use hidlink_core::Command;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_serial::SerialPortBuilderExt;
use tracing::trace;

use crate::application::CommandSink;

/// Single-writer command link over any async byte sink.
///
/// Cloning is cheap and shares the underlying writer.
pub struct SerialLink<W> {
    writer: Arc<Mutex<W>>,
}

impl<W> Clone for SerialLink<W> {
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
        }
    }
}

impl SerialLink<tokio_serial::SerialStream> {
    /// Opens the serial device at `path` with the given baud rate.
    pub fn open(path: &str, baud: u32) -> tokio_serial::Result<Self> {
        let stream = tokio_serial::new(path, baud).open_native_async()?;
        Ok(Self::from_writer(stream))
    }
}

impl<W: AsyncWrite + Unpin + Send + 'static> SerialLink<W> {
    /// Wraps an already-open writer.  Used by tests with in-memory pipes.
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
        }
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send + 'static> CommandSink for SerialLink<W> {
    async fn write_command(&self, command: Command) -> std::io::Result<()> {
        let frame = command.encode();
        let mut writer = self.writer.lock().await;
        writer.write_all(&frame).await?;
        writer.flush().await?;
        trace!(opcode = frame[0], len = frame.len(), "frame written");
        Ok(())
    }
}
