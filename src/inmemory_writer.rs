// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Writer
//!
//! A sink that keeps formatted output in memory instead of writing it anywhere.
//! It is meant for tests and for programmatically examining what a formatter
//! produced.
//!
//! `InMemoryWriter` implements [`MakeWriter`], so it plugs into any `fmt` layer.
//! Clones share one buffer: keep a clone, hand the other to the layer, and
//! drain the clone afterwards.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

/// A shared in-memory byte buffer usable as a `tracing_subscriber` writer.
///
/// # Example
///
/// ```rust
/// use indentwise::{IndentConfig, InMemoryWriter};
///
/// let writer = InMemoryWriter::new();
/// let layer = indentwise::layer(&IndentConfig::new().with_date_format(""), writer.clone()).unwrap();
/// let subscriber = tracing_subscriber::layer::SubscriberExt::with(tracing_subscriber::registry(), layer);
///
/// tracing::subscriber::with_default(subscriber, || {
///     tracing::info!(indent = 1, "Test message {}", 42);
/// });
///
/// assert_eq!(writer.drain_logs(), "INFO     -     Test message 42\n");
/// // the buffer is now empty
/// assert_eq!(writer.drain_logs(), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Clone: shares the buffer, which is what MakeWriter needs
// - Default: empty buffer
// - PartialEq/Eq/Hash: NOT implemented, comparing buffers behind a mutex has
//   no clear meaning
// - Send/Sync: automatic through Arc<Mutex<_>>

impl InMemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while a test holds the lock must not hide the output.
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns everything written so far and clears the buffer.
    ///
    /// Invalid UTF-8 is replaced rather than reported.
    pub fn drain_logs(&self) -> String {
        let bytes = std::mem::take(&mut *self.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Like [`drain_logs`](Self::drain_logs), split into lines without their
    /// terminators.
    pub fn drain_lines(&self) -> Vec<String> {
        self.drain_logs().lines().map(str::to_string).collect()
    }
}

/// The per-event handle returned by [`InMemoryWriter::make_writer`].
#[derive(Debug)]
pub struct InMemoryHandle {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for InMemoryHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for InMemoryWriter {
    type Writer = InMemoryHandle;

    fn make_writer(&'a self) -> Self::Writer {
        InMemoryHandle {
            buffer: Arc::clone(&self.buffer),
        }
    }
}
