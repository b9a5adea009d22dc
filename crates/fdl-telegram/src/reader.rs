use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::codec::{decode_telegram, skip_to_start_delimiter, Frame, TelegramConfig};
use crate::error::{Result, TelegramError};

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 256;

/// Reads complete telegrams from any `Read` byte stream.
///
/// Handles partial reads internally; callers always get complete telegrams.
pub struct TelegramReader<T> {
    inner: T,
    buf: BytesMut,
    config: TelegramConfig,
    halted: bool,
}

impl<T: Read> TelegramReader<T> {
    /// Create a new telegram reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, TelegramConfig::default())
    }

    /// Create a new telegram reader with explicit configuration.
    pub fn with_config(inner: T, config: TelegramConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            halted: false,
        }
    }

    /// Read the next complete telegram (blocking).
    ///
    /// A telegram that fails validation is consumed and its error returned;
    /// the next call continues after it. Without `resync_on_garbage`, a head
    /// that cannot start a telegram is left in place and every further call
    /// fails the same way. Returns `Err(TelegramError::ConnectionClosed)`
    /// when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if self.config.resync_on_garbage {
                let skipped = skip_to_start_delimiter(&mut self.buf);
                if skipped > 0 {
                    tracing::warn!(skipped, "discarded bytes before start delimiter");
                }
            }

            match decode_telegram(&mut self.buf) {
                Ok(Some(frame)) => {
                    tracing::trace!(
                        kind = frame.kind_name(),
                        size = frame.wire_size(),
                        "telegram received"
                    );
                    return Ok(frame);
                }
                Ok(None) => {}
                Err(err) if self.config.resync_on_garbage && err.is_framing_loss() => {
                    tracing::warn!(error = %err, "dropping false start delimiter");
                    self.buf.advance(1);
                    continue;
                }
                Err(err) => return Err(err),
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TelegramError::Io(err)),
            };

            if read == 0 {
                tracing::debug!(pending = self.buf.len(), "stream closed");
                return Err(TelegramError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Bytes received but not yet part of a complete telegram.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current telegram reader configuration.
    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }
}

impl<T: Read> Iterator for TelegramReader<T> {
    type Item = Result<Frame>;

    /// Yields telegrams until the stream closes or loses framing.
    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        match self.read_frame() {
            Err(TelegramError::ConnectionClosed) => None,
            Err(err) if err.is_framing_loss() => {
                self.halted = true;
                Some(Err(err))
            }
            other => Some(other),
        }
    }
}
