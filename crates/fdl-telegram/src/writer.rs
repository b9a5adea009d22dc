use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_into, Frame};
use crate::error::{Result, TelegramError};

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Writes complete telegrams to any `Write` byte stream.
pub struct TelegramWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> TelegramWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Write a complete telegram (blocking) and flush.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.buf.clear();
        encode_into(frame, &mut self.buf);
        tracing::trace!(kind = frame.kind_name(), size = self.buf.len(), "telegram sent");
        self.write_buffered()?;
        self.flush()
    }

    /// Write several telegrams back to back with a single flush.
    pub fn write_all_frames<'a>(
        &mut self,
        frames: impl IntoIterator<Item = &'a Frame>,
    ) -> Result<()> {
        self.buf.clear();
        for frame in frames {
            encode_into(frame, &mut self.buf);
        }
        self.write_buffered()?;
        self.flush()
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(TelegramError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TelegramError::Io(err)),
            }
        }
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TelegramError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
