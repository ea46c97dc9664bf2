use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, FrameConfig, FramePayload, MAX_FRAME_SIZE};
use crate::error::{FrameError, Result};
use crate::frames::Frame;
use crate::slip;

/// Writes SLIP framed frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    frame: BytesMut,
    packet: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            frame: BytesMut::with_capacity(MAX_FRAME_SIZE),
            packet: BytesMut::with_capacity(2 * MAX_FRAME_SIZE + 2),
            config,
        }
    }

    /// Write a complete frame (blocking) and flush.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.frame.clear();
        frame.encode(&mut self.frame)?;
        if self.config.log_frames {
            tracing::debug!(%frame, "sending frame");
        }
        self.write_encoded()
    }

    /// Write a concrete frame type without wrapping it in [`Frame`].
    pub fn send<P: FramePayload>(&mut self, frame: &P) -> Result<()> {
        self.frame.clear();
        encode_frame(frame, &mut self.frame)?;
        if self.config.log_frames {
            tracing::debug!(%frame, "sending frame");
        }
        self.write_encoded()
    }

    fn write_encoded(&mut self) -> Result<()> {
        self.packet.clear();
        slip::encode(&self.frame, &mut self.packet);

        let mut offset = 0usize;
        while offset < self.packet.len() {
            match self.inner.write(&self.packet[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
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

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
