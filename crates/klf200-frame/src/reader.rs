use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::FrameConfig;
use crate::error::{FrameError, Result};
use crate::frames::Frame;
use crate::registry::decode_frame;
use crate::slip;

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 1024;

/// Pull the next SLIP packet out of `src` and decode it as a frame.
///
/// `Ok(None)` means `src` needs more bytes. A bad packet is consumed before
/// its error is returned.
pub(crate) fn next_frame(src: &mut BytesMut, config: &FrameConfig) -> Result<Option<Frame>> {
    loop {
        let Some(packet) = slip::decode_packet(src, config.max_packet_size)? else {
            return Ok(None);
        };
        match decode_frame(&packet) {
            Ok(frame) => {
                if config.log_frames {
                    tracing::debug!(%frame, "received frame");
                }
                return Ok(Some(frame));
            }
            Err(FrameError::UnknownCommand(command)) if config.skip_unknown_commands => {
                tracing::warn!(
                    command = format_args!("0x{command:04x}"),
                    "skipping frame with unknown command"
                );
            }
            Err(err) => return Err(err),
        }
    }
}

/// Reads complete frames from a SLIP framed `Read` stream.
///
/// Handles partial reads internally; callers always get complete frames.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached. After
    /// a decode error the reader stays usable and continues with the next
    /// packet.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = next_frame(&mut self.buf, &self.config)? {
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// True when the buffer holds the start of a packet whose closing END
    /// has not arrived yet.
    pub fn has_partial_packet(&self) -> bool {
        self.buf.iter().any(|&b| b != slip::END)
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

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Frame>;

    /// Yields frames until the stream closes. A packet cut off by EOF is
    /// reported once as `ConnectionClosed`.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_frame() {
            Err(FrameError::ConnectionClosed) if !self.has_partial_packet() => None,
            Err(FrameError::ConnectionClosed) => {
                self.buf.clear();
                Some(Err(FrameError::ConnectionClosed))
            }
            other => Some(other),
        }
    }
}
