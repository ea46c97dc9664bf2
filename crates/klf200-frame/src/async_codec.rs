//! `tokio_util::codec` adapter for SLIP framed gateway streams.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{FrameConfig, MAX_FRAME_SIZE};
use crate::error::FrameError;
use crate::frames::Frame;
use crate::reader::next_frame;
use crate::slip;

/// Decodes and encodes [`Frame`]s for use with `Framed`, `FramedRead` and
/// `FramedWrite`.
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    config: FrameConfig,
    scratch: BytesMut,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            config,
            scratch: BytesMut::with_capacity(MAX_FRAME_SIZE),
        }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        next_frame(src, &self.config)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.iter().all(|&b| b == slip::END) => {
                src.clear();
                Ok(None)
            }
            None => Err(FrameError::ConnectionClosed),
        }
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        Encoder::<&Frame>::encode(self, &frame, dst)
    }
}

impl Encoder<&Frame> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: &Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        self.scratch.clear();
        frame.encode(&mut self.scratch)?;
        if self.config.log_frames {
            tracing::debug!(%frame, "sending frame");
        }
        slip::encode(&self.scratch, dst);
        Ok(())
    }
}
