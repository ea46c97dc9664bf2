use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::checksum;
use crate::command::Command;
use crate::error::{FrameError, PayloadError, Result};

/// First byte of every frame (protocol id).
pub const START_MARKER: u8 = 0x00;

/// Frame header: marker (1) + length (1) + command (2) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// Trailing checksum byte.
pub const CHECKSUM_SIZE: usize = 1;

/// Smallest valid frame: header + checksum with an empty payload.
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Largest payload the one-byte length field can describe.
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize - 3;

/// Largest complete frame on the wire.
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE + CHECKSUM_SIZE;

/// Payload size contract of a frame type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadLength {
    /// The payload is always exactly this many bytes.
    Fixed(usize),
    /// The payload size depends on its contents; the parser bounds-checks it.
    Variable,
}

impl fmt::Display for PayloadLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadLength::Fixed(len) => write!(f, "{len}"),
            PayloadLength::Variable => f.write_str("variable"),
        }
    }
}

/// A concrete frame type: one command id and its payload layout.
pub trait FramePayload: Sized + fmt::Display {
    /// The command id this type is sent and received under.
    const COMMAND: Command;

    /// Size contract checked on both encode and decode.
    const PAYLOAD_LENGTH: PayloadLength;

    /// Append the payload bytes to `dst`.
    fn serialize_payload(&self, dst: &mut BytesMut) -> std::result::Result<(), PayloadError>;

    /// Build the frame from its payload bytes.
    fn parse_payload(payload: &[u8]) -> std::result::Result<Self, PayloadError>;
}

/// Check a payload against a length contract.
pub fn validate_payload_length(
    command: Command,
    payload: &[u8],
    expected: PayloadLength,
) -> Result<()> {
    match expected {
        PayloadLength::Fixed(len) if payload.len() != len => Err(FrameError::InvalidPayloadLength {
            command,
            expected: len,
            actual: payload.len(),
        }),
        _ => Ok(()),
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────┬───────────┬──────────────┬──────────┐
/// │ Marker   │ Length   │ Command   │ Payload      │ Checksum │
/// │ 0x00     │ (1B)     │ (2B BE)   │ (Length - 3) │ (1B XOR) │
/// └──────────┴──────────┴───────────┴──────────────┴──────────┘
/// ```
///
/// Length counts the command, payload and checksum. On error `dst` is left
/// untouched.
pub fn encode_frame<P: FramePayload>(frame: &P, dst: &mut BytesMut) -> Result<()> {
    let mut payload = BytesMut::new();
    frame
        .serialize_payload(&mut payload)
        .map_err(|source| FrameError::InvalidPayload {
            command: P::COMMAND,
            source,
        })?;
    validate_payload_length(P::COMMAND, &payload, P::PAYLOAD_LENGTH)?;
    put_frame(P::COMMAND.id(), &payload, dst)
}

/// Assemble header, payload and checksum around an already serialized payload.
pub fn put_frame(command: u16, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let start = dst.len();
    dst.reserve(HEADER_SIZE + payload.len() + CHECKSUM_SIZE);
    dst.put_u8(START_MARKER);
    // Bounded by MAX_PAYLOAD_SIZE above.
    dst.put_u8((2 + payload.len() + 1) as u8);
    dst.put_u16(command);
    dst.put_slice(payload);
    let crc = checksum(&dst[start..]);
    dst.put_u8(crc);
    Ok(())
}

/// A structurally valid frame whose payload has not been interpreted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// The command id from the header.
    pub command: u16,
    /// The payload between header and checksum.
    pub payload: Bytes,
}

impl RawFrame {
    /// Create a raw frame.
    pub fn new(command: u16, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + payload + checksum).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len() + CHECKSUM_SIZE
    }

    /// Encode this frame, computing a fresh checksum.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_frame(self.command, &self.payload, dst)
    }
}

/// Validate the envelope of a complete frame and split off its payload.
///
/// Checks, in order: minimum size, declared length, checksum. The command id
/// is returned uninterpreted.
pub fn split_frame(raw: &[u8]) -> Result<RawFrame> {
    if raw.len() < MIN_FRAME_SIZE {
        return Err(FrameError::Truncated { len: raw.len() });
    }

    let declared = usize::from(raw[1]);
    if declared != raw.len() - 2 {
        return Err(FrameError::LengthMismatch {
            declared,
            actual: raw.len() - 2,
        });
    }

    let (body, trailer) = raw.split_at(raw.len() - CHECKSUM_SIZE);
    let expected = checksum(body);
    if expected != trailer[0] {
        return Err(FrameError::ChecksumMismatch {
            expected,
            actual: trailer[0],
        });
    }

    let command = u16::from_be_bytes([raw[2], raw[3]]);
    Ok(RawFrame::new(
        command,
        Bytes::copy_from_slice(&body[HEADER_SIZE..]),
    ))
}

/// Largest stuffed packet a frame can turn into (every byte escaped).
pub const DEFAULT_MAX_PACKET_SIZE: usize = 2 * MAX_FRAME_SIZE;

/// Configuration for the stream adapters.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum SLIP packet size in bytes, before unstuffing. Default: 514.
    pub max_packet_size: usize,
    /// Drop frames with an unregistered command id instead of failing.
    pub skip_unknown_commands: bool,
    /// Log every frame read or written at debug level.
    pub log_frames: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            skip_unknown_commands: false,
            log_frames: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_frame_layout() {
        let mut buf = BytesMut::new();
        put_frame(0x0301, &[0x03, 0xe8, 0x01], &mut buf).unwrap();
        assert_eq!(
            buf.as_ref(),
            &[0x00, 0x06, 0x03, 0x01, 0x03, 0xe8, 0x01, 0xee]
        );
    }

    #[test]
    fn put_frame_appends_after_existing_bytes() {
        let mut buf = BytesMut::from(&[0xAA, 0xBB][..]);
        put_frame(0x0008, &[], &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0xAA, 0xBB, 0x00, 0x03, 0x00, 0x08, 0x0b]);
    }

    #[test]
    fn put_frame_rejects_oversized_payload() {
        let mut buf = BytesMut::new();
        let payload = vec![0u8; MAX_PAYLOAD_SIZE + 1];
        let err = put_frame(0x040E, &payload, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            FrameError::PayloadTooLarge { size: 253, max: 252 }
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn largest_payload_fits_length_byte() {
        let mut buf = BytesMut::new();
        put_frame(0x040E, &vec![0u8; MAX_PAYLOAD_SIZE], &mut buf).unwrap();
        assert_eq!(buf.len(), MAX_FRAME_SIZE);
        assert_eq!(buf[1], 0xff);
        assert!(split_frame(&buf).is_ok());
    }

    #[test]
    fn split_frame_returns_command_and_payload() {
        let raw = [0x00, 0x06, 0x03, 0x01, 0x03, 0xe8, 0x00, 0xef];
        let frame = split_frame(&raw).unwrap();
        assert_eq!(frame.command, 0x0301);
        assert_eq!(frame.payload.as_ref(), &[0x03, 0xe8, 0x00]);
        assert_eq!(frame.wire_size(), raw.len());
    }

    #[test]
    fn split_frame_truncated() {
        for len in 0..MIN_FRAME_SIZE {
            let raw = vec![0u8; len];
            assert!(matches!(
                split_frame(&raw),
                Err(FrameError::Truncated { len: l }) if l == len
            ));
        }
    }

    #[test]
    fn split_frame_length_mismatch() {
        let raw = [0x00, 0x07, 0x03, 0x01, 0x03, 0xe8, 0x00, 0xee];
        assert!(matches!(
            split_frame(&raw),
            Err(FrameError::LengthMismatch {
                declared: 7,
                actual: 6
            })
        ));
    }

    #[test]
    fn split_frame_checksum_mismatch() {
        let raw = [0x00, 0x06, 0x03, 0x01, 0x03, 0xe8, 0x00, 0xee];
        assert!(matches!(
            split_frame(&raw),
            Err(FrameError::ChecksumMismatch {
                expected: 0xef,
                actual: 0xee
            })
        ));
    }

    #[test]
    fn raw_frame_encode_round_trip() {
        let frame = RawFrame::new(0x3001, vec![0x00]);
        let mut buf = BytesMut::new();
        frame.encode(&mut buf).unwrap();
        assert_eq!(split_frame(&buf).unwrap(), frame);
    }

    #[test]
    fn validate_payload_length_variants() {
        assert!(validate_payload_length(
            Command::CommandSendCfm,
            &[1, 2, 3],
            PayloadLength::Fixed(3)
        )
        .is_ok());
        assert!(
            validate_payload_length(Command::GetSceneListNtf, &[1], PayloadLength::Variable)
                .is_ok()
        );
        assert!(matches!(
            validate_payload_length(Command::CommandSendCfm, &[1, 2], PayloadLength::Fixed(3)),
            Err(FrameError::InvalidPayloadLength {
                command: Command::CommandSendCfm,
                expected: 3,
                actual: 2
            })
        ));
    }
}
