//! Command id to frame type lookup and the top-level frame decoder.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::codec::{split_frame, validate_payload_length, FramePayload, PayloadLength};
use crate::command::Command;
use crate::error::{FrameError, PayloadError, Result};
use crate::frames::{registrations, Frame};

type DecodeFn = fn(&[u8]) -> std::result::Result<Frame, PayloadError>;

/// How to decode one command id.
#[derive(Clone, Copy)]
pub struct Registration {
    pub command: Command,
    pub length: PayloadLength,
    decode: DecodeFn,
}

impl Registration {
    pub(crate) fn of<P>() -> Self
    where
        P: FramePayload + Into<Frame>,
    {
        Self {
            command: P::COMMAND,
            length: P::PAYLOAD_LENGTH,
            decode: |payload| P::parse_payload(payload).map(Into::into),
        }
    }

    /// Length check then parse, for a payload already split from its envelope.
    pub fn decode_payload(&self, payload: &[u8]) -> Result<Frame> {
        validate_payload_length(self.command, payload, self.length)?;
        (self.decode)(payload).map_err(|source| FrameError::InvalidPayload {
            command: self.command,
            source,
        })
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("command", &self.command)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Process-wide table of every known frame type, keyed by command id.
///
/// Built once on first use and read-only afterwards.
#[derive(Debug)]
pub struct FrameRegistry {
    entries: HashMap<u16, Registration>,
}

impl FrameRegistry {
    /// The shared registry.
    pub fn global() -> &'static FrameRegistry {
        static REGISTRY: OnceLock<FrameRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut entries = HashMap::new();
            for registration in registrations() {
                let previous = entries.insert(registration.command.id(), registration);
                debug_assert!(
                    previous.is_none(),
                    "duplicate registration for {}",
                    registration.command
                );
            }
            FrameRegistry { entries }
        })
    }

    /// Look up a command id.
    pub fn get(&self, command: u16) -> Option<&Registration> {
        self.entries.get(&command)
    }

    /// Registered commands in ascending id order.
    pub fn commands(&self) -> Vec<Command> {
        let mut commands: Vec<Command> = self.entries.values().map(|r| r.command).collect();
        commands.sort_unstable();
        commands
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode a complete frame.
    pub fn decode(&self, raw: &[u8]) -> Result<Frame> {
        let envelope = split_frame(raw)?;
        let registration = self
            .get(envelope.command)
            .ok_or(FrameError::UnknownCommand(envelope.command))?;
        let frame = registration.decode_payload(&envelope.payload)?;
        tracing::trace!(command = %registration.command, len = raw.len(), "decoded frame");
        Ok(frame)
    }
}

/// Decode a complete frame (without SLIP framing) into its concrete type.
///
/// Checks, in order: minimum size, declared length, checksum, known command,
/// fixed payload length, payload contents. The first failure is returned.
pub fn decode_frame(raw: &[u8]) -> Result<Frame> {
    FrameRegistry::global().decode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{put_frame, MIN_FRAME_SIZE};
    use crate::frames::{
        CommandSendConfirmation, CommandSendConfirmationStatus, CommandSendRequest,
        GetVersionRequest,
    };
    use crate::Parameter;

    fn command_send_cfm() -> Vec<u8> {
        vec![0x00, 0x06, 0x03, 0x01, 0x03, 0xe8, 0x01, 0xee]
    }

    #[test]
    fn decodes_command_send_confirmation() {
        let frame = decode_frame(&command_send_cfm()).unwrap();
        assert_eq!(
            frame,
            Frame::CommandSendConfirmation(CommandSendConfirmation {
                session_id: 1000,
                status: CommandSendConfirmationStatus::Accepted,
            })
        );
    }

    #[test]
    fn every_command_registered_once() {
        let registry = FrameRegistry::global();
        assert_eq!(registry.len(), Command::ALL.len());
        assert_eq!(registry.commands(), Command::ALL.to_vec());
        for command in Command::ALL {
            let registration = registry.get(command.id()).unwrap();
            assert_eq!(registration.command, *command);
        }
        assert_eq!(registrations().len(), Command::ALL.len());
    }

    #[test]
    fn commands_are_sorted() {
        let commands = FrameRegistry::global().commands();
        assert!(commands.windows(2).all(|w| w[0].id() < w[1].id()));
    }

    #[test]
    fn short_input_is_truncated() {
        let raw = command_send_cfm();
        for len in 0..MIN_FRAME_SIZE {
            let err = decode_frame(&raw[..len]).unwrap_err();
            assert!(matches!(err, FrameError::Truncated { len: l } if l == len));
        }
    }

    #[test]
    fn length_byte_must_match() {
        let mut raw = command_send_cfm();
        raw.push(0x00);
        let err = decode_frame(&raw).unwrap_err();
        assert!(matches!(
            err,
            FrameError::LengthMismatch {
                declared: 6,
                actual: 7
            }
        ));
    }

    #[test]
    fn single_bit_flips_are_detected() {
        let raw = command_send_cfm();
        for index in 0..raw.len() {
            for bit in 0..8 {
                let mut corrupted = raw.clone();
                corrupted[index] ^= 1 << bit;
                let err = decode_frame(&corrupted).unwrap_err();
                if index == 1 {
                    assert!(
                        matches!(err, FrameError::LengthMismatch { .. }),
                        "byte {index} bit {bit}: {err:?}"
                    );
                } else {
                    assert!(
                        matches!(err, FrameError::ChecksumMismatch { .. }),
                        "byte {index} bit {bit}: {err:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn unknown_command_after_valid_envelope() {
        let mut raw = bytes::BytesMut::new();
        put_frame(0x7777, &[0x01], &mut raw).unwrap();
        let err = decode_frame(&raw).unwrap_err();
        assert!(matches!(err, FrameError::UnknownCommand(0x7777)));
    }

    #[test]
    fn fixed_length_checked_on_decode() {
        let mut raw = bytes::BytesMut::new();
        put_frame(Command::CommandSendCfm.id(), &[0x03, 0xe8], &mut raw).unwrap();
        let err = decode_frame(&raw).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidPayloadLength {
                command: Command::CommandSendCfm,
                expected: 3,
                actual: 2
            }
        ));

        let mut raw = bytes::BytesMut::new();
        put_frame(Command::GetVersionReq.id(), &[0x00], &mut raw).unwrap();
        assert!(matches!(
            decode_frame(&raw).unwrap_err(),
            FrameError::InvalidPayloadLength { expected: 0, actual: 1, .. }
        ));
    }

    #[test]
    fn invalid_payload_reports_command() {
        let mut raw = bytes::BytesMut::new();
        put_frame(Command::CommandSendCfm.id(), &[0x03, 0xe8, 0x09], &mut raw).unwrap();
        let err = decode_frame(&raw).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidPayload {
                command: Command::CommandSendCfm,
                source: PayloadError::InvalidEnumValue { field: "status", value: 9 }
            }
        ));
    }

    #[test]
    fn encode_decode_through_frame_enum() {
        let request = CommandSendRequest::new(7, vec![1, 2], Parameter::from_percent(30));
        let bytes = Frame::from(request.clone()).to_bytes().unwrap();
        assert_eq!(decode_frame(&bytes).unwrap(), Frame::CommandSendRequest(request));

        let bytes = Frame::from(GetVersionRequest).to_bytes().unwrap();
        assert_eq!(decode_frame(&bytes).unwrap(), Frame::GetVersionRequest(GetVersionRequest));
    }
}
