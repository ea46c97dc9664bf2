//! Gateway authentication.
//!
//! The `Display` impls never print password material.

use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::codec::{FramePayload, PayloadLength};
use crate::command::Command;
use crate::error::PayloadError;
use crate::fields::{put_padded_string, PayloadReader, PASSWORD_LEN};

byte_enum! {
    pub enum PasswordConfirmationStatus {
        Successful = 0 => "successful",
        Failed = 1 => "failed",
    }
}

/// GW_PASSWORD_ENTER_REQ: first frame on a fresh connection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PasswordEnterRequest {
    pub password: String,
}

impl PasswordEnterRequest {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

impl FramePayload for PasswordEnterRequest {
    const COMMAND: Command = Command::PasswordEnterReq;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(PASSWORD_LEN);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        put_padded_string(dst, "password", &self.password, PASSWORD_LEN)
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            password: reader.string("password", PASSWORD_LEN)?,
        })
    }
}

impl fmt::Display for PasswordEnterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<PasswordEnterRequest password=\"****\"/>")
    }
}

/// GW_PASSWORD_ENTER_CFM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PasswordEnterConfirmation {
    pub status: PasswordConfirmationStatus,
}

impl FramePayload for PasswordEnterConfirmation {
    const COMMAND: Command = Command::PasswordEnterCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(1);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.status.into());
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            status: reader.enumeration("status")?,
        })
    }
}

impl fmt::Display for PasswordEnterConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<PasswordEnterConfirmation status=\"{}\"/>", self.status)
    }
}

/// GW_PASSWORD_CHANGE_REQ
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

impl FramePayload for PasswordChangeRequest {
    const COMMAND: Command = Command::PasswordChangeReq;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(2 * PASSWORD_LEN);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        put_padded_string(dst, "current_password", &self.current_password, PASSWORD_LEN)?;
        put_padded_string(dst, "new_password", &self.new_password, PASSWORD_LEN)
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            current_password: reader.string("current_password", PASSWORD_LEN)?,
            new_password: reader.string("new_password", PASSWORD_LEN)?,
        })
    }
}

impl fmt::Display for PasswordChangeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<PasswordChangeRequest current_password=\"****\" new_password=\"****\"/>")
    }
}

/// GW_PASSWORD_CHANGE_CFM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PasswordChangeConfirmation {
    pub status: PasswordConfirmationStatus,
}

impl FramePayload for PasswordChangeConfirmation {
    const COMMAND: Command = Command::PasswordChangeCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(1);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.status.into());
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            status: reader.enumeration("status")?,
        })
    }
}

impl fmt::Display for PasswordChangeConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<PasswordChangeConfirmation status=\"{}\"/>", self.status)
    }
}

/// GW_PASSWORD_CHANGE_NTF: broadcast to other clients after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PasswordChangeNotification {
    pub new_password: String,
}

impl FramePayload for PasswordChangeNotification {
    const COMMAND: Command = Command::PasswordChangeNtf;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(PASSWORD_LEN);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        put_padded_string(dst, "new_password", &self.new_password, PASSWORD_LEN)
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            new_password: reader.string("new_password", PASSWORD_LEN)?,
        })
    }
}

impl fmt::Display for PasswordChangeNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<PasswordChangeNotification new_password=\"****\"/>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_frame;
    use crate::error::FrameError;
    use crate::frames::test_util::round_trip;
    use crate::frames::Frame;

    #[test]
    fn enter_request_pads_to_32_bytes() {
        let (bytes, decoded) = round_trip(PasswordEnterRequest::new("velux123"));
        assert_eq!(bytes.len(), 4 + PASSWORD_LEN + 1);
        assert_eq!(&bytes[2..4], &[0x30, 0x00]);
        assert_eq!(&bytes[4..12], b"velux123");
        assert!(bytes[12..4 + PASSWORD_LEN].iter().all(|&b| b == 0));
        assert_eq!(decoded, Frame::PasswordEnterRequest(PasswordEnterRequest::new("velux123")));
    }

    #[test]
    fn enter_request_rejects_long_password() {
        let err = encode_frame(&PasswordEnterRequest::new("x".repeat(33)), &mut BytesMut::new())
            .unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidPayload {
                command: Command::PasswordEnterReq,
                source: PayloadError::StringTooLong { field: "password", len: 33, max: 32 }
            }
        ));
    }

    #[test]
    fn display_masks_passwords() {
        let text = PasswordEnterRequest::new("secret").to_string();
        assert!(!text.contains("secret"));

        let change = PasswordChangeRequest {
            current_password: "old-secret".to_string(),
            new_password: "new-secret".to_string(),
        };
        assert!(!change.to_string().contains("secret"));
        assert!(!PasswordChangeNotification {
            new_password: "new-secret".to_string()
        }
        .to_string()
        .contains("secret"));
    }

    #[test]
    fn change_request_places_both_passwords() {
        let req = PasswordChangeRequest {
            current_password: "old".to_string(),
            new_password: "new".to_string(),
        };
        let (bytes, decoded) = round_trip(req.clone());
        assert_eq!(&bytes[4..7], b"old");
        assert_eq!(&bytes[4 + PASSWORD_LEN..4 + PASSWORD_LEN + 3], b"new");
        assert_eq!(decoded, Frame::PasswordChangeRequest(req));
    }

    #[test]
    fn confirmation_status() {
        let (bytes, decoded) = round_trip(PasswordEnterConfirmation {
            status: PasswordConfirmationStatus::Failed,
        });
        assert_eq!(bytes, vec![0x00, 0x04, 0x30, 0x01, 0x01, 0x34]);
        assert_eq!(
            decoded.to_string(),
            "<PasswordEnterConfirmation status=\"failed\"/>"
        );

        let err = PasswordChangeConfirmation::parse_payload(&[2]).unwrap_err();
        assert_eq!(
            err,
            PayloadError::InvalidEnumValue {
                field: "status",
                value: 2
            }
        );
    }
}
