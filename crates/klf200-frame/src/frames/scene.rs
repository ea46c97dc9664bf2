//! Scene listing and activation.

use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::codec::{FramePayload, PayloadLength};
use crate::command::Command;
use crate::error::PayloadError;
use crate::fields::{put_padded_string, PayloadReader, NAME_LEN};
use crate::frames::command_send::{Originator, Priority};
use crate::frames::node::Velocity;

/// Size of one scene entry in GW_GET_SCENE_LIST_NTF.
pub const SCENE_ENTRY_LEN: usize = 1 + NAME_LEN;

/// Scene entries that fit into one notification.
pub const MAX_SCENES_PER_NOTIFICATION: usize = 3;

byte_enum! {
    pub enum ActivateSceneStatus {
        Accepted = 0 => "accepted",
        ErrorInvalidParameter = 1 => "error_invalid_parameter",
        ErrorRequestRejected = 2 => "error_request_rejected",
    }
}

/// A scene as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    pub scene_id: u8,
    pub name: String,
}

empty_frame!(GetSceneListRequest => GetSceneListReq);

/// GW_GET_SCENE_LIST_CFM: number of scenes about to be notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetSceneListConfirmation {
    pub count_scenes: u8,
}

impl FramePayload for GetSceneListConfirmation {
    const COMMAND: Command = Command::GetSceneListCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(1);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.count_scenes);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            count_scenes: reader.u8("count_scenes")?,
        })
    }
}

impl fmt::Display for GetSceneListConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<GetSceneListConfirmation count_scenes=\"{}\"/>",
            self.count_scenes
        )
    }
}

/// GW_GET_SCENE_LIST_NTF: a batch of scenes plus how many are still to come.
///
/// Layout: `count`, `count` entries of (scene id, 64 byte name), `remaining`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetSceneListNotification {
    pub scenes: Vec<Scene>,
    pub remaining_scenes: u8,
}

impl FramePayload for GetSceneListNotification {
    const COMMAND: Command = Command::GetSceneListNtf;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Variable;

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        if self.scenes.len() > MAX_SCENES_PER_NOTIFICATION {
            return Err(PayloadError::TooManyEntries {
                field: "scenes",
                count: self.scenes.len(),
                max: MAX_SCENES_PER_NOTIFICATION,
            });
        }
        dst.put_u8(self.scenes.len() as u8);
        for scene in &self.scenes {
            dst.put_u8(scene.scene_id);
            put_padded_string(dst, "name", &scene.name, NAME_LEN)?;
        }
        dst.put_u8(self.remaining_scenes);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        let count = usize::from(reader.u8("count_scenes")?);
        let expected = 2 + count * SCENE_ENTRY_LEN;
        if payload.len() != expected {
            return Err(PayloadError::InvalidLength {
                field: "scenes",
                expected,
                actual: payload.len(),
            });
        }
        let mut scenes = Vec::with_capacity(count);
        for _ in 0..count {
            scenes.push(Scene {
                scene_id: reader.u8("scene_id")?,
                name: reader.string("name", NAME_LEN)?,
            });
        }
        Ok(Self {
            scenes,
            remaining_scenes: reader.u8("remaining_scenes")?,
        })
    }
}

impl fmt::Display for GetSceneListNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<GetSceneListNotification scenes=\"")?;
        for (i, scene) in self.scenes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", scene.scene_id, scene.name)?;
        }
        write!(f, "\" remaining_scenes=\"{}\"/>", self.remaining_scenes)
    }
}

/// GW_ACTIVATE_SCENE_REQ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivateSceneRequest {
    pub session_id: u16,
    pub originator: Originator,
    pub priority: Priority,
    pub scene_id: u8,
    pub velocity: Velocity,
}

impl ActivateSceneRequest {
    /// Activate a scene as a user command at default velocity.
    pub fn new(session_id: u16, scene_id: u8) -> Self {
        Self {
            session_id,
            originator: Originator::User,
            priority: Priority::UserLevel2,
            scene_id,
            velocity: Velocity::Default,
        }
    }
}

impl FramePayload for ActivateSceneRequest {
    const COMMAND: Command = Command::ActivateSceneReq;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(6);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u16(self.session_id);
        dst.put_u8(self.originator.into());
        dst.put_u8(self.priority.into());
        dst.put_u8(self.scene_id);
        dst.put_u8(self.velocity.into());
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            session_id: reader.u16("session_id")?,
            originator: reader.enumeration("originator")?,
            priority: reader.enumeration("priority")?,
            scene_id: reader.u8("scene_id")?,
            velocity: reader.enumeration("velocity")?,
        })
    }
}

impl fmt::Display for ActivateSceneRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ActivateSceneRequest scene_id=\"{}\" session_id=\"{}\" originator=\"{}\" velocity=\"{}\"/>",
            self.scene_id, self.session_id, self.originator, self.velocity
        )
    }
}

/// GW_ACTIVATE_SCENE_CFM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivateSceneConfirmation {
    pub status: ActivateSceneStatus,
    pub session_id: u16,
}

impl FramePayload for ActivateSceneConfirmation {
    const COMMAND: Command = Command::ActivateSceneCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(3);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.status.into());
        dst.put_u16(self.session_id);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            status: reader.enumeration("status")?,
            session_id: reader.u16("session_id")?,
        })
    }
}

impl fmt::Display for ActivateSceneConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ActivateSceneConfirmation session_id=\"{}\" status=\"{}\"/>",
            self.session_id, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_frame;
    use crate::error::FrameError;
    use crate::frames::test_util::round_trip;
    use crate::frames::Frame;

    fn scene(scene_id: u8, name: &str) -> Scene {
        Scene {
            scene_id,
            name: name.to_string(),
        }
    }

    #[test]
    fn scene_list_notification_round_trip() {
        let ntf = GetSceneListNotification {
            scenes: vec![scene(0, "All windows closed"), scene(1, "Night")],
            remaining_scenes: 4,
        };
        let (bytes, decoded) = round_trip(ntf.clone());
        assert_eq!(bytes.len(), 4 + 2 + 2 * SCENE_ENTRY_LEN + 1);
        assert_eq!(bytes[4], 2);
        assert_eq!(bytes[5], 0);
        assert_eq!(&bytes[6..24], b"All windows closed");
        assert_eq!(bytes[4 + 1 + SCENE_ENTRY_LEN], 1);
        assert_eq!(bytes[bytes.len() - 2], 4);
        assert_eq!(decoded, Frame::GetSceneListNotification(ntf));
    }

    #[test]
    fn empty_scene_list() {
        let (bytes, decoded) = round_trip(GetSceneListNotification::default());
        assert_eq!(&bytes[4..6], &[0, 0]);
        assert_eq!(
            decoded.to_string(),
            "<GetSceneListNotification scenes=\"\" remaining_scenes=\"0\"/>"
        );
    }

    #[test]
    fn scene_list_count_must_match_length() {
        let mut payload = BytesMut::new();
        GetSceneListNotification {
            scenes: vec![scene(3, "Morning")],
            remaining_scenes: 0,
        }
        .serialize_payload(&mut payload)
        .unwrap();
        payload[0] = 2;
        let err = GetSceneListNotification::parse_payload(&payload).unwrap_err();
        assert_eq!(
            err,
            PayloadError::InvalidLength {
                field: "scenes",
                expected: 2 + 2 * SCENE_ENTRY_LEN,
                actual: 2 + SCENE_ENTRY_LEN,
            }
        );
    }

    #[test]
    fn scene_list_rejects_oversized_batch() {
        let ntf = GetSceneListNotification {
            scenes: (0..4).map(|id| scene(id, "s")).collect(),
            remaining_scenes: 0,
        };
        let err = encode_frame(&ntf, &mut BytesMut::new()).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidPayload {
                source: PayloadError::TooManyEntries { field: "scenes", count: 4, max: 3 },
                ..
            }
        ));
    }

    #[test]
    fn activate_scene_round_trip() {
        let req = ActivateSceneRequest::new(0x0102, 7);
        let (bytes, decoded) = round_trip(req);
        assert_eq!(&bytes[2..4], &[0x04, 0x12]);
        assert_eq!(&bytes[4..10], &[0x01, 0x02, 0x01, 0x03, 0x07, 0x00]);
        assert_eq!(decoded, Frame::ActivateSceneRequest(req));

        let (_, decoded) = round_trip(ActivateSceneConfirmation {
            status: ActivateSceneStatus::ErrorRequestRejected,
            session_id: 0x0102,
        });
        assert_eq!(
            decoded.to_string(),
            "<ActivateSceneConfirmation session_id=\"258\" status=\"error_request_rejected\"/>"
        );
    }
}
