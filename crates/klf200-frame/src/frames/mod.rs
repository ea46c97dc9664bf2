//! Concrete frame types and the closed [`Frame`] enum over all of them.

use std::fmt;

use bytes::{Bytes, BytesMut};

use crate::codec::{encode_frame, FramePayload, PayloadLength};
use crate::command::Command;
use crate::error::Result;
use crate::registry::Registration;

/// Declare a one-byte enumeration with `TryFrom<u8>`, `Into<u8>` and a
/// lowercase `Display`.
macro_rules! byte_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(value: u8) -> std::result::Result<Self, u8> {
                match value {
                    $($value => Ok($name::$variant),)+
                    other => Err(other),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $($name::$variant => $label,)+
                })
            }
        }
    };
}

/// Declare a frame type whose payload is empty.
macro_rules! empty_frame {
    ($(#[$meta:meta])* $name:ident => $command:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name;

        impl $crate::codec::FramePayload for $name {
            const COMMAND: $crate::command::Command = $crate::command::Command::$command;
            const PAYLOAD_LENGTH: $crate::codec::PayloadLength =
                $crate::codec::PayloadLength::Fixed(0);

            fn serialize_payload(
                &self,
                _dst: &mut bytes::BytesMut,
            ) -> std::result::Result<(), $crate::error::PayloadError> {
                Ok(())
            }

            fn parse_payload(
                _payload: &[u8],
            ) -> std::result::Result<Self, $crate::error::PayloadError> {
                Ok($name)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(concat!("<", stringify!($name), "/>"))
            }
        }
    };
}

pub mod command_send;
pub mod discovery;
pub mod gateway;
pub mod house_status;
pub mod node;
pub mod password;
pub mod scene;

pub use command_send::{
    CommandRemainingTimeNotification, CommandRunStatusNotification, CommandSendConfirmation,
    CommandSendConfirmationStatus, CommandSendRequest, Originator, Priority, RunStatus,
    SessionFinishedNotification,
};
pub use discovery::{
    DiscoverNodesConfirmation, DiscoverNodesNotification, DiscoverNodesRequest, DiscoverStatus,
};
pub use gateway::{
    ErrorNotification, ErrorType, GatewayState, GatewaySubState, GetNetworkSetupConfirmation,
    GetNetworkSetupRequest, GetProtocolVersionConfirmation, GetProtocolVersionRequest,
    GetStateConfirmation, GetStateRequest, GetVersionConfirmation, GetVersionRequest,
    RebootConfirmation, RebootRequest, SetUtcConfirmation, SetUtcRequest,
};
pub use house_status::{
    HouseStatusMonitorDisableConfirmation, HouseStatusMonitorDisableRequest,
    HouseStatusMonitorEnableConfirmation, HouseStatusMonitorEnableRequest,
};
pub use node::{
    AllNodesInformationStatus, GetAllNodesInformationConfirmation,
    GetAllNodesInformationFinishedNotification, GetAllNodesInformationNotification,
    GetAllNodesInformationRequest, GetNodeInformationConfirmation,
    GetNodeInformationNotification, GetNodeInformationRequest, NodeInformation,
    NodeInformationChangedNotification, NodeInformationStatus, NodeStatePositionChangedNotification,
    NodeVariation, OperatingState, SetNodeNameConfirmation, SetNodeNameRequest,
    SetNodeNameStatus, Velocity,
};
pub use password::{
    PasswordChangeConfirmation, PasswordChangeNotification, PasswordChangeRequest,
    PasswordConfirmationStatus, PasswordEnterConfirmation, PasswordEnterRequest,
};
pub use scene::{
    ActivateSceneConfirmation, ActivateSceneRequest, ActivateSceneStatus, GetSceneListConfirmation,
    GetSceneListNotification, GetSceneListRequest, Scene,
};

macro_rules! frames {
    ($($variant:ident,)+) => {
        /// Any frame known to this crate, tagged by its concrete type.
        #[derive(Debug, Clone, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum Frame {
            $($variant($variant),)+
        }

        impl Frame {
            /// The command id of the wrapped frame.
            pub fn command(&self) -> Command {
                match self {
                    $(Frame::$variant(_) => <$variant as FramePayload>::COMMAND,)+
                }
            }

            /// The payload size contract of the wrapped frame.
            pub fn payload_length(&self) -> PayloadLength {
                match self {
                    $(Frame::$variant(_) => <$variant as FramePayload>::PAYLOAD_LENGTH,)+
                }
            }

            /// Encode the wrapped frame into the wire format.
            pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
                match self {
                    $(Frame::$variant(frame) => encode_frame(frame, dst),)+
                }
            }
        }

        impl fmt::Display for Frame {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Frame::$variant(frame) => fmt::Display::fmt(frame, f),)+
                }
            }
        }

        $(
            impl From<$variant> for Frame {
                fn from(frame: $variant) -> Self {
                    Frame::$variant(frame)
                }
            }

            impl TryFrom<Frame> for $variant {
                type Error = Frame;

                fn try_from(frame: Frame) -> std::result::Result<Self, Frame> {
                    match frame {
                        Frame::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )+

        /// One registry entry per frame type.
        pub(crate) fn registrations() -> Vec<Registration> {
            vec![$(Registration::of::<$variant>(),)+]
        }
    };
}

frames! {
    ErrorNotification,
    RebootRequest,
    RebootConfirmation,
    GetVersionRequest,
    GetVersionConfirmation,
    GetProtocolVersionRequest,
    GetProtocolVersionConfirmation,
    GetStateRequest,
    GetStateConfirmation,
    GetNetworkSetupRequest,
    GetNetworkSetupConfirmation,
    DiscoverNodesRequest,
    DiscoverNodesConfirmation,
    DiscoverNodesNotification,
    GetNodeInformationRequest,
    GetNodeInformationConfirmation,
    GetAllNodesInformationRequest,
    GetAllNodesInformationConfirmation,
    GetAllNodesInformationNotification,
    GetAllNodesInformationFinishedNotification,
    SetNodeNameRequest,
    SetNodeNameConfirmation,
    NodeInformationChangedNotification,
    GetNodeInformationNotification,
    NodeStatePositionChangedNotification,
    HouseStatusMonitorEnableRequest,
    HouseStatusMonitorEnableConfirmation,
    HouseStatusMonitorDisableRequest,
    HouseStatusMonitorDisableConfirmation,
    CommandSendRequest,
    CommandSendConfirmation,
    CommandRunStatusNotification,
    CommandRemainingTimeNotification,
    SessionFinishedNotification,
    GetSceneListRequest,
    GetSceneListConfirmation,
    GetSceneListNotification,
    ActivateSceneRequest,
    ActivateSceneConfirmation,
    SetUtcRequest,
    SetUtcConfirmation,
    PasswordEnterRequest,
    PasswordEnterConfirmation,
    PasswordChangeRequest,
    PasswordChangeConfirmation,
    PasswordChangeNotification,
}

impl Frame {
    /// Encode into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_matches_variant() {
        let frame = Frame::from(GetVersionRequest);
        assert_eq!(frame.command(), Command::GetVersionReq);
        assert_eq!(frame.payload_length(), PayloadLength::Fixed(0));
    }

    #[test]
    fn try_from_unwraps_matching_variant() {
        let frame = Frame::from(SessionFinishedNotification { session_id: 7 });
        let ntf = SessionFinishedNotification::try_from(frame).unwrap();
        assert_eq!(ntf.session_id, 7);

        let other = Frame::from(RebootRequest);
        assert!(SessionFinishedNotification::try_from(other).is_err());
    }

    #[test]
    fn empty_frames_encode_header_only() {
        let bytes = Frame::from(GetVersionRequest).to_bytes().unwrap();
        assert_eq!(bytes.as_ref(), &[0x00, 0x03, 0x00, 0x08, 0x0b]);
        assert_eq!(GetVersionRequest.to_string(), "<GetVersionRequest/>");
    }

    #[test]
    fn display_delegates_to_inner_frame() {
        let frame = Frame::from(SessionFinishedNotification { session_id: 9 });
        assert_eq!(
            frame.to_string(),
            "<SessionFinishedNotification session_id=\"9\"/>"
        );
    }
}
