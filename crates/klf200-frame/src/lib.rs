//! Checksummed binary frames for the Velux KLF-200 gateway API.
//!
//! Every frame on the wire looks like:
//! - A 1-byte start marker (`0x00`)
//! - A 1-byte length covering command, payload and checksum
//! - A 2-byte big-endian command id
//! - The payload, whose layout depends on the command
//! - A 1-byte XOR checksum over everything before it
//!
//! On the gateway socket each frame is additionally wrapped in SLIP, which
//! [`FrameReader`], [`FrameWriter`] and (with the `async` feature)
//! [`FrameCodec`] take care of.
//!
//! ```
//! use klf200_frame::{decode_frame, CommandSendConfirmation, Frame};
//!
//! let raw = [0x00, 0x06, 0x03, 0x01, 0x03, 0xe8, 0x01, 0xee];
//! let frame = decode_frame(&raw).unwrap();
//! let cfm = CommandSendConfirmation::try_from(frame).unwrap();
//! assert_eq!(cfm.session_id, 1000);
//! assert_eq!(Frame::from(cfm).to_bytes().unwrap().as_ref(), &raw);
//! ```

pub mod checksum;
pub mod codec;
pub mod command;
pub mod error;
pub mod fields;
pub mod frames;
pub mod reader;
pub mod registry;
pub mod slip;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

#[cfg(feature = "async")]
pub use async_codec::FrameCodec;
pub use checksum::checksum;
pub use codec::{
    encode_frame, split_frame, FrameConfig, FramePayload, PayloadLength, RawFrame,
    MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE,
};
pub use command::Command;
pub use error::{FrameError, PayloadError, Result};
pub use fields::Parameter;
pub use frames::*;
pub use reader::FrameReader;
pub use registry::{decode_frame, FrameRegistry, Registration};
pub use writer::FrameWriter;
