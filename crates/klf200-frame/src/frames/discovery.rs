//! Node discovery.

use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::codec::{FramePayload, PayloadLength};
use crate::command::Command;
use crate::error::PayloadError;
use crate::fields::{bitmap_to_nodes, nodes_to_bitmap, PayloadReader, NODE_BITMAP_LEN};

byte_enum! {
    pub enum DiscoverStatus {
        Ok = 0 => "ok",
        Failed = 5 => "failed",
        PartialOk = 6 => "partial_ok",
        Busy = 7 => "busy",
    }
}

/// GW_CS_DISCOVER_NODES_REQ: search for new actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscoverNodesRequest {
    /// Actuator type to look for; 0 discovers every type.
    pub node_type: u8,
}

impl FramePayload for DiscoverNodesRequest {
    const COMMAND: Command = Command::DiscoverNodesReq;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(1);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.node_type);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            node_type: reader.u8("node_type")?,
        })
    }
}

impl fmt::Display for DiscoverNodesRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<DiscoverNodesRequest node_type=\"{}\"/>", self.node_type)
    }
}

empty_frame!(DiscoverNodesConfirmation => DiscoverNodesCfm);

/// GW_CS_DISCOVER_NODES_NTF: outcome of a discovery run as node id lists.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscoverNodesNotification {
    pub added_nodes: Vec<u8>,
    pub rf_connection_error_nodes: Vec<u8>,
    pub zero_nodes: Vec<u8>,
    pub removed_nodes: Vec<u8>,
    pub open_nodes: Vec<u8>,
    pub discover_status: DiscoverStatus,
}

impl FramePayload for DiscoverNodesNotification {
    const COMMAND: Command = Command::DiscoverNodesNtf;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(5 * NODE_BITMAP_LEN + 1);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        for (field, nodes) in [
            ("added_nodes", &self.added_nodes),
            ("rf_connection_error_nodes", &self.rf_connection_error_nodes),
            ("zero_nodes", &self.zero_nodes),
            ("removed_nodes", &self.removed_nodes),
            ("open_nodes", &self.open_nodes),
        ] {
            dst.put_slice(&nodes_to_bitmap(field, nodes)?);
        }
        dst.put_u8(self.discover_status.into());
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            added_nodes: bitmap_to_nodes(&reader.array("added_nodes")?),
            rf_connection_error_nodes: bitmap_to_nodes(
                &reader.array("rf_connection_error_nodes")?,
            ),
            zero_nodes: bitmap_to_nodes(&reader.array("zero_nodes")?),
            removed_nodes: bitmap_to_nodes(&reader.array("removed_nodes")?),
            open_nodes: bitmap_to_nodes(&reader.array("open_nodes")?),
            discover_status: reader.enumeration("discover_status")?,
        })
    }
}

impl fmt::Display for DiscoverNodesNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<DiscoverNodesNotification added_nodes=\"{:?}\" removed_nodes=\"{:?}\" discover_status=\"{}\"/>",
            self.added_nodes, self.removed_nodes, self.discover_status
        )
    }
}
