//! Node (actuator) information, naming and state change notifications.

use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::codec::{FramePayload, PayloadLength};
use crate::command::Command;
use crate::error::PayloadError;
use crate::fields::{put_padded_string, Parameter, PayloadReader, NAME_LEN};

/// Alias slots in a node information record.
pub const MAX_ALIASES: usize = 5;

/// Size of a node information record.
pub const NODE_INFORMATION_LEN: usize = 124;

byte_enum! {
    pub enum Velocity {
        Default = 0 => "default",
        Silent = 1 => "silent",
        Fast = 2 => "fast",
        NotAvailable = 255 => "not_available",
    }
}

byte_enum! {
    pub enum NodeVariation {
        NotSet = 0 => "not_set",
        TopHung = 1 => "top_hung",
        Kip = 2 => "kip",
        FlatRoof = 3 => "flat_roof",
        SkyLight = 4 => "sky_light",
    }
}

byte_enum! {
    pub enum OperatingState {
        NonExecuting = 0 => "non_executing",
        Error = 1 => "error",
        NotUsed = 2 => "not_used",
        WaitingForPower = 3 => "waiting_for_power",
        Executing = 4 => "executing",
        Done = 5 => "done",
        Unknown = 255 => "unknown",
    }
}

byte_enum! {
    pub enum NodeInformationStatus {
        Ok = 0 => "ok",
        RequestRejected = 1 => "request_rejected",
        InvalidNodeIndex = 2 => "invalid_node_index",
    }
}

byte_enum! {
    pub enum AllNodesInformationStatus {
        Ok = 0 => "ok",
        ErrorSystemTableEmpty = 1 => "error_system_table_empty",
    }
}

byte_enum! {
    pub enum SetNodeNameStatus {
        Ok = 0 => "ok",
        RequestRejected = 1 => "request_rejected",
        InvalidSystemTableIndex = 2 => "invalid_system_table_index",
    }
}

/// Everything the gateway knows about one node.
///
/// Shared by GW_GET_NODE_INFORMATION_NTF and GW_GET_ALL_NODES_INFORMATION_NTF.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeInformation {
    pub node_id: u8,
    pub order: u16,
    pub placement: u8,
    pub name: String,
    pub velocity: Velocity,
    /// Actuator type in the upper ten bits, sub type in the lower six.
    pub node_type: u16,
    pub product_group: u8,
    pub product_type: u8,
    pub node_variation: NodeVariation,
    pub power_mode: u8,
    pub build_number: u8,
    pub serial_number: [u8; 8],
    pub state: OperatingState,
    pub current_position: Parameter,
    pub target: Parameter,
    pub functional_positions: [Parameter; 4],
    /// Seconds until the node reaches its target.
    pub remaining_time: u16,
    pub timestamp: u32,
    /// Alias (type, value) pairs.
    pub aliases: Vec<(u16, u16)>,
}

impl NodeInformation {
    fn put(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        if self.aliases.len() > MAX_ALIASES {
            return Err(PayloadError::TooManyEntries {
                field: "aliases",
                count: self.aliases.len(),
                max: MAX_ALIASES,
            });
        }
        dst.put_u8(self.node_id);
        dst.put_u16(self.order);
        dst.put_u8(self.placement);
        put_padded_string(dst, "name", &self.name, NAME_LEN)?;
        dst.put_u8(self.velocity.into());
        dst.put_u16(self.node_type);
        dst.put_u8(self.product_group);
        dst.put_u8(self.product_type);
        dst.put_u8(self.node_variation.into());
        dst.put_u8(self.power_mode);
        dst.put_u8(self.build_number);
        dst.put_slice(&self.serial_number);
        dst.put_u8(self.state.into());
        self.current_position.put(dst);
        self.target.put(dst);
        for position in &self.functional_positions {
            position.put(dst);
        }
        dst.put_u16(self.remaining_time);
        dst.put_u32(self.timestamp);
        // Bounded by MAX_ALIASES above.
        dst.put_u8(self.aliases.len() as u8);
        for &(alias_type, alias_value) in &self.aliases {
            dst.put_u16(alias_type);
            dst.put_u16(alias_value);
        }
        dst.put_bytes(0, (MAX_ALIASES - self.aliases.len()) * 4);
        Ok(())
    }

    fn read(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        let node_id = reader.u8("node_id")?;
        let order = reader.u16("order")?;
        let placement = reader.u8("placement")?;
        let name = reader.string("name", NAME_LEN)?;
        let velocity = reader.enumeration("velocity")?;
        let node_type = reader.u16("node_type")?;
        let product_group = reader.u8("product_group")?;
        let product_type = reader.u8("product_type")?;
        let node_variation = reader.enumeration("node_variation")?;
        let power_mode = reader.u8("power_mode")?;
        let build_number = reader.u8("build_number")?;
        let serial_number = reader.array("serial_number")?;
        let state = reader.enumeration("state")?;
        let current_position = reader.parameter("current_position")?;
        let target = reader.parameter("target")?;
        let mut functional_positions = [Parameter::default(); 4];
        for position in &mut functional_positions {
            *position = reader.parameter("functional_position")?;
        }
        let remaining_time = reader.u16("remaining_time")?;
        let timestamp = reader.u32("timestamp")?;

        let alias_count = usize::from(reader.u8("alias_count")?);
        if alias_count > MAX_ALIASES {
            return Err(PayloadError::TooManyEntries {
                field: "aliases",
                count: alias_count,
                max: MAX_ALIASES,
            });
        }
        let mut aliases = Vec::with_capacity(alias_count);
        for slot in 0..MAX_ALIASES {
            let alias_type = reader.u16("alias_type")?;
            let alias_value = reader.u16("alias_value")?;
            if slot < alias_count {
                aliases.push((alias_type, alias_value));
            }
        }

        Ok(Self {
            node_id,
            order,
            placement,
            name,
            velocity,
            node_type,
            product_group,
            product_type,
            node_variation,
            power_mode,
            build_number,
            serial_number,
            state,
            current_position,
            target,
            functional_positions,
            remaining_time,
            timestamp,
            aliases,
        })
    }

    /// Serial number as colon separated hex, e.g. `53:09:1e:17:10:1a:00:0c`.
    pub fn serial_number_string(&self) -> String {
        self.serial_number
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl fmt::Display for NodeInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node_id=\"{}\" order=\"{}\" placement=\"{}\" name=\"{}\" velocity=\"{}\" node_type=\"{}\" node_variation=\"{}\" serial_number=\"{}\" state=\"{}\" current_position=\"{}\" target=\"{}\" remaining_time=\"{}\" timestamp=\"{}\" alias_count=\"{}\"",
            self.node_id,
            self.order,
            self.placement,
            self.name,
            self.velocity,
            self.node_type,
            self.node_variation,
            self.serial_number_string(),
            self.state,
            self.current_position,
            self.target,
            self.remaining_time,
            self.timestamp,
            self.aliases.len()
        )
    }
}

/// GW_GET_NODE_INFORMATION_REQ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetNodeInformationRequest {
    pub node_id: u8,
}

impl FramePayload for GetNodeInformationRequest {
    const COMMAND: Command = Command::GetNodeInformationReq;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(1);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.node_id);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            node_id: reader.u8("node_id")?,
        })
    }
}

impl fmt::Display for GetNodeInformationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<GetNodeInformationRequest node_id=\"{}\"/>", self.node_id)
    }
}

/// GW_GET_NODE_INFORMATION_CFM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetNodeInformationConfirmation {
    pub status: NodeInformationStatus,
    pub node_id: u8,
}

impl FramePayload for GetNodeInformationConfirmation {
    const COMMAND: Command = Command::GetNodeInformationCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(2);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.status.into());
        dst.put_u8(self.node_id);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            status: reader.enumeration("status")?,
            node_id: reader.u8("node_id")?,
        })
    }
}

impl fmt::Display for GetNodeInformationConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<GetNodeInformationConfirmation node_id=\"{}\" status=\"{}\"/>",
            self.node_id, self.status
        )
    }
}

/// GW_GET_NODE_INFORMATION_NTF
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetNodeInformationNotification(pub NodeInformation);

impl FramePayload for GetNodeInformationNotification {
    const COMMAND: Command = Command::GetNodeInformationNtf;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(NODE_INFORMATION_LEN);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        self.0.put(dst)
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        NodeInformation::read(payload).map(Self)
    }
}

impl fmt::Display for GetNodeInformationNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<GetNodeInformationNotification {}/>", self.0)
    }
}

empty_frame!(GetAllNodesInformationRequest => GetAllNodesInformationReq);

/// GW_GET_ALL_NODES_INFORMATION_CFM: announces how many notifications follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetAllNodesInformationConfirmation {
    pub status: AllNodesInformationStatus,
    pub number_of_nodes: u8,
}

impl FramePayload for GetAllNodesInformationConfirmation {
    const COMMAND: Command = Command::GetAllNodesInformationCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(2);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.status.into());
        dst.put_u8(self.number_of_nodes);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            status: reader.enumeration("status")?,
            number_of_nodes: reader.u8("number_of_nodes")?,
        })
    }
}

impl fmt::Display for GetAllNodesInformationConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<GetAllNodesInformationConfirmation status=\"{}\" number_of_nodes=\"{}\"/>",
            self.status, self.number_of_nodes
        )
    }
}

/// GW_GET_ALL_NODES_INFORMATION_NTF
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetAllNodesInformationNotification(pub NodeInformation);

impl FramePayload for GetAllNodesInformationNotification {
    const COMMAND: Command = Command::GetAllNodesInformationNtf;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(NODE_INFORMATION_LEN);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        self.0.put(dst)
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        NodeInformation::read(payload).map(Self)
    }
}

impl fmt::Display for GetAllNodesInformationNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<GetAllNodesInformationNotification {}/>", self.0)
    }
}

empty_frame!(GetAllNodesInformationFinishedNotification => GetAllNodesInformationFinishedNtf);

/// GW_SET_NODE_NAME_REQ
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetNodeNameRequest {
    pub node_id: u8,
    pub name: String,
}

impl FramePayload for SetNodeNameRequest {
    const COMMAND: Command = Command::SetNodeNameReq;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(1 + NAME_LEN);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.node_id);
        put_padded_string(dst, "name", &self.name, NAME_LEN)
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            node_id: reader.u8("node_id")?,
            name: reader.string("name", NAME_LEN)?,
        })
    }
}

impl fmt::Display for SetNodeNameRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<SetNodeNameRequest node_id=\"{}\" name=\"{}\"/>",
            self.node_id, self.name
        )
    }
}

/// GW_SET_NODE_NAME_CFM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetNodeNameConfirmation {
    pub status: SetNodeNameStatus,
    pub node_id: u8,
}

impl FramePayload for SetNodeNameConfirmation {
    const COMMAND: Command = Command::SetNodeNameCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(2);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.status.into());
        dst.put_u8(self.node_id);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            status: reader.enumeration("status")?,
            node_id: reader.u8("node_id")?,
        })
    }
}

impl fmt::Display for SetNodeNameConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<SetNodeNameConfirmation node_id=\"{}\" status=\"{}\"/>",
            self.node_id, self.status
        )
    }
}

/// GW_NODE_INFORMATION_CHANGED_NTF
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeInformationChangedNotification {
    pub node_id: u8,
    pub name: String,
    pub order: u16,
    pub placement: u8,
    pub node_variation: NodeVariation,
}

impl FramePayload for NodeInformationChangedNotification {
    const COMMAND: Command = Command::NodeInformationChangedNtf;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(1 + NAME_LEN + 4);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.node_id);
        put_padded_string(dst, "name", &self.name, NAME_LEN)?;
        dst.put_u16(self.order);
        dst.put_u8(self.placement);
        dst.put_u8(self.node_variation.into());
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            node_id: reader.u8("node_id")?,
            name: reader.string("name", NAME_LEN)?,
            order: reader.u16("order")?,
            placement: reader.u8("placement")?,
            node_variation: reader.enumeration("node_variation")?,
        })
    }
}

impl fmt::Display for NodeInformationChangedNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<NodeInformationChangedNotification node_id=\"{}\" name=\"{}\" order=\"{}\" placement=\"{}\" node_variation=\"{}\"/>",
            self.node_id, self.name, self.order, self.placement, self.node_variation
        )
    }
}

/// GW_NODE_STATE_POSITION_CHANGED_NTF: sent while the house status monitor is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeStatePositionChangedNotification {
    pub node_id: u8,
    pub state: OperatingState,
    pub current_position: Parameter,
    pub target: Parameter,
    pub functional_positions: [Parameter; 4],
    pub remaining_time: u16,
    pub timestamp: u32,
}

impl FramePayload for NodeStatePositionChangedNotification {
    const COMMAND: Command = Command::NodeStatePositionChangedNtf;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(20);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.node_id);
        dst.put_u8(self.state.into());
        self.current_position.put(dst);
        self.target.put(dst);
        for position in &self.functional_positions {
            position.put(dst);
        }
        dst.put_u16(self.remaining_time);
        dst.put_u32(self.timestamp);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        let node_id = reader.u8("node_id")?;
        let state = reader.enumeration("state")?;
        let current_position = reader.parameter("current_position")?;
        let target = reader.parameter("target")?;
        let mut functional_positions = [Parameter::default(); 4];
        for position in &mut functional_positions {
            *position = reader.parameter("functional_position")?;
        }
        Ok(Self {
            node_id,
            state,
            current_position,
            target,
            functional_positions,
            remaining_time: reader.u16("remaining_time")?,
            timestamp: reader.u32("timestamp")?,
        })
    }
}

impl fmt::Display for NodeStatePositionChangedNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<NodeStatePositionChangedNotification node_id=\"{}\" state=\"{}\" current_position=\"{}\" target=\"{}\" remaining_time=\"{}\" timestamp=\"{}\"/>",
            self.node_id,
            self.state,
            self.current_position,
            self.target,
            self.remaining_time,
            self.timestamp
        )
    }
}
