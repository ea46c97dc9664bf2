//! Actuator commands: request, confirmation and the session notifications
//! that follow it.

use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::codec::{FramePayload, PayloadLength};
use crate::command::Command;
use crate::error::PayloadError;
use crate::fields::{Parameter, PayloadReader};

/// Maximum number of nodes addressed by one command.
pub const MAX_NODES: usize = 20;

/// Number of functional parameters following the main parameter.
pub const FUNCTIONAL_PARAMETERS: usize = 16;

byte_enum! {
    /// Who issued a command.
    pub enum Originator {
        User = 1 => "user",
        Rain = 2 => "rain",
        Timer = 3 => "timer",
        Ups = 5 => "ups",
        Saac = 8 => "saac",
        Wind = 9 => "wind",
        LoadShedding = 11 => "load_shedding",
        LocalLight = 12 => "local_light",
        EnvironmentSensor = 13 => "environment_sensor",
        Emergency = 255 => "emergency",
    }
}

byte_enum! {
    /// Command priority; lower values win.
    pub enum Priority {
        ProtectionHuman = 0 => "protection_human",
        ProtectionEnvironment = 1 => "protection_environment",
        UserLevel1 = 2 => "user_level_1",
        UserLevel2 = 3 => "user_level_2",
        ComfortLevel1 = 4 => "comfort_level_1",
        ComfortLevel2 = 5 => "comfort_level_2",
        ComfortLevel3 = 6 => "comfort_level_3",
        ComfortLevel4 = 7 => "comfort_level_4",
    }
}

byte_enum! {
    pub enum CommandSendConfirmationStatus {
        Rejected = 0 => "rejected",
        Accepted = 1 => "accepted",
    }
}

byte_enum! {
    pub enum RunStatus {
        ExecutionCompleted = 0 => "execution_completed",
        ExecutionFailed = 1 => "execution_failed",
        ExecutionActive = 2 => "execution_active",
    }
}

/// GW_COMMAND_SEND_REQ: move one or more actuators.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandSendRequest {
    pub session_id: u16,
    pub originator: Originator,
    pub priority: Priority,
    /// Index of the parameter the command acts on (0 = main parameter).
    pub parameter_active: u8,
    /// Bit set selecting which functional parameters are valid.
    pub functional_parameter_indicator: u16,
    pub main_parameter: Parameter,
    pub functional_parameters: [Parameter; FUNCTIONAL_PARAMETERS],
    pub node_ids: Vec<u8>,
    pub priority_level_lock: u8,
    pub priority_levels: [u8; 2],
    pub lock_time: u8,
}

impl CommandSendRequest {
    /// A user-level command setting the main parameter of `node_ids`.
    pub fn new(session_id: u16, node_ids: Vec<u8>, main_parameter: Parameter) -> Self {
        Self {
            session_id,
            originator: Originator::User,
            priority: Priority::UserLevel2,
            parameter_active: 0,
            functional_parameter_indicator: 0,
            main_parameter,
            functional_parameters: [Parameter::default(); FUNCTIONAL_PARAMETERS],
            node_ids,
            priority_level_lock: 0,
            priority_levels: [0; 2],
            lock_time: 0,
        }
    }
}

impl FramePayload for CommandSendRequest {
    const COMMAND: Command = Command::CommandSendReq;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(66);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        if self.node_ids.len() > MAX_NODES {
            return Err(PayloadError::TooManyEntries {
                field: "node_ids",
                count: self.node_ids.len(),
                max: MAX_NODES,
            });
        }
        dst.put_u16(self.session_id);
        dst.put_u8(self.originator.into());
        dst.put_u8(self.priority.into());
        dst.put_u8(self.parameter_active);
        dst.put_u16(self.functional_parameter_indicator);
        self.main_parameter.put(dst);
        for parameter in &self.functional_parameters {
            parameter.put(dst);
        }
        // Bounded by MAX_NODES above.
        dst.put_u8(self.node_ids.len() as u8);
        dst.put_slice(&self.node_ids);
        dst.put_bytes(0, MAX_NODES - self.node_ids.len());
        dst.put_u8(self.priority_level_lock);
        dst.put_slice(&self.priority_levels);
        dst.put_u8(self.lock_time);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        let session_id = reader.u16("session_id")?;
        let originator = reader.enumeration("originator")?;
        let priority = reader.enumeration("priority")?;
        let parameter_active = reader.u8("parameter_active")?;
        let functional_parameter_indicator = reader.u16("functional_parameter_indicator")?;
        let main_parameter = reader.parameter("main_parameter")?;
        let mut functional_parameters = [Parameter::default(); FUNCTIONAL_PARAMETERS];
        for parameter in &mut functional_parameters {
            *parameter = reader.parameter("functional_parameter")?;
        }
        let count = usize::from(reader.u8("node_count")?);
        if count > MAX_NODES {
            return Err(PayloadError::TooManyEntries {
                field: "node_ids",
                count,
                max: MAX_NODES,
            });
        }
        let node_array = reader.bytes("node_ids", MAX_NODES)?;
        let priority_level_lock = reader.u8("priority_level_lock")?;
        let priority_levels = reader.array("priority_levels")?;
        let lock_time = reader.u8("lock_time")?;

        Ok(Self {
            session_id,
            originator,
            priority,
            parameter_active,
            functional_parameter_indicator,
            main_parameter,
            functional_parameters,
            node_ids: node_array[..count].to_vec(),
            priority_level_lock,
            priority_levels,
            lock_time,
        })
    }
}

impl fmt::Display for CommandSendRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<CommandSendRequest session_id=\"{}\" originator=\"{}\" priority=\"{}\" node_ids=\"{:?}\" parameter=\"{}\"/>",
            self.session_id, self.originator, self.priority, self.node_ids, self.main_parameter
        )
    }
}

/// GW_COMMAND_SEND_CFM: the gateway accepted or rejected a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandSendConfirmation {
    /// Session id of the request this confirms.
    pub session_id: u16,
    pub status: CommandSendConfirmationStatus,
}

impl FramePayload for CommandSendConfirmation {
    const COMMAND: Command = Command::CommandSendCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(3);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u16(self.session_id);
        dst.put_u8(self.status.into());
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            session_id: reader.u16("session_id")?,
            status: reader.enumeration("status")?,
        })
    }
}

impl fmt::Display for CommandSendConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<CommandSendConfirmation session_id=\"{}\" status=\"{}\"/>",
            self.session_id, self.status
        )
    }
}

/// GW_COMMAND_RUN_STATUS_NTF: progress of one node within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandRunStatusNotification {
    pub session_id: u16,
    pub status_id: u8,
    pub index_id: u8,
    pub node_parameter: u8,
    pub parameter_value: Parameter,
    pub run_status: RunStatus,
    pub status_reply: u8,
    pub information_code: u32,
}

impl FramePayload for CommandRunStatusNotification {
    const COMMAND: Command = Command::CommandRunStatusNtf;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(13);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u16(self.session_id);
        dst.put_u8(self.status_id);
        dst.put_u8(self.index_id);
        dst.put_u8(self.node_parameter);
        self.parameter_value.put(dst);
        dst.put_u8(self.run_status.into());
        dst.put_u8(self.status_reply);
        dst.put_u32(self.information_code);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            session_id: reader.u16("session_id")?,
            status_id: reader.u8("status_id")?,
            index_id: reader.u8("index_id")?,
            node_parameter: reader.u8("node_parameter")?,
            parameter_value: reader.parameter("parameter_value")?,
            run_status: reader.enumeration("run_status")?,
            status_reply: reader.u8("status_reply")?,
            information_code: reader.u32("information_code")?,
        })
    }
}

impl fmt::Display for CommandRunStatusNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<CommandRunStatusNotification session_id=\"{}\" status_id=\"{}\" index_id=\"{}\" node_parameter=\"{}\" parameter_value=\"{}\" run_status=\"{}\" status_reply=\"{}\" information_code=\"{}\"/>",
            self.session_id,
            self.status_id,
            self.index_id,
            self.node_parameter,
            self.parameter_value,
            self.run_status,
            self.status_reply,
            self.information_code
        )
    }
}

/// GW_COMMAND_REMAINING_TIME_NTF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandRemainingTimeNotification {
    pub session_id: u16,
    pub index_id: u8,
    pub node_parameter: u8,
    pub seconds: u16,
}

impl FramePayload for CommandRemainingTimeNotification {
    const COMMAND: Command = Command::CommandRemainingTimeNtf;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(6);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u16(self.session_id);
        dst.put_u8(self.index_id);
        dst.put_u8(self.node_parameter);
        dst.put_u16(self.seconds);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            session_id: reader.u16("session_id")?,
            index_id: reader.u8("index_id")?,
            node_parameter: reader.u8("node_parameter")?,
            seconds: reader.u16("seconds")?,
        })
    }
}

impl fmt::Display for CommandRemainingTimeNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<CommandRemainingTimeNotification session_id=\"{}\" index_id=\"{}\" node_parameter=\"{}\" seconds=\"{}\"/>",
            self.session_id, self.index_id, self.node_parameter, self.seconds
        )
    }
}

/// GW_SESSION_FINISHED_NTF: no further notifications follow for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionFinishedNotification {
    pub session_id: u16,
}

impl FramePayload for SessionFinishedNotification {
    const COMMAND: Command = Command::SessionFinishedNtf;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(2);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u16(self.session_id);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            session_id: reader.u16("session_id")?,
        })
    }
}

impl fmt::Display for SessionFinishedNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<SessionFinishedNotification session_id=\"{}\"/>",
            self.session_id
        )
    }
}
