//! Gateway housekeeping: errors, reboot, version and state queries, network
//! setup and clock.

use std::fmt;
use std::net::Ipv4Addr;

use bytes::{BufMut, BytesMut};

use crate::codec::{FramePayload, PayloadLength};
use crate::command::Command;
use crate::error::PayloadError;
use crate::fields::PayloadReader;

byte_enum! {
    /// Reason carried by GW_ERROR_NTF.
    pub enum ErrorType {
        NotFurtherDefined = 0 => "not_further_defined",
        UnknownCommand = 1 => "unknown_command",
        ErrorOnFrameStructure = 2 => "error_on_frame_structure",
        Busy = 7 => "busy",
        BadSystemTableIndex = 8 => "bad_system_table_index",
        NotAuthenticated = 12 => "not_authenticated",
    }
}

byte_enum! {
    pub enum GatewayState {
        TestMode = 0 => "test_mode",
        GatewayModeNoActuator = 1 => "gateway_mode_no_actuator",
        GatewayModeWithActuators = 2 => "gateway_mode_with_actuators",
        BeaconModeNotConfigured = 3 => "beacon_mode_not_configured",
        BeaconModeWithActuators = 4 => "beacon_mode_with_actuators",
    }
}

byte_enum! {
    pub enum GatewaySubState {
        Idle = 0x00 => "idle",
        PerformingTaskConfigurationServiceHandler = 0x01 => "performing_task_configuration_service_handler",
        PerformingTaskSceneConfiguration = 0x02 => "performing_task_scene_configuration",
        PerformingTaskInformationServiceConfiguration = 0x03 => "performing_task_information_service_configuration",
        PerformingTaskContactInputConfiguration = 0x04 => "performing_task_contact_input_configuration",
        PerformingTaskCommand = 0x80 => "performing_task_command",
        PerformingTaskActivateGroup = 0x81 => "performing_task_activate_group",
        PerformingTaskActivateScene = 0x82 => "performing_task_activate_scene",
    }
}

/// GW_ERROR_NTF: the gateway could not process the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorNotification {
    pub error_type: ErrorType,
}

impl FramePayload for ErrorNotification {
    const COMMAND: Command = Command::ErrorNtf;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(1);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.error_type.into());
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            error_type: reader.enumeration("error_type")?,
        })
    }
}

impl fmt::Display for ErrorNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<ErrorNotification error_type=\"{}\"/>", self.error_type)
    }
}

empty_frame!(RebootRequest => RebootReq);
empty_frame!(RebootConfirmation => RebootCfm);
empty_frame!(GetVersionRequest => GetVersionReq);

/// GW_GET_VERSION_CFM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetVersionConfirmation {
    pub software_version: [u8; 6],
    pub hardware_version: u8,
    pub product_group: u8,
    pub product_type: u8,
}

impl GetVersionConfirmation {
    /// Software version in dotted form, e.g. `0.2.0.0.71.0`.
    pub fn software_version_string(&self) -> String {
        self.software_version
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Product group 14 / type 3 identifies a KLF 200.
    pub fn product_name(&self) -> Option<&'static str> {
        match (self.product_group, self.product_type) {
            (14, 3) => Some("KLF 200"),
            _ => None,
        }
    }
}

impl FramePayload for GetVersionConfirmation {
    const COMMAND: Command = Command::GetVersionCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(9);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_slice(&self.software_version);
        dst.put_u8(self.hardware_version);
        dst.put_u8(self.product_group);
        dst.put_u8(self.product_type);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            software_version: reader.array("software_version")?,
            hardware_version: reader.u8("hardware_version")?,
            product_group: reader.u8("product_group")?,
            product_type: reader.u8("product_type")?,
        })
    }
}

impl fmt::Display for GetVersionConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<GetVersionConfirmation software_version=\"{}\" hardware_version=\"{}\" product=\"{}\"/>",
            self.software_version_string(),
            self.hardware_version,
            self.product_name().unwrap_or("unknown")
        )
    }
}

empty_frame!(GetProtocolVersionRequest => GetProtocolVersionReq);

/// GW_GET_PROTOCOL_VERSION_CFM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetProtocolVersionConfirmation {
    pub major_version: u16,
    pub minor_version: u16,
}

impl FramePayload for GetProtocolVersionConfirmation {
    const COMMAND: Command = Command::GetProtocolVersionCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(4);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u16(self.major_version);
        dst.put_u16(self.minor_version);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            major_version: reader.u16("major_version")?,
            minor_version: reader.u16("minor_version")?,
        })
    }
}

impl fmt::Display for GetProtocolVersionConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<GetProtocolVersionConfirmation version=\"{}.{}\"/>",
            self.major_version, self.minor_version
        )
    }
}

empty_frame!(GetStateRequest => GetStateReq);

/// GW_GET_STATE_CFM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetStateConfirmation {
    pub gateway_state: GatewayState,
    pub gateway_sub_state: GatewaySubState,
    /// Reserved by the gateway, passed through untouched.
    pub state_data: [u8; 4],
}

impl FramePayload for GetStateConfirmation {
    const COMMAND: Command = Command::GetStateCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(6);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u8(self.gateway_state.into());
        dst.put_u8(self.gateway_sub_state.into());
        dst.put_slice(&self.state_data);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            gateway_state: reader.enumeration("gateway_state")?,
            gateway_sub_state: reader.enumeration("gateway_sub_state")?,
            state_data: reader.array("state_data")?,
        })
    }
}

impl fmt::Display for GetStateConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<GetStateConfirmation gateway_state=\"{}\" gateway_sub_state=\"{}\"/>",
            self.gateway_state, self.gateway_sub_state
        )
    }
}

empty_frame!(GetNetworkSetupRequest => GetNetworkSetupReq);

/// GW_GET_NETWORK_SETUP_CFM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetNetworkSetupConfirmation {
    pub ipaddress: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub dhcp: bool,
}

impl FramePayload for GetNetworkSetupConfirmation {
    const COMMAND: Command = Command::GetNetworkSetupCfm;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(13);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_slice(&self.ipaddress.octets());
        dst.put_slice(&self.netmask.octets());
        dst.put_slice(&self.gateway.octets());
        dst.put_u8(u8::from(self.dhcp));
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        let ipaddress = Ipv4Addr::from(reader.array::<4>("ipaddress")?);
        let netmask = Ipv4Addr::from(reader.array::<4>("netmask")?);
        let gateway = Ipv4Addr::from(reader.array::<4>("gateway")?);
        let dhcp = match reader.u8("dhcp")? {
            0 => false,
            1 => true,
            value => return Err(PayloadError::InvalidEnumValue { field: "dhcp", value }),
        };
        Ok(Self {
            ipaddress,
            netmask,
            gateway,
            dhcp,
        })
    }
}

impl fmt::Display for GetNetworkSetupConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<GetNetworkSetupConfirmation ipaddress=\"{}\" netmask=\"{}\" gateway=\"{}\" dhcp=\"{}\"/>",
            self.ipaddress, self.netmask, self.gateway, self.dhcp
        )
    }
}

/// GW_SET_UTC_REQ: set the gateway clock (seconds since the Unix epoch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetUtcRequest {
    pub timestamp: u32,
}

impl FramePayload for SetUtcRequest {
    const COMMAND: Command = Command::SetUtcReq;
    const PAYLOAD_LENGTH: PayloadLength = PayloadLength::Fixed(4);

    fn serialize_payload(&self, dst: &mut BytesMut) -> Result<(), PayloadError> {
        dst.put_u32(self.timestamp);
        Ok(())
    }

    fn parse_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = PayloadReader::new(payload);
        Ok(Self {
            timestamp: reader.u32("timestamp")?,
        })
    }
}

impl fmt::Display for SetUtcRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<SetUtcRequest timestamp=\"{}\"/>", self.timestamp)
    }
}

empty_frame!(SetUtcConfirmation => SetUtcCfm);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use crate::frames::test_util::round_trip;
    use crate::frames::Frame;
    use crate::registry::decode_frame;

    #[test]
    fn error_notification_from_raw() {
        // GW_ERROR_NTF, not authenticated
        let raw = [0x00, 0x04, 0x00, 0x00, 0x0c, 0x08];
        let frame = decode_frame(&raw).unwrap();
        assert_eq!(
            frame,
            Frame::ErrorNotification(ErrorNotification {
                error_type: ErrorType::NotAuthenticated
            })
        );
    }

    #[test]
    fn error_notification_rejects_undefined_type() {
        let err = ErrorNotification::parse_payload(&[0x03]).unwrap_err();
        assert_eq!(
            err,
            PayloadError::InvalidEnumValue {
                field: "error_type",
                value: 3
            }
        );
    }

    #[test]
    fn version_confirmation() {
        let cfm = GetVersionConfirmation {
            software_version: [0, 2, 0, 0, 71, 0],
            hardware_version: 6,
            product_group: 14,
            product_type: 3,
        };
        let (bytes, decoded) = round_trip(cfm);
        assert_eq!(&bytes[..4], &[0x00, 0x0c, 0x00, 0x09]);
        assert_eq!(decoded, Frame::GetVersionConfirmation(cfm));
        assert_eq!(cfm.software_version_string(), "0.2.0.0.71.0");
        assert_eq!(
            cfm.to_string(),
            "<GetVersionConfirmation software_version=\"0.2.0.0.71.0\" hardware_version=\"6\" product=\"KLF 200\"/>"
        );
    }

    #[test]
    fn protocol_version_confirmation() {
        let cfm = GetProtocolVersionConfirmation {
            major_version: 3,
            minor_version: 14,
        };
        let (bytes, decoded) = round_trip(cfm);
        assert_eq!(&bytes[4..8], &[0x00, 0x03, 0x00, 0x0e]);
        assert_eq!(decoded, Frame::GetProtocolVersionConfirmation(cfm));
    }

    #[test]
    fn state_confirmation() {
        let cfm = GetStateConfirmation {
            gateway_state: GatewayState::GatewayModeWithActuators,
            gateway_sub_state: GatewaySubState::PerformingTaskCommand,
            state_data: [0; 4],
        };
        let (bytes, decoded) = round_trip(cfm);
        assert_eq!(&bytes[4..6], &[0x02, 0x80]);
        assert_eq!(decoded, Frame::GetStateConfirmation(cfm));
    }

    #[test]
    fn network_setup_confirmation() {
        let cfm = GetNetworkSetupConfirmation {
            ipaddress: Ipv4Addr::new(192, 168, 2, 127),
            netmask: Ipv4Addr::new(255, 255, 255, 0),
            gateway: Ipv4Addr::new(192, 168, 2, 1),
            dhcp: true,
        };
        let (bytes, decoded) = round_trip(cfm);
        assert_eq!(&bytes[4..8], &[192, 168, 2, 127]);
        assert_eq!(bytes[16], 1);
        assert_eq!(decoded, Frame::GetNetworkSetupConfirmation(cfm));
    }

    #[test]
    fn network_setup_rejects_bad_dhcp_flag() {
        let mut payload = [0u8; 13];
        payload[12] = 2;
        assert!(matches!(
            GetNetworkSetupConfirmation::parse_payload(&payload),
            Err(PayloadError::InvalidEnumValue { field: "dhcp", value: 2 })
        ));
    }

    #[test]
    fn set_utc_request() {
        let req = SetUtcRequest {
            timestamp: 1_700_000_000,
        };
        let (bytes, decoded) = round_trip(req);
        assert_eq!(&bytes[4..8], &1_700_000_000u32.to_be_bytes());
        assert_eq!(decoded, Frame::SetUtcRequest(req));
    }

    #[test]
    fn empty_confirmation_with_payload_is_rejected() {
        // GW_REBOOT_CFM carrying one stray byte
        let raw = [0x00, 0x04, 0x00, 0x02, 0x00, 0x06];
        assert!(matches!(
            decode_frame(&raw),
            Err(FrameError::InvalidPayloadLength {
                command: Command::RebootCfm,
                expected: 0,
                actual: 1
            })
        ));
    }
}
