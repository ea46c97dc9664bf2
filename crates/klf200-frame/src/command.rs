//! Gateway API command identifiers.
//!
//! Every frame on the wire carries a 16-bit command id selecting its payload
//! layout. Requests (`*Req`) go to the gateway; confirmations (`*Cfm`) and
//! notifications (`*Ntf`) come back from it.

use std::fmt;

macro_rules! commands {
    ($($variant:ident = $value:literal => $name:literal,)+) => {
        /// A command id known to this crate.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u16)]
        pub enum Command {
            $($variant = $value,)+
        }

        impl Command {
            /// All known commands in ascending id order.
            pub const ALL: &'static [Command] = &[$(Command::$variant,)+];

            /// The protocol name of the command, e.g. `GW_COMMAND_SEND_CFM`.
            pub fn name(self) -> &'static str {
                match self {
                    $(Command::$variant => $name,)+
                }
            }
        }

        impl TryFrom<u16> for Command {
            type Error = u16;

            fn try_from(value: u16) -> std::result::Result<Self, u16> {
                match value {
                    $($value => Ok(Command::$variant),)+
                    other => Err(other),
                }
            }
        }
    };
}

commands! {
    ErrorNtf = 0x0000 => "GW_ERROR_NTF",
    RebootReq = 0x0001 => "GW_REBOOT_REQ",
    RebootCfm = 0x0002 => "GW_REBOOT_CFM",
    GetVersionReq = 0x0008 => "GW_GET_VERSION_REQ",
    GetVersionCfm = 0x0009 => "GW_GET_VERSION_CFM",
    GetProtocolVersionReq = 0x000A => "GW_GET_PROTOCOL_VERSION_REQ",
    GetProtocolVersionCfm = 0x000B => "GW_GET_PROTOCOL_VERSION_CFM",
    GetStateReq = 0x000C => "GW_GET_STATE_REQ",
    GetStateCfm = 0x000D => "GW_GET_STATE_CFM",
    GetNetworkSetupReq = 0x00E0 => "GW_GET_NETWORK_SETUP_REQ",
    GetNetworkSetupCfm = 0x00E1 => "GW_GET_NETWORK_SETUP_CFM",
    DiscoverNodesReq = 0x0103 => "GW_CS_DISCOVER_NODES_REQ",
    DiscoverNodesCfm = 0x0104 => "GW_CS_DISCOVER_NODES_CFM",
    DiscoverNodesNtf = 0x0105 => "GW_CS_DISCOVER_NODES_NTF",
    GetNodeInformationReq = 0x0200 => "GW_GET_NODE_INFORMATION_REQ",
    GetNodeInformationCfm = 0x0201 => "GW_GET_NODE_INFORMATION_CFM",
    GetAllNodesInformationReq = 0x0202 => "GW_GET_ALL_NODES_INFORMATION_REQ",
    GetAllNodesInformationCfm = 0x0203 => "GW_GET_ALL_NODES_INFORMATION_CFM",
    GetAllNodesInformationNtf = 0x0204 => "GW_GET_ALL_NODES_INFORMATION_NTF",
    GetAllNodesInformationFinishedNtf = 0x0205 => "GW_GET_ALL_NODES_INFORMATION_FINISHED_NTF",
    SetNodeNameReq = 0x0208 => "GW_SET_NODE_NAME_REQ",
    SetNodeNameCfm = 0x0209 => "GW_SET_NODE_NAME_CFM",
    NodeInformationChangedNtf = 0x020C => "GW_NODE_INFORMATION_CHANGED_NTF",
    GetNodeInformationNtf = 0x0210 => "GW_GET_NODE_INFORMATION_NTF",
    NodeStatePositionChangedNtf = 0x0211 => "GW_NODE_STATE_POSITION_CHANGED_NTF",
    HouseStatusMonitorEnableReq = 0x0240 => "GW_HOUSE_STATUS_MONITOR_ENABLE_REQ",
    HouseStatusMonitorEnableCfm = 0x0241 => "GW_HOUSE_STATUS_MONITOR_ENABLE_CFM",
    HouseStatusMonitorDisableReq = 0x0242 => "GW_HOUSE_STATUS_MONITOR_DISABLE_REQ",
    HouseStatusMonitorDisableCfm = 0x0243 => "GW_HOUSE_STATUS_MONITOR_DISABLE_CFM",
    CommandSendReq = 0x0300 => "GW_COMMAND_SEND_REQ",
    CommandSendCfm = 0x0301 => "GW_COMMAND_SEND_CFM",
    CommandRunStatusNtf = 0x0302 => "GW_COMMAND_RUN_STATUS_NTF",
    CommandRemainingTimeNtf = 0x0303 => "GW_COMMAND_REMAINING_TIME_NTF",
    SessionFinishedNtf = 0x0304 => "GW_SESSION_FINISHED_NTF",
    GetSceneListReq = 0x040C => "GW_GET_SCENE_LIST_REQ",
    GetSceneListCfm = 0x040D => "GW_GET_SCENE_LIST_CFM",
    GetSceneListNtf = 0x040E => "GW_GET_SCENE_LIST_NTF",
    ActivateSceneReq = 0x0412 => "GW_ACTIVATE_SCENE_REQ",
    ActivateSceneCfm = 0x0413 => "GW_ACTIVATE_SCENE_CFM",
    SetUtcReq = 0x2000 => "GW_SET_UTC_REQ",
    SetUtcCfm = 0x2001 => "GW_SET_UTC_CFM",
    PasswordEnterReq = 0x3000 => "GW_PASSWORD_ENTER_REQ",
    PasswordEnterCfm = 0x3001 => "GW_PASSWORD_ENTER_CFM",
    PasswordChangeReq = 0x3002 => "GW_PASSWORD_CHANGE_REQ",
    PasswordChangeCfm = 0x3003 => "GW_PASSWORD_CHANGE_CFM",
    PasswordChangeNtf = 0x3004 => "GW_PASSWORD_CHANGE_NTF",
}

impl Command {
    /// The 16-bit value sent on the wire.
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Returns true for frames sent from the client to the gateway.
    pub fn is_request(self) -> bool {
        self.name().ends_with("_REQ")
    }

    /// Returns true for unsolicited gateway notifications.
    pub fn is_notification(self) -> bool {
        self.name().ends_with("_NTF")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04x})", self.name(), self.id())
    }
}
