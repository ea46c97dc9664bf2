//! House status monitor: while enabled the gateway pushes
//! GW_NODE_STATE_POSITION_CHANGED_NTF for every node movement.

empty_frame!(HouseStatusMonitorEnableRequest => HouseStatusMonitorEnableReq);
empty_frame!(HouseStatusMonitorEnableConfirmation => HouseStatusMonitorEnableCfm);
empty_frame!(HouseStatusMonitorDisableRequest => HouseStatusMonitorDisableReq);
empty_frame!(HouseStatusMonitorDisableConfirmation => HouseStatusMonitorDisableCfm);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::test_util::round_trip;
    use crate::frames::Frame;

    #[test]
    fn enable_disable_round_trip() {
        let (bytes, decoded) = round_trip(HouseStatusMonitorEnableRequest);
        assert_eq!(bytes, vec![0x00, 0x03, 0x02, 0x40, 0x41]);
        assert_eq!(decoded, Frame::HouseStatusMonitorEnableRequest(HouseStatusMonitorEnableRequest));

        let (bytes, _) = round_trip(HouseStatusMonitorDisableConfirmation);
        assert_eq!(bytes, vec![0x00, 0x03, 0x02, 0x43, 0x42]);
    }
}
