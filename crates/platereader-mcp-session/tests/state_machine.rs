//! Property-based tests for the device session state machine.
//!
//! Uses proptest to run random operation sequences and verify that only
//! connect and disconnect ever transition the session state, and that no
//! sequence leaks a device handle.

use std::sync::Arc;

use proptest::prelude::*;

use platereader_mcp_core::{IntegrationMode, LuminescenceConfig};
use platereader_mcp_driver::testing::{MockSdk, ScriptedDevice};
use platereader_mcp_session::DeviceSession;

#[derive(Debug, Clone, Copy)]
enum Op {
    Connect,
    Disconnect,
    Info,
    Status,
    Uptime,
    Humidity,
    MeasureLuminescence,
    MeasureAbsorbance,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Connect),
        Just(Op::Disconnect),
        Just(Op::Info),
        Just(Op::Status),
        Just(Op::Uptime),
        Just(Op::Humidity),
        Just(Op::MeasureLuminescence),
        Just(Op::MeasureAbsorbance),
    ]
}

proptest! {
    /// For every operation sequence: connect is the only Disconnected ->
    /// Connected transition, disconnect the only way back, everything else
    /// reads the state without changing it, and at most one handle is ever
    /// live.
    #[test]
    fn only_connect_and_disconnect_transition_state(ops in prop::collection::vec(op(), 1..48)) {
        let sdk = Arc::new(MockSdk::new(vec![ScriptedDevice::combo("SN1")]));
        let mut session = DeviceSession::new(sdk.clone());
        let mut connected = false;

        for op in ops {
            match op {
                Op::Connect => {
                    let result = session.connect().map(|_| ());
                    prop_assert_eq!(result.is_ok(), !connected);
                    if result.is_ok() {
                        connected = true;
                    }
                }
                Op::Disconnect => {
                    let result = session.disconnect();
                    prop_assert_eq!(result.is_ok(), connected);
                    connected = false;
                }
                Op::Info => {
                    prop_assert_eq!(session.info().is_ok(), connected);
                }
                Op::Status => {
                    prop_assert_eq!(session.status().is_ok(), connected);
                }
                Op::Uptime => {
                    prop_assert_eq!(session.uptime().is_ok(), connected);
                }
                Op::Humidity => {
                    prop_assert_eq!(session.humidity().is_ok(), connected);
                }
                Op::MeasureLuminescence => {
                    let config =
                        LuminescenceConfig::new(IntegrationMode::Sensitive, None).unwrap();
                    prop_assert_eq!(
                        session.measure_luminescence(&config).is_ok(),
                        connected
                    );
                }
                Op::MeasureAbsorbance => {
                    prop_assert_eq!(session.measure_absorbance().is_ok(), connected);
                }
            }

            prop_assert_eq!(session.is_connected(), connected);
            prop_assert!(sdk.live_handles().len() <= 1);
            prop_assert_eq!(!sdk.live_handles().is_empty(), connected);
        }
    }

    /// Disconnecting always frees exactly the handles that were opened for
    /// successful connects.
    #[test]
    fn no_sequence_leaks_handles(connect_cycles in 1usize..8) {
        let sdk = Arc::new(MockSdk::new(vec![ScriptedDevice::lum96("SN1")]));
        let mut session = DeviceSession::new(sdk.clone());

        for _ in 0..connect_cycles {
            session.connect().unwrap();
            session.disconnect().unwrap();
        }

        prop_assert_eq!(sdk.opened_handles().len(), connect_cycles);
        prop_assert_eq!(sdk.freed_handles().len(), connect_cycles);
        prop_assert!(sdk.live_handles().is_empty());
    }
}
