//! Request bodies sent to the execution service.

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::network::NodeSequence;
use crate::state::StateValue;

/// Body of an execution request: initial state and node strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePacket {
    /// Per-qubit initial values in index order.
    pub state: Vec<StateValue>,
    /// Per-node wire strings in circuit order.
    pub nodes: Vec<String>,
}

impl WirePacket {
    /// Snapshot the current nodes and state of `circuit`.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self {
            state: circuit.state().serialize(),
            nodes: circuit.serialize(),
        }
    }
}

impl From<&Circuit> for WirePacket {
    fn from(circuit: &Circuit) -> Self {
        Self::from_circuit(circuit)
    }
}

/// Body of the session termination notice, `{"end": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndPacket {
    /// Always true.
    pub end: bool,
}

impl Default for EndPacket {
    fn default() -> Self {
        Self { end: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::ops;
    use crate::qubit::QubitId;
    use serde_json::json;

    #[test]
    fn test_packet_json() {
        let mut c = Circuit::new(3);
        c.add(2, ops::x()).unwrap();
        c.add_observer(QubitId(1), 1, 1).unwrap();
        c.state_mut().set(0, 1).unwrap();

        let packet = WirePacket::from_circuit(&c);
        assert_eq!(
            serde_json::to_value(&packet).unwrap(),
            json!({
                "state": [1, 0, 0],
                "nodes": ["Gate(2, X)", "Observer(1, 1, 1)"]
            })
        );
    }

    #[test]
    fn test_empty_circuit_packet() {
        let packet = WirePacket::from(&Circuit::new(0));
        assert_eq!(
            serde_json::to_string(&packet).unwrap(),
            r#"{"state":[],"nodes":[]}"#
        );
    }

    #[test]
    fn test_end_packet() {
        assert_eq!(
            serde_json::to_string(&EndPacket::default()).unwrap(),
            r#"{"end":true}"#
        );
    }
}
