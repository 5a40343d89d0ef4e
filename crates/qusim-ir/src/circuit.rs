//! Measurable circuit container.

use std::fmt;
use std::ops::Index;

use crate::network::{NodeSequence, fmt_nodes, sealed};
use crate::node::Node;
use crate::state::QState;

/// An ordered circuit over a fixed number of qubits.
///
/// Unlike [`Network`](crate::Network), a circuit may declare measurements
/// and carries the initial-state declaration sent along with its nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    nodes: Vec<Node>,
    state: QState,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            nodes: Vec::new(),
            state: QState::new(num_qubits),
        }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The initial-state declaration.
    pub fn state(&self) -> &QState {
        &self.state
    }

    /// Mutable access to the initial-state declaration.
    pub fn state_mut(&mut self) -> &mut QState {
        &mut self.state
    }

    /// Put every qubit's declared initial value back to zero.
    pub fn reset_state(&mut self) {
        self.state.reset();
    }
}

impl NodeSequence for Circuit {
    const ACCEPTS_OBSERVERS: bool = true;

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl sealed::Storage for Circuit {
    fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    fn with_nodes(&self, nodes: Vec<Node>) -> Self {
        Self {
            num_qubits: self.num_qubits,
            nodes,
            state: self.state.clone(),
        }
    }
}

impl Index<usize> for Circuit {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.nodes[index]
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_nodes(f, &self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IrError;
    use crate::network::Network;
    use crate::op::ops;
    use crate::qubit::QubitId;
    use crate::state::StateValue;

    fn bell() -> Circuit {
        let mut c = Circuit::new(2);
        c.add(0, ops::h())
            .unwrap()
            .add((0, 1), ops::cnot())
            .unwrap()
            .add_observer(QubitId(0), 1, 1)
            .unwrap()
            .add_observer(QubitId(1), 1, 1)
            .unwrap();
        c
    }

    #[test]
    fn test_serialize() {
        let c = bell();
        assert_eq!(
            c.serialize(),
            vec![
                "Gate(0, H)",
                "Gate((0, 1), CNOT)",
                "Observer(0, 1, 1)",
                "Observer(1, 1, 1)"
            ]
        );
    }

    #[test]
    fn test_classical_observer() {
        let mut c = Circuit::new(2);
        c.add_classical_observer([QubitId(0), QubitId(1)], "ZZ", Some("parity".into()))
            .unwrap();
        assert_eq!(c[0].to_string(), "ClassicalObserver((0, 1), ZZ, parity)");
    }

    #[test]
    fn test_clear_keeps_state() {
        let mut c = bell();
        c.state_mut().set(1, 1).unwrap();
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.num_qubits(), 2);
        assert_eq!(c.state().get(1), Some(&StateValue::Basis(1)));
    }

    #[test]
    fn test_slice_keeps_metadata() {
        let mut c = bell();
        c.state_mut().set(0, 1).unwrap();
        let head = c.slice(0..2).unwrap();
        assert_eq!(head.len(), 2);
        assert_eq!(head.num_qubits(), 2);
        assert_eq!(head.state(), c.state());
    }

    #[test]
    fn test_measured_circuit_cannot_transpose() {
        assert!(matches!(
            bell().transpose(),
            Err(IrError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_add_network() {
        let mut sub = Network::new();
        sub.add(0, ops::h()).unwrap().add(1, ops::h()).unwrap();

        let mut c = Circuit::new(2);
        c.add_network(sub.iter().cloned()).unwrap();
        c.add_network(sub.shift(0).unwrap().iter().cloned()).unwrap();
        c.add_observer(QubitId(0), true, 1).unwrap();
        assert_eq!(c.len(), 5);
        assert_eq!(
            c.to_string(),
            "[Gate(0, H), Gate(1, H), Gate(0, H), Gate(1, H), Observer(0, True, 1)]"
        );
    }

    #[test]
    fn test_reversed_slice() {
        let c = bell();
        let rev = c.reversed();
        assert_eq!(rev[0].to_string(), "Observer(1, 1, 1)");
        assert_eq!(rev[3].to_string(), "Gate(0, H)");
    }
}
