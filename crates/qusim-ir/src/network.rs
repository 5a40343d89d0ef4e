//! Ordered node containers.
//!
//! [`NodeSequence`] carries everything the two containers share: composition,
//! slicing, shifting and the transpose / adjoint / conjugate transforms.
//! [`Network`] is the composable sub-circuit and only holds gates;
//! [`Circuit`](crate::Circuit) additionally declares measurements.

use std::fmt;
use std::ops::{Bound, Index, RangeBounds};

use crate::error::{IrError, IrResult};
use crate::node::{AutoReset, Node};
use crate::op::OpExpr;
use crate::qubit::{QubitId, QubitKey};

pub(crate) mod sealed {
    use crate::node::Node;

    /// Raw node storage. Not nameable outside the crate, so every insertion
    /// goes through the checked [`NodeSequence`](super::NodeSequence) methods.
    pub trait Storage: Sized {
        fn nodes_mut(&mut self) -> &mut Vec<Node>;

        /// A container of the same kind and metadata holding `nodes`.
        fn with_nodes(&self, nodes: Vec<Node>) -> Self;
    }
}

/// Shared behaviour of ordered node containers.
///
/// Insertion order is execution order. Transpose and adjoint reverse it;
/// conjugation and shifting preserve it.
///
/// The node list can only be changed through the checked mutators, so a
/// [`Network`] never holds an observer:
///
/// ```compile_fail
/// use qusim_ir::{Network, Node, NodeSequence};
///
/// let mut net = Network::new();
/// net.nodes_mut().push(Node::observer(0u32, 1, 1));
/// ```
///
/// ```compile_fail
/// use qusim_ir::{Network, Node, NodeSequence};
///
/// let net = Network::new().with_nodes(vec![Node::observer(1u32, 1, 1)]);
/// ```
pub trait NodeSequence: sealed::Storage {
    /// Whether observer nodes may be inserted.
    const ACCEPTS_OBSERVERS: bool;

    /// The nodes in execution order.
    fn nodes(&self) -> &[Node];

    /// Number of nodes.
    fn len(&self) -> usize {
        self.nodes().len()
    }

    /// True when there are no nodes.
    fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }

    /// Iterate over the nodes in order.
    fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes().iter()
    }

    /// Node at `index`.
    fn get(&self, index: usize) -> Option<&Node> {
        self.nodes().get(index)
    }

    /// Append a node.
    fn push(&mut self, node: Node) -> IrResult<&mut Self> {
        check_accepts::<Self>(&node)?;
        self.nodes_mut().push(node);
        Ok(self)
    }

    /// Replace the node at `index`.
    fn set(&mut self, index: usize, node: Node) -> IrResult<()> {
        check_accepts::<Self>(&node)?;
        let len = self.len();
        let slot = self
            .nodes_mut()
            .get_mut(index)
            .ok_or(IrError::IndexOutOfRange { index, len })?;
        *slot = node;
        Ok(())
    }

    /// Append a gate.
    fn add(&mut self, key: impl Into<QubitKey>, op: OpExpr) -> IrResult<&mut Self> {
        let node = Node::gate(key, op)?;
        self.push(node)
    }

    /// Append a measurement on `key`.
    fn add_observer(
        &mut self,
        key: impl Into<QubitId>,
        auto_reset: impl Into<AutoReset>,
        keep: u32,
    ) -> IrResult<&mut Self> {
        if !Self::ACCEPTS_OBSERVERS {
            return Err(IrError::UnsupportedOperation(
                "add_observer on a network without measurement support".into(),
            ));
        }
        self.push(Node::observer(key, auto_reset, keep))
    }

    /// Append a classical observable over `sites`.
    fn add_classical_observer(
        &mut self,
        sites: impl IntoIterator<Item = QubitId>,
        opname: impl Into<String>,
        name: Option<String>,
    ) -> IrResult<&mut Self> {
        if !Self::ACCEPTS_OBSERVERS {
            return Err(IrError::UnsupportedOperation(
                "add_classical_observer on a network without measurement support".into(),
            ));
        }
        let node = Node::classical_observer(sites, opname, name)?;
        self.push(node)
    }

    /// Append `nodes` in order. Pass `other.iter().cloned()` to concatenate
    /// another container.
    fn add_network(&mut self, nodes: impl IntoIterator<Item = Node>) -> IrResult<&mut Self> {
        let nodes: Vec<Node> = nodes.into_iter().collect();
        for node in &nodes {
            check_accepts::<Self>(node)?;
        }
        self.nodes_mut().extend(nodes);
        Ok(self)
    }

    /// A same-kind container holding the nodes in `range`, in order.
    fn slice(&self, range: impl RangeBounds<usize>) -> IrResult<Self> {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        if end > len {
            return Err(IrError::IndexOutOfRange { index: end, len });
        }
        if start > end {
            return Err(IrError::IndexOutOfRange { index: start, len });
        }
        Ok(self.with_nodes(self.nodes()[start..end].to_vec()))
    }

    /// A same-kind container holding the nodes in reverse order.
    fn reversed(&self) -> Self {
        self.with_nodes(self.iter().rev().cloned().collect())
    }

    /// Every node moved by `distance`, order preserved.
    fn shift(&self, distance: i64) -> IrResult<Self> {
        let nodes = self
            .iter()
            .map(|n| n.shift(distance))
            .collect::<IrResult<Vec<_>>>()?;
        Ok(self.with_nodes(nodes))
    }

    /// Transpose: reverse the order and transpose each node.
    fn transpose(&self) -> IrResult<Self> {
        let nodes = self
            .iter()
            .rev()
            .map(Node::transpose)
            .collect::<IrResult<Vec<_>>>()?;
        Ok(self.with_nodes(nodes))
    }

    /// Adjoint: reverse the order and take the adjoint of each node.
    fn adjoint(&self) -> IrResult<Self> {
        let nodes = self
            .iter()
            .rev()
            .map(Node::adjoint)
            .collect::<IrResult<Vec<_>>>()?;
        Ok(self.with_nodes(nodes))
    }

    /// Conjugate every node, order preserved.
    fn conj(&self) -> IrResult<Self> {
        let nodes = self
            .iter()
            .map(Node::conj)
            .collect::<IrResult<Vec<_>>>()?;
        Ok(self.with_nodes(nodes))
    }

    /// Per-node wire strings in node order.
    fn serialize(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }

    /// Remove every node.
    fn clear(&mut self) {
        self.nodes_mut().clear();
    }
}

fn check_accepts<S: NodeSequence>(node: &Node) -> IrResult<()> {
    if node.is_observer() && !S::ACCEPTS_OBSERVERS {
        return Err(IrError::UnsupportedOperation(format!(
            "{} node in a network without measurement support",
            node.kind_name()
        )));
    }
    Ok(())
}

/// Write a node list as `[a, b, c]`.
pub(crate) fn fmt_nodes(f: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    f.write_str("[")?;
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{node}")?;
    }
    f.write_str("]")
}

/// A composable sequence of gates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    nodes: Vec<Node>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeSequence for Network {
    const ACCEPTS_OBSERVERS: bool = false;

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl sealed::Storage for Network {
    fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    fn with_nodes(&self, nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

impl Index<usize> for Network {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.nodes[index]
    }
}

impl<'a> IntoIterator for &'a Network {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_nodes(f, &self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::ops;

    fn sample() -> Network {
        let mut net = Network::new();
        net.add(0, ops::h())
            .unwrap()
            .add((0, 1), ops::cnot())
            .unwrap()
            .add(1, ops::rx().call(0.5).unwrap())
            .unwrap();
        net
    }

    #[test]
    fn test_add_and_index() {
        let net = sample();
        assert_eq!(net.len(), 3);
        assert_eq!(net[1].to_string(), "Gate((0, 1), CNOT)");
        assert!(net.get(3).is_none());
    }

    #[test]
    fn test_network_rejects_observers() {
        let mut net = Network::new();
        assert!(matches!(
            net.add_observer(QubitId(0), 1, 1),
            Err(IrError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            net.add_classical_observer([QubitId(0)], "Z", None),
            Err(IrError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            net.push(Node::observer(QubitId(0), 1, 1)),
            Err(IrError::UnsupportedOperation(_))
        ));
        assert!(net.is_empty());
    }

    #[test]
    fn test_network_bulk_mutators_reject_observers() {
        let mut net = sample();
        let measured = vec![Node::gate(0, ops::x()).unwrap(), Node::observer(QubitId(0), 1, 1)];
        assert!(matches!(
            net.add_network(measured),
            Err(IrError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            net.set(0, Node::observer(QubitId(0), 1, 1)),
            Err(IrError::UnsupportedOperation(_))
        ));
        assert_eq!(net, sample());
        assert!(net.iter().all(|n| !n.is_observer()));
    }

    #[test]
    fn test_add_network_concatenates() {
        let mut a = sample();
        let b = sample();
        a.add_network(b.iter().cloned()).unwrap();
        assert_eq!(a.len(), 6);
        assert_eq!(a.slice(3..).unwrap(), b);
    }

    #[test]
    fn test_slice_and_reverse() {
        let net = sample();
        let head = net.slice(..2).unwrap();
        assert_eq!(head.serialize(), vec!["Gate(0, H)", "Gate((0, 1), CNOT)"]);

        let rev = net.reversed();
        assert_eq!(rev[0], net[2]);
        assert_eq!(rev[2], net[0]);

        assert!(matches!(
            net.slice(1..5),
            Err(IrError::IndexOutOfRange { index: 5, len: 3 })
        ));
    }

    #[test]
    fn test_transpose_reverses_order() {
        let net = sample();
        let t = net.transpose().unwrap();
        assert_eq!(
            t.serialize(),
            vec!["Gate(1, Rx(0.5).T)", "Gate((0, 1), CNOT.T)", "Gate(0, H.T)"]
        );
        assert_eq!(t.transpose().unwrap(), net);
    }

    #[test]
    fn test_adjoint_equals_transpose_conj() {
        let net = sample();
        assert_eq!(
            net.adjoint().unwrap(),
            net.transpose().unwrap().conj().unwrap()
        );
    }

    #[test]
    fn test_conj_keeps_order() {
        let net = sample();
        let c = net.conj().unwrap();
        assert_eq!(c[0].to_string(), "Gate(0, H.conj())");
        assert_eq!(c[2].to_string(), "Gate(1, Rx(0.5).conj())");
    }

    #[test]
    fn test_shift() {
        let net = sample().shift(2).unwrap();
        assert_eq!(net[1].to_string(), "Gate((2, 3), CNOT)");
    }

    #[test]
    fn test_set_and_clear() {
        let mut net = sample();
        net.set(0, Node::gate(0, ops::x()).unwrap()).unwrap();
        assert_eq!(net[0].to_string(), "Gate(0, X)");
        assert!(net.set(9, Node::gate(0, ops::x()).unwrap()).is_err());
        net.clear();
        assert!(net.is_empty());
    }

    #[test]
    fn test_display() {
        let mut net = Network::new();
        net.add(0, ops::x()).unwrap().add(1, ops::y()).unwrap();
        assert_eq!(net.to_string(), "[Gate(0, X), Gate(1, Y)]");
    }
}
