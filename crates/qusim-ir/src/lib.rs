//! qusim circuit intermediate representation
//!
//! This crate holds the symbolic description of a circuit that is shipped to
//! the qusim execution service. Nothing here evaluates a gate: operations are
//! symbolic expressions, and the service owns the numerics.
//!
//! # Core Components
//!
//! - **Addressing**: [`QubitId`] and [`QubitKey`] (single qubit or ordered tuple)
//! - **Operations**: [`OpExpr`] with composition, application, transpose,
//!   adjoint and conjugate; the standard vocabulary lives in [`ops`]
//! - **Nodes**: [`Node`], the closed set of gate, observer and classical
//!   observer elements
//! - **Containers**: [`Network`] (gates only) and [`Circuit`] (gates and
//!   measurements, plus the initial [`QState`]), sharing [`NodeSequence`]
//! - **Wire format**: [`WirePacket`] and [`EndPacket`]
//!
//! # Example: Bell pair
//!
//! ```rust
//! use qusim_ir::{Circuit, NodeSequence, QubitId, WirePacket, ops};
//!
//! let mut circuit = Circuit::new(2);
//! circuit.add(0, ops::h()).unwrap();
//! circuit.add((0, 1), ops::cnot()).unwrap();
//! circuit.add_observer(QubitId(0), 1, 1).unwrap();
//! circuit.add_observer(QubitId(1), 1, 1).unwrap();
//!
//! let packet = WirePacket::from_circuit(&circuit);
//! assert_eq!(packet.nodes[1], "Gate((0, 1), CNOT)");
//! assert_eq!(packet.state.len(), 2);
//! ```
//!
//! # Example: Transforms
//!
//! ```rust
//! use qusim_ir::{Network, NodeSequence, ops};
//!
//! let mut net = Network::new();
//! net.add(0, ops::rx().call(0.5).unwrap()).unwrap();
//! net.add(1, ops::s()).unwrap();
//!
//! let adj = net.adjoint().unwrap();
//! assert_eq!(adj.serialize(), vec!["Gate(1, S.T.conj())", "Gate(0, Rx(0.5).T.conj())"]);
//! assert_eq!(net.transpose().unwrap().transpose().unwrap(), net);
//! ```

pub mod circuit;
pub mod error;
pub mod network;
pub mod node;
pub mod op;
pub mod qubit;
pub mod state;
pub mod wire;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use network::{Network, NodeSequence};
pub use node::{AutoReset, Node};
pub use op::{OpArg, OpExpr, OpKind, OpStep, ops};
pub use qubit::{QubitId, QubitKey};
pub use state::{Amplitude, QState, StateValue};
pub use wire::{EndPacket, WirePacket};
