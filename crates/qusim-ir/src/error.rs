//! Error types for the IR crate.

use thiserror::Error;

use crate::qubit::QubitId;

/// Errors that can occur while building or transforming circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A node was constructed without a required key, operation or sites.
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// The container or node does not support this operation.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An operation expression was applied to an argument of the wrong type.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A non-parameterizable operation expression was invoked.
    #[error("Operation '{0}' is not callable")]
    NotCallable(String),

    /// Initial-state assignment with a value that is not an int, tuple or list.
    #[error("Invalid state value: {0}")]
    InvalidStateValue(String),

    /// Shifting an address moved it outside the addressable range.
    #[error("Shifting qubit {address} by {distance} leaves the addressable range")]
    AddressOutOfRange {
        /// The address being shifted.
        address: QubitId,
        /// The requested shift distance.
        distance: i64,
    },

    /// State index beyond the circuit's qubit count.
    #[error("Qubit {index} out of range for a {num_qubits}-qubit state")]
    QubitOutOfRange {
        /// The requested qubit index.
        index: usize,
        /// Number of qubits in the state.
        num_qubits: usize,
    },

    /// Node index or slice bound beyond the container length.
    #[error("Index {index} out of range for {len} nodes")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of nodes in the container.
        len: usize,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
