//! Circuit nodes: gates, observers and classical observers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::op::OpExpr;
use crate::qubit::{QubitId, QubitKey, shift_all, write_tuple};

/// Reset policy of an observer.
///
/// The service accepts either a boolean or an integer level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AutoReset {
    /// Boolean flag, rendered `True` / `False`.
    Flag(bool),
    /// Integer level.
    Level(i64),
}

impl Default for AutoReset {
    fn default() -> Self {
        AutoReset::Level(1)
    }
}

impl fmt::Display for AutoReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoReset::Flag(true) => f.write_str("True"),
            AutoReset::Flag(false) => f.write_str("False"),
            AutoReset::Level(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for AutoReset {
    fn from(v: bool) -> Self {
        AutoReset::Flag(v)
    }
}

impl From<i64> for AutoReset {
    fn from(v: i64) -> Self {
        AutoReset::Level(v)
    }
}

impl From<i32> for AutoReset {
    fn from(v: i32) -> Self {
        AutoReset::Level(i64::from(v))
    }
}

/// One circuit element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// An operation applied at a qubit address.
    Gate {
        /// Target address.
        key: QubitKey,
        /// The operation.
        op: OpExpr,
    },
    /// A measurement declaration on one qubit.
    Observer {
        /// Measured qubit.
        key: QubitId,
        /// Reset policy after measurement.
        auto_reset: AutoReset,
        /// Number of retained samples.
        keep: u32,
    },
    /// A named observable computed from several qubit sites.
    ClassicalObserver {
        /// Sites the observable is computed from.
        sites: Vec<QubitId>,
        /// Observable name.
        opname: String,
        /// Optional label for the result.
        name: Option<String>,
    },
}

impl Node {
    /// Create a gate node.
    pub fn gate(key: impl Into<QubitKey>, op: OpExpr) -> IrResult<Self> {
        Self::try_gate(Some(key.into()), Some(op))
    }

    /// Create a gate node from possibly-missing parts.
    pub fn try_gate(key: Option<QubitKey>, op: Option<OpExpr>) -> IrResult<Self> {
        let key = key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| IrError::MissingKey("gate requires a qubit key".into()))?;
        let op = op.ok_or_else(|| IrError::MissingKey("gate requires an operation".into()))?;
        Ok(Node::Gate { key, op })
    }

    /// Create an observer node.
    pub fn observer(key: impl Into<QubitId>, auto_reset: impl Into<AutoReset>, keep: u32) -> Self {
        Node::Observer {
            key: key.into(),
            auto_reset: auto_reset.into(),
            keep,
        }
    }

    /// Create an observer node from a possibly-missing key.
    pub fn try_observer(key: Option<QubitId>, auto_reset: AutoReset, keep: u32) -> IrResult<Self> {
        let key = key.ok_or_else(|| IrError::MissingKey("observer requires a qubit key".into()))?;
        Ok(Self::observer(key, auto_reset, keep))
    }

    /// Create a classical observer node.
    pub fn classical_observer(
        sites: impl IntoIterator<Item = QubitId>,
        opname: impl Into<String>,
        name: Option<String>,
    ) -> IrResult<Self> {
        Self::try_classical_observer(Some(sites.into_iter().collect()), opname, name)
    }

    /// Create a classical observer node from possibly-missing sites.
    pub fn try_classical_observer(
        sites: Option<Vec<QubitId>>,
        opname: impl Into<String>,
        name: Option<String>,
    ) -> IrResult<Self> {
        let sites = sites
            .filter(|s| !s.is_empty())
            .ok_or_else(|| IrError::MissingKey("classical observer requires sites".into()))?;
        Ok(Node::ClassicalObserver {
            sites,
            opname: opname.into(),
            name,
        })
    }

    /// True for the two measurement variants.
    pub fn is_observer(&self) -> bool {
        !matches!(self, Node::Gate { .. })
    }

    /// The operation, for gate nodes.
    pub fn op(&self) -> Option<&OpExpr> {
        match self {
            Node::Gate { op, .. } => Some(op),
            _ => None,
        }
    }

    /// Every qubit this node touches, in key order.
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Node::Gate { key, .. } => key.qubits(),
            Node::Observer { key, .. } => vec![*key],
            Node::ClassicalObserver { sites, .. } => sites.clone(),
        }
    }

    /// Variant name as it appears on the wire.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Gate { .. } => "Gate",
            Node::Observer { .. } => "Observer",
            Node::ClassicalObserver { .. } => "ClassicalObserver",
        }
    }

    /// Same node with every address moved by `distance`.
    pub fn shift(&self, distance: i64) -> IrResult<Self> {
        Ok(match self {
            Node::Gate { key, op } => Node::Gate {
                key: key.shift(distance)?,
                op: op.clone(),
            },
            Node::Observer {
                key,
                auto_reset,
                keep,
            } => Node::Observer {
                key: key.shift(distance)?,
                auto_reset: *auto_reset,
                keep: *keep,
            },
            Node::ClassicalObserver {
                sites,
                opname,
                name,
            } => Node::ClassicalObserver {
                sites: shift_all(sites, distance)?,
                opname: opname.clone(),
                name: name.clone(),
            },
        })
    }

    /// Transposed gate.
    pub fn transpose(&self) -> IrResult<Self> {
        self.map_op("transpose", OpExpr::transpose)
    }

    /// Adjoint gate.
    pub fn adjoint(&self) -> IrResult<Self> {
        self.map_op("adjoint", OpExpr::adjoint)
    }

    /// Conjugated gate.
    pub fn conj(&self) -> IrResult<Self> {
        self.map_op("conj", OpExpr::conj)
    }

    fn map_op(&self, what: &str, f: impl FnOnce(&OpExpr) -> OpExpr) -> IrResult<Self> {
        match self {
            Node::Gate { key, op } => Ok(Node::Gate {
                key: key.clone(),
                op: f(op),
            }),
            other => Err(IrError::UnsupportedOperation(format!(
                "{what} of {} node",
                other.kind_name()
            ))),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Gate { key, op } => write!(f, "Gate({key}, {op})"),
            Node::Observer {
                key,
                auto_reset,
                keep,
            } => write!(f, "Observer({key}, {auto_reset}, {keep})"),
            Node::ClassicalObserver {
                sites,
                opname,
                name,
            } => {
                f.write_str("ClassicalObserver(")?;
                write_tuple(f, sites)?;
                write!(f, ", {opname}")?;
                if let Some(name) = name {
                    write!(f, ", {name}")?;
                }
                f.write_str(")")
            }
        }
    }
}
