//! Qubit addresses and multi-qubit keys.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Address of a single qubit.
///
/// Renders as its bare index, which is the form the execution service
/// expects inside node strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Move this address by `distance`.
    pub fn shift(self, distance: i64) -> IrResult<Self> {
        i64::from(self.0)
            .checked_add(distance)
            .and_then(|v| u32::try_from(v).ok())
            .map(QubitId)
            .ok_or(IrError::AddressOutOfRange {
                address: self,
                distance,
            })
    }

    /// The address as a container index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// The qubit address of a gate: one qubit, or an ordered tuple of qubits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QubitKey {
    /// A single-qubit address.
    Single(QubitId),
    /// An N-qubit address; order is significant (control first).
    Tuple(Vec<QubitId>),
}

impl QubitKey {
    /// Number of qubits addressed.
    pub fn arity(&self) -> usize {
        match self {
            QubitKey::Single(_) => 1,
            QubitKey::Tuple(qs) => qs.len(),
        }
    }

    /// True for an empty tuple, which carries no address at all.
    pub fn is_empty(&self) -> bool {
        self.arity() == 0
    }

    /// The addressed qubits in key order.
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            QubitKey::Single(q) => vec![*q],
            QubitKey::Tuple(qs) => qs.clone(),
        }
    }

    /// Move every address in the key by `distance`, keeping its shape.
    pub fn shift(&self, distance: i64) -> IrResult<Self> {
        match self {
            QubitKey::Single(q) => Ok(QubitKey::Single(q.shift(distance)?)),
            QubitKey::Tuple(qs) => Ok(QubitKey::Tuple(shift_all(qs, distance)?)),
        }
    }
}

impl fmt::Display for QubitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QubitKey::Single(q) => write!(f, "{q}"),
            QubitKey::Tuple(qs) => write_tuple(f, qs),
        }
    }
}

impl From<QubitId> for QubitKey {
    fn from(q: QubitId) -> Self {
        QubitKey::Single(q)
    }
}

impl From<u32> for QubitKey {
    fn from(q: u32) -> Self {
        QubitKey::Single(QubitId(q))
    }
}

impl From<(u32, u32)> for QubitKey {
    fn from((a, b): (u32, u32)) -> Self {
        QubitKey::Tuple(vec![QubitId(a), QubitId(b)])
    }
}

impl From<(u32, u32, u32)> for QubitKey {
    fn from((a, b, c): (u32, u32, u32)) -> Self {
        QubitKey::Tuple(vec![QubitId(a), QubitId(b), QubitId(c)])
    }
}

impl<const N: usize> From<[u32; N]> for QubitKey {
    fn from(qs: [u32; N]) -> Self {
        QubitKey::Tuple(qs.into_iter().map(QubitId).collect())
    }
}

impl From<Vec<u32>> for QubitKey {
    fn from(qs: Vec<u32>) -> Self {
        QubitKey::Tuple(qs.into_iter().map(QubitId).collect())
    }
}

impl From<Vec<QubitId>> for QubitKey {
    fn from(qs: Vec<QubitId>) -> Self {
        QubitKey::Tuple(qs)
    }
}

pub(crate) fn shift_all(qs: &[QubitId], distance: i64) -> IrResult<Vec<QubitId>> {
    qs.iter().map(|q| q.shift(distance)).collect()
}

/// Write a Python-style tuple: `(0, 1)`, `(0,)`, `()`.
pub(crate) fn write_tuple(f: &mut fmt::Formatter<'_>, qs: &[QubitId]) -> fmt::Result {
    match qs {
        [only] => write!(f, "({only},)"),
        _ => {
            write!(f, "(")?;
            for (i, q) in qs.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{q}")?;
            }
            write!(f, ")")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(QubitKey::from(2).to_string(), "2");
        assert_eq!(QubitKey::from((0, 1)).to_string(), "(0, 1)");
        assert_eq!(QubitKey::from([4]).to_string(), "(4,)");
        assert_eq!(QubitKey::from((0, 1, 2)).to_string(), "(0, 1, 2)");
    }

    #[test]
    fn test_key_arity() {
        assert_eq!(QubitKey::from(3).arity(), 1);
        assert_eq!(QubitKey::from((0, 1)).arity(), 2);
        assert!(QubitKey::Tuple(vec![]).is_empty());
    }

    #[test]
    fn test_shift_keeps_shape() {
        let key = QubitKey::from((0, 3));
        assert_eq!(key.shift(2).unwrap(), QubitKey::from((2, 5)));
        assert_eq!(QubitKey::from(1).shift(-1).unwrap(), QubitKey::from(0));
    }

    #[test]
    fn test_shift_below_zero_fails() {
        let err = QubitId(1).shift(-2).unwrap_err();
        assert!(matches!(
            err,
            IrError::AddressOutOfRange {
                address: QubitId(1),
                distance: -2
            }
        ));
    }
}
