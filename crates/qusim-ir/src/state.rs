//! Initial-state declaration of a circuit.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IrError, IrResult};

/// Declared initial value of one qubit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    /// Computational basis state (0 or 1).
    Basis(i64),
    /// Explicit amplitude vector for a custom initial state.
    Vector(Vec<Amplitude>),
}

/// One entry of a custom initial-state vector.
///
/// Complex amplitudes go on the wire as `[re, im]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amplitude {
    Real(f64),
    Complex(Complex64),
}

impl From<f64> for Amplitude {
    fn from(v: f64) -> Self {
        Amplitude::Real(v)
    }
}

impl From<Complex64> for Amplitude {
    fn from(v: Complex64) -> Self {
        Amplitude::Complex(v)
    }
}

impl TryFrom<&Value> for Amplitude {
    type Error = IrError;

    fn try_from(value: &Value) -> IrResult<Self> {
        if let Some(re) = value.as_f64() {
            return Ok(Amplitude::Real(re));
        }
        match value.as_array().map(Vec::as_slice) {
            Some([re, im]) => match (re.as_f64(), im.as_f64()) {
                (Some(re), Some(im)) => Ok(Amplitude::Complex(Complex64::new(re, im))),
                _ => Err(IrError::InvalidStateValue(format!(
                    "{value} is not a complex amplitude"
                ))),
            },
            _ => Err(IrError::InvalidStateValue(format!(
                "{value} is not a number or an [re, im] pair"
            ))),
        }
    }
}

impl Default for StateValue {
    fn default() -> Self {
        StateValue::Basis(0)
    }
}

impl From<i64> for StateValue {
    fn from(v: i64) -> Self {
        StateValue::Basis(v)
    }
}

impl From<i32> for StateValue {
    fn from(v: i32) -> Self {
        StateValue::Basis(i64::from(v))
    }
}

impl From<Vec<f64>> for StateValue {
    fn from(v: Vec<f64>) -> Self {
        StateValue::Vector(v.into_iter().map(Amplitude::Real).collect())
    }
}

impl From<Vec<Complex64>> for StateValue {
    fn from(v: Vec<Complex64>) -> Self {
        StateValue::Vector(v.into_iter().map(Amplitude::Complex).collect())
    }
}

impl<const N: usize> From<[f64; N]> for StateValue {
    fn from(v: [f64; N]) -> Self {
        StateValue::Vector(v.into_iter().map(Amplitude::Real).collect())
    }
}

impl<const N: usize> From<[Complex64; N]> for StateValue {
    fn from(v: [Complex64; N]) -> Self {
        StateValue::Vector(v.into_iter().map(Amplitude::Complex).collect())
    }
}

impl TryFrom<Value> for StateValue {
    type Error = IrError;

    fn try_from(value: Value) -> IrResult<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(StateValue::Basis)
                .ok_or_else(|| IrError::InvalidStateValue(format!("{n} is not an integer"))),
            Value::Array(items) => items
                .iter()
                .map(Amplitude::try_from)
                .collect::<IrResult<Vec<_>>>()
                .map(StateValue::Vector),
            other => Err(IrError::InvalidStateValue(format!(
                "expected an integer or a list, got {other}"
            ))),
        }
    }
}

/// Per-qubit initial values, indexed by qubit address.
///
/// The length is fixed at construction and always equals the circuit's
/// qubit count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QState {
    values: Vec<StateValue>,
}

impl QState {
    /// A state of `num_qubits` qubits, all in `Basis(0)`.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            values: vec![StateValue::default(); num_qubits],
        }
    }

    /// Number of qubits.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for a zero-qubit state.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Declared value of qubit `index`.
    pub fn get(&self, index: usize) -> Option<&StateValue> {
        self.values.get(index)
    }

    /// Declare the initial value of qubit `index`.
    pub fn set(&mut self, index: usize, value: impl Into<StateValue>) -> IrResult<()> {
        let num_qubits = self.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(IrError::QubitOutOfRange { index, num_qubits })?;
        *slot = value.into();
        Ok(())
    }

    /// Declare the initial value of qubit `index` from untyped JSON.
    pub fn set_json(&mut self, index: usize, value: Value) -> IrResult<()> {
        let value = StateValue::try_from(value)?;
        self.set(index, value)
    }

    /// Put every qubit back to `Basis(0)`.
    pub fn reset(&mut self) {
        self.values.fill(StateValue::default());
    }

    /// The values in qubit-index order, as sent on the wire.
    pub fn serialize(&self) -> Vec<StateValue> {
        self.values.clone()
    }

    /// Borrow the values in qubit-index order.
    pub fn values(&self) -> &[StateValue] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_state_is_all_zero() {
        let state = QState::new(3);
        assert_eq!(state.len(), 3);
        assert_eq!(serde_json::to_value(state.serialize()).unwrap(), json!([0, 0, 0]));
    }

    #[test]
    fn test_set_basis_and_vector() {
        let mut state = QState::new(2);
        state.set(0, 1).unwrap();
        state.set(1, [0.6, 0.8]).unwrap();
        assert_eq!(
            serde_json::to_value(state.serialize()).unwrap(),
            json!([1, [0.6, 0.8]])
        );
    }

    #[test]
    fn test_set_out_of_range() {
        let mut state = QState::new(2);
        assert!(matches!(
            state.set(2, 1),
            Err(IrError::QubitOutOfRange {
                index: 2,
                num_qubits: 2
            })
        ));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_set_json_type_checks() {
        let mut state = QState::new(1);
        state.set_json(0, json!([1, 0])).unwrap();
        assert_eq!(state.get(0), Some(&StateValue::from(vec![1.0, 0.0])));

        for bad in [
            json!("one"),
            json!(0.5),
            json!(null),
            json!({"a": 1}),
            json!(["x"]),
            json!([[1, 2, 3]]),
        ] {
            assert!(matches!(
                state.set_json(0, bad),
                Err(IrError::InvalidStateValue(_))
            ));
        }
    }

    #[test]
    fn test_complex_amplitudes() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let mut state = QState::new(2);
        state
            .set(0, [Complex64::new(h, 0.0), Complex64::new(0.0, h)])
            .unwrap();
        state.set_json(1, json!([0.6, [0.0, 0.8]])).unwrap();

        assert_eq!(
            state.get(1),
            Some(&StateValue::Vector(vec![
                Amplitude::Real(0.6),
                Amplitude::Complex(Complex64::new(0.0, 0.8)),
            ]))
        );
        assert_eq!(
            serde_json::to_value(state.serialize()).unwrap(),
            json!([[[h, 0.0], [0.0, h]], [0.6, [0.0, 0.8]]])
        );
    }

    #[test]
    fn test_reset() {
        let mut state = QState::new(2);
        state.set(1, 1).unwrap();
        state.reset();
        assert_eq!(state, QState::new(2));
    }
}
