//! Adapter driven by the QI circuit virtual machine.
//!
//! The virtual machine builds one circuit at a time through this narrow
//! interface: initialise, append gates and measurements, fetch the result
//! as a JSON string, clear.

use qusim_ir::{AutoReset, NodeSequence, OpExpr, QubitId};
use tracing::debug;

use crate::auth::Auth;
use crate::error::{ClientError, ClientResult};
use crate::remote::RemoteCircuit;

/// Host the virtual machine talks to by default.
pub const QI_DEFAULT_IP: &str = "qcapi.supremacyfuture.com";

/// Circuit builder used by the QI circuit virtual machine.
#[derive(Debug)]
pub struct QiCircuitInterface {
    auth: Auth,
    circuit: Option<RemoteCircuit>,
}

impl Default for QiCircuitInterface {
    fn default() -> Self {
        Self::new(Auth::with_address(QI_DEFAULT_IP, 80, ""))
    }
}

impl QiCircuitInterface {
    /// Create an adapter with no circuit yet.
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            circuit: None,
        }
    }

    /// Number of qubits of the current circuit, 0 before initialisation.
    pub fn num_qubits(&self) -> usize {
        self.circuit.as_ref().map_or(0, |c| c.num_qubits())
    }

    /// The current circuit, if initialised.
    pub fn circuit(&self) -> Option<&RemoteCircuit> {
        self.circuit.as_ref()
    }

    fn circuit_mut(&mut self) -> ClientResult<&mut RemoteCircuit> {
        self.circuit.as_mut().ok_or(ClientError::NotInitialized)
    }

    /// Start a fresh interactive circuit over `num_qubits` qubits.
    pub fn init_circuit(&mut self, num_qubits: usize) -> ClientResult<()> {
        self.circuit = Some(RemoteCircuit::new(num_qubits, self.auth.clone(), true)?);
        debug!("QIcircuit: initialized a {}-qubit circuit", num_qubits);
        Ok(())
    }

    /// Append `op` on `qubit`.
    pub fn add_single_qubit_operation(&mut self, op: OpExpr, qubit: u32) -> ClientResult<()> {
        debug!("QIcircuit: added operation {} on qubit {}", op, qubit);
        self.circuit_mut()?.add(qubit, op)?;
        Ok(())
    }

    /// Append `op` on the ordered pair `(qubit0, qubit1)`.
    pub fn add_two_qubit_operation(
        &mut self,
        op: OpExpr,
        qubit0: u32,
        qubit1: u32,
    ) -> ClientResult<()> {
        debug!(
            "QIcircuit: added operation {} on qubits {} {}",
            op, qubit0, qubit1
        );
        self.circuit_mut()?.add((qubit0, qubit1), op)?;
        Ok(())
    }

    /// Measure `qubit`, resetting it afterwards and keeping one sample.
    pub fn add_measurement(&mut self, qubit: u32) -> ClientResult<()> {
        self.circuit_mut()?
            .add_observer(QubitId(qubit), AutoReset::Flag(true), 1)?;
        debug!("QIcircuit: added measurement on qubit {}", qubit);
        Ok(())
    }

    /// Run the circuit and return the result encoded as a JSON string.
    pub fn return_measurement_result(&mut self) -> ClientResult<String> {
        let result = self.circuit_mut()?.run()?;
        Ok(serde_json::to_string(&result)?)
    }

    /// Drop every node of the current circuit.
    pub fn clear_circuit(&mut self) -> ClientResult<()> {
        self.circuit_mut()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qusim_ir::ops;

    fn adapter() -> QiCircuitInterface {
        QiCircuitInterface::new(Auth::with_address("127.0.0.1", 9, "t"))
    }

    #[test]
    fn test_requires_init() {
        let mut qi = adapter();
        assert_eq!(qi.num_qubits(), 0);
        assert!(matches!(
            qi.add_single_qubit_operation(ops::x(), 0),
            Err(ClientError::NotInitialized)
        ));
        assert!(matches!(qi.add_measurement(0), Err(ClientError::NotInitialized)));
        assert!(matches!(
            qi.return_measurement_result(),
            Err(ClientError::NotInitialized)
        ));
        assert!(matches!(qi.clear_circuit(), Err(ClientError::NotInitialized)));
    }

    #[test]
    fn test_builds_circuit() {
        let mut qi = adapter();
        qi.init_circuit(2).unwrap();
        qi.add_single_qubit_operation(ops::h(), 0).unwrap();
        qi.add_two_qubit_operation(ops::cnot(), 0, 1).unwrap();
        qi.add_measurement(1).unwrap();

        let circuit = qi.circuit().unwrap();
        assert!(circuit.interactive());
        assert_eq!(
            circuit.packet().nodes,
            vec!["Gate(0, H)", "Gate((0, 1), CNOT)", "Observer(1, True, 1)"]
        );

        qi.clear_circuit().unwrap();
        assert!(qi.circuit().unwrap().is_empty());
        assert_eq!(qi.num_qubits(), 2);
    }

    #[test]
    fn test_default_host() {
        let qi = QiCircuitInterface::default();
        assert_eq!(qi.auth.endpoint(), "https://qcapi.supremacyfuture.com/api/v1/circuit/result/");
    }
}
