//! Circuits bound to the execution service, and the session scope.

use std::ops::{Deref, DerefMut};

use qusim_ir::{Circuit, WirePacket};
use serde_json::Value;
use tracing::instrument;

use crate::api::{CircuitClient, EndNotice};
use crate::auth::Auth;
use crate::error::ClientResult;

/// A [`Circuit`] together with the credentials it executes with.
///
/// Dereferences to the circuit, so every container operation is available
/// directly. Use [`session`](Self::session) or [`scoped`](Self::scoped) so the
/// service is told when the work is done.
#[derive(Debug)]
pub struct RemoteCircuit {
    circuit: Circuit,
    client: CircuitClient,
    interactive: bool,
}

impl RemoteCircuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: usize, auth: Auth, interactive: bool) -> ClientResult<Self> {
        Ok(Self {
            circuit: Circuit::new(num_qubits),
            client: CircuitClient::new(auth)?,
            interactive,
        })
    }

    /// Bind an existing circuit to the service.
    pub fn from_circuit(circuit: Circuit, auth: Auth, interactive: bool) -> ClientResult<Self> {
        Ok(Self {
            circuit,
            client: CircuitClient::new(auth)?,
            interactive,
        })
    }

    pub fn auth(&self) -> &Auth {
        self.client.auth()
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// The request body `run` would send right now.
    pub fn packet(&self) -> WirePacket {
        WirePacket::from_circuit(&self.circuit)
    }

    /// Execute the current nodes and state, returning the service's result.
    ///
    /// The circuit is not modified and may be run again.
    #[instrument(skip(self), fields(qubits = self.circuit.num_qubits()))]
    pub fn run(&self) -> ClientResult<Value> {
        self.client.execute(&self.packet())
    }

    /// Send the termination notice now, outside any session.
    pub fn end_session(&self) -> EndNotice {
        self.client.end_session()
    }

    /// Open a session. The state declaration is reset to all zeros, and the
    /// termination notice is sent when the session ends.
    pub fn session(&mut self) -> Session<'_> {
        self.circuit.reset_state();
        Session {
            remote: self,
            ended: false,
        }
    }

    /// Run `f` inside a session and return its value with the termination
    /// notice. The notice is also sent if `f` panics.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut RemoteCircuit) -> T) -> (T, EndNotice) {
        let mut session = self.session();
        let value = f(&mut *session);
        let notice = session.finish();
        (value, notice)
    }
}

impl Deref for RemoteCircuit {
    type Target = Circuit;

    fn deref(&self) -> &Circuit {
        &self.circuit
    }
}

impl DerefMut for RemoteCircuit {
    fn deref_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }
}

/// Scope guard over a [`RemoteCircuit`].
///
/// The termination notice is sent exactly once: by [`finish`](Self::finish),
/// or on drop (including unwinding) if `finish` was never called.
#[derive(Debug)]
pub struct Session<'a> {
    remote: &'a mut RemoteCircuit,
    ended: bool,
}

impl Session<'_> {
    /// End the session and return the notice.
    pub fn finish(mut self) -> EndNotice {
        self.ended = true;
        self.remote.end_session()
    }
}

impl Deref for Session<'_> {
    type Target = RemoteCircuit;

    fn deref(&self) -> &RemoteCircuit {
        self.remote
    }
}

impl DerefMut for Session<'_> {
    fn deref_mut(&mut self) -> &mut RemoteCircuit {
        self.remote
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if !self.ended {
            self.ended = true;
            self.remote.end_session();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qusim_ir::{NodeSequence, QubitId, StateValue, ops};

    fn remote() -> RemoteCircuit {
        RemoteCircuit::new(3, Auth::with_address("127.0.0.1", 9, "t"), false).unwrap()
    }

    #[test]
    fn test_derefs_to_circuit() {
        let mut rc = remote();
        rc.add(2, ops::x()).unwrap();
        rc.add_observer(QubitId(1), 1, 1).unwrap();
        assert_eq!(rc.len(), 2);
        assert_eq!(rc.num_qubits(), 3);
        assert_eq!(rc.packet().nodes, vec!["Gate(2, X)", "Observer(1, 1, 1)"]);
    }

    #[test]
    fn test_clear_keeps_credentials_and_state() {
        let mut rc = remote();
        rc.add(0, ops::h()).unwrap();
        rc.state_mut().set(0, 1).unwrap();
        rc.clear();
        assert!(rc.is_empty());
        assert_eq!(rc.state().get(0), Some(&StateValue::Basis(1)));
        assert_eq!(rc.auth().port, 9);
    }
}
