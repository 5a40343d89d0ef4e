//! qusim execution client
//!
//! Submits circuits built with [`qusim_ir`] to the qusim execution service
//! and maps the service's answers to typed errors.
//!
//! The protocol is a single blocking `POST /api/v1/circuit/result/` carrying
//! `{"state": [...], "nodes": [...]}`. A 200 answer carries the result in its
//! `message` field; 401 is an authentication failure; any other status is a
//! request failure with the server's message. When a session ends, the same
//! resource receives `{"end": true}`.
//!
//! # Example
//!
//! ```no_run
//! use qusim_client::{Auth, RemoteCircuit};
//! use qusim_ir::{NodeSequence, QubitId, ops};
//!
//! # fn main() -> qusim_client::ClientResult<()> {
//! let mut circuit = RemoteCircuit::new(2, Auth::new("my-token"), false)?;
//! let (result, notice) = circuit.scoped(|c| {
//!     c.add(0, ops::h())?;
//!     c.add((0, 1), ops::cnot())?;
//!     c.add_observer(QubitId(0), 1, 1)?;
//!     c.run()
//! });
//! println!("{notice}");
//! println!("{}", result?);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod interface;
pub mod remote;

pub use api::{CircuitClient, EndNotice};
pub use auth::Auth;
pub use config::{ClientConfig, ConfigError, LoggingConfig, ServerConfig};
pub use error::{ClientError, ClientResult};
pub use interface::QiCircuitInterface;
pub use remote::{RemoteCircuit, Session};
