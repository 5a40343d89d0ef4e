//! Credentials for the execution service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default service host.
pub const DEFAULT_IP: &str = "120.79.17.42";

/// Default service port. Port 80 selects the TLS endpoint.
pub const DEFAULT_PORT: u16 = 80;

/// Path of the circuit execution resource.
pub const RESULT_PATH: &str = "/api/v1/circuit/result/";

/// Host, port and opaque token of the execution service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    /// Service host name or address.
    pub ip: String,
    /// Pre-provisioned token, sent verbatim as `Authorization`.
    pub token: String,
    /// Service port.
    pub port: u16,
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("ip", &self.ip)
            .field("token", &"[REDACTED]")
            .field("port", &self.port)
            .finish()
    }
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            ip: DEFAULT_IP.to_string(),
            token: String::new(),
            port: DEFAULT_PORT,
        }
    }
}

impl Auth {
    /// Credentials for the default host and port.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Credentials for an explicit host and port.
    pub fn with_address(ip: impl Into<String>, port: u16, token: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            token: token.into(),
            port,
        }
    }

    /// Full URL of the execution resource.
    ///
    /// Port 80 maps to `https://{ip}`; any other port to plain
    /// `http://{ip}:{port}`.
    pub fn endpoint(&self) -> String {
        if self.port == DEFAULT_PORT {
            format!("https://{}{RESULT_PATH}", self.ip)
        } else {
            format!("http://{}:{}{RESULT_PATH}", self.ip, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_80_uses_https() {
        let auth = Auth::new("t");
        assert_eq!(auth.endpoint(), "https://120.79.17.42/api/v1/circuit/result/");
    }

    #[test]
    fn test_other_port_uses_http() {
        let auth = Auth::with_address("localhost", 8000, "t");
        assert_eq!(auth.endpoint(), "http://localhost:8000/api/v1/circuit/result/");
    }

    #[test]
    fn test_debug_redacts_token() {
        let auth = Auth::new("super-secret");
        let debug = format!("{auth:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
