//! Execution service REST client.
//!
//! The service exposes a single resource, `POST /api/v1/circuit/result/`,
//! which both executes circuits and receives the session termination notice.

use std::fmt;

use qusim_ir::{EndPacket, WirePacket};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::auth::Auth;
use crate::error::{ClientError, ClientResult};

/// Outcome of a session termination notice.
///
/// Termination is best effort: the notice is reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndNotice {
    /// The service answered 200.
    Acknowledged,
    /// The service answered with another status, typically because the
    /// session had already ended.
    Rejected { status: u16 },
    /// The request did not complete.
    Failed(String),
}

impl EndNotice {
    /// True when the service acknowledged the notice.
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, EndNotice::Acknowledged)
    }
}

impl fmt::Display for EndNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndNotice::Acknowledged => f.write_str("session ended"),
            EndNotice::Rejected { status } => {
                write!(f, "session end rejected ({status}): the session may already be closed")
            }
            EndNotice::Failed(reason) => write!(f, "session end failed: {reason}"),
        }
    }
}

/// Blocking client for the execution service.
pub struct CircuitClient {
    client: Client,
    auth: Auth,
}

impl fmt::Debug for CircuitClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitClient")
            .field("endpoint", &self.auth.endpoint())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl CircuitClient {
    /// Create a client for the service described by `auth`.
    pub fn new(auth: Auth) -> ClientResult<Self> {
        let client = Client::builder().build().map_err(ClientError::Http)?;
        Ok(Self { client, auth })
    }

    /// The credentials in use.
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Headers sent with every request.
    fn headers(&self) -> ClientResult<HeaderMap> {
        let mut token =
            HeaderValue::from_str(&self.auth.token).map_err(|_| ClientError::InvalidToken)?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, token);
        Ok(headers)
    }

    /// POST a JSON body to the execution resource.
    fn post(&self, body: &impl Serialize) -> ClientResult<Response> {
        let url = self.auth.endpoint();
        debug!("POST {}", url);

        let resp = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(body)
            .send()?;

        Ok(resp)
    }

    /// Map the response status to the result or a typed error.
    fn handle_response(&self, response: Response) -> ClientResult<Value> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Authentication);
        }

        let text = response.text()?;
        if status != StatusCode::OK {
            return Err(ClientError::Request {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| ClientError::Request {
            status: status.as_u16(),
            message: format!("response is not valid JSON: {e}"),
        })?;
        match body {
            Value::Object(mut fields) => {
                fields.remove("message").ok_or_else(|| ClientError::Request {
                    status: status.as_u16(),
                    message: "response has no 'message' field".into(),
                })
            }
            _ => Err(ClientError::Request {
                status: status.as_u16(),
                message: "response is not a JSON object".into(),
            }),
        }
    }

    /// Submit a circuit for execution and return the service's `message`.
    #[instrument(skip(self, packet), fields(nodes = packet.nodes.len(), qubits = packet.state.len()))]
    pub fn execute(&self, packet: &WirePacket) -> ClientResult<Value> {
        debug!("Submitting circuit");
        let resp = self.post(packet)?;
        self.handle_response(resp)
    }

    /// Send the `{"end": true}` termination notice.
    #[instrument(skip(self))]
    pub fn end_session(&self) -> EndNotice {
        let notice = match self.post(&EndPacket::default()) {
            Ok(resp) if resp.status() == StatusCode::OK => EndNotice::Acknowledged,
            Ok(resp) => EndNotice::Rejected {
                status: resp.status().as_u16(),
            },
            Err(e) => EndNotice::Failed(e.to_string()),
        };

        if notice.is_acknowledged() {
            info!("{}", notice);
        } else {
            warn!("{}", notice);
        }
        notice
    }
}

/// Detail of an error response: the body's `message` field, or the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => match fields.get("message") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_message_field() {
        assert_eq!(error_message(r#"{"message": "internal error"}"#), "internal error");
        assert_eq!(error_message(r#"{"message": {"code": 3}}"#), r#"{"code":3}"#);
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(r#"{"detail": "x"}"#), r#"{"detail": "x"}"#);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let client = CircuitClient::new(Auth::new("bad\ntoken")).unwrap();
        assert!(matches!(client.headers(), Err(ClientError::InvalidToken)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = CircuitClient::new(Auth::new("secret-token")).unwrap();
        assert!(!format!("{client:?}").contains("secret-token"));
    }

    #[test]
    fn test_end_notice_display() {
        assert_eq!(EndNotice::Acknowledged.to_string(), "session ended");
        assert!(EndNotice::Rejected { status: 409 }.to_string().contains("409"));
    }
}
