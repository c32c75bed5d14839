// ── Core error types ──
//
// Local failures (validation, unknown state, bad filter) stop an invocation
// before any network call. Remote failures keep the status and message the
// service sent, unchanged.

use serde::Serialize;
use strum::Display;
use thiserror::Error;

use crate::model::{DesiredState, Field};

/// Broad class of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// The request hit the client-side timeout.
    Timeout,
    /// The service answered with an error status.
    RemoteHttp,
    /// No answer: DNS, connection refused, TLS handshake.
    Transport,
    /// The connection settings themselves are unusable.
    Configuration,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local errors ─────────────────────────────────────────────────
    #[error(
        "Required argument(s) missing for state={state}, requires: {}",
        field_list(.required)
    )]
    Validation {
        state: DesiredState,
        required: &'static [Field],
        missing: Vec<Field>,
    },

    #[error("Invalid state provided: {state}")]
    UnknownState { state: String },

    #[error("Invalid query filter entry {entry:?}: {reason}")]
    InvalidQueryFilter { entry: String, reason: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("LibreNMS API error (HTTP {status}): {message}")]
    Api {
        kind: ApiErrorKind,
        status: u16,
        message: String,
    },
}

impl CoreError {
    /// Was this detected before any network call?
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Api { .. })
    }

    /// HTTP-style status code, for remote failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn field_list(fields: &[Field]) -> String {
    let names: Vec<&str> = fields.iter().map(|f| <&'static str>::from(*f)).collect();
    format!("[{}]", names.join(", "))
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<libre_api::Error> for CoreError {
    fn from(err: libre_api::Error) -> Self {
        let kind = match &err {
            libre_api::Error::Timeout { .. } => ApiErrorKind::Timeout,
            libre_api::Error::Http { .. } => ApiErrorKind::RemoteHttp,
            libre_api::Error::Transport { .. } | libre_api::Error::Deserialization { .. } => {
                ApiErrorKind::Transport
            }
            libre_api::Error::InvalidUrl(_)
            | libre_api::Error::InvalidToken(_)
            | libre_api::Error::Tls(_) => ApiErrorKind::Configuration,
        };
        CoreError::Api {
            kind,
            status: err.status_code(),
            message: err.detail().into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_required_fields() {
        let err = CoreError::Validation {
            state: DesiredState::Present,
            required: DesiredState::Present.required_fields(),
            missing: vec![Field::SnmpVersion],
        };
        assert_eq!(
            err.to_string(),
            "Required argument(s) missing for state=present, requires: [hostname, snmpver]"
        );
        assert!(err.is_local());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn remote_error_keeps_status_and_message() {
        let err: CoreError = libre_api::Error::Http {
            status: 403,
            message: "Insufficient permissions".into(),
            body: None,
        }
        .into();
        match &err {
            CoreError::Api {
                kind,
                status,
                message,
            } => {
                assert_eq!(*kind, ApiErrorKind::RemoteHttp);
                assert_eq!(*status, 403);
                assert_eq!(message, "Insufficient permissions");
            }
            other => panic!("expected Api, got {other:?}"),
        }
        assert_eq!(err.status_code(), Some(403));
    }

    #[test]
    fn timeout_maps_to_408() {
        let err: CoreError = libre_api::Error::Timeout { timeout_secs: 5 }.into();
        assert_eq!(
            err.to_string(),
            "LibreNMS API error (HTTP 408): request timed out"
        );
    }

    #[test]
    fn bad_url_is_a_configuration_failure() {
        let parse_err = url_error();
        let err: CoreError = parse_err.into();
        assert!(matches!(
            err,
            CoreError::Api {
                kind: ApiErrorKind::Configuration,
                status: 500,
                ..
            }
        ));
    }

    fn url_error() -> libre_api::Error {
        libre_api::ConnectionConfig::new(
            "not a url",
            secrecy::SecretString::from("t".to_string()),
            false,
        )
        .expect_err("relative URL must fail")
    }
}
