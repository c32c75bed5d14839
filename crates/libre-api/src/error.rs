use std::borrow::Cow;

use thiserror::Error;

/// Status reported for a request that hit the client-side timeout.
pub const TIMEOUT_STATUS: u16 = 408;

/// Status reported for failures that never produced an HTTP response.
pub const TRANSPORT_STATUS: u16 = 500;

/// Top-level error type for the `libre-api` crate.
///
/// Every variant can be viewed as a classified remote failure: a numeric
/// status code plus a human-readable detail string (see [`Error::status_code`]
/// and [`Error::detail`]). `libre-core` inspects that view to decide whether a
/// failure means "already converged".
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Connection-level failure (DNS, connection refused, TLS handshake).
    #[error("HTTP transport error: {message}")]
    Transport { message: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API token cannot be carried in an HTTP header.
    #[error("Invalid API token: {0}")]
    InvalidToken(String),

    /// TLS configuration or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote ──────────────────────────────────────────────────────
    /// The service answered with a status it does not treat as success.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        /// Decoded JSON body, when the service sent one.
        body: Option<serde_json::Value>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A success response carried a body that is not JSON.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Numeric status code of this failure.
    ///
    /// Timeouts report 408; anything that never reached the service reports 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Timeout { .. } => TIMEOUT_STATUS,
            Self::Http { status, .. } => *status,
            Self::Transport { .. }
            | Self::InvalidUrl(_)
            | Self::InvalidToken(_)
            | Self::Tls(_)
            | Self::Deserialization { .. } => TRANSPORT_STATUS,
        }
    }

    /// Human-readable detail string, without the status prefix.
    pub fn detail(&self) -> Cow<'_, str> {
        match self {
            Self::Timeout { .. } => Cow::Borrowed("request timed out"),
            Self::Http { message, .. } | Self::Transport { message } => Cow::Borrowed(message),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Build from a `reqwest` failure that happened before a response arrived.
    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            return Self::Timeout { timeout_secs };
        }
        Self::Transport {
            message: error_chain(err),
        }
    }
}

/// Flatten an error and its sources into one line.
///
/// `reqwest` keeps the useful part ("connection refused", "invalid peer
/// certificate") in the source chain, not in its own `Display`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_reports_408() {
        let err = Error::Timeout { timeout_secs: 30 };
        assert_eq!(err.status_code(), 408);
        assert_eq!(err.detail(), "request timed out");
    }

    #[test]
    fn http_error_keeps_status_and_message() {
        let err = Error::Http {
            status: 422,
            message: "Missing fields to add device".into(),
            body: None,
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.detail(), "Missing fields to add device");
    }

    #[test]
    fn transport_failures_report_500() {
        let err = Error::Transport {
            message: "error sending request: connection refused".into(),
        };
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.detail(), "error sending request: connection refused");

        let err = Error::Tls("invalid CA cert".into());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.detail(), "TLS error: invalid CA cert");
    }

    #[test]
    fn error_chain_skips_repeated_text() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        assert_eq!(error_chain(&io), "connection refused");
    }
}
