// Connection configuration for building the reqwest::Client.
//
// One `ConnectionConfig` describes one LibreNMS server: where it lives, which
// token to present, how strictly to check its certificate, and how long to
// wait for an answer.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use url::{ParseError, Url};

use crate::error::Error;

/// Header carrying the API token on every request.
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Path prefix of the v0 API.
const API_PREFIX: [&str; 2] = ["api", "v0"];

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the built-in root certificate store.
    System,
    /// Trust an additional CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate. LibreNMS installs are often self-signed.
    #[default]
    DangerAcceptInvalid,
}

impl TlsMode {
    /// Map the `ssl_verify` switch onto a mode.
    pub fn from_verify(ssl_verify: bool) -> Self {
        if ssl_verify {
            Self::System
        } else {
            Self::DangerAcceptInvalid
        }
    }

    /// Whether certificates are checked at all.
    pub fn verifies(&self) -> bool {
        !matches!(self, Self::DangerAcceptInvalid)
    }
}

/// Everything needed to talk to one LibreNMS server.
///
/// Immutable once handed to a [`LibreClient`](crate::LibreClient).
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Server root, e.g. `https://librenms.example.com`.
    pub api_url: Url,
    /// API token sent as `X-Auth-Token`.
    pub api_token: SecretString,
    /// Certificate verification.
    pub tls: TlsMode,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConnectionConfig {
    /// Build a config from the raw caller parameters.
    pub fn new(api_url: &str, api_token: SecretString, ssl_verify: bool) -> Result<Self, Error> {
        Ok(Self {
            api_url: Url::parse(api_url)?,
            api_token,
            tls: TlsMode::from_verify(ssl_verify),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the TLS mode.
    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    /// Build the full URL for an API endpoint: `{api_url}/api/v0/{segments..}`.
    ///
    /// Each segment is percent-escaped, so a `/`, `?` or `#` inside a device
    /// name stays part of that name.
    pub fn endpoint_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    /// Token header value, marked sensitive so it never shows up in logs.
    pub(crate) fn auth_header(&self) -> Result<HeaderValue, Error> {
        let mut token = HeaderValue::from_str(self.api_token.expose_secret())
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        token.set_sensitive(true);
        Ok(token)
    }

    /// Build a `reqwest::Client` with this config's timeout and TLS mode.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("librectl/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
