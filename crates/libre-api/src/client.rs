// LibreNMS API HTTP client
//
// Wraps `reqwest::Client` with `/api/v0/` URL construction, token injection
// and status classification. Device endpoints are inherent methods in
// `devices.rs`; this module stays focused on transport mechanics.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

use crate::classify;
use crate::error::Error;
use crate::transport::{AUTH_HEADER, ConnectionConfig};

/// Path below `/api/v0/`, one entry per segment.
pub type Endpoint<'a> = &'a [&'a str];

/// Query string pairs, sent in order.
pub type QueryPairs = [(String, String)];

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Responses ────────────────────────────────────────────────────────

/// A response that made it past status classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    /// Decoded JSON body; `Null` when the body was empty.
    pub body: Value,
}

/// Result of a POST that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PostOutcome {
    /// The service accepted the new resource.
    Created(Value),
    /// The service refused because the resource is already there.
    AlreadyExists {
        message: String,
        /// Decoded error body, or the message itself when there was none.
        body: Value,
    },
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the LibreNMS v0 API.
///
/// The underlying `reqwest::Client` is built on first use and reused for
/// every later call on this instance. It is pooled internally, so one
/// `LibreClient` may be shared across tasks.
pub struct LibreClient {
    config: ConnectionConfig,
    http: OnceCell<reqwest::Client>,
}

impl LibreClient {
    /// Create a client. No connection is made until the first request.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            http: OnceCell::new(),
        }
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The caller owns the client's timeout and TLS settings.
    pub fn with_client(config: ConnectionConfig, http: reqwest::Client) -> Self {
        Self {
            config,
            http: OnceCell::new_with(Some(http)),
        }
    }

    /// The connection settings this client was built from.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Whether the underlying HTTP session has been created yet.
    pub fn is_connected(&self) -> bool {
        self.http.initialized()
    }

    async fn session(&self) -> Result<&reqwest::Client, Error> {
        self.http
            .get_or_try_init(|| async { self.config.build_client() })
            .await
    }

    fn url(&self, endpoint: Endpoint<'_>) -> Result<Url, Error> {
        self.config.endpoint_url(endpoint)
    }

    // ── Raw invocation ───────────────────────────────────────────────

    /// Send one request and classify the outcome.
    ///
    /// Statuses of 400 and above become [`Error::Http`] carrying the
    /// server's `message`. Timeouts become [`Error::Timeout`]; any other
    /// failure before a response becomes [`Error::Transport`]. There are
    /// no retries.
    pub async fn invoke(
        &self,
        method: Method,
        endpoint: Endpoint<'_>,
        payload: Option<&Value>,
        query: Option<&QueryPairs>,
    ) -> Result<RawResponse, Error> {
        let url = self.url(endpoint)?;
        let timeout_secs = self.config.timeout.as_secs();
        debug!(%method, %url, ?query, "invoking LibreNMS API");

        let mut request = self
            .session()
            .await?
            .request(method.clone(), url)
            .header(AUTH_HEADER, self.config.auth_header()?);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&e, timeout_secs))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::from_reqwest(&e, timeout_secs))?;
        debug!(%method, status = status.as_u16(), "LibreNMS API responded");

        if status.is_client_error() || status.is_server_error() {
            return Err(http_error(status, &text));
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: text.clone(),
            })?
        };

        Ok(RawResponse { status, body })
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    /// GET an endpoint. Only 200 counts as success.
    pub async fn get(
        &self,
        endpoint: Endpoint<'_>,
        query: Option<&QueryPairs>,
    ) -> Result<Value, Error> {
        let resp = self.invoke(Method::GET, endpoint, None, query).await?;
        expect_ok(resp)
    }

    /// POST a JSON payload.
    ///
    /// 200 is success. A 500 whose message says the resource already exists
    /// is returned as [`PostOutcome::AlreadyExists`] instead of an error;
    /// every other status fails.
    pub async fn post(&self, endpoint: Endpoint<'_>, payload: &Value) -> Result<PostOutcome, Error> {
        match self.invoke(Method::POST, endpoint, Some(payload), None).await {
            Ok(resp) => expect_ok(resp).map(PostOutcome::Created),
            Err(Error::Http {
                status,
                message,
                body,
            }) if classify::is_already_present(status, &message) => {
                debug!(?endpoint, "resource already exists");
                let body = body.unwrap_or_else(|| Value::String(message.clone()));
                Ok(PostOutcome::AlreadyExists { message, body })
            }
            Err(e) => Err(e),
        }
    }

    /// DELETE an endpoint, optionally with a JSON payload. Only 200 counts as success.
    pub async fn delete(
        &self,
        endpoint: Endpoint<'_>,
        payload: Option<&Value>,
    ) -> Result<Value, Error> {
        let resp = self.invoke(Method::DELETE, endpoint, payload, None).await?;
        expect_ok(resp)
    }
}

// ── Response helpers ─────────────────────────────────────────────────

/// Accept only HTTP 200.
fn expect_ok(resp: RawResponse) -> Result<Value, Error> {
    if resp.status == StatusCode::OK {
        return Ok(resp.body);
    }
    let message = message_from_value(&resp.body).unwrap_or_else(|| {
        format!("unexpected status {}", resp.status.as_u16())
    });
    Err(Error::Http {
        status: resp.status.as_u16(),
        message,
        body: Some(resp.body),
    })
}

/// Build an [`Error::Http`] from a failed response body.
///
/// The message is the body's `message` field when present, the raw text
/// otherwise, and the status reason phrase for an empty body.
fn http_error(status: StatusCode, text: &str) -> Error {
    let body: Option<Value> = serde_json::from_str(text).ok();
    let message = serde_json::from_str::<ErrorResponse>(text)
        .ok()
        .and_then(|e| e.message)
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        });

    Error::Http {
        status: status.as_u16(),
        message,
        body,
    }
}

fn message_from_value(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}
