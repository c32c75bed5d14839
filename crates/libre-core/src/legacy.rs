// ── Named-parameter interface ──
//
// Automation runners hand over one flat mapping: `state`, connection
// settings, the device attributes and `query_params` as a list of
// single-key entries. This module maps that shape onto the typed API and
// back onto the `{changed, data}` / `{failed, msg}` result shapes.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::filter::{LegacyQueryEntry, QueryFilter};
use crate::model::{DesiredState, DeviceDescriptor};
use crate::reconcile::{ReconcileOutcome, Reconciler};
use crate::request;
use libre_api::ConnectionConfig;

/// Flat parameter mapping as supplied by an automation runner.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleParams {
    /// `present`, `absent` or `get`. Defaults to `get`, as the read-only
    /// info entry point never passes one.
    #[serde(default = "default_state")]
    pub state: String,
    pub api_url: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_token: SecretString,
    /// Verify the server certificate. Off unless set.
    #[serde(default)]
    pub ssl_verify: Option<bool>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(flatten)]
    pub device: DeviceDescriptor,
    #[serde(default)]
    pub query_params: Option<Vec<LegacyQueryEntry>>,
}

fn default_state() -> String {
    DesiredState::Get.to_string()
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Failure shape returned across the named-parameter boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleFailure {
    pub failed: bool,
    pub msg: String,
    /// HTTP-style status of a remote failure.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<u16>,
}

impl From<&CoreError> for ModuleFailure {
    fn from(err: &CoreError) -> Self {
        let msg = match err {
            // Remote failures surface the service's own wording.
            CoreError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self {
            failed: true,
            msg,
            status: err.status_code(),
        }
    }
}

impl ModuleParams {
    pub fn desired_state(&self) -> Result<DesiredState, CoreError> {
        self.state.parse().map_err(|_| CoreError::UnknownState {
            state: self.state.clone(),
        })
    }

    /// Connection settings carried in the mapping.
    pub fn connection(&self) -> Result<ConnectionConfig, CoreError> {
        let mut config = ConnectionConfig::new(
            &self.api_url,
            self.api_token.clone(),
            self.ssl_verify.unwrap_or(false),
        )?;
        if let Some(secs) = self.timeout {
            if secs == 0 {
                return Err(CoreError::InvalidParameter {
                    field: "timeout".into(),
                    reason: "must be at least one second".into(),
                });
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Flattened `query_params`; empty when none were given.
    pub fn query_filter(&self) -> Result<QueryFilter, CoreError> {
        match &self.query_params {
            Some(entries) => QueryFilter::from_legacy_entries(entries),
            None => Ok(QueryFilter::new()),
        }
    }

    /// Validate, connect and reconcile.
    ///
    /// Every local problem is reported before a client is built.
    pub async fn run(&self) -> Result<ReconcileOutcome, CoreError> {
        let state = self.desired_state()?;
        request::check(&self.device, state)?;

        let filter = if state == DesiredState::Get {
            self.query_filter()?
        } else {
            QueryFilter::new()
        };

        let reconciler = Reconciler::new(self.connection()?);
        reconciler.reconcile(state, &self.device, &filter).await
    }
}
