// ── Reconciliation ──
//
// One desired state resolves to at most one API call. Validation failures
// stop before the network; "already there" / "already gone" answers from
// LibreNMS are reported as unchanged, not as failures.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use libre_api::classify;
use libre_api::{ConnectionConfig, LibreClient, PostOutcome};

use crate::error::CoreError;
use crate::filter::QueryFilter;
use crate::model::{DesiredState, DeviceDescriptor};
use crate::request;

/// Result of one reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Whether the remote inventory was modified.
    pub changed: bool,
    /// Decoded response, or the service's explanation for a no-op.
    pub data: Value,
}

impl ReconcileOutcome {
    pub fn changed(data: Value) -> Self {
        Self {
            changed: true,
            data,
        }
    }

    pub fn unchanged(data: Value) -> Self {
        Self {
            changed: false,
            data,
        }
    }
}

/// Maps a desired state onto the LibreNMS devices API.
pub struct Reconciler {
    client: LibreClient,
}

impl Reconciler {
    /// Build a reconciler that owns a fresh client for `config`.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            client: LibreClient::new(config),
        }
    }

    /// Build a reconciler around an existing client.
    pub fn with_client(client: LibreClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &LibreClient {
        &self.client
    }

    /// Drive `device` towards `state`.
    ///
    /// `filter` only applies to [`DesiredState::Get`].
    pub async fn reconcile(
        &self,
        state: DesiredState,
        device: &DeviceDescriptor,
        filter: &QueryFilter,
    ) -> Result<ReconcileOutcome, CoreError> {
        request::check(device, state)?;
        debug!(%state, hostname = ?device.hostname, "reconciling device");

        let outcome = match state {
            DesiredState::Present => self.ensure_present(device).await?,
            DesiredState::Absent => {
                // `check` guarantees a non-empty identity for absent.
                let identity = device.identity().unwrap_or_default();
                self.ensure_absent(identity).await?
            }
            DesiredState::Get => self.query(device.identity(), filter).await?,
        };

        if state.is_mutating() {
            info!(%state, changed = outcome.changed, "device reconciled");
        } else {
            debug!("device query answered");
        }
        Ok(outcome)
    }

    async fn ensure_present(&self, device: &DeviceDescriptor) -> Result<ReconcileOutcome, CoreError> {
        let payload = request::build_payload(device);
        match self.client.add_device(&payload).await? {
            PostOutcome::Created(body) => Ok(ReconcileOutcome::changed(body)),
            PostOutcome::AlreadyExists { message, .. } => {
                debug!(hostname = ?device.hostname, "device already present");
                Ok(ReconcileOutcome::unchanged(Value::String(message)))
            }
        }
    }

    async fn ensure_absent(&self, identity: &str) -> Result<ReconcileOutcome, CoreError> {
        match self.client.delete_device(identity).await {
            Ok(body) => Ok(ReconcileOutcome::changed(body)),
            Err(err) if classify::is_already_absent(&err) => {
                debug!(identity, "device already absent");
                Ok(ReconcileOutcome::unchanged(Value::String(
                    err.detail().into_owned(),
                )))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn query(
        &self,
        identity: Option<&str>,
        filter: &QueryFilter,
    ) -> Result<ReconcileOutcome, CoreError> {
        let pairs = filter.to_pairs();
        let query = (!pairs.is_empty()).then_some(pairs.as_slice());

        let body = match identity {
            Some(identity) => self.client.get_device(identity, query).await?,
            None => self.client.list_devices(query).await?,
        };
        Ok(ReconcileOutcome::unchanged(body))
    }
}
