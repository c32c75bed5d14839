// LibreNMS device endpoints
//
// `POST devices`, `DELETE devices/{id}`, `GET devices/{id}` and
// `GET devices`. The id is a hostname, an IP address or a numeric device id.

use serde_json::Value;
use tracing::debug;

use crate::client::{LibreClient, PostOutcome, QueryPairs};
use crate::error::Error;

/// Collection endpoint for devices.
pub const DEVICES: &str = "devices";

impl LibreClient {
    /// Add a device.
    ///
    /// `POST /api/v0/devices` with the full device payload.
    pub async fn add_device(&self, payload: &Value) -> Result<PostOutcome, Error> {
        debug!("adding device");
        self.post(&[DEVICES], payload).await
    }

    /// Delete a device by hostname or id.
    ///
    /// `DELETE /api/v0/devices/{identity}`
    pub async fn delete_device(&self, identity: &str) -> Result<Value, Error> {
        debug!(identity, "deleting device");
        self.delete(&[DEVICES, identity], None).await
    }

    /// Fetch one device by hostname or id.
    ///
    /// `GET /api/v0/devices/{identity}`
    pub async fn get_device(
        &self,
        identity: &str,
        query: Option<&QueryPairs>,
    ) -> Result<Value, Error> {
        debug!(identity, "fetching device");
        self.get(&[DEVICES, identity], query).await
    }

    /// List devices, optionally narrowed by `type`/`query` filters.
    ///
    /// `GET /api/v0/devices`
    pub async fn list_devices(&self, query: Option<&QueryPairs>) -> Result<Value, Error> {
        debug!(?query, "listing devices");
        self.get(&[DEVICES], query).await
    }
}
