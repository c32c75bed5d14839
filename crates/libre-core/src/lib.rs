//! Desired-state reconciliation for LibreNMS devices.
//!
//! - **[`request`]** -- required attributes per [`DesiredState`] and the
//!   `POST devices` payload built from a [`DeviceDescriptor`].
//! - **[`Reconciler`]** -- resolves one desired state to at most one API call
//!   and turns LibreNMS's "already exists" / "not found" answers into
//!   unchanged results.
//! - **[`QueryFilter`]** -- ordered, last-write-wins filter for device listings.
//! - **[`legacy`]** -- the flat named-parameter interface used by automation
//!   runners, mapped onto the typed API.

pub mod error;
pub mod filter;
pub mod legacy;
pub mod model;
pub mod reconcile;
pub mod request;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::{ApiErrorKind, CoreError};
pub use filter::{LegacyQueryEntry, QueryFilter};
pub use legacy::{ModuleFailure, ModuleParams};
pub use model::{DesiredState, DeviceDescriptor, Field};
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use request::{build_payload, required_fields, validate};

pub use libre_api::{ConnectionConfig, TlsMode};
