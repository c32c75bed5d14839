// ── Request building ──
//
// Turns a desired state plus a device descriptor into the exact payload
// LibreNMS expects, and decides which attributes each state needs.

use serde_json::{Map, Value};
use strum::IntoEnumIterator;

use crate::error::CoreError;
use crate::model::{DesiredState, DeviceDescriptor, Field};

/// Attributes that must be present for `state`.
pub fn required_fields(state: DesiredState) -> &'static [Field] {
    state.required_fields()
}

/// Like [`required_fields`], for a state name that may not parse.
///
/// Unknown names require nothing here; they are rejected separately when
/// the state itself is parsed.
pub fn required_fields_named(state: &str) -> &'static [Field] {
    state
        .parse::<DesiredState>()
        .map(DesiredState::required_fields)
        .unwrap_or_default()
}

/// Required attributes that are unset for `state`, in declaration order.
pub fn missing_fields(device: &DeviceDescriptor, state: DesiredState) -> Vec<Field> {
    required_fields(state)
        .iter()
        .copied()
        .filter(|field| !device.is_set(*field))
        .collect()
}

/// True iff every attribute `state` requires is present and non-null.
pub fn validate(device: &DeviceDescriptor, state: DesiredState) -> bool {
    missing_fields(device, state).is_empty()
}

/// [`validate`] as a `Result`, carrying the missing field names.
pub fn check(device: &DeviceDescriptor, state: DesiredState) -> Result<(), CoreError> {
    let missing = missing_fields(device, state);
    if missing.is_empty() {
        return Ok(());
    }
    Err(CoreError::Validation {
        state,
        required: required_fields(state),
        missing,
    })
}

/// Payload for `POST devices`.
///
/// Every known attribute is emitted under its wire name, unset ones as
/// `null`. Values pass through untouched; LibreNMS applies its own defaults.
pub fn build_payload(device: &DeviceDescriptor) -> Value {
    let payload: Map<String, Value> = Field::iter()
        .map(|field| (field.to_string(), device.value_of(field)))
        .collect();
    Value::Object(payload)
}
