// ── Desired state ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::device::Field;

/// What the caller wants to be true about a device.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// The device is registered (`POST devices`).
    Present,
    /// The device is not registered (`DELETE devices/{id}`).
    Absent,
    /// Read one device or the device list (`GET devices[/{id}]`).
    Get,
}

impl DesiredState {
    /// Attributes that must be set before this state can be reconciled.
    pub fn required_fields(self) -> &'static [Field] {
        match self {
            Self::Present => &[Field::Hostname, Field::SnmpVersion],
            Self::Absent => &[Field::Hostname],
            Self::Get => &[],
        }
    }

    /// Whether reconciling this state can change the remote inventory.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("present".parse::<DesiredState>(), Ok(DesiredState::Present));
        assert_eq!("absent".parse::<DesiredState>(), Ok(DesiredState::Absent));
        assert_eq!("get".parse::<DesiredState>(), Ok(DesiredState::Get));
        assert!("latest".parse::<DesiredState>().is_err());
        assert!("Present".parse::<DesiredState>().is_err());
    }

    #[test]
    fn displays_lowercase() {
        assert_eq!(DesiredState::Absent.to_string(), "absent");
    }

    #[test]
    fn only_get_is_read_only() {
        assert!(DesiredState::Present.is_mutating());
        assert!(DesiredState::Absent.is_mutating());
        assert!(!DesiredState::Get.is_mutating());
    }
}
