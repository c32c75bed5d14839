// ── Device domain types ──

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Every attribute LibreNMS accepts when adding a device.
///
/// The string form is the exact key used on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Field {
    #[strum(serialize = "hostname")]
    #[serde(rename = "hostname")]
    Hostname,
    #[strum(serialize = "display")]
    #[serde(rename = "display")]
    Display,
    #[strum(serialize = "port")]
    #[serde(rename = "port")]
    Port,
    #[strum(serialize = "transport")]
    #[serde(rename = "transport")]
    Transport,
    #[strum(serialize = "snmpver")]
    #[serde(rename = "snmpver")]
    SnmpVersion,
    #[strum(serialize = "port_association_mode")]
    #[serde(rename = "port_association_mode")]
    PortAssociationMode,
    #[strum(serialize = "poller_group")]
    #[serde(rename = "poller_group")]
    PollerGroup,
    #[strum(serialize = "force_add")]
    #[serde(rename = "force_add")]
    ForceAdd,
    #[strum(serialize = "community")]
    #[serde(rename = "community")]
    Community,
    #[strum(serialize = "authlevel")]
    #[serde(rename = "authlevel")]
    AuthLevel,
    #[strum(serialize = "authname")]
    #[serde(rename = "authname")]
    AuthName,
    #[strum(serialize = "authpass")]
    #[serde(rename = "authpass")]
    AuthPass,
    #[strum(serialize = "authalgo")]
    #[serde(rename = "authalgo")]
    AuthAlgo,
    #[strum(serialize = "cryptopass")]
    #[serde(rename = "cryptopass")]
    CryptoPass,
    #[strum(serialize = "cryptoalgo")]
    #[serde(rename = "cryptoalgo")]
    CryptoAlgo,
    #[strum(serialize = "snmp_disable")]
    #[serde(rename = "snmp_disable")]
    SnmpDisable,
    #[strum(serialize = "os")]
    #[serde(rename = "os")]
    Os,
    #[strum(serialize = "sysName")]
    #[serde(rename = "sysName")]
    SysName,
    #[strum(serialize = "hardware")]
    #[serde(rename = "hardware")]
    Hardware,
}

impl Field {
    /// Fields whose values must never be printed.
    pub fn is_secret(self) -> bool {
        matches!(self, Self::Community | Self::AuthPass | Self::CryptoPass)
    }
}

/// Attribute set describing one LibreNMS device.
///
/// Every field is optional here; which ones are mandatory depends on the
/// [`DesiredState`](super::DesiredState). Built fresh per invocation and never
/// persisted -- LibreNMS is the source of truth.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Hostname, IP address or (for get/delete) numeric device id.
    #[serde(alias = "name", default, deserialize_with = "deserialize_identity")]
    pub hostname: Option<String>,
    pub display: Option<String>,
    /// SNMP port.
    pub port: Option<u16>,
    /// SNMP transport (udp, tcp, udp6, tcp6).
    pub transport: Option<String>,
    /// SNMP version: v1, v2c or v3.
    pub snmpver: Option<String>,
    /// ifIndex, ifName, ifDescr or ifAlias.
    pub port_association_mode: Option<String>,
    pub poller_group: Option<u32>,
    pub force_add: Option<bool>,
    pub community: Option<String>,

    // SNMPv3
    pub authlevel: Option<String>,
    pub authname: Option<String>,
    pub authpass: Option<String>,
    pub authalgo: Option<String>,
    pub cryptopass: Option<String>,
    pub cryptoalgo: Option<String>,

    // ICMP-only overrides
    pub snmp_disable: Option<bool>,
    pub os: Option<String>,
    #[serde(rename = "sysName")]
    pub sys_name: Option<String>,
    pub hardware: Option<String>,
}

/// Accept a device id given as a number as well as a name.
fn deserialize_identity<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Identity {
        Name(String),
        Id(u64),
    }

    Ok(Option::<Identity>::deserialize(deserializer)?.map(|identity| match identity {
        Identity::Name(name) => name,
        Identity::Id(id) => id.to_string(),
    }))
}

impl DeviceDescriptor {
    /// Descriptor that only names a device.
    pub fn identified_by(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            ..Self::default()
        }
    }

    /// The identity key, if set and non-empty.
    pub fn identity(&self) -> Option<&str> {
        self.hostname.as_deref().filter(|h| !h.is_empty())
    }

    /// JSON value of one attribute; `Null` when unset.
    pub fn value_of(&self, field: Field) -> Value {
        fn text(v: Option<&str>) -> Value {
            v.map_or(Value::Null, Value::from)
        }

        match field {
            Field::Hostname => text(self.hostname.as_deref()),
            Field::Display => text(self.display.as_deref()),
            Field::Port => self.port.map_or(Value::Null, Value::from),
            Field::Transport => text(self.transport.as_deref()),
            Field::SnmpVersion => text(self.snmpver.as_deref()),
            Field::PortAssociationMode => text(self.port_association_mode.as_deref()),
            Field::PollerGroup => self.poller_group.map_or(Value::Null, Value::from),
            Field::ForceAdd => self.force_add.map_or(Value::Null, Value::Bool),
            Field::Community => text(self.community.as_deref()),
            Field::AuthLevel => text(self.authlevel.as_deref()),
            Field::AuthName => text(self.authname.as_deref()),
            Field::AuthPass => text(self.authpass.as_deref()),
            Field::AuthAlgo => text(self.authalgo.as_deref()),
            Field::CryptoPass => text(self.cryptopass.as_deref()),
            Field::CryptoAlgo => text(self.cryptoalgo.as_deref()),
            Field::SnmpDisable => self.snmp_disable.map_or(Value::Null, Value::Bool),
            Field::Os => text(self.os.as_deref()),
            Field::SysName => text(self.sys_name.as_deref()),
            Field::Hardware => text(self.hardware.as_deref()),
        }
    }

    /// Is this attribute present and non-null?
    ///
    /// An empty hostname does not count: it cannot address a device.
    pub fn is_set(&self, field: Field) -> bool {
        match field {
            Field::Hostname => self.identity().is_some(),
            other => !self.value_of(other).is_null(),
        }
    }
}

// Hand-written so SNMP secrets stay out of logs.
impl fmt::Debug for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(v: Option<&String>) -> Option<&'static str> {
            v.map(|_| "****")
        }

        f.debug_struct("DeviceDescriptor")
            .field("hostname", &self.hostname)
            .field("display", &self.display)
            .field("port", &self.port)
            .field("transport", &self.transport)
            .field("snmpver", &self.snmpver)
            .field("port_association_mode", &self.port_association_mode)
            .field("poller_group", &self.poller_group)
            .field("force_add", &self.force_add)
            .field("community", &redact(self.community.as_ref()))
            .field("authlevel", &self.authlevel)
            .field("authname", &self.authname)
            .field("authpass", &redact(self.authpass.as_ref()))
            .field("authalgo", &self.authalgo)
            .field("cryptopass", &redact(self.cryptopass.as_ref()))
            .field("cryptoalgo", &self.cryptoalgo)
            .field("snmp_disable", &self.snmp_disable)
            .field("os", &self.os)
            .field("sys_name", &self.sys_name)
            .field("hardware", &self.hardware)
            .finish()
    }
}
