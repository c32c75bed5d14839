//! Device command handlers.

use libre_core::request;
use libre_core::{DesiredState, DeviceDescriptor, QueryFilter};

use crate::cli::{DeviceFlags, DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<DeviceFlags> for DeviceDescriptor {
    fn from(f: DeviceFlags) -> Self {
        Self {
            hostname: f.hostname,
            display: f.display,
            port: f.port,
            transport: f.transport,
            snmpver: f.snmpver,
            port_association_mode: f.port_association_mode,
            poller_group: f.poller_group,
            // Unset switches stay null so LibreNMS applies its own default.
            force_add: f.force_add.then_some(true),
            community: f.community,
            authlevel: f.authlevel,
            authname: f.authname,
            authpass: f.authpass,
            authalgo: f.authalgo,
            cryptopass: f.cryptopass,
            cryptoalgo: f.cryptoalgo,
            snmp_disable: f.snmp_disable.then_some(true),
            os: f.os,
            sys_name: f.sys_name,
            hardware: f.hardware,
        }
    }
}

pub async fn handle(args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (state, device, filter) = match args.command {
        DevicesCommand::Present(flags) => {
            (DesiredState::Present, flags.into(), QueryFilter::new())
        }
        DevicesCommand::Absent { hostname } => (
            DesiredState::Absent,
            DeviceDescriptor {
                hostname,
                ..DeviceDescriptor::default()
            },
            QueryFilter::new(),
        ),
        DevicesCommand::Get(get) => (
            DesiredState::Get,
            DeviceDescriptor {
                hostname: get.hostname,
                ..DeviceDescriptor::default()
            },
            util::build_filter(&get.filter, &get.query_param)?,
        ),
    };

    request::check(&device, state)?;
    let reconciler = util::reconciler(global)?;
    let outcome = reconciler.reconcile(state, &device, &filter).await?;

    let color = output::should_color(&global.color_mode());
    let out = output::render_outcome(&global.output_format(), &outcome, color);
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use libre_core::build_payload;
    use serde_json::Value;

    use super::*;

    #[test]
    fn unset_switches_stay_null() {
        let device: DeviceDescriptor = DeviceFlags {
            hostname: Some("10.0.0.9".into()),
            snmpver: Some("v2c".into()),
            ..DeviceFlags::default()
        }
        .into();
        let payload = build_payload(&device);
        assert_eq!(payload["force_add"], Value::Null);
        assert_eq!(payload["snmp_disable"], Value::Null);
        assert_eq!(payload["snmpver"], "v2c");
    }

    #[test]
    fn set_switches_are_sent() {
        let device: DeviceDescriptor = DeviceFlags {
            hostname: Some("10.0.0.9".into()),
            force_add: true,
            snmp_disable: true,
            sys_name: Some("edge".into()),
            ..DeviceFlags::default()
        }
        .into();
        let payload = build_payload(&device);
        assert_eq!(payload["force_add"], true);
        assert_eq!(payload["snmp_disable"], true);
        assert_eq!(payload["sysName"], "edge");
    }
}
