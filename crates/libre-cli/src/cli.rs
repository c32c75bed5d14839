//! Clap derive structures for the `librectl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// librectl -- desired-state device management for LibreNMS
#[derive(Debug, Parser)]
#[command(
    name = "librectl",
    version,
    about = "Reconcile LibreNMS device inventory from the command line",
    long_about = "Declare whether a device should be present in or absent from a \
        LibreNMS server, or query its device inventory.\n\n\
        Repeated runs converge: adding a device that already exists or removing \
        one that is already gone reports `changed: false` instead of failing.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "LIBRENMS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// LibreNMS base URL (overrides profile)
    #[arg(long, env = "LIBRENMS_URL", global = true)]
    pub api_url: Option<String>,

    /// LibreNMS API token
    #[arg(long, env = "LIBRENMS_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Verify the server's TLS certificate (overrides profile)
    #[arg(
        long,
        env = "LIBRENMS_SSL_VERIFY",
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub ssl_verify: Option<bool>,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "LIBRENMS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format [default: json, or `defaults.output` from the config file]
    #[arg(long, short = 'o', env = "LIBRENMS_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto, or `defaults.color`]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    #[default]
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Device table
    Table,
    /// Plain text, one hostname per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add, remove, or query devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Run one reconciliation from a named-parameter file
    Apply(ApplyArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// Ensure a device is registered (requires --hostname and --snmpver)
    #[command(alias = "add")]
    Present(DeviceFlags),

    /// Ensure a device is not registered
    #[command(alias = "remove", alias = "rm")]
    Absent {
        /// Hostname, IP address, or device id
        #[arg(long, short = 'H')]
        hostname: Option<String>,
    },

    /// Query one device or the device list (never changes anything)
    #[command(alias = "list", alias = "ls")]
    Get(GetArgs),
}

/// Device attributes accepted by LibreNMS when adding a device.
#[derive(Debug, Default, Args)]
pub struct DeviceFlags {
    /// Hostname or IP address
    #[arg(long, short = 'H')]
    pub hostname: Option<String>,

    /// Display name template
    #[arg(long)]
    pub display: Option<String>,

    /// SNMP port
    #[arg(long)]
    pub port: Option<u16>,

    /// SNMP transport
    #[arg(long, value_parser = ["udp", "tcp", "udp6", "tcp6"])]
    pub transport: Option<String>,

    /// SNMP version
    #[arg(long, value_parser = ["v1", "v2c", "v3"])]
    pub snmpver: Option<String>,

    /// Port association mode
    #[arg(long, value_parser = ["ifIndex", "ifName", "ifDescr", "ifAlias"])]
    pub port_association_mode: Option<String>,

    /// Poller group id
    #[arg(long)]
    pub poller_group: Option<u32>,

    /// Add the device even if it does not answer SNMP/ICMP
    #[arg(long)]
    pub force_add: bool,

    /// SNMP v1/v2c community
    #[arg(long)]
    pub community: Option<String>,

    // ── SNMPv3 ──
    /// SNMPv3 security level
    #[arg(long, value_parser = ["noAuthNoPriv", "authNoPriv", "authPriv"])]
    pub authlevel: Option<String>,

    /// SNMPv3 user name
    #[arg(long)]
    pub authname: Option<String>,

    /// SNMPv3 authentication passphrase
    #[arg(long)]
    pub authpass: Option<String>,

    /// SNMPv3 authentication algorithm
    #[arg(long)]
    pub authalgo: Option<String>,

    /// SNMPv3 privacy passphrase
    #[arg(long)]
    pub cryptopass: Option<String>,

    /// SNMPv3 privacy algorithm
    #[arg(long)]
    pub cryptoalgo: Option<String>,

    // ── ICMP-only ──
    /// Monitor with ICMP only
    #[arg(long)]
    pub snmp_disable: bool,

    /// OS to record when SNMP is disabled
    #[arg(long)]
    pub os: Option<String>,

    /// sysName to record when SNMP is disabled
    #[arg(long)]
    pub sys_name: Option<String>,

    /// Hardware to record when SNMP is disabled
    #[arg(long)]
    pub hardware: Option<String>,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Hostname, IP address, or device id (omit to list devices)
    #[arg(long, short = 'H')]
    pub hostname: Option<String>,

    /// List filter as key=value (e.g. type=os, query=linux); repeatable
    #[arg(long, short = 'f', value_name = "KEY=VALUE")]
    pub filter: Vec<String>,

    /// List filter as a single-key mapping, e.g. "{'type': 'down'}"; repeatable
    #[arg(long, value_name = "MAPPING")]
    pub query_param: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  APPLY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// JSON or YAML parameter file (`-` reads stdin)
    #[arg(long, value_name = "FILE")]
    pub params: PathBuf,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (tokens masked)
    Show,

    /// Print the config file path
    Path,

    /// Store an API token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
