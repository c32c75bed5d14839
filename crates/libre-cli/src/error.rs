//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use libre_config::ConfigError;
use libre_core::{ApiErrorKind, CoreError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach LibreNMS: {reason}")]
    #[diagnostic(
        code(librectl::connection_failed),
        help(
            "Check that the server is running and that api_url is correct.\n\
             Self-signed certificate? Leave --ssl-verify off or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out: {reason}")]
    #[diagnostic(
        code(librectl::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed (HTTP {status}): {message}")]
    #[diagnostic(
        code(librectl::auth_failed),
        help(
            "Verify the API token and its permissions (Settings > API > API Settings).\n\
             Run: librectl config set-token"
        )
    )]
    AuthFailed { status: u16, message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(librectl::no_credentials),
        help(
            "Configure a token with: librectl config init\n\
             Or set the LIBRENMS_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(librectl::not_found),
        help("Run: librectl devices list to see registered devices")
    )]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(librectl::conflict))]
    Conflict { message: String },

    #[error("LibreNMS API error (HTTP {status}): {message}")]
    #[diagnostic(code(librectl::api_error))]
    ApiError { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(librectl::missing_arguments),
        help("present needs --hostname and --snmpver; absent needs --hostname.")
    )]
    MissingArguments { message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(librectl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(librectl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: librectl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No LibreNMS server configured")]
    #[diagnostic(
        code(librectl::no_config),
        help(
            "Create a config with: librectl config init\n\
             Expected at: {path}\n\
             Or pass --api-url and --api-token (LIBRENMS_URL / LIBRENMS_TOKEN)."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(librectl::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid parameters: {0}")]
    #[diagnostic(
        code(librectl::params),
        help("Expected a JSON or YAML mapping with at least api_url and api_token.")
    )]
    Params(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::MissingArguments { .. } | Self::Validation { .. } | Self::Params(_) => {
                exit_code::USAGE
            }
            Self::ApiError { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::Config(_)
            | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { .. } => Self::MissingArguments {
                message: err.to_string(),
            },
            CoreError::UnknownState { .. } => Self::Validation {
                field: "state".into(),
                reason: err.to_string(),
            },
            CoreError::InvalidQueryFilter { entry, reason } => Self::Validation {
                field: format!("query filter {entry:?}"),
                reason,
            },
            CoreError::InvalidParameter { field, reason } => Self::Validation { field, reason },
            CoreError::Api {
                kind,
                status,
                message,
            } => match kind {
                ApiErrorKind::Timeout => Self::Timeout { reason: message },
                ApiErrorKind::Transport => Self::ConnectionFailed { reason: message },
                ApiErrorKind::Configuration => Self::Validation {
                    field: "connection".into(),
                    reason: message,
                },
                ApiErrorKind::RemoteHttp => match status {
                    401 | 403 => Self::AuthFailed { status, message },
                    404 => Self::NotFound { message },
                    409 => Self::Conflict { message },
                    _ => Self::ApiError { status, message },
                },
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}
