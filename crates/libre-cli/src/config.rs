//! `GlobalOpts`-aware connection resolution.
//!
//! Profiles, token storage, and the plain credential chain live in
//! `libre_config`; this module layers the command-line overrides on top.

use clap::ValueEnum;
use secrecy::SecretString;

use libre_config::{Config, Defaults, Profile};
use libre_core::ConnectionConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use libre_config::{config_path, load_config_or_default, save_config};

impl GlobalOpts {
    /// Output format after flag, env and config defaults.
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or_default()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.clone().unwrap_or_default()
    }
}

/// Fill `--output` / `--color` from the config file's `[defaults]` when
/// neither a flag nor `LIBRENMS_OUTPUT` set them.
pub fn apply_output_defaults(
    global: &mut GlobalOpts,
    defaults: &Defaults,
) -> Result<(), CliError> {
    if global.output.is_none() {
        global.output = Some(parse_default(&defaults.output, "defaults.output")?);
    }
    if global.color.is_none() {
        global.color = Some(parse_default(&defaults.color, "defaults.color")?);
    }
    Ok(())
}

fn parse_default<T: ValueEnum>(raw: &str, field: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Build a `ConnectionConfig` from the config file, profile, and CLI overrides.
///
/// Precedence for every setting: flag > env var > profile > defaults.
pub fn resolve_connection(global: &GlobalOpts) -> Result<ConnectionConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // No profile -- try to build from CLI flags / env vars alone
        None if global.api_url.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(verify) = global.ssl_verify {
        profile.ssl_verify = Some(verify);
    }

    profile.timeout = global.timeout.or(profile.timeout);

    // CLI flag / LIBRENMS_TOKEN wins over the profile's chain
    let api_token = global.api_token.clone().map(SecretString::from);
    let conn = libre_config::profile_to_connection_config(
        &profile,
        &profile_name,
        &cfg.defaults,
        api_token,
    )?;

    tracing::debug!(profile = %profile_name, url = %conn.api_url, "resolved connection");
    Ok(conn)
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["librectl"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).expect("valid args").global
    }

    fn defaults(output: &str, color: &str) -> Defaults {
        Defaults {
            output: output.into(),
            color: color.into(),
            ..Defaults::default()
        }
    }

    #[test]
    fn config_defaults_fill_missing_flags() {
        let mut opts = global(&[]);
        apply_output_defaults(&mut opts, &defaults("plain", "never")).expect("valid defaults");
        assert_eq!(opts.output_format(), OutputFormat::Plain);
        assert_eq!(opts.color_mode(), ColorMode::Never);
    }

    #[test]
    fn flags_win_over_config_defaults() {
        let mut opts = global(&["-o", "yaml", "--color", "always"]);
        apply_output_defaults(&mut opts, &defaults("plain", "never")).expect("valid defaults");
        assert_eq!(opts.output_format(), OutputFormat::Yaml);
        assert_eq!(opts.color_mode(), ColorMode::Always);
    }

    #[test]
    fn builtin_defaults_are_json_and_auto() {
        let mut opts = global(&[]);
        apply_output_defaults(&mut opts, &Defaults::default()).expect("valid defaults");
        assert_eq!(opts.output_format(), OutputFormat::Json);
        assert_eq!(opts.color_mode(), ColorMode::Auto);
    }

    #[test]
    fn unknown_config_default_is_a_validation_error() {
        let mut opts = global(&[]);
        let err = apply_output_defaults(&mut opts, &defaults("xml", "auto"))
            .expect_err("xml is not a format");
        assert!(matches!(err, CliError::Validation { field, .. } if field == "defaults.output"));
    }
}
