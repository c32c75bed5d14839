//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input, Select};
use secrecy::SecretString;
use serde_json::Value;

use libre_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking plaintext tokens.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "ssl_verify = {}", cfg.defaults.ssl_verify);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if p.api_token.is_some() {
            let _ = writeln!(out, "api_token = \"{MASK}\"");
        }
        if let Some(ref env) = p.api_token_env {
            let _ = writeln!(out, "api_token_env = \"{env}\"");
        }
        if let Some(verify) = p.ssl_verify {
            let _ = writeln!(out, "ssl_verify = {verify}");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Serializable copy of the config with plaintext tokens masked.
fn redacted_value(cfg: &Config) -> Value {
    let mut value = serde_json::to_value(cfg).unwrap_or(Value::Null);
    if let Some(profiles) = value.get_mut("profiles").and_then(Value::as_object_mut) {
        for profile in profiles.values_mut() {
            if let Some(token) = profile.get_mut("api_token") {
                *token = Value::String(MASK.into());
            }
        }
    }
    value
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_token() -> Result<SecretString, CliError> {
    let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "api_token".into(),
            reason: "API token cannot be empty".into(),
        });
    }
    Ok(SecretString::from(token.trim().to_owned()))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = match global.output_format() {
                OutputFormat::Json => output::render_json(&redacted_value(&cfg), false),
                OutputFormat::JsonCompact => output::render_json(&redacted_value(&cfg), true),
                OutputFormat::Yaml => output::render_yaml(&redacted_value(&cfg)),
                OutputFormat::Table | OutputFormat::Plain => format_config_redacted(&cfg),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: config::available_profiles(&cfg),
                });
            }

            let token = prompt_token()?;
            libre_config::store_api_token(&profile_name, &token)?;
            eprintln!("✓ API token for '{profile_name}' stored in system keyring");
            Ok(())
        }
    }
}

/// Interactive wizard: one profile, written to the canonical path.
fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("librectl configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Server URL
    let api_url: String = Input::new()
        .with_prompt("LibreNMS URL")
        .default("https://librenms.example.com".into())
        .interact_text()
        .map_err(prompt_err)?;
    libre_config::parse_api_url(&api_url)?;

    // 3. Certificate verification
    let ssl_verify = Confirm::new()
        .with_prompt("Verify the server's TLS certificate?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;

    // 4. Token and where to keep it
    let token = prompt_token()?;
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the API token?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let api_token = if selection == 0 {
        libre_config::store_api_token(&profile_name, &token)?;
        eprintln!("   ✓ API token stored in system keyring");
        None
    } else {
        use secrecy::ExposeSecret;
        Some(token.expose_secret().to_owned())
    };

    // 5. Merge into any existing config
    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            api_url,
            api_token,
            ssl_verify: Some(ssl_verify),
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: librectl devices list");
    Ok(())
}
