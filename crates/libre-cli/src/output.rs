//! Output formatting: JSON, YAML, table, plain.
//!
//! Every command produces a `{changed, data}` result (or a `{failed, msg}`
//! failure). Structured formats serialize it as-is; `table` and `plain`
//! look for a `devices` array inside `data`.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};

use libre_core::{ModuleFailure, ReconcileOutcome};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn paint_changed(changed: bool, color: bool) -> String {
    let label = if changed { "changed" } else { "ok" };
    match (color, changed) {
        (false, _) => label.to_owned(),
        (true, true) => label.yellow().to_string(),
        (true, false) => label.green().to_string(),
    }
}

// ── Table row ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "sysName")]
    sys_name: String,
    #[tabled(rename = "OS")]
    os: String,
    #[tabled(rename = "Hardware")]
    hardware: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Value> for DeviceRow {
    fn from(d: &Value) -> Self {
        Self {
            id: text(d, "device_id"),
            hostname: text(d, "hostname"),
            sys_name: text(d, "sysName"),
            os: text(d, "os"),
            hardware: text(d, "hardware"),
            status: match d.get("status") {
                Some(Value::Bool(true)) => "up".into(),
                Some(Value::Bool(false)) => "down".into(),
                Some(Value::Number(n)) if n.as_u64() == Some(1) => "up".into(),
                Some(Value::Number(_)) => "down".into(),
                _ => String::new(),
            },
        }
    }
}

/// Render a scalar field of a device object; missing and null become empty.
fn text(d: &Value, key: &str) -> String {
    match d.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn devices(data: &Value) -> Option<&Vec<Value>> {
    data.get("devices").and_then(Value::as_array)
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a reconciliation result in the chosen format.
pub fn render_outcome(format: &OutputFormat, outcome: &ReconcileOutcome, color: bool) -> String {
    match format {
        OutputFormat::Json => render_json(outcome, false),
        OutputFormat::JsonCompact => render_json(outcome, true),
        OutputFormat::Yaml => render_yaml(outcome),
        OutputFormat::Table => match devices(&outcome.data) {
            Some(list) => {
                let rows: Vec<DeviceRow> = list.iter().map(DeviceRow::from).collect();
                Table::new(rows).with(Style::rounded()).to_string()
            }
            None => summary(outcome, color),
        },
        OutputFormat::Plain => match devices(&outcome.data) {
            Some(list) => list
                .iter()
                .map(|d| text(d, "hostname"))
                .collect::<Vec<_>>()
                .join("\n"),
            None => match &outcome.data {
                Value::String(s) => s.clone(),
                other => render_json(other, true),
            },
        },
    }
}

/// Render a failure in the chosen format. Table and plain print the message.
pub fn render_failure(format: &OutputFormat, failure: &ModuleFailure) -> String {
    match format {
        OutputFormat::Json => render_json(failure, false),
        OutputFormat::JsonCompact => render_json(failure, true),
        OutputFormat::Yaml => render_yaml(failure),
        OutputFormat::Table | OutputFormat::Plain => failure.msg.clone(),
    }
}

/// Key/value view of a result that carries no device list.
fn summary(outcome: &ReconcileOutcome, color: bool) -> String {
    let data = match &outcome.data {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| render_json(&outcome.data, true), str::to_owned),
        other => render_json(other, true),
    };
    format!(
        "Result:  {}\nMessage: {data}",
        paint_changed(outcome.changed, color)
    )
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| {
        format!("{{\"failed\": true, \"msg\": \"serialization failed: {e}\"}}")
    })
}

pub(crate) fn render_yaml<T: Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data)
        .unwrap_or_else(|e| format!("failed: true\nmsg: serialization failed: {e}\n"))
}
