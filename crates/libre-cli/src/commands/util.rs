//! Shared helpers for command handlers.

use std::io::Read;
use std::path::Path;

use libre_core::{LegacyQueryEntry, QueryFilter, Reconciler};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

/// Build a reconciler for the active profile and CLI overrides.
pub fn reconciler(global: &GlobalOpts) -> Result<Reconciler, CliError> {
    Ok(Reconciler::new(config::resolve_connection(global)?))
}

/// Combine `--query-param` mappings and `--filter` pairs into one filter.
///
/// Mappings are applied first, then pairs; a repeated key keeps the last value.
pub fn build_filter(filters: &[String], query_params: &[String]) -> Result<QueryFilter, CliError> {
    let entries: Vec<LegacyQueryEntry> = query_params
        .iter()
        .cloned()
        .map(LegacyQueryEntry::Text)
        .collect();
    let mut filter = QueryFilter::from_legacy_entries(&entries)?;

    for raw in filters {
        let (key, value) = QueryFilter::parse_pair(raw)?;
        filter.insert(key, value);
    }
    Ok(filter)
}

/// Read a parameter document from a file, or stdin for `-`.
pub fn read_input(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}
