//! Command dispatch: bridges CLI args -> core reconciliation -> output formatting.

pub mod apply;
pub mod config_cmd;
pub mod devices;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
///
/// Handlers validate their input before resolving a connection, so a
/// malformed request fails the same way with or without a configured server.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(args, global).await,
        Command::Apply(args) => apply::handle(&args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
