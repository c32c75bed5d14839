//! `apply`: one reconciliation driven by a flat named-parameter document.
//!
//! Success prints `{changed, data}`; failure prints `{failed: true, msg}` on
//! stdout and exits non-zero.

use libre_core::{ModuleFailure, ModuleParams};

use crate::cli::{ApplyArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: &ApplyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let raw = util::read_input(&args.params)?;

    // YAML is a superset of JSON, so one parser covers both.
    let params: ModuleParams = match serde_yaml::from_str(&raw) {
        Ok(params) => params,
        Err(e) => {
            report_failure(global, &ModuleFailure {
                failed: true,
                msg: format!("invalid parameters: {e}"),
                status: None,
            });
            return Err(e.into());
        }
    };

    tracing::debug!(state = %params.state, "applying parameters");
    match params.run().await {
        Ok(outcome) => {
            let color = output::should_color(&global.color_mode());
            let out = output::render_outcome(&global.output_format(), &outcome, color);
            output::print_output(&out, global.quiet);
            Ok(())
        }
        Err(err) => {
            report_failure(global, &ModuleFailure::from(&err));
            Err(err.into())
        }
    }
}

fn report_failure(global: &GlobalOpts, failure: &ModuleFailure) {
    let out = output::render_failure(&global.output_format(), failure);
    output::print_output(&out, global.quiet);
}
