//! The single `check_puppet` command: settings -> inputs -> verdict.

use anyhow::Result;
use chrono::Utc;
use pchk_config::{CliOverrides, ProbeSettings};
use pchk_probe::{evaluate, read_probe_inputs, Severity, Verdict};
use tracing::debug;

pub const EXIT_USAGE: u8 = Severity::Unknown as u8;

pub const MISSING_THRESHOLDS: &str = "Please specify a warning and critical level";

pub const INVALID_ARGUMENTS: &str = "invalid arguments, see --help";

pub struct CheckArgs {
    pub config_paths: Vec<String>,
    pub overrides: CliOverrides,
}

/// Always produces a verdict. Configuration problems come back as UNKNOWN
/// before any file is inspected.
pub fn run(args: CheckArgs) -> Verdict {
    let settings = match load_settings(&args) {
        Ok(s) => s,
        Err(e) => return Verdict::usage(format!("invalid configuration: {e:#}")),
    };

    let thresholds = match settings.thresholds() {
        Ok(t) => t,
        Err(e) => {
            debug!(error = %e, "threshold validation failed");
            return Verdict::usage(MISSING_THRESHOLDS);
        }
    };

    debug!(
        lock_file = %settings.paths.lock_file.display(),
        state_file = %settings.paths.state_file.display(),
        summary_file = %settings.paths.summary_file.display(),
        "probing"
    );

    let inputs = read_probe_inputs(&settings.paths);
    evaluate(
        &inputs,
        &thresholds,
        settings.mode,
        settings.only_enabled,
        Utc::now().timestamp(),
    )
}

fn load_settings(args: &CheckArgs) -> Result<ProbeSettings> {
    let path_refs: Vec<&str> = args.config_paths.iter().map(|s| s.as_str()).collect();
    let settings = ProbeSettings::load(&path_refs)?;
    Ok(settings.apply(args.overrides.clone()))
}
