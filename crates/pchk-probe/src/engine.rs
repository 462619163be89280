use tracing::{debug, warn};

use crate::summary::SummaryLoad;
use crate::types::{
    DerivedState, EvaluationMode, LockPresence, ProbeInputs, Severity, Thresholds, Verdict,
};

/// Failure count reported when the summary exists but has no `events`
/// section: the agent never got as far as applying resources.
pub const FAILED_RUN_SENTINEL: i64 = 99;

/// Fuse the raw inputs into one state tuple.
pub fn derive_state(inputs: &ProbeInputs) -> DerivedState {
    let enabled = inputs.lock_presence != LockPresence::PresentEmpty;
    let running = inputs.lock_presence == LockPresence::PresentNonEmpty;

    let summary = inputs.summary.loaded();

    // Timestamp: summary, then legacy mtime, then epoch start.
    let last_run_epoch = summary
        .and_then(|s| s.last_run)
        .or(inputs.legacy_mtime)
        .unwrap_or(0);

    let failure_count = match summary {
        None => 0,
        Some(s) if !s.has_events => FAILED_RUN_SENTINEL,
        Some(s) => s
            .events_failure
            .unwrap_or(0)
            .saturating_add(s.resources_failed.unwrap_or(0)),
    };

    DerivedState {
        enabled,
        running,
        last_run_epoch,
        failure_count,
        summary_trusted: summary.is_some(),
    }
}

/// Evaluate the agent's health at `now` (epoch seconds).
///
/// Precedence:
/// 1. `only_if_enabled` and disabled => OK, in either mode
/// 2. metric >= crit => CRITICAL
/// 3. metric >= warn => WARNING
/// 4. OK
pub fn evaluate(
    inputs: &ProbeInputs,
    thresholds: &Thresholds,
    mode: EvaluationMode,
    only_if_enabled: bool,
    now: i64,
) -> Verdict {
    let st = derive_state(inputs);
    // No clamping: a last_run in the future yields a negative value.
    let since = now.saturating_sub(st.last_run_epoch);
    let fails = st.failure_count;

    debug!(
        enabled = st.enabled,
        running = st.running,
        last_run_epoch = st.last_run_epoch,
        failure_count = fails,
        time_since_last_run = since,
        mode = mode.as_str(),
        "derived state"
    );
    if let SummaryLoad::ParseFailed(err) = &inputs.summary {
        debug!(error = %err, "failure count defaulted to 0; summary unusable");
    }
    if thresholds.is_inverted() {
        warn!(
            warn = thresholds.warn(),
            critical = thresholds.crit(),
            "warn threshold exceeds critical; WARNING cannot be reported"
        );
    }

    if only_if_enabled && !st.enabled {
        return Verdict::new(
            Severity::Ok,
            format!(
                "Puppet is currently disabled, not alerting.  Last run {since} seconds ago with {fails} failures"
            ),
        );
    }

    let metric = match mode {
        EvaluationMode::Staleness => since,
        EvaluationMode::FailureCount => fails,
    };

    let breached = if metric >= thresholds.crit() {
        Some((Severity::Critical, thresholds.crit()))
    } else if metric >= thresholds.warn() {
        Some((Severity::Warning, thresholds.warn()))
    } else {
        None
    };

    match breached {
        Some((severity, limit)) => {
            let message = match mode {
                EvaluationMode::Staleness => {
                    format!("Puppet last ran {since} seconds ago, expected < {limit}")
                }
                EvaluationMode::FailureCount => {
                    format!("Puppet last ran had {fails} failures, expected < {limit}")
                }
            };
            Verdict::new(severity, message)
        }
        None => {
            let wording = if st.enabled { "enabled" } else { "disabled" };
            Verdict::new(
                Severity::Ok,
                format!(
                    "Puppet is currently {wording}, last run {since} seconds ago with {fails} failures"
                ),
            )
        }
    }
}
