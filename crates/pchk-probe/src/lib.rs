//! pchk-probe
//!
//! Health verdict for a Puppet agent's run cycle, built from three on-disk
//! artifacts: the agent lock file, the legacy `state.yaml`, and
//! `last_run_summary.yaml`.
//!
//! Layout:
//! - `types`: inputs, derived state, thresholds, verdicts
//! - `summary`: tolerant summary document parsing
//! - `sources`: filesystem reads (stat + read only; errors mean "absent")
//! - `engine`: pure evaluation. No IO, no wall-clock; caller supplies `now`.

mod engine;
pub mod sources;
pub mod summary;
mod types;

pub use engine::{derive_state, evaluate, FAILED_RUN_SENTINEL};
pub use sources::{read_lock_presence, read_legacy_mtime, read_probe_inputs, ProbePaths};
pub use summary::{load_summary, parse_summary, RunSummary, SummaryError, SummaryLoad};
pub use types::*;
