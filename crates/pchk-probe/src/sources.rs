//! Filesystem observations feeding the evaluator.
//!
//! Stat and read failures are folded into "absent". A probe that cannot see
//! a file reports on what it can see; it does not error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::summary::load_summary;
use crate::types::{LockPresence, ProbeInputs};

pub const DEFAULT_LOCK_FILE: &str = "/var/lib/puppet/state/puppetdlock";
pub const DEFAULT_STATE_FILE: &str = "/var/lib/puppet/state/state.yaml";
pub const DEFAULT_SUMMARY_FILE: &str = "/var/lib/puppet/state/last_run_summary.yaml";

/// Locations of the three agent artifacts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbePaths {
    pub lock_file: PathBuf,
    pub state_file: PathBuf,
    pub summary_file: PathBuf,
}

impl Default for ProbePaths {
    fn default() -> Self {
        Self {
            lock_file: PathBuf::from(DEFAULT_LOCK_FILE),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            summary_file: PathBuf::from(DEFAULT_SUMMARY_FILE),
        }
    }
}

/// Existence + size of the lock file. Content is never read.
pub fn read_lock_presence(path: &Path) -> LockPresence {
    match fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => LockPresence::PresentEmpty,
        Ok(_) => LockPresence::PresentNonEmpty,
        Err(e) => {
            log_stat_miss("lock", path, &e);
            LockPresence::Absent
        }
    }
}

/// Modification time of the legacy state file, epoch seconds.
pub fn read_legacy_mtime(path: &Path) -> Option<i64> {
    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(mtime) => Some(DateTime::<Utc>::from(mtime).timestamp()),
        Err(e) => {
            log_stat_miss("state", path, &e);
            None
        }
    }
}

/// Snapshot all three sources.
pub fn read_probe_inputs(paths: &ProbePaths) -> ProbeInputs {
    ProbeInputs {
        lock_presence: read_lock_presence(&paths.lock_file),
        legacy_mtime: read_legacy_mtime(&paths.state_file),
        summary: load_summary(&paths.summary_file),
    }
}

fn log_stat_miss(kind: &str, path: &Path, e: &io::Error) {
    if e.kind() == io::ErrorKind::NotFound {
        debug!(kind, path = %path.display(), "file absent");
    } else {
        debug!(kind, path = %path.display(), error = %e, "stat failed; treating as absent");
    }
}
