use std::fmt;

use crate::summary::SummaryLoad;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// What the lock file tells us. Only existence and size are ever inspected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LockPresence {
    /// No lock file: idle and enabled. This is the normal state, not an error.
    Absent,
    /// Zero-byte lock file: agent administratively disabled.
    PresentEmpty,
    /// Non-empty lock file: a run is in progress.
    PresentNonEmpty,
}

/// Raw observations gathered at evaluation start.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeInputs {
    pub lock_presence: LockPresence,
    /// mtime of the legacy state file, epoch seconds.
    pub legacy_mtime: Option<i64>,
    pub summary: SummaryLoad,
}

impl ProbeInputs {
    /// Nothing on disk at all.
    pub fn empty() -> Self {
        Self {
            lock_presence: LockPresence::Absent,
            legacy_mtime: None,
            summary: SummaryLoad::Missing,
        }
    }
}

/// State fused from [`ProbeInputs`]. Computed once per evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DerivedState {
    /// False only for an empty lock file. A running agent stays enabled.
    pub enabled: bool,
    pub running: bool,
    pub last_run_epoch: i64,
    pub failure_count: i64,
    /// True when `failure_count` came from a loaded summary document.
    pub summary_trusted: bool,
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Which metric is compared against the thresholds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Seconds since the last run.
    Staleness,
    /// Failed events + failed resources of the last run.
    FailureCount,
}

impl EvaluationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationMode::Staleness => "staleness",
            EvaluationMode::FailureCount => "failure-count",
        }
    }
}

/// Validated warning/critical thresholds. Both strictly positive.
///
/// `warn <= crit` is not required; critical is always checked first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Thresholds {
    warn: i64,
    crit: i64,
}

impl Thresholds {
    /// Build from optional raw values. Missing, zero and negative values are
    /// configuration errors.
    pub fn new(warn: Option<i64>, crit: Option<i64>) -> Result<Self, ThresholdError> {
        let warn = validate_threshold("warn", warn)?;
        let crit = validate_threshold("critical", crit)?;
        Ok(Self { warn, crit })
    }

    pub fn warn(&self) -> i64 {
        self.warn
    }

    pub fn crit(&self) -> i64 {
        self.crit
    }

    /// True when the warning level sits above the critical level, which
    /// makes WARNING unreachable.
    pub fn is_inverted(&self) -> bool {
        self.warn > self.crit
    }
}

fn validate_threshold(name: &'static str, v: Option<i64>) -> Result<i64, ThresholdError> {
    match v {
        None => Err(ThresholdError::Missing { name }),
        Some(n) if n <= 0 => Err(ThresholdError::NotPositive { name, value: n }),
        Some(n) => Ok(n),
    }
}

/// Threshold configuration errors. These never reach evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdError {
    Missing { name: &'static str },
    NotPositive { name: &'static str, value: i64 },
}

impl fmt::Display for ThresholdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdError::Missing { name } => write!(f, "{name} threshold is not set"),
            ThresholdError::NotPositive { name, value } => {
                write!(f, "{name} threshold must be > 0, got {value}")
            }
        }
    }
}

impl std::error::Error for ThresholdError {}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Monitoring-plugin result state. Discriminants are the process exit codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Severity {
    pub fn exit_code(&self) -> i32 {
        *self as i32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One result line: severity plus free text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub severity: Severity,
    pub message: String,
}

impl Verdict {
    pub fn new<S: Into<String>>(severity: Severity, message: S) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Configuration error result (exit code 3).
    pub fn usage<S: Into<String>>(message: S) -> Self {
        Self::new(Severity::Unknown, message)
    }

    pub fn exit_code(&self) -> i32 {
        self.severity.exit_code()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}
