//! `last_run_summary.yaml` parsing.
//!
//! The agent writes a mapping-of-mappings:
//!
//! ```yaml
//! time:
//!   last_run: 1718000000
//! events:
//!   failure: 0
//! resources:
//!   failed: 0
//! ```
//!
//! Only document-level problems (unreadable, invalid YAML, top level not a
//! mapping) are errors. Each field is looked up on its own and a missing or
//! mistyped field reads as absent; callers apply their own defaults.

use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Typed view
// ---------------------------------------------------------------------------

/// Fields of the summary document the probe cares about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// `time.last_run`, epoch seconds.
    pub last_run: Option<i64>,
    /// Whether the top-level `events` key exists at all. An agent that failed
    /// before applying a catalog writes a summary without it.
    pub has_events: bool,
    /// `events.failure`
    pub events_failure: Option<i64>,
    /// `resources.failed`
    pub resources_failed: Option<i64>,
}

impl RunSummary {
    fn from_json(doc: &Value) -> Result<Self, SummaryError> {
        let top = doc.as_object().ok_or(SummaryError::NotAMapping)?;

        Ok(Self {
            last_run: int_at(doc, "/time/last_run"),
            has_events: top.contains_key("events"),
            events_failure: int_at(doc, "/events/failure"),
            resources_failed: int_at(doc, "/resources/failed"),
        })
    }
}

/// Integer or float scalar at `pointer`. Floats are truncated; non-finite
/// floats read as absent.
fn int_at(doc: &Value, pointer: &str) -> Option<i64> {
    let v = doc.pointer(pointer)?;
    v.as_i64().or_else(|| {
        v.as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f as i64)
    })
}

// ---------------------------------------------------------------------------
// Load result
// ---------------------------------------------------------------------------

/// Outcome of trying to load the summary document.
///
/// Every variant is a valid input to evaluation; none of them abort it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SummaryLoad {
    Loaded(RunSummary),
    /// File does not exist.
    Missing,
    /// File exists but could not be read or parsed.
    ParseFailed(SummaryError),
}

impl SummaryLoad {
    pub fn loaded(&self) -> Option<&RunSummary> {
        match self {
            SummaryLoad::Loaded(s) => Some(s),
            _ => None,
        }
    }
}

/// Document-level summary failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    Read(String),
    InvalidYaml(String),
    /// Top level is a scalar, a sequence, or empty.
    NotAMapping,
    /// YAML that has no plain-data equivalent (e.g. complex mapping keys).
    NotPlainData(String),
}

impl fmt::Display for SummaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryError::Read(e) => write!(f, "summary file could not be read: {e}"),
            SummaryError::InvalidYaml(e) => write!(f, "summary file is not valid yaml: {e}"),
            SummaryError::NotAMapping => write!(f, "summary document is not a mapping"),
            SummaryError::NotPlainData(e) => {
                write!(f, "summary document has unsupported structure: {e}")
            }
        }
    }
}

impl std::error::Error for SummaryError {}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse summary document text.
pub fn parse_summary(raw: &str) -> Result<RunSummary, SummaryError> {
    let v_yaml: serde_yaml::Value =
        serde_yaml::from_str(raw).map_err(|e| SummaryError::InvalidYaml(e.to_string()))?;
    let v_json =
        serde_json::to_value(v_yaml).map_err(|e| SummaryError::NotPlainData(e.to_string()))?;
    RunSummary::from_json(&v_json)
}

/// Load the summary document from disk. Never fails; see [`SummaryLoad`].
pub fn load_summary(path: &Path) -> SummaryLoad {
    if !path.exists() {
        debug!(path = %path.display(), "summary file absent");
        return SummaryLoad::Missing;
    }

    let parsed = fs::read_to_string(path)
        .map_err(|e| SummaryError::Read(e.to_string()))
        .and_then(|raw| parse_summary(&raw));

    match parsed {
        Ok(summary) => SummaryLoad::Loaded(summary),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unusable summary file");
            SummaryLoad::ParseFailed(err)
        }
    }
}
