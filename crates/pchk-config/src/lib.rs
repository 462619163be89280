//! Probe settings: layered YAML files, then command-line overrides.
//!
//! Each file is one [`ConfigLayer`]. Layers are overlaid field by field in
//! order; a field a layer leaves out keeps the value from below. The command
//! line is the topmost layer. Unknown keys are rejected so a typo in a
//! config file fails loudly instead of silently falling back to a default
//! path.
//!
//! ```yaml
//! thresholds:
//!   warn: 1800
//!   critical: 3600
//! check_failures: false
//! only_enabled: true
//! paths:
//!   lock_file: /var/lib/puppet/state/puppetdlock
//!   state_file: /var/lib/puppet/state/state.yaml
//!   summary_file: /var/lib/puppet/state/last_run_summary.yaml
//! ```

use anyhow::{Context, Result};
use pchk_probe::{EvaluationMode, ProbePaths, ThresholdError, Thresholds};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

// ---------------------------------------------------------------------------
// Layer schema
// ---------------------------------------------------------------------------

/// One config file (or the command line). Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    thresholds: ThresholdsSection,
    check_failures: Option<bool>,
    only_enabled: Option<bool>,
    #[serde(default)]
    paths: PathsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThresholdsSection {
    warn: Option<i64>,
    critical: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct PathsSection {
    lock_file: Option<PathBuf>,
    state_file: Option<PathBuf>,
    summary_file: Option<PathBuf>,
}

impl ConfigLayer {
    /// Parse one YAML document. An empty document is an empty layer.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let doc: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        if doc.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(doc)
            .context("CONFIG_INVALID: config does not match the probe schema")
    }
}

// ---------------------------------------------------------------------------
// Effective settings
// ---------------------------------------------------------------------------

/// Values given on the command line. `None` / `false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub warn: Option<i64>,
    pub critical: Option<i64>,
    pub check_failures: bool,
    pub only_enabled: bool,
    pub lock_file: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
    pub summary_file: Option<PathBuf>,
}

impl From<CliOverrides> for ConfigLayer {
    fn from(cli: CliOverrides) -> Self {
        // An absent flag is "not given", never "off".
        Self {
            thresholds: ThresholdsSection {
                warn: cli.warn,
                critical: cli.critical,
            },
            check_failures: cli.check_failures.then_some(true),
            only_enabled: cli.only_enabled.then_some(true),
            paths: PathsSection {
                lock_file: cli.lock_file,
                state_file: cli.state_file,
                summary_file: cli.summary_file,
            },
        }
    }
}

/// Everything one probe invocation needs, thresholds still unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub warn: Option<i64>,
    pub critical: Option<i64>,
    pub mode: EvaluationMode,
    pub only_enabled: bool,
    pub paths: ProbePaths,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            warn: None,
            critical: None,
            mode: EvaluationMode::Staleness,
            only_enabled: false,
            paths: ProbePaths::default(),
        }
    }
}

impl ProbeSettings {
    /// Overlay YAML documents in order on top of the defaults.
    pub fn from_yaml_layers(yaml_docs: &[&str]) -> Result<Self> {
        let mut settings = Self::default();
        for (i, raw) in yaml_docs.iter().enumerate() {
            let layer =
                ConfigLayer::from_yaml(raw).with_context(|| format!("config layer {i}"))?;
            settings = settings.overlay(layer);
        }
        Ok(settings)
    }

    /// Load config files in merge order. No files means built-in defaults.
    pub fn load(config_paths: &[&str]) -> Result<Self> {
        debug!(files = ?config_paths, "loading config layers");
        let mut settings = Self::default();
        for p in config_paths {
            let raw = fs::read_to_string(p)
                .with_context(|| format!("failed to read config file: {p}"))?;
            let layer = ConfigLayer::from_yaml(&raw).with_context(|| format!("config file: {p}"))?;
            settings = settings.overlay(layer);
        }
        Ok(settings)
    }

    /// Fields set in `layer` replace the current values.
    pub fn overlay(mut self, layer: ConfigLayer) -> Self {
        if let Some(v) = layer.thresholds.warn {
            self.warn = Some(v);
        }
        if let Some(v) = layer.thresholds.critical {
            self.critical = Some(v);
        }
        if let Some(on) = layer.check_failures {
            self.mode = if on {
                EvaluationMode::FailureCount
            } else {
                EvaluationMode::Staleness
            };
        }
        if let Some(on) = layer.only_enabled {
            self.only_enabled = on;
        }
        if let Some(p) = layer.paths.lock_file {
            self.paths.lock_file = p;
        }
        if let Some(p) = layer.paths.state_file {
            self.paths.state_file = p;
        }
        if let Some(p) = layer.paths.summary_file {
            self.paths.summary_file = p;
        }
        self
    }

    /// Command-line values win. Flags can only switch a policy on.
    pub fn apply(self, cli: CliOverrides) -> Self {
        self.overlay(cli.into())
    }

    pub fn thresholds(&self) -> std::result::Result<Thresholds, ThresholdError> {
        Thresholds::new(self.warn, self.critical)
    }
}
