use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// End-to-end: the binary prints one result line and exits with the
/// monitoring-plugin code for that result.

struct StateDir {
    _tmp: TempDir,
    lock: PathBuf,
    state: PathBuf,
    summary: PathBuf,
}

impl StateDir {
    fn new() -> anyhow::Result<Self> {
        let tmp = tempdir()?;
        let root = tmp.path().to_path_buf();
        Ok(Self {
            _tmp: tmp,
            lock: root.join("puppetdlock"),
            state: root.join("state.yaml"),
            summary: root.join("last_run_summary.yaml"),
        })
    }

    fn write_summary(&self, body: &str) -> anyhow::Result<()> {
        fs::write(&self.summary, body)?;
        Ok(())
    }

    fn check(&self) -> anyhow::Result<Command> {
        let mut cmd = Command::cargo_bin("check_puppet")?;
        cmd.env_remove("RUST_LOG").args([
            "--lock-file",
            path_str(&self.lock),
            "--state-file",
            path_str(&self.state),
            "--summary-file",
            path_str(&self.summary),
        ]);
        Ok(cmd)
    }
}

fn path_str(p: &Path) -> &str {
    p.to_str().expect("temp path is utf-8")
}

fn summary_ran_ago(secs: i64, failures: i64) -> String {
    let last_run = chrono::Utc::now().timestamp() - secs;
    format!(
        "time:\n  last_run: {last_run}\nevents:\n  failure: {failures}\nresources:\n  failed: 0\n"
    )
}

#[test]
fn recent_run_is_ok() -> anyhow::Result<()> {
    let dir = StateDir::new()?;
    dir.write_summary(&summary_ran_ago(10, 0))?;

    dir.check()?
        .args(["-w", "1800", "-c", "3600"])
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with(
            "OK: Puppet is currently enabled, last run",
        ))
        .stdout(predicate::str::contains("with 0 failures"));
    Ok(())
}

#[test]
fn stale_run_warns() -> anyhow::Result<()> {
    let dir = StateDir::new()?;
    dir.write_summary(&summary_ran_ago(600, 0))?;

    dir.check()?
        .args(["--warn", "500", "--critical", "100000"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("WARNING: Puppet last ran "))
        .stdout(predicate::str::ends_with("seconds ago, expected < 500\n"));
    Ok(())
}

#[test]
fn very_stale_run_is_critical() -> anyhow::Result<()> {
    let dir = StateDir::new()?;
    dir.write_summary(&summary_ran_ago(600, 0))?;

    dir.check()?
        .args(["-w", "100", "-c", "500"])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with("CRITICAL: Puppet last ran "))
        .stdout(predicate::str::contains("expected < 500"));
    Ok(())
}

#[test]
fn failed_run_is_critical_in_failure_mode() -> anyhow::Result<()> {
    let dir = StateDir::new()?;
    dir.write_summary("time:\n  last_run: 400\n")?;

    dir.check()?
        .args(["-f", "-w", "1", "-c", "10"])
        .assert()
        .code(2)
        .stdout("CRITICAL: Puppet last ran had 99 failures, expected < 10\n");
    Ok(())
}

#[test]
fn disabled_agent_is_not_alerted_with_only_enabled() -> anyhow::Result<()> {
    let dir = StateDir::new()?;
    fs::write(&dir.lock, b"")?;

    // No summary and no state file: last run is epoch start, far past any threshold.
    dir.check()?
        .args(["-e", "-w", "1", "-c", "2"])
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with(
            "OK: Puppet is currently disabled, not alerting.  Last run ",
        ));
    Ok(())
}

#[test]
fn corrupt_summary_falls_back_to_state_file() -> anyhow::Result<()> {
    let dir = StateDir::new()?;
    dir.write_summary("time: [unclosed\n")?;
    fs::write(&dir.state, "--- {}\n")?;

    dir.check()?
        .args(["-w", "1800", "-c", "3600"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("with 0 failures"));
    Ok(())
}

#[test]
fn output_is_exactly_one_line() -> anyhow::Result<()> {
    let dir = StateDir::new()?;
    dir.write_summary(&summary_ran_ago(10, 3))?;

    let out = dir.check()?.args(["-f", "-w", "1", "-c", "5"]).output()?;
    let stdout = String::from_utf8(out.stdout)?;
    assert_eq!(stdout.lines().count(), 1, "stdout: {stdout:?}");
    assert_eq!(stdout, "WARNING: Puppet last ran had 3 failures, expected < 1\n");
    assert_eq!(out.status.code(), Some(1));
    Ok(())
}
