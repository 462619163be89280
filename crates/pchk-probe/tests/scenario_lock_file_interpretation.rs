use anyhow::Result;
use pchk_probe::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn absent_lock_means_enabled_and_idle() -> Result<()> {
    let tmp = tempdir()?;
    let presence = read_lock_presence(&tmp.path().join("puppetdlock"));
    assert_eq!(presence, LockPresence::Absent);

    let mut inputs = ProbeInputs::empty();
    inputs.lock_presence = presence;
    let st = derive_state(&inputs);
    assert!(st.enabled);
    assert!(!st.running);
    Ok(())
}

#[test]
fn empty_lock_means_disabled() -> Result<()> {
    let tmp = tempdir()?;
    let lock = tmp.path().join("puppetdlock");
    fs::write(&lock, b"")?;

    let presence = read_lock_presence(&lock);
    assert_eq!(presence, LockPresence::PresentEmpty);

    let mut inputs = ProbeInputs::empty();
    inputs.lock_presence = presence;
    let st = derive_state(&inputs);
    assert!(!st.enabled);
    assert!(!st.running);
    Ok(())
}

#[test]
fn nonempty_lock_means_running_and_enabled() -> Result<()> {
    let tmp = tempdir()?;
    let lock = tmp.path().join("puppetdlock");
    fs::write(&lock, b"12345\n")?;

    let presence = read_lock_presence(&lock);
    assert_eq!(presence, LockPresence::PresentNonEmpty);

    let mut inputs = ProbeInputs::empty();
    inputs.lock_presence = presence;
    let st = derive_state(&inputs);
    assert!(st.enabled);
    assert!(st.running);
    Ok(())
}

#[test]
fn legacy_state_file_supplies_timestamp() -> Result<()> {
    let tmp = tempdir()?;
    let state = tmp.path().join("state.yaml");
    fs::write(&state, "--- {}\n")?;

    let mtime = read_legacy_mtime(&state).expect("state file mtime");
    let now = chrono::Utc::now().timestamp();
    assert!((now - mtime).abs() < 300, "mtime {mtime} far from now {now}");

    assert_eq!(read_legacy_mtime(&tmp.path().join("missing.yaml")), None);
    Ok(())
}

#[test]
fn read_probe_inputs_snapshots_all_sources() -> Result<()> {
    let tmp = tempdir()?;
    let paths = ProbePaths {
        lock_file: tmp.path().join("puppetdlock"),
        state_file: tmp.path().join("state.yaml"),
        summary_file: tmp.path().join("last_run_summary.yaml"),
    };
    fs::write(&paths.lock_file, b"")?;
    fs::write(&paths.summary_file, "time:\n  last_run: 400\nevents:\n  failure: 1\n")?;

    let inputs = read_probe_inputs(&paths);
    assert_eq!(inputs.lock_presence, LockPresence::PresentEmpty);
    assert_eq!(inputs.legacy_mtime, None);

    let st = derive_state(&inputs);
    assert_eq!(st.last_run_epoch, 400);
    assert_eq!(st.failure_count, 1);
    Ok(())
}
