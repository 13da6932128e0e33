use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "bastion"])
        .status()
        .expect("failed to invoke cargo check for bastion CLI binary");

    assert!(status.success(), "cargo check --bin bastion should succeed");
}

#[test]
fn headless_session_runs_to_completion() {
    let dir = tempfile::tempdir().expect("temp dir");
    let scores = dir.path().join("scores.json");
    let status = Command::new(env!("CARGO_BIN_EXE_bastion"))
        .args(["--headless", "--frames", "600", "--difficulty", "hard", "--seed", "9"])
        .arg("--scores")
        .arg(&scores)
        .status()
        .expect("failed to run bastion");

    assert!(status.success(), "headless run should exit cleanly");
}
