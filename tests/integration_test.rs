//! Integration tests for the lnbot CLI

use std::process::Command;

fn cargo_run(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to run command")
}

#[test]
fn test_cli_help() {
    let output = cargo_run(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("config"));
    assert!(stdout.contains("--input-dir"));
    assert!(stdout.contains("--output-dir"));
    assert!(stdout.contains("--llm"));
    assert!(stdout.contains("--embedding-mode"));
    assert!(stdout.contains("--top-k"));
}

#[test]
fn test_cli_version() {
    let output = cargo_run(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("lnbot"));
}

#[test]
fn test_config_help() {
    let output = cargo_run(&["config", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("show"));
    assert!(stdout.contains("init"));
    assert!(stdout.contains("path"));
}

#[test]
fn test_ask_simulated() {
    let input = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        input.path().join("channels.md"),
        "Opening a Lightning channel requires an on-chain funding transaction.",
    )
    .unwrap();

    let output = cargo_run(&[
        "--quiet",
        "--input-dir",
        input.path().to_str().unwrap(),
        "--output-dir",
        output_dir.path().to_str().unwrap(),
        "--llm",
        "simulated",
        "--embedding-mode",
        "simulated",
        "--show-sources",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("How to open a Lightning channel?"));
    assert!(stdout.contains("> Source (Doc id: "));
    assert!(output_dir.path().join("docstore.json").exists());
}

#[test]
fn test_empty_query_exit_code() {
    let input = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("notes.txt"), "Watchtowers guard offline nodes.").unwrap();
    let dir = input.path().to_str().unwrap();

    let output = cargo_run(&[
        "",
        "--input-dir",
        dir,
        "--output-dir",
        dir,
        "--llm",
        "simulated",
        "--embedding-mode",
        "simulated",
    ]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Query cannot be empty"));
}
