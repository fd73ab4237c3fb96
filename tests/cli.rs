//! Integration tests for top-level CLI behavior.

use std::path::PathBuf;
use std::process::Command;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ght_cli_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn run_ght(dir: &PathBuf, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_ght");
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env_remove("GITHUB_TOKEN")
        .env_remove("GHT_RECORD")
        .output()
        .expect("failed to run ght binary")
}

#[test]
fn help_lists_sync_subcommand() {
    let dir = scratch_dir("help");
    let output = run_ght(&dir, &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("sync"));
}

#[test]
fn sync_help_shows_dry_run_and_config() {
    let dir = scratch_dir("sync_help");
    let output = run_ght(&dir, &["sync", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--config"));
}

#[test]
fn unknown_subcommand_fails() {
    let dir = scratch_dir("unknown");
    let output = run_ght(&dir, &["push"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn sync_without_config_file_fails() {
    let dir = scratch_dir("no_config");
    let output = run_ght(&dir, &["sync", "--dry-run"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("ght.conf.yaml"), "stderr was: {stderr}");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn sync_without_tokens_fails() {
    let dir = scratch_dir("no_tokens");
    std::fs::write(dir.join("ght.conf.yaml"), "default: Inbox\nlabels: {_default_: github}\ntemplates: {_default_: {children: []}}\n").unwrap();
    let output = run_ght(&dir, &["sync"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.to_lowercase().contains("token"), "stderr was: {stderr}");
    let _ = std::fs::remove_dir_all(&dir);
}
