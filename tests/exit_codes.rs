//! Exit-code contract of the built binary.
//!
//! Spawns the actual `gglib-fetch` executable and asserts both sides of the
//! contract at once: the protocol line on stdout and the process exit code.
//! Every case here works offline; network-dependent paths are covered by
//! the in-process session tests instead.

use std::process::{Command, Output};

use tempfile::TempDir;

fn fetch(dest: &TempDir, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gglib-fetch"))
        .args(["--repo-id", "owner/repo"])
        .arg("--dest")
        .arg(dest.path())
        .args(extra)
        .output()
        .expect("spawn gglib-fetch")
}

fn stdout_events(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8(output.stdout.clone())
        .expect("stdout is utf-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each stdout line is one JSON object"))
        .collect()
}

#[cfg(feature = "accel")]
#[test]
fn test_probe_reports_versions_and_exits_zero() {
    let dest = TempDir::new().unwrap();
    let output = fetch(&dest, &["--probe"]);

    assert_eq!(output.status.code(), Some(0));

    let events = stdout_events(&output);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["status"], "ok");
    assert_eq!(
        events[0]["helper"].as_str(),
        Some(env!("CARGO_PKG_VERSION"))
    );
    assert!(!events[0]["hub_client"].as_str().unwrap().is_empty());
}

#[cfg(feature = "accel")]
#[test]
fn test_missing_file_arguments_exit_64() {
    let dest = TempDir::new().unwrap();
    let output = fetch(&dest, &[]);

    assert_eq!(output.status.code(), Some(64));

    let events = stdout_events(&output);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["status"], "error");
    assert!(events[0]["message"].as_str().unwrap().contains("--file"));
}

#[cfg(feature = "accel")]
#[test]
fn test_blank_file_specs_exit_64() {
    let dest = TempDir::new().unwrap();
    let output = fetch(&dest, &["--file", "  "]);

    assert_eq!(output.status.code(), Some(64));
    assert_eq!(stdout_events(&output)[0]["status"], "error");
}

#[cfg(feature = "accel")]
#[test]
fn test_local_only_cold_cache_exits_65() {
    let dest = TempDir::new().unwrap();
    let output = fetch(&dest, &["--local-only", "--file", "model.gguf"]);

    assert_eq!(output.status.code(), Some(65));

    let events = stdout_events(&output);
    let last = events.last().unwrap();
    assert_eq!(last["status"], "error");
    assert!(last["message"].as_str().unwrap().contains("model.gguf"));
    assert!(!events.iter().any(|e| e["status"] == "complete"));
}

#[cfg(not(feature = "accel"))]
#[test]
fn test_build_without_hub_backend_exits_90() {
    let dest = TempDir::new().unwrap();
    let output = fetch(&dest, &["--file", "model.gguf"]);

    assert_eq!(output.status.code(), Some(90));

    let events = stdout_events(&output);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["status"], "unavailable");
    assert!(!events[0]["reason"].as_str().unwrap().is_empty());
}
