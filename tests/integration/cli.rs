//! The medprune binary: arguments, output streams and exit status

use std::process::Command;

use super::helpers::{read, write_corpus, BASE_XML};

fn medprune() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_medprune"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_prune_dry_run_prints_phase_report() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);

    let output = medprune()
        .args(["prune", "--root"])
        .arg(corpus.path())
        .output()
        .expect("Failed to run medprune");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[PHASE 1]"));
    assert!(stdout.contains("[PHASE 2]"));
    assert!(stdout.contains("S_ORPHAN"));
    assert_eq!(read(corpus.path(), "Database/Base.xml"), BASE_XML);
}

#[test]
fn test_prune_json_output_parses() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);

    let output = medprune()
        .args(["prune", "--json", "--root"])
        .arg(corpus.path())
        .output()
        .expect("Failed to run medprune");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["mode"], "dry-run");
    assert_eq!(value["treatments"]["unused"][0], "T_OLD");
}

#[test]
fn test_backup_without_apply_warns() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);

    let output = medprune()
        .args(["prune", "--backup", "--root"])
        .arg(corpus.path())
        .output()
        .expect("Failed to run medprune");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--backup has no effect without --apply"));
}

#[test]
fn test_missing_root_exits_non_zero() {
    let corpus = write_corpus(&[]);

    let output = medprune()
        .args(["prune", "--root"])
        .arg(corpus.path().join("missing"))
        .output()
        .expect("Failed to run medprune");

    assert!(!output.status.success());
}

#[test]
fn test_completions_for_bash() {
    let output = medprune()
        .args(["completions", "bash"])
        .output()
        .expect("Failed to run medprune");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("medprune"));
}

#[test]
fn test_completions_reject_unknown_shell() {
    let output = medprune()
        .args(["completions", "tcsh"])
        .output()
        .expect("Failed to run medprune");

    assert!(!output.status.success());
}

#[test]
fn test_apply_logs_persistence_once() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);

    let output = medprune()
        .args(["-v", "prune", "--apply", "--root"])
        .arg(corpus.path())
        .output()
        .expect("Failed to run medprune");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Persisted documents").count(), 1);
    assert!(!read(corpus.path(), "Database/Base.xml").contains("S_ORPHAN"));
}
