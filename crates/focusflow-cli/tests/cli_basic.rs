//! CLI binary tests using assert_cmd.
//!
//! HOME and XDG_CONFIG_HOME point at a temp dir so a user's config file never
//! leaks into the results.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("focusflow-cli").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("FOCUSFLOW_ENV")
        .env_remove("FOCUSFLOW_LOG");
    cmd
}

#[test]
fn test_classify_is_case_insensitive() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["classify", "https://DISCORD.gg/abc"])
        .assert()
        .success()
        .stdout("Social Media (distraction)\n");
}

#[test]
fn test_classify_unknown_destination_as_json() {
    let home = TempDir::new().unwrap();
    let output = cli(&home)
        .args(["classify", "https://example.org", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["category"], "Other");
    assert_eq!(json["is_distraction"], false);
}

#[test]
fn test_classify_with_custom_config() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("custom.toml");
    std::fs::write(
        &path,
        r#"
[classifier]
distractions = []

[[classifier.categories]]
name = "Reading"
keywords = ["arxiv"]
"#,
    )
    .unwrap();

    cli(&home)
        .args(["--config", path.to_str().unwrap(), "classify", "https://arxiv.org/abs/1"])
        .assert()
        .success()
        .stdout("Reading\n");
}

#[test]
fn test_invalid_config_fails() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("bad.toml");
    std::fs::write(&path, "[timer]\ntick_secs = 0\n").unwrap();

    cli(&home)
        .args(["--config", path.to_str().unwrap(), "classify", "x"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("error:"))
        .stderr(predicate::str::contains("timer.tick_secs"));
}

#[test]
fn test_summarize_note_truncates() {
    let home = TempDir::new().unwrap();
    let words: Vec<String> = (1..=22).map(|i| format!("w{i}")).collect();

    cli(&home)
        .arg("summarize-note")
        .args(&words)
        .assert()
        .success()
        .stdout(predicate::str::ends_with("w19 w20...\n"))
        .stdout(predicate::str::contains("w21").not());
}

#[test]
fn test_suggest_without_tasks() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("suggest")
        .assert()
        .success()
        .stdout("Add a few tasks to get started!\n");
}

#[test]
fn test_suggest_rejects_bad_priority() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["suggest", "--task", "Essay:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("priority"));
}

#[test]
fn test_config_get() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "get", "monitor.poll_secs"])
        .assert()
        .success()
        .stdout("2\n");

    cli(&home)
        .args(["config", "get", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key: nope"));
}

#[test]
fn test_shell_tasks_and_tips() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["shell", "--no-viewer", "--cycle-tips"])
        .write_stdin("task add 5 Write report\ntask add 2 Email\ntasks\ntip\ntask rm 1\ntip\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Write report (priority 5)"))
        .stdout(predicate::str::contains("2. Email (priority 2)"))
        .stdout(predicate::str::contains(
            "Break 'Write report' into smaller steps to reduce pressure.",
        ))
        .stdout(predicate::str::contains("Removed task: Write report"))
        .stdout(predicate::str::contains("Take a 5-minute break, then jump back into focus."));
}

#[test]
fn test_shell_sessions_and_history() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["shell", "--no-viewer"])
        .write_stdin("history\nopen https://youtube.com/watch\nclose\nclose\nhistory\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No focus history yet."))
        .stdout(predicate::str::contains("Focusing on https://youtube.com/watch"))
        .stdout(predicate::str::contains("Closed: https://youtube.com/watch - "))
        .stdout(predicate::str::contains("No active session."))
        .stdout(predicate::str::contains("Most of your focus time was spent on Entertainment"));
}

#[test]
fn test_shell_notes() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["shell", "--no-viewer"])
        .write_stdin("notes\nnote add call the bank --tags work,personal\nnote add buy milk\nnotes\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes yet."))
        .stdout(predicate::str::contains("Added note #work: call the bank"))
        .stdout(predicate::str::contains("#personal: call the bank"))
        .stdout(predicate::str::contains("#general: buy milk"));
}

#[test]
fn test_shell_survives_undecodable_line() {
    let home = TempDir::new().unwrap();
    let mut input = b"task add 3 Plan\n".to_vec();
    input.extend_from_slice(&[0xff, 0xfe, b'\n']);
    input.extend_from_slice(b"tasks\nquit\n");

    cli(&home)
        .args(["shell", "--no-viewer"])
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::contains("error: "))
        .stdout(predicate::str::contains("1. Plan (priority 3)"));
}

#[test]
fn test_shell_reports_errors_and_keeps_going() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["shell", "--no-viewer"])
        .write_stdin("task add 7 Too important\ntask rm 3\nlaunch\ntip\nquit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("error: "))
        .stderr(predicate::str::contains("no task at index 3"))
        .stdout(predicate::str::contains("Add a few tasks to get started!"));
}
