//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_birthlog"))
        .env("BIRTHLOG_DATA_DIR", data_dir)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout is not JSON")
}

#[test]
fn test_streak_show_on_fresh_install() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["--today", "2024-05-15", "streak", "show"]);
    assert_eq!(code, 0, "streak show failed");

    let view = json(&stdout);
    assert_eq!(view["state"]["currentStreak"], 0);
    assert_eq!(view["state"]["weekStartDate"], "2024-05-13");
    assert_eq!(view["persisted"], true);
    assert_eq!(view["nextMilestone"]["milestone"], 1);
}

#[test]
fn test_log_add_completes_week() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["--today", "2024-05-15", "log", "add", "--note", "twins"],
    );
    assert_eq!(code, 0, "log add failed");
    let added = json(&stdout);
    assert_eq!(added["bornOn"], "2024-05-15");
    assert_eq!(added["currentWeekLogs"], 1);

    // Week closes at the next boundary.
    let (code, stdout, _) = run_cli(dir.path(), &["--today", "2024-05-20", "streak", "show"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["state"]["currentStreak"], 1);

    let (code, stdout, _) = run_cli(dir.path(), &["log", "list"]);
    assert_eq!(code, 0);
    let births = json(&stdout);
    assert_eq!(births.as_array().map(Vec::len), Some(1));
    assert_eq!(births[0]["note"], "twins");
}

#[test]
fn test_log_add_rejects_future_date() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["--today", "2024-05-15", "log", "add", "--date", "2024-05-16"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (_, stdout, _) = run_cli(dir.path(), &["log", "list"]);
    assert_eq!(json(&stdout).as_array().map(Vec::len), Some(0));

    let (_, stdout, _) = run_cli(dir.path(), &["--today", "2024-05-15", "streak", "show"]);
    let view = json(&stdout);
    assert_eq!(view["state"]["currentWeekLogs"], 0);
    assert!(view["state"]["lastLogDate"].is_null());
}

#[test]
fn test_streak_goal() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["--today", "2024-05-15", "streak", "goal", "3"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["weeklyGoal"], 3);

    let (code, _, _) = run_cli(dir.path(), &["streak", "goal", "0"]);
    assert_ne!(code, 0, "goal of 0 must be rejected");
}

#[test]
fn test_streak_cancel_recovery_without_challenge() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["--today", "2024-05-15", "streak", "cancel-recovery"],
    );
    assert_eq!(code, 0);
    assert!(json(&stdout)["recoveryChallenge"].is_null());
}

#[test]
fn test_stats() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), &["--today", "2024-05-15", "log", "add"]);
    let (code, stdout, _) = run_cli(dir.path(), &["--today", "2024-05-15", "stats", "--weeks", "2"]);
    assert_eq!(code, 0);
    let stats = json(&stdout);
    assert_eq!(stats["births"]["total_births"], 1);
    assert_eq!(stats["births"]["this_week"], 1);
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "streak.at_risk_days"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "2");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "streak.at_risk_days", "3"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "streak.at_risk_days"]);
    assert_eq!(stdout.trim(), "3");

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "streak.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_data_reset_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), &["--today", "2024-05-15", "log", "add"]);

    let (code, _, _) = run_cli(dir.path(), &["data", "reset"]);
    assert_ne!(code, 0);

    let (code, _, _) = run_cli(dir.path(), &["data", "reset", "--yes"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["log", "list"]);
    assert_eq!(json(&stdout).as_array().map(Vec::len), Some(0));
}
