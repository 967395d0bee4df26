use assert_cmd::Command;
use predicates::prelude::*;

fn notedate() -> Command {
    let mut cmd = Command::cargo_bin("notedate").unwrap();
    cmd.env_remove("NOTEDATE_TODAY").env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

#[test]
fn test_date_relative_keyword() {
    notedate()
        .args(["--today", "2025-10-18", "date", "tomorrow"])
        .assert()
        .success()
        .stdout("2025-10-19\n");
}

#[test]
fn test_date_chinese_weekday() {
    notedate()
        .args(["date", "星期三", "--today", "2025-10-18"])
        .assert()
        .success()
        .stdout("2025-10-22\n");
}

#[test]
fn test_date_today_from_env() {
    notedate()
        .env("NOTEDATE_TODAY", "2025-10-20")
        .args(["date", "monday"])
        .assert()
        .success()
        .stdout("2025-10-20\n");
}

#[test]
fn test_date_passthrough_and_empty() {
    notedate()
        .args(["--today", "2025-10-18", "date", "sometime soon!"])
        .assert()
        .success()
        .stdout("sometime soon\n");

    notedate()
        .args(["--today", "2025-10-18", "date", ""])
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn test_invalid_today_is_rejected() {
    notedate()
        .args(["--today", "yesterday", "date", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--today"));
}

#[test]
fn test_time_meridiem() {
    notedate()
        .args(["time", "5:30 p.m."])
        .assert()
        .success()
        .stdout("17:30\n");
}

#[test]
fn test_extract_prints_json() {
    let output = notedate()
        .args(["--today", "2025-10-18", "extract", "Badminton tmr 5pm @polyu"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output.stdout);
    assert_eq!(json["date"], "2025-10-19");
    assert_eq!(json["time"], "17:00");
}

#[test]
fn test_extract_miss_is_null() {
    let output = notedate()
        .args(["--today", "2025-10-18", "extract", "no date here"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output.stdout);
    assert!(json["date"].is_null());
    assert!(json["time"].is_null());
}

#[test]
fn test_schedule_fields_from_argument() {
    let output = notedate()
        .args([
            "--today",
            "2025-10-18",
            "schedule",
            "--prompt",
            "Lunch with Sam",
            "--fields",
            r#"{"Title": "Lunch", "Date": "2025 - 10 - 25", "Time": "12:30pm"}"#,
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output.stdout);
    assert_eq!(json["date"], "2025-10-25");
    assert_eq!(json["time"], "12:30");
}

#[test]
fn test_schedule_prompt_wins_with_stdin_fields() {
    let output = notedate()
        .args(["--today", "2025-10-18", "schedule", "--prompt", "Get up tomorrow 7am"])
        .write_stdin(r#"{"Title": "Wake up", "Date": "today", "Time": "08:00"}"#)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output.stdout);
    assert_eq!(json["date"], "2025-10-19");
    assert_eq!(json["time"], "07:00");
}

#[test]
fn test_schedule_rejects_bad_json() {
    notedate()
        .args(["schedule", "--prompt", "x", "--fields", "not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid note fields"));
}

#[test]
fn test_strict_date() {
    notedate()
        .args(["strict-date", "2025-10-20T09:00:00"])
        .assert()
        .success()
        .stdout("2025-10-20\n");

    notedate()
        .args(["strict-date", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_strict_time() {
    notedate()
        .args(["strict-time", "09:30"])
        .assert()
        .success()
        .stdout("09:30\n");

    notedate()
        .args(["strict-time", "5pm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time"));
}
