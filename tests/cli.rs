#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn cli(roster: &Path) -> Command {
    let mut cmd = Command::cargo_bin("corex-roster-cli").unwrap();
    cmd.arg("--roster").arg(roster);
    cmd
}

fn seed(roster: &Path) {
    cli(roster)
        .args(["employee", "--uid", "u-alice", "--name", "Alice"])
        .assert()
        .success();
    cli(roster)
        .args([
            "add", "--staff", "u-alice", "--date", "2025-01-06", "--start", "09:00", "--end",
            "17:00", "--note", "Open store",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shift added successfully"));
}

#[test]
fn week_view_shows_status_and_hours() {
    let dir = tempdir().unwrap();
    let roster = dir.path().join("roster.json");
    seed(&roster);

    cli(&roster)
        .args(["--now", "2025-01-06T12:00", "week", "--staff", "u-alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("This Week (6 Jan - 12 Jan) 8h"))
        .stdout(predicate::str::contains("09:00-17:00 Alice (In Progress)"));

    cli(&roster)
        .args(["--now", "2025-01-13T08:00", "week", "--staff", "u-alice", "--offset", "-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Last Week"))
        .stdout(predicate::str::contains("(Completed)"));
}

#[test]
fn week_offset_outside_the_calendar_fails_cleanly() {
    let dir = tempdir().unwrap();
    let roster = dir.path().join("roster.json");
    seed(&roster);

    for cmd in ["week", "export"] {
        cli(&roster)
            .args(["--today", "2025-01-06", cmd, "--staff", "u-alice", "--offset", "100000000"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("week offset 100000000 is out of range"))
            .stderr(predicate::str::contains("panicked").not());
    }
}

#[test]
fn unknown_employee_is_rejected() {
    let dir = tempdir().unwrap();
    let roster = dir.path().join("roster.json");
    seed(&roster);

    cli(&roster)
        .args([
            "add", "--staff", "u-ghost", "--date", "2025-01-06", "--start", "09:00", "--end",
            "17:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Employee not found with given UID"));

    cli(&roster)
        .args([
            "add", "--staff", "u-alice", "--date", "2025-01-06", "--start", "9am", "--end",
            "17:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid time of day"));
}

#[test]
fn day_and_month_views() {
    let dir = tempdir().unwrap();
    let roster = dir.path().join("roster.json");
    seed(&roster);

    cli(&roster)
        .args(["--now", "2025-01-06T08:00", "day", "--date", "2025-01-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday, January 6, 2025"))
        .stdout(predicate::str::contains("9:00 AM → 5:00 PM | Today | Open store"));

    cli(&roster)
        .args(["--today", "2025-01-06", "month", "--staff", "u-alice", "--month", "1", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6[1]"))
        .stdout(predicate::str::contains("Monthly hours: 8"));
}

#[test]
fn import_then_upcoming_and_export() {
    let dir = tempdir().unwrap();
    let roster = dir.path().join("roster.json");
    seed(&roster);

    let csv = dir.path().join("shifts.csv");
    std::fs::write(
        &csv,
        "employee_uid,date,start_time,end_time,note\n\
         u-alice,2025-01-08,22:00,06:00,Night fill\n\
         u-alice,2025-01-09,12:00,16:30,\n",
    )
    .unwrap();
    cli(&roster)
        .args(["import", "--csv"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 shift(s)"));

    cli(&roster)
        .args(["--now", "2025-01-06T12:00", "upcoming", "--staff", "u-alice", "--days", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wednesday, January 8, 2025: 1 shift(s), 8h"))
        .stdout(predicate::str::contains("Thursday, January 9, 2025: 1 shift(s), 4.5h"));

    let out_csv = dir.path().join("week.csv");
    let out_json = dir.path().join("week.json");
    cli(&roster)
        .args(["--now", "2025-01-06T12:00", "export", "--staff", "u-alice", "--out-csv"])
        .arg(&out_csv)
        .arg("--out-json")
        .arg(&out_json)
        .assert()
        .success();
    let csv_out = std::fs::read_to_string(&out_csv).unwrap();
    assert_eq!(csv_out.lines().count(), 4);
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_json).unwrap()).unwrap();
    assert_eq!(json["2025-01-08"][0]["shiftNote"], "Night fill");
}

#[test]
fn bad_csv_row_aborts_import() {
    let dir = tempdir().unwrap();
    let roster = dir.path().join("roster.json");
    seed(&roster);

    let csv = dir.path().join("broken.csv");
    std::fs::write(
        &csv,
        "employee_uid,date,start_time,end_time\nu-alice,2025-01-08,10:00,10:00\n",
    )
    .unwrap();
    cli(&roster)
        .args(["import", "--csv"])
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 2"));
}

#[test]
fn check_missing_flags_an_empty_tomorrow() {
    let dir = tempdir().unwrap();
    let roster = dir.path().join("roster.json");
    seed(&roster);

    cli(&roster)
        .args(["--today", "2025-01-06", "check-missing"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "No shifts are rostered for Tuesday, January 7, 2025",
        ));

    cli(&roster)
        .args(["--today", "2025-01-05", "check-missing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn notify_writes_the_reminder() {
    let dir = tempdir().unwrap();
    let roster = dir.path().join("roster.json");
    seed(&roster);

    let out = dir.path().join("reminder.txt");
    cli(&roster)
        .args(["--now", "2025-01-04T10:00", "notify", "--staff", "u-alice", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("at 2025-01-05 09:00"));
    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains("Note: Open store"));
}

#[test]
fn update_then_delete() {
    let dir = tempdir().unwrap();
    let roster = dir.path().join("roster.json");
    seed(&roster);

    let raw = std::fs::read_to_string(&roster).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let id = json["shifts"][0]["id"].as_str().unwrap().to_string();

    cli(&roster)
        .args(["update", "--id", &id, "--end", "15:00"])
        .assert()
        .success();
    let raw = std::fs::read_to_string(&roster).unwrap();
    assert!(raw.contains("\"endTime\": \"15:00\""));

    cli(&roster).args(["update", "--id", &id]).assert().failure();
    cli(&roster).args(["delete", "--id", &id]).assert().success();
    cli(&roster)
        .args(["delete", "--id", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Shift not found"));
}
