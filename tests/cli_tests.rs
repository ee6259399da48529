use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::fs;
use std::path::PathBuf;

struct Workspace {
    _dir: tempfile::TempDir,
    config: PathBuf,
    output: PathBuf,
    holidays: PathBuf,
}

fn workspace() -> Workspace {
    let dir = tempfile::tempdir().expect("create temp dir");
    let output = dir.path().join("out.ics");
    let holidays = dir.path().join("holidays.json");
    let body = serde_json::json!({
        "output_file": output,
        "cache_file": dir.path().join("cache.json"),
        "holidays_file": holidays,
        "default_year_range": 1,
    });
    let config = dir.path().join("config.json");
    fs::write(&config, body.to_string()).expect("write config");
    Workspace {
        _dir: dir,
        config,
        output,
        holidays,
    }
}

fn cli(ws: &Workspace) -> Command {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.arg("--config").arg(&ws.config);
    cmd
}

#[test]
fn cli_add_list_remove_round_trip() {
    let ws = workspace();

    cli(&ws)
        .args(["add-holiday", "Festivus", "12", "23"])
        .assert()
        .success();
    cli(&ws)
        .arg("list")
        .assert()
        .success()
        .stdout(str_contains("Festivus"))
        .stdout(str_contains("fixed 12-23"));

    cli(&ws)
        .args(["remove-holiday", "Festivus"])
        .assert()
        .success();
    let listed = cli(&ws).arg("list").assert().success();
    let output = String::from_utf8_lossy(&listed.get_output().stdout);
    assert!(
        !output.contains("Festivus"),
        "removed holiday still listed:\n{}",
        output
    );
}

#[test]
fn cli_rejects_impossible_dates_without_touching_the_store() {
    let ws = workspace();
    cli(&ws)
        .args(["add-holiday", "National Pizza Day", "2", "30"])
        .assert()
        .failure();
    assert!(!ws.holidays.exists());
}

#[test]
fn cli_dry_run_previews_without_writing() {
    let ws = workspace();
    cli(&ws)
        .args(["generate", "--year", "2025", "--dry-run"])
        .assert()
        .success()
        .stdout(str_contains("Thanksgiving Day"));
    assert!(!ws.output.exists());
}

#[test]
fn cli_generate_writes_a_calendar_file() {
    let ws = workspace();
    cli(&ws)
        .args(["add-holiday", "Festivus", "12", "23"])
        .assert()
        .success();
    cli(&ws)
        .args(["generate", "--year", "2025"])
        .assert()
        .success();

    let ics = fs::read_to_string(&ws.output).expect("read calendar");
    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(ics.contains("SUMMARY:Festivus"));
    assert!(ics.contains("END:VCALENDAR"));
}

#[test]
fn cli_readded_holiday_is_not_served_from_a_stale_cache() {
    let ws = workspace();
    cli(&ws)
        .args(["add-holiday", "Festivus", "12", "23"])
        .assert()
        .success();
    cli(&ws)
        .args(["generate", "--year", "2025"])
        .assert()
        .success();
    let ics = fs::read_to_string(&ws.output).expect("read calendar");
    assert!(ics.contains("20251223"));

    // Re-add the holiday on a different day; the cached 2025 resolution
    // from the first definition must not leak into the new calendar.
    cli(&ws)
        .args(["remove-holiday", "Festivus"])
        .assert()
        .success();
    cli(&ws)
        .args(["add-holiday", "Festivus", "12", "24"])
        .assert()
        .success();
    cli(&ws)
        .args(["generate", "--year", "2025"])
        .assert()
        .success();

    let ics = fs::read_to_string(&ws.output).expect("read calendar");
    assert!(ics.contains("20251224"));
    assert!(
        !ics.contains("20251223"),
        "stale cached date survived the re-add:\n{}",
        ics
    );
}
