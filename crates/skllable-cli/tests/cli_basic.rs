//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against a config file and data files in a
//! temporary directory, with `--now` pinned so results are deterministic.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;

const NOW: &str = "2024-12-15T20:00:00Z";
const TRACK: &str = "data-analysis";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let config = self.path("config.toml");
        let output = Command::new(env!("CARGO_BIN_EXE_skllable-cli"))
            .arg("--config")
            .arg(&config)
            .args(["--now", NOW])
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "{args:?} failed: {stderr}");
        serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("{args:?} printed non-JSON ({e}): {stdout}"))
    }

    /// Write a candidate starting at 09:00 UTC `days_ago` days before `NOW`.
    fn candidate(&self, days_ago: u32, minutes: u32) -> PathBuf {
        let now: DateTime<Utc> = NOW.parse().expect("NOW is RFC 3339");
        let day = now.date_naive() - Duration::days(i64::from(days_ago));
        let start = Utc.from_utc_datetime(&day.and_hms_opt(9, 0, 0).expect("09:00 exists"));
        let end = start + Duration::minutes(i64::from(minutes));
        let body = json!({
            "id": format!("s-{days_ago}"),
            "trackId": TRACK,
            "startTime": start.to_rfc3339(),
            "endTime": end.to_rfc3339(),
            "quizScore": 92.0,
            "avgResponseTime": 11.0,
        });
        let path = self.path(&format!("candidate-{days_ago}.json"));
        std::fs::write(&path, body.to_string()).expect("write candidate");
        path
    }

    /// Record a week of daily sessions into `history.json`.
    fn record_week(&self) -> PathBuf {
        let history = self.path("history.json");
        for days_ago in (0..7).rev() {
            let candidate = self.candidate(days_ago, 30);
            let out = self.run_json(&[
                "session",
                "validate",
                p(&candidate),
                "--history",
                p(&history),
                "--record",
            ]);
            assert_eq!(out["isValid"], true, "day {days_ago}: {out}");
        }
        history
    }
}

fn p(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn test_session_validate_reports_quality() {
    let ws = Workspace::new();
    let candidate = ws.candidate(0, 30);
    let out = ws.run_json(&["session", "validate", p(&candidate)]);

    assert_eq!(out["isValid"], true);
    assert_eq!(out["record"]["duration"], 30);
    assert_eq!(out["record"]["trackId"], TRACK);
    let quality = out["qualityScore"].as_f64().unwrap();
    assert!((0.3..=1.0).contains(&quality));
}

#[test]
fn test_session_validate_rejects_short_session() {
    let ws = Workspace::new();
    let candidate = ws.candidate(0, 10);
    let out = ws.run_json(&["session", "validate", p(&candidate)]);

    assert_eq!(out["isValid"], false);
    assert_eq!(out["rejection"], "too_short");
    assert_eq!(out["record"]["isValid"], false);
}

#[test]
fn test_credential_id_has_expected_shape() {
    let ws = Workspace::new();
    let id = ws.run_json(&["credential", "id", "--track", TRACK, "--level", "Intent"]);
    let id = id.as_str().unwrap().to_string();
    assert!(id.starts_with("DA-INT-2024-"), "{id}");

    let check = ws.run_json(&["credential", "verify", &id]);
    assert_eq!(check["isValid"], true);
}

#[test]
fn test_credential_id_refuses_track_without_letter_code() {
    let ws = Workspace::new();
    let (stdout, stderr, code) = ws.run(&["credential", "id", "--track", "3d-modelling", "--level", "Intent"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("3d-modelling"), "{stderr}");
}

#[test]
fn test_session_from_previous_month_is_accepted() {
    let ws = Workspace::new();
    let candidate = ws.candidate(20, 45);
    let out = ws.run_json(&["session", "validate", p(&candidate)]);
    assert_eq!(out["isValid"], true);
    assert_eq!(out["record"]["startTime"], "2024-11-25T09:00:00Z");
}

#[test]
fn test_credential_verify_rejects_bad_format() {
    let ws = Workspace::new();
    let check = ws.run_json(&["credential", "verify", "not-an-id"]);
    assert_eq!(check["isValid"], false);
    assert_eq!(check["reason"], "Invalid credential format");
}

#[test]
fn test_week_of_sessions_issues_verifiable_credential() {
    let ws = Workspace::new();
    let history = ws.record_week();
    let registry = ws.path("credentials.json");

    let tiers = ws.run_json(&["credential", "check", "--history", p(&history), "--track", TRACK]);
    let tiers = tiers.as_array().unwrap();
    assert_eq!(tiers[0]["level"], "Intent");
    assert_eq!(tiers[0]["eligible"], true);
    assert_eq!(tiers[1]["eligible"], false);

    let issued = ws.run_json(&[
        "credential",
        "issue",
        "--history",
        p(&history),
        "--track",
        TRACK,
        "--title",
        "Data Analysis Fundamentals",
        "--learner",
        "Alex Johnson",
        "--level",
        "intent",
        "--registry",
        p(&registry),
    ]);
    let id = issued["credential"]["id"].as_str().unwrap().to_string();
    assert_eq!(issued["credential"]["validUntil"], "2025-12-15");
    assert!(issued["shareUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://www.linkedin.com/profile/add?"));

    let verified = ws.run_json(&["credential", "verify", &id, "--registry", p(&registry)]);
    assert_eq!(verified["isValid"], true, "{verified}");
    assert_eq!(verified["credential"]["id"], id.as_str());

    let page = ws.run_json(&[
        "credential",
        "page",
        &id,
        "--registry",
        p(&registry),
        "--history",
        p(&history),
    ]);
    assert_eq!(page["isActive"], true);
    assert_eq!(page["daysRemaining"], 365);
}

#[test]
fn test_issue_above_earned_tier_fails() {
    let ws = Workspace::new();
    let history = ws.record_week();
    let (_, stderr, code) = ws.run(&[
        "credential",
        "issue",
        "--history",
        p(&history),
        "--track",
        TRACK,
        "--title",
        "Data Analysis Fundamentals",
        "--learner",
        "Alex Johnson",
        "--level",
        "Performance",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "{stderr}");
}

#[test]
fn test_badge_check_persists_earned_badges() {
    let ws = Workspace::new();
    let history = ws.record_week();
    let earned = ws.path("badges.json");

    let first = ws.run_json(&["badge", "check", "--history", p(&history), "--earned", p(&earned)]);
    assert_eq!(first["stats"]["totalSessions"], 7);
    assert_eq!(first["stats"]["longestStreak"], 7);
    let awarded = first["newlyEarned"].as_array().unwrap();
    assert!(awarded.iter().any(|b| b["id"] == "first-session"));
    assert!(earned.exists());

    let second = ws.run_json(&["badge", "check", "--history", p(&history), "--earned", p(&earned)]);
    assert_eq!(second["newlyEarned"].as_array().unwrap().len(), 0);
    assert_eq!(second["progress"]["earnedCount"], awarded.len());
}

#[test]
fn test_badge_tiers() {
    let ws = Workspace::new();
    let ladder = ws.run_json(&["badge", "tiers"]);
    assert_eq!(ladder.as_array().unwrap().len(), 6);
    assert_eq!(ladder[5]["name"], "Challenger");

    let standing = ws.run_json(&["badge", "tiers", "--points", "250"]);
    assert_eq!(standing["current"]["name"], "Silver");
    assert_eq!(standing["next"]["name"], "Gold");
    assert_eq!(standing["pointsToNext"], 50);
}

#[test]
fn test_badge_catalog_filters() {
    let ws = Workspace::new();
    let legendary = ws.run_json(&["badge", "catalog", "--rarity", "legendary"]);
    assert_eq!(legendary.as_array().unwrap().len(), 4);

    let gold = ws.run_json(&["badge", "catalog", "--tier", "Gold"]);
    assert!(gold.as_array().unwrap().iter().all(|b| b["tier"] == "Gold"));
}

#[test]
fn test_config_set_then_get() {
    let ws = Workspace::new();
    let (stdout, _, code) = ws.run(&["config", "set", "validation.cooldown_hours", "6"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = ws.run(&["config", "get", "validation.cooldown_hours"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "6");

    let (_, stderr, code) = ws.run(&["config", "set", "validation.min_session_minutes", "500"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("min_session_minutes"), "{stderr}");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let ws = Workspace::new();
    let (_, stderr, code) = ws.run(&["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}
