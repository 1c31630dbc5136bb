//! End-to-end tests for the `fdas` binary.
//!
//! Every test gets its own data directory through `FDAS_DATA_DIR`, so the
//! login flag never leaks between tests or into the user's machine.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

/// Path to the fdas binary (set by cargo at compile time)
fn fdas_bin() -> &'static str {
    env!("CARGO_BIN_EXE_fdas")
}

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Env {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Logged-in environment
    fn logged_in() -> Self {
        let env = Env::new();
        let out = env.run(&["login", "--username", "admin", "--password", "fdas123"]);
        assert!(out.status.success(), "login failed: {}", stderr(&out));
        env
    }

    /// Logged-in environment with a fresh estimate document
    fn with_document() -> (Self, PathBuf) {
        let env = Env::logged_in();
        let doc = env.path("site.fdas.json");
        let out = env.run(&["init", doc.to_str().unwrap()]);
        assert!(out.status.success(), "init failed: {}", stderr(&out));
        (env, doc)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(fdas_bin())
            .args(args)
            .env("FDAS_DATA_DIR", self.dir.path().join("data"))
            .env_remove("RUST_LOG")
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to execute command")
    }

    fn run_doc(&self, doc: &Path, args: &[&str]) -> Output {
        let mut full = vec!["--input", doc.to_str().unwrap()];
        full.extend_from_slice(args);
        self.run(&full)
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn json(out: &Output) -> Value {
    assert!(out.status.success(), "command failed: {}", stderr(out));
    serde_json::from_slice(&out.stdout).expect("stdout should be JSON")
}

// ============================================================================
// Login gate
// ============================================================================

#[test]
fn test_commands_refused_before_login() {
    let env = Env::new();
    let out = env.run(&["summary"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Not logged in"));
}

#[test]
fn test_wrong_password_rejected() {
    let env = Env::new();
    let out = env.run(&["login", "--username", "admin", "--password", "nope"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Invalid username or password"));

    let status = json(&env.run(&["status", "--json"]));
    assert_eq!(status["authenticated"], false);
}

#[test]
fn test_logout_locks_again() {
    let env = Env::logged_in();
    assert!(env.run(&["summary"]).status.success());

    assert!(env.run(&["logout"]).status.success());
    assert!(!env.run(&["summary"]).status.success());
}

// ============================================================================
// Read-only views
// ============================================================================

#[test]
fn test_summary_with_defaults() {
    let env = Env::logged_in();
    let out = env.run(&["summary"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("SLC points (with spare):  0"));
    assert!(text.contains("Loop 1: 0 pts"));
    assert!(text.contains("professional review"));
}

#[test]
fn test_summary_json_after_edits() {
    let (env, doc) = Env::with_document();
    assert!(env.run_doc(&doc, &["floor", "set", "1", "smoke", "100"]).status.success());
    assert!(env.run_doc(&doc, &["floor", "set", "2", "horn-strobe", "50"]).status.success());
    assert!(env.run_doc(&doc, &["floor", "set", "3", "ann", "8"]).status.success());

    let v = json(&env.run_doc(&doc, &["summary", "--json"]));
    assert_eq!(v["slcPoints"], 119);
    assert_eq!(v["loopPlan"]["loopCount"], 1);
    assert_eq!(v["loopPlan"]["pointsPerLoop"], serde_json::json!([119]));
    assert_eq!(v["totalsWithSpare"]["hornStrobe"], 55);
    assert_eq!(v["nacPlan"]["totalNacs"], 4);
    assert_eq!(v["moduleEstimate"]["simSuggested"], true);
    assert_eq!(v["loopFillPercent"], 60);
}

#[test]
fn test_two_loop_split() {
    let (env, doc) = Env::with_document();
    assert!(env.run_doc(&doc, &["floor", "set", "1", "smoke", "300"]).status.success());

    let v = json(&env.run_doc(&doc, &["summary", "--json"]));
    assert_eq!(v["loopPlan"]["pointsPerLoop"], serde_json::json!([165, 165]));
}

#[test]
fn test_bom_search_filters_device_rows() {
    let env = Env::logged_in();
    let v = json(&env.run(&["bom", "--search", "horn", "--json"]));
    let rows = v.as_array().unwrap();
    assert_eq!(rows.len(), 1 + 1 + 4);
    assert_eq!(rows[0]["item"], "Horn/Strobe");
    assert_eq!(rows[1]["item"], "—");
}

// ============================================================================
// Exports
// ============================================================================

#[test]
fn test_export_csv_to_stdout() {
    let (env, doc) = Env::with_document();
    assert!(env.run_doc(&doc, &["floor", "set", "1", "smoke", "100"]).status.success());

    let out = env.run_doc(&doc, &["export", "csv", "-o", "-"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    assert!(text.starts_with("\"Item\",\"Qty\",\"Qty (with spare)\",\"Notes\""));

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 11 + 1 + 4);
    assert_eq!(&records[0][0], "Smoke Detector");
    assert_eq!(&records[0][1], "100");
    assert_eq!(&records[0][2], "110");
}

#[test]
fn test_export_defaults_to_named_files() {
    let env = Env::logged_in();
    assert!(env.run(&["export", "csv"]).status.success());
    assert!(env.run(&["export", "json"]).status.success());
    assert!(env.path("fdas-bom.csv").exists());

    let json_text = std::fs::read_to_string(env.path("fdas-config-export.json")).unwrap();
    let v: Value = serde_json::from_str(&json_text).unwrap();
    for key in [
        "rules",
        "floors",
        "totals",
        "totalsWithSpare",
        "slcPoints",
        "loopPlan",
        "nacPlan",
        "moduleEstimate",
        "bomRows",
    ] {
        assert!(v.get(key).is_some(), "missing {}", key);
    }
}

#[test]
fn test_json_export_reloads_as_input() {
    let (env, doc) = Env::with_document();
    assert!(env.run_doc(&doc, &["rules", "set", "loopMaxPoints", "125"]).status.success());
    assert!(env.run_doc(&doc, &["floor", "set", "1", "heat", "12"]).status.success());

    let export = env.path("export.json");
    assert!(env
        .run_doc(&doc, &["export", "json", "-o", export.to_str().unwrap()])
        .status
        .success());

    let v = json(&env.run_doc(&export, &["summary", "--json"]));
    assert_eq!(v["totals"]["heat"], 12);
    assert_eq!(v["loopPlan"]["effectiveCap"], 100);
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_floor_add_rename_remove() {
    let (env, doc) = Env::with_document();

    let floors = json(&env.run_doc(&doc, &["floor", "add", "--json"]));
    assert_eq!(floors.as_array().unwrap().len(), 4);
    assert_eq!(floors[3]["name"], "Floor 4");

    let floors = json(&env.run_doc(&doc, &["floor", "rename", "4", "Roof Deck", "--json"]));
    assert_eq!(floors[3]["name"], "Roof Deck");

    for _ in 0..3 {
        assert!(env.run_doc(&doc, &["floor", "remove", "1"]).status.success());
    }
    let out = env.run_doc(&doc, &["floor", "remove", "1"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("last remaining floor"));

    let floors = json(&env.run_doc(&doc, &["floor", "list", "--json"]));
    assert_eq!(floors[0]["name"], "Roof Deck");
}

#[test]
fn test_floor_errors() {
    let (env, doc) = Env::with_document();

    let out = env.run_doc(&doc, &["floor", "set", "9", "smoke", "1"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Floor #9 not found"));

    let out = env.run_doc(&doc, &["floor", "set", "1", "laser", "1", "--json"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("UnknownDevice"));
}

#[test]
fn test_floor_counts_are_clamped() {
    let (env, doc) = Env::with_document();
    assert!(env.run_doc(&doc, &["floor", "set", "1", "mps", "-5"]).status.success());
    assert!(env.run_doc(&doc, &["floor", "set", "2", "mps", "250000"]).status.success());
    assert!(env.run_doc(&doc, &["floor", "set", "3", "mps", "abc"]).status.success());

    let floors = json(&env.run_doc(&doc, &["floor", "list", "--json"]));
    assert_eq!(floors[0]["mps"], 0);
    assert_eq!(floors[1]["mps"], 99999);
    assert_eq!(floors[2]["mps"], 0);
}

#[test]
fn test_rules_set_clamps_and_reset() {
    let (env, doc) = Env::with_document();

    let rules = json(&env.run_doc(&doc, &["rules", "set", "loop-max-points", "5000", "--json"]));
    assert_eq!(rules["loopMaxPoints"], 1000);

    let rules = json(&env.run_doc(&doc, &["rules", "set", "sparePercent", "0.25", "--json"]));
    assert_eq!(rules["sparePercent"], 0.25);

    let rules = json(&env.run_doc(&doc, &["rules", "reset", "--json"]));
    assert_eq!(rules["loopMaxPoints"], 250);
    assert_eq!(rules["sparePercent"], 0.1);

    let out = env.run_doc(&doc, &["rules", "set", "bogus", "1"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Unknown rule"));
}

#[test]
fn test_edit_requires_input_document() {
    let env = Env::logged_in();
    let out = env.run(&["floor", "add"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("--input"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let (env, doc) = Env::with_document();
    let out = env.run(&["init", doc.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("already exists"));

    assert!(env.run(&["init", doc.to_str().unwrap(), "--force"]).status.success());
}

#[test]
fn test_incompatible_document_version() {
    let env = Env::logged_in();
    let doc = env.path("future.json");
    std::fs::write(&doc, r#"{"meta": {"version": "9.0.0"}}"#).unwrap();

    let out = env.run_doc(&doc, &["summary"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Version mismatch"));
}

#[test]
fn test_malformed_rules_still_load() {
    let env = Env::logged_in();
    let doc = env.path("hand-edited.json");
    std::fs::write(
        &doc,
        r#"{"rules": {"loopMaxPoints": "abc", "sparePercent": "0.2", "cc1PerNAC": -3}}"#,
    )
    .unwrap();

    let v = json(&env.run_doc(&doc, &["summary", "--json"]));
    assert_eq!(v["loopPlan"]["effectiveCap"], 40);

    let rules = json(&env.run_doc(&doc, &["rules", "show", "--json"]));
    assert_eq!(rules["loopMaxPoints"], 50);
    assert_eq!(rules["sparePercent"], 0.2);
    assert_eq!(rules["cc1PerNAC"], 0);
}
