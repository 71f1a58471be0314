use assert_cmd::Command;
use indoc::indoc;
use std::fs;
use tempfile::TempDir;

const SNAPSHOT: &str = indoc! {r#"
    {
      "workbook": {
        "sheets": [
          {
            "name": "Leases",
            "headers": ["File", "ContractURL", "Amount", "State"],
            "rows": [
              {"File": "a.pdf", "ContractURL": "http://x/a.pdf", "Amount": 100, "State": "CA"},
              {"File": "b.pdf", "ContractURL": "http://x/b.pdf", "Amount": 200, "State": "ZZ"},
              {"File": "c.pdf", "ContractURL": "http://x/c.pdf", "Amount": 300, "State": "NY"}
            ]
          },
          {
            "name": "Amendments",
            "headers": ["File", "ContractURL", "Note"],
            "rows": [{"File": "d.pdf", "ContractURL": "http://x/d.pdf", "Note": "ok"}]
          }
        ]
      },
      "signals": {
        "row_statuses": {"Leases": {"0": "complete"}},
        "rfi_comments": {"Leases": {"2": {"Amount": "Which amount applies?"}}}
      },
      "preflight": [
        {"sheet_name": "Amendments", "row_index": 0, "field_name": "ContractURL",
         "valid": false, "category": "text_unreadable"}
      ],
      "glossary": [{"header": "State", "allowed_values": ["CA", "NY"]}]
    }
"#};

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.json");
    fs::write(&path, SNAPSHOT).unwrap();
    (dir, path)
}

fn reviewmap(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reviewmap"));
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_analyze_json_report() {
    let (dir, snapshot) = setup();
    let output = reviewmap(&dir)
        .arg("analyze")
        .arg(&snapshot)
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let leases = &report["sheets"][0];
    assert_eq!(leases["sheet_name"], "Leases");
    assert_eq!(leases["rows"][0]["review"]["reason"], "finalized");
    assert_eq!(leases["rows"][1]["review"]["reason"], "anomaly_detected");
    assert_eq!(leases["rows"][2]["review"]["reason"], "rfi_required");
    assert_eq!(leases["analytics"]["progress_percent"], 33);

    let amendments = &report["sheets"][1];
    assert_eq!(
        amendments["rows"][0]["review"]["reason"],
        "manual_pdf_review_required"
    );
}

#[test]
fn test_analyze_single_sheet_to_file() {
    let (dir, snapshot) = setup();
    let out = dir.path().join("report.md");
    reviewmap(&dir)
        .arg("analyze")
        .arg(&snapshot)
        .args(["--format", "markdown", "--sheet", "Amendments", "--output"])
        .arg(&out)
        .assert()
        .success();

    let markdown = fs::read_to_string(out).unwrap();
    assert!(markdown.starts_with("# Review Status Report"));
    assert!(markdown.contains("Amendments"));
    assert!(!markdown.contains("## Leases"));
}

#[test]
fn test_analyze_unknown_sheet_fails() {
    let (dir, snapshot) = setup();
    let assert = reviewmap(&dir)
        .arg("analyze")
        .arg(&snapshot)
        .args(["--sheet", "Missing", "--no-color"])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("available: Leases, Amendments"));
}

#[test]
fn test_analyze_rejects_malformed_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"workbook\": ").unwrap();
    reviewmap(&dir).arg("analyze").arg(&path).assert().failure();
}

#[test]
fn test_init_creates_config_once() {
    let dir = TempDir::new().unwrap();
    reviewmap(&dir).arg("init").assert().success();
    assert!(dir.path().join(".reviewmap.toml").exists());

    reviewmap(&dir).arg("init").assert().failure();
    reviewmap(&dir).args(["init", "--force"]).assert().success();
}

#[test]
fn test_analyze_terminal_output() {
    let (dir, snapshot) = setup();
    let output = reviewmap(&dir)
        .arg("analyze")
        .arg(&snapshot)
        .arg("--no-color")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Leases"));
    assert!(text.contains("NEEDS REVIEW"));
}
