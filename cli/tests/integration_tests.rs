use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "smart_report_cli_test_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_smart-report"))
}

const NVME_OUTPUT: &str = "\
=== START OF INFORMATION SECTION ===
Model Number:                       UMIS RPJYJ1T24RLS1QWY
Serial Number:                      SS0L25218X3RC11B12GB
Firmware Version:                   2.Q1107A

=== START OF SMART DATA SECTION ===
SMART overall-health self-assessment test result: PASSED

SMART/Health Information (NVMe Log 0x02)
Critical Warning:                   0x00
Temperature:                        29 Celsius
Percentage Used:                    0%
Data Units Read:                    1,778,273 [910 GB]
Power On Hours:                     41

Error Information (NVMe Log 0x01, 16 of 64 entries)
No Errors Logged
";

#[test]
fn test_parse_file_emits_json_without_raw() {
    let dir = TempDir::new("parse_file");
    let input = dir.join("nvme.txt");
    fs::write(&input, NVME_OUTPUT).expect("failed to write fixture");

    let output = bin()
        .arg("parse-file")
        .arg(&input)
        .output()
        .expect("failed to run smart-report");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["model"], "UMIS RPJYJ1T24RLS1QWY");
    assert_eq!(value["health"], "PASSED");
    assert_eq!(value["nvme_health"]["temperature"]["value"], 29);
    assert_eq!(value["nvme_health"]["power_on_hours"]["value"], 41);
    assert!(value.get("raw").is_none());
}

#[test]
fn test_parse_file_include_raw_round_trips_input() {
    let dir = TempDir::new("parse_file_raw");
    let input = dir.join("nvme.txt");
    fs::write(&input, NVME_OUTPUT).expect("failed to write fixture");

    let output = bin()
        .arg("parse-file")
        .arg(&input)
        .arg("--include-raw")
        .output()
        .expect("failed to run smart-report");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["raw"], NVME_OUTPUT);
}

#[test]
fn test_parse_stdin_table_format() {
    let mut child = bin()
        .arg("parse-stdin")
        .arg("--format")
        .arg("table")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn smart-report");
    child
        .stdin
        .as_mut()
        .expect("stdin should be piped")
        .write_all(NVME_OUTPUT.as_bytes())
        .expect("failed to write stdin");
    let output = child.wait_with_output().expect("failed to wait");
    assert!(output.status.success());

    let table = String::from_utf8_lossy(&output.stdout);
    assert!(table.contains("Model:    UMIS RPJYJ1T24RLS1QWY"));
    assert!(table.contains("Health:   PASSED"));
    assert!(table.contains("temperature: 29 Celsius"));
}

#[test]
fn test_parse_stdin_total_on_garbage() {
    let mut child = bin()
        .arg("parse-stdin")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn smart-report");
    child
        .stdin
        .as_mut()
        .expect("stdin should be piped")
        .write_all(b"complete garbage, nothing recognizable")
        .expect("failed to write stdin");
    let output = child.wait_with_output().expect("failed to wait");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value, serde_json::json!({}));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    let output = bin().output().expect("failed to run smart-report");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}
