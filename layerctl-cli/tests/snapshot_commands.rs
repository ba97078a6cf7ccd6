use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const V3: &str = "arn:aws:lambda:us-west-2:123456789012:layer:asserts-aws-lambda-layer:3";

fn layerctl_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("layerctl"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn snapshot() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/list-functions.json")
}

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("config.yml");
    fs::write(&path, body).expect("write config");
    path
}

fn attach_config(dir: &TempDir) -> PathBuf {
    write_config(
        dir,
        &format!(
            "operation: add-layer\nfunction_name_pattern: 'fn-'\nlayer_arn: {V3}\n\
             ASSERTS_METRIC_ENDPOINT: https://metrics.example\nASSERTS_PASSWORD: hunter2\n"
        ),
    )
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_good_config() {
    let dir = TempDir::new().expect("dir");
    let config = attach_config(&dir);
    layerctl_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .assert()
        .success()
        .stdout(contains("config valid: attach on pattern 'fn-'"))
        .stdout(contains(V3));
}

#[test]
fn validate_finds_config_in_working_directory() {
    let dir = TempDir::new().expect("dir");
    write_config(&dir, "operation: disable-layer\nfunction_names: [fn-b]\n");
    layerctl_cmd(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(contains("disable on names [fn-b]"));
}

#[test]
fn validate_rejects_missing_operation() {
    let dir = TempDir::new().expect("dir");
    let config = write_config(&dir, "function_names: [fn-a]\n");
    layerctl_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .assert()
        .failure()
        .stderr(contains("'operation' is not specified"));
}

#[test]
fn validate_lists_valid_operations() {
    let dir = TempDir::new().expect("dir");
    let config = write_config(&dir, "operation: upgrade\nfunction_names: [fn-a]\n");
    layerctl_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .assert()
        .failure()
        .stderr(contains("add-layer").and(contains("update-version")));
}

#[test]
fn validate_reports_missing_file() {
    let dir = TempDir::new().expect("dir");
    layerctl_cmd(dir.path())
        .args(["--config", "nope.yml", "validate"])
        .assert()
        .failure()
        .stderr(contains("config not found"));
}

// ---------------------------------------------------------------------------
// plan
// ---------------------------------------------------------------------------

#[test]
fn plan_shows_layer_and_masked_password() {
    let dir = TempDir::new().expect("dir");
    let config = attach_config(&dir);
    layerctl_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("plan")
        .arg("--snapshot")
        .arg(snapshot())
        .assert()
        .success()
        .stdout(contains("--- a/fn-a"))
        .stdout(contains(format!("+  {V3}")))
        .stdout(contains("+  ACCOUNT_ID=123456789012"))
        .stdout(contains("ASSERTS_PASSWORD=sha256:"))
        .stdout(contains("hunter2").not())
        .stdout(contains("DATABASE_URL=pg://a"))
        .stdout(contains("# fn-py: skipped"))
        .stdout(contains("other").not());
}

#[test]
fn plan_account_flag_overrides_snapshot_account() {
    let dir = TempDir::new().expect("dir");
    let config = attach_config(&dir);
    layerctl_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("plan")
        .arg("--snapshot")
        .arg(snapshot())
        .args(["--account-id", "999"])
        .assert()
        .success()
        .stdout(contains("+  ACCOUNT_ID=999"));
}

#[test]
fn plan_reports_no_differences_when_converged() {
    let dir = TempDir::new().expect("dir");
    let config = write_config(&dir, "operation: disable-layer\nfunction_names: [fn-b]\n");
    layerctl_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("plan")
        .arg("--snapshot")
        .arg(snapshot())
        .assert()
        .success()
        .stdout(contains("No differences for disable (1 selected)"));
}

#[test]
fn plan_rejects_malformed_snapshot() {
    let dir = TempDir::new().expect("dir");
    let config = attach_config(&dir);
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ nope").expect("write snapshot");
    layerctl_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("plan")
        .arg("--snapshot")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(contains("bad.json"));
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[test]
fn list_json_reports_addon_state() {
    let dir = TempDir::new().expect("dir");
    let config = attach_config(&dir);
    let output = layerctl_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("list")
        .arg("--snapshot")
        .arg(snapshot())
        .arg("--json")
        .output()
        .expect("run list");
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let rows = rows.as_array().expect("array");
    let names: Vec<_> = rows.iter().map(|r| r["function"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["fn-a", "fn-b", "fn-py"]);

    assert_eq!(rows[0]["state"], "absent");
    assert_eq!(rows[0]["pending"], "layers, variables");
    assert_eq!(rows[1]["state"], "disabled");
    assert_eq!(rows[1]["layer"], "asserts-aws-lambda-layer:2");
    assert_eq!(rows[2]["state"], "unsupported");
}

#[test]
fn list_table_has_header_and_rows() {
    let dir = TempDir::new().expect("dir");
    let config = attach_config(&dir);
    layerctl_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("list")
        .arg("--snapshot")
        .arg(snapshot())
        .assert()
        .success()
        .stdout(contains("3 selected | 1 attached"))
        .stdout(contains("DISABLED"))
        .stdout(contains("fn-py"));
}
