// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const DIGEST: &str = r#"
id: digest
name: Digest
steps:
  - id: summary
    type: summarize
    parameters:
      length: short
  - id: keywords
    type: extract
"#;

const ARTICLE: &str = "Rust pipelines chain text steps. Each step feeds the next. \
                       Pipelines fail fast when a step fails.";

fn textflow(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("textflow").unwrap();
    cmd.current_dir(dir)
        .env_remove("TEXTFLOW_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("digest.yaml"), DIGEST).unwrap();
    std::fs::write(temp.path().join("article.txt"), ARTICLE).unwrap();
    std::fs::write(
        temp.path().join("textflow.toml"),
        "[store]\ndirectory = \"store\"\n",
    )
    .unwrap();
    temp
}

#[test]
fn test_types_lists_parameters() {
    let temp = workspace();

    textflow(temp.path())
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("translate"))
        .stdout(predicate::str::contains("en | es | fr | de | nl | pt"));
}

#[test]
fn test_validate_rejects_unknown_language() {
    let temp = workspace();
    std::fs::write(
        temp.path().join("bad.yaml"),
        "id: bad\nname: Bad\nsteps:\n  - id: t\n    type: translate\n    parameters:\n      language: xx\n",
    )
    .unwrap();

    textflow(temp.path())
        .args(["validate", "digest.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pipeline is valid!"));

    textflow(temp.path())
        .args(["validate", "bad.yaml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Step 't' has invalid parameters"));
}

#[test]
fn test_run_with_local_provider() {
    let temp = workspace();

    textflow(temp.path())
        .args(["run", "digest.yaml", "--input", "article.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pipeline completed"))
        .stdout(predicate::str::contains("pipelines"));
}

#[test]
fn test_run_reads_stdin_and_prints_json() {
    let temp = workspace();

    let output = textflow(temp.path())
        .args(["run", "digest.yaml", "--format", "json"])
        .write_stdin(ARTICLE)
        .output()
        .unwrap();

    assert!(output.status.success());
    let trace: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(trace["outcome"]["status"], "completed");
    assert_eq!(trace["steps"][0]["output"], "Rust pipelines chain text steps.");
}

#[test]
fn test_failed_step_exits_non_zero() {
    let temp = workspace();
    std::fs::write(
        temp.path().join("polish.yaml"),
        "id: polish\nname: Polish\nsteps:\n  - id: r\n    type: rewrite\n  - id: k\n    type: extract\n",
    )
    .unwrap();

    textflow(temp.path())
        .args(["run", "polish.yaml", "--input", "article.txt"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("(skipped)"))
        .stdout(predicate::str::contains("Pipeline failed"));
}

#[test]
fn test_stored_pipeline_lifecycle() {
    let temp = workspace();

    textflow(temp.path())
        .args(["pipeline", "import", "digest.yaml"])
        .assert()
        .success();
    assert!(temp.path().join("store").join("digest.yaml").exists());

    textflow(temp.path())
        .args(["pipeline", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digest"));

    textflow(temp.path())
        .args(["plan", "--id", "digest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("summarize(length=short)"));

    textflow(temp.path())
        .args(["run", "--id", "digest", "--input", "article.txt"])
        .assert()
        .success();

    textflow(temp.path())
        .args(["pipeline", "delete", "digest"])
        .assert()
        .success();

    textflow(temp.path())
        .args(["pipeline", "show", "digest"])
        .assert()
        .failure();
}

#[test]
fn test_zero_timeout_rejected() {
    let temp = workspace();

    textflow(temp.path())
        .args(["run", "digest.yaml", "--input", "article.txt", "--step-timeout", "0s"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_pipeline_reported_once() {
    let temp = workspace();
    std::fs::write(
        temp.path().join("bad.yaml"),
        "id: bad\nname: Bad\nsteps:\n  - id: t\n    type: translate\n    parameters:\n      language: xx\n",
    )
    .unwrap();

    let output = textflow(temp.path())
        .env("RUST_LOG", "off")
        .args(["run", "bad.yaml", "--input", "article.txt"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(combined.matches("Step 't' has invalid parameters").count(), 1);
    assert!(combined.contains("Pipeline 'bad' failed validation"));
}

#[test]
fn test_oversized_timeout_rejected() {
    let temp = workspace();

    textflow(temp.path())
        .args(["run", "digest.yaml", "--input", "article.txt", "--run-timeout", "500000000000y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("maximum"));
}
