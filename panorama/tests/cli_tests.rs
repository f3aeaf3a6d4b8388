use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const ORG_GATE: &str = r#"{
    "name": "Org gate",
    "conditions": [{ "metric": ["LOC"], "operator": "<=", "threshold": 500 }],
    "branches": ["productionBranch", "stagingBranch"]
}"#;

const REPO: &str = r#"{
    "_id": "r1",
    "owner": "cyclopt",
    "name": "api",
    "language": "python",
    "branches": ["main", "dev", "feature"],
    "productionBranch": "main",
    "stagingBranch": "dev"
}"#;

const PROJECT: &str = r#"{
    "_id": "p1",
    "type": "team",
    "linkedRepositories": [{ "_id": "r1", "language": "python" }]
}"#;

const PRISTINE_PROJECT_GATE: &str = r#"{
    "name": "",
    "conditions": [],
    "linkedRepositories": [{
        "repoId": "r1",
        "branches": { "isProductionBranch": true, "isStagingBranch": true, "otherBranches": [] }
    }]
}"#;

/// Temporary working directory for one CLI scenario.
struct PanoramaTestEnv {
    tmp: TempDir,
}

impl PanoramaTestEnv {
    fn new() -> Result<Self> {
        Ok(Self {
            tmp: tempfile::tempdir()?,
        })
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    fn panorama(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("panorama"));
        cmd.current_dir(self.root())
            .arg("--project-dir")
            .arg(self.root())
            .env_remove("PANORAMA_CATALOG")
            .env_remove("PANORAMA_STORE_DIR");
        cmd
    }
}

#[test]
fn test_metrics_table_for_dart() -> Result<()> {
    let env = PanoramaTestEnv::new()?;
    env.panorama()
        .args(["metrics", "--language", "dart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Number of Functions"))
        .stdout(predicate::str::contains("Halstead Volume"))
        .stdout(predicate::str::contains("16 metrics available."));
    Ok(())
}

#[test]
fn test_metrics_uses_default_language_from_config() -> Result<()> {
    let env = PanoramaTestEnv::new()?;
    env.write("panorama.yaml", "default_language: go\n")?;
    env.panorama()
        .arg("metrics")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cyclomatic Complexity per Function"));
    Ok(())
}

#[test]
fn test_check_pristine_project_draft() -> Result<()> {
    let env = PanoramaTestEnv::new()?;
    let draft = env.write("draft.json", PRISTINE_PROJECT_GATE)?;
    let project = env.write("project.json", PROJECT)?;

    let output = env
        .panorama()
        .arg("check")
        .arg("--draft")
        .arg(&draft)
        .arg("--project")
        .arg(&project)
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["done_disabled"], true);
    assert_eq!(report["reset_disabled"], true);
    assert_eq!(report["type"], "Project");
    let reasons: Vec<&str> = report["blockers"]
        .as_array()
        .context("blockers should be an array")?
        .iter()
        .filter_map(|b| b["reason"].as_str())
        .collect();
    assert_eq!(reasons, vec!["empty_name", "no_conditions"]);
    Ok(())
}

#[test]
fn test_check_unchanged_gate_cannot_be_done() -> Result<()> {
    let env = PanoramaTestEnv::new()?;
    let gate = env.write("gate.json", ORG_GATE)?;

    env.panorama()
        .arg("check")
        .arg("--draft")
        .arg(&gate)
        .arg("--baseline")
        .arg(&gate)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""reason": "unchanged""#))
        .stdout(predicate::str::contains(r#""should_reexecute": false"#));
    Ok(())
}

#[test]
fn test_check_rejects_grade_on_numeric_metric() -> Result<()> {
    let env = PanoramaTestEnv::new()?;
    let draft = env.write(
        "draft.json",
        r#"{
            "name": "Graded size",
            "conditions": [{ "metric": ["LOC"], "operator": ">=", "threshold": "B" }],
            "branches": ["all"]
        }"#,
    )?;

    env.panorama()
        .arg("check")
        .arg("--draft")
        .arg(&draft)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""done_disabled": true"#))
        .stdout(predicate::str::contains(r#""reason": "invalid_condition""#));

    env.panorama()
        .arg("submit")
        .arg("--draft")
        .arg(&draft)
        .args(["--organization", "org-1"])
        .assert()
        .failure();
    assert!(!env.root().join(".panorama/gates.json").exists());
    Ok(())
}

#[test]
fn test_submit_keeps_project_gate_branches() -> Result<()> {
    let env = PanoramaTestEnv::new()?;
    let project = env.write("project.json", PROJECT)?;
    let draft = env.write(
        "draft.json",
        r#"{
            "name": "Project gate",
            "conditions": [{ "metric": ["LOC"], "operator": "<=", "threshold": 500 }],
            "linkedRepositories": [{
                "repoId": "r1",
                "branches": { "isProductionBranch": true, "isStagingBranch": false, "otherBranches": [] }
            }],
            "branches": ["productionBranch"]
        }"#,
    )?;

    let output = env
        .panorama()
        .arg("submit")
        .arg("--draft")
        .arg(&draft)
        .arg("--project")
        .arg(&project)
        .output()?;
    assert!(output.status.success());

    let saved: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(saved["branches"], serde_json::json!(["productionBranch"]));
    Ok(())
}

#[test]
fn test_branches_for_organization_gate() -> Result<()> {
    let env = PanoramaTestEnv::new()?;
    let gate = env.write("gate.json", ORG_GATE)?;
    let repo = env.write("repo.json", REPO)?;

    env.panorama()
        .arg("branches")
        .arg("--gate")
        .arg(&gate)
        .arg("--repo")
        .arg(&repo)
        .assert()
        .success()
        .stdout(predicate::str::contains("main (production)"))
        .stdout(predicate::str::contains("dev (staging)"))
        .stdout(predicate::str::contains("feature").not());
    Ok(())
}

#[test]
fn test_submit_then_status_round_trip() -> Result<()> {
    let env = PanoramaTestEnv::new()?;
    let draft = env.write("draft.json", ORG_GATE)?;
    let repo = env.write("repo.json", REPO)?;

    let output = env
        .panorama()
        .arg("submit")
        .arg("--draft")
        .arg(&draft)
        .args(["--organization", "org-1"])
        .output()?;
    assert!(output.status.success());

    let saved: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let id = saved["_id"].as_str().context("saved gate should have an id")?;
    assert_eq!(id.len(), 24);
    assert!(env.root().join(".panorama/gates.json").exists());

    let saved_gate = env.write("saved.json", &serde_json::to_string(&saved)?)?;
    env.panorama()
        .arg("status")
        .arg("--gate")
        .arg(&saved_gate)
        .arg("--repo")
        .arg(&repo)
        .args(["--branch", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status: not_computed"));

    env.panorama()
        .arg("status")
        .arg("--gate")
        .arg(&saved_gate)
        .arg("--repo")
        .arg(&repo)
        .assert()
        .success()
        .stdout(predicate::str::contains("status: no_branch"));
    Ok(())
}

#[test]
fn test_submit_refuses_gate_without_conditions() -> Result<()> {
    let env = PanoramaTestEnv::new()?;
    let draft = env.write(
        "draft.json",
        r#"{ "name": "Empty", "conditions": [], "branches": ["all"] }"#,
    )?;

    env.panorama()
        .arg("submit")
        .arg("--draft")
        .arg(&draft)
        .args(["--organization", "org-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("panorama::domain::not_submittable"));

    assert!(!env.root().join(".panorama/gates.json").exists());
    Ok(())
}

#[test]
fn test_submit_requires_an_owner() -> Result<()> {
    let env = PanoramaTestEnv::new()?;
    let draft = env.write("draft.json", ORG_GATE)?;

    env.panorama()
        .arg("submit")
        .arg("--draft")
        .arg(&draft)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--organization"));
    Ok(())
}

#[test]
fn test_reconcile_drops_vanished_metrics() -> Result<()> {
    let env = PanoramaTestEnv::new()?;
    let gate = env.write(
        "gate.json",
        r#"{
            "name": "Dart gate",
            "conditions": [
                { "metric": ["DCM_HV"], "operator": "<=", "threshold": 10 },
                { "metric": ["SECURITY"], "operator": ">=", "threshold": "B" }
            ],
            "branches": ["all"]
        }"#,
    )?;

    let output = env
        .panorama()
        .arg("reconcile")
        .arg("--gate")
        .arg(&gate)
        .args(["--from", "dart", "--to", "java"])
        .output()?;
    assert!(output.status.success());

    let reconciled: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let conditions = reconciled["conditions"]
        .as_array()
        .context("conditions should be an array")?;
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0]["metric"][0], "SECURITY");
    assert_eq!(conditions[0]["threshold"], "B");
    Ok(())
}
