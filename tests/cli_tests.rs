//! CLI interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn templatekit() -> Command {
    let mut cmd = Command::cargo_bin("templatekit").unwrap();
    cmd.env_remove("TEMPLATEKIT_REPO").env_remove("RUST_LOG");
    cmd
}

fn write_template(dir: &Path, variables: &str, config: Option<&str>, source: Option<&str>) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("cookiecutter.json"), variables).unwrap();
    if let Some(config) = config {
        fs::write(dir.join("templatekit.yaml"), config).unwrap();
    }
    if let Some(source) = source {
        fs::write(dir.join(source), "{{ cookiecutter.copyright_holder }}\n").unwrap();
    }
}

fn sample_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_template(
        &root.join("file_templates/copyright"),
        r#"{"year": "2024", "copyright_holder": ["AURA", "Jane Doe"]}"#,
        Some("name: COPYRIGHT file\n"),
        Some("COPYRIGHT.jinja"),
    );
    write_template(
        &root.join("project_templates/example_project"),
        r#"{"project_name": "example"}"#,
        Some(""),
        None,
    );

    temp_dir
}

#[test]
fn test_version_flag() {
    templatekit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("templatekit"));
}

#[test]
fn test_help_flag() {
    templatekit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "A CLI tool for discovering templates",
        ));
}

#[test]
fn test_list_templates() {
    let repo = sample_repo();

    templatekit()
        .arg("--template-repo")
        .arg(repo.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("File templates:"))
        .stdout(predicate::str::contains("    copyright"))
        .stdout(predicate::str::contains("Project templates:"))
        .stdout(predicate::str::contains("    example_project"));
}

#[test]
fn test_list_from_nested_directory() {
    let repo = sample_repo();

    templatekit()
        .arg("-r")
        .arg(repo.path().join("file_templates/copyright"))
        .args(["list", "--type", "project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("example_project"))
        .stdout(predicate::str::contains("File templates:").not());
}

#[test]
fn test_show_json() {
    let repo = sample_repo();

    templatekit()
        .arg("-r")
        .arg(repo.path())
        .args(["show", "copyright", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "COPYRIGHT file""#))
        .stdout(predicate::str::contains(r#""group": "General""#))
        .stdout(predicate::str::contains("COPYRIGHT.jinja"));
}

#[test]
fn test_show_yaml() {
    let repo = sample_repo();

    templatekit()
        .arg("-r")
        .arg(repo.path())
        .args(["show", "example_project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind: project"))
        .stdout(predicate::str::contains("dialog_title: Create from template"));
}

#[test]
fn test_variables_with_context() {
    let repo = sample_repo();

    templatekit()
        .arg("-r")
        .arg(repo.path())
        .args(["variables", "copyright", "--context", "year=1999"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""year": "1999""#))
        .stdout(predicate::str::contains(r#""copyright_holder": "AURA""#));
}

#[test]
fn test_variables_unknown_key() {
    let repo = sample_repo();

    templatekit()
        .arg("-r")
        .arg(repo.path())
        .args(["variables", "copyright", "--context", "colour=blue"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_check_passes() {
    let repo = sample_repo();

    templatekit()
        .arg("-r")
        .arg(repo.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Passed!"));
}

#[test]
fn test_check_reports_invalid_templates() {
    let repo = sample_repo();
    write_template(
        &repo.path().join("file_templates/broken"),
        "{}",
        None,
        Some("broken.jinja"),
    );

    templatekit()
        .arg("-r")
        .arg(repo.path())
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("1 invalid template(s)"))
        .stdout(predicate::str::contains("broken"));
}

#[test]
fn test_unknown_template() {
    let repo = sample_repo();

    templatekit()
        .arg("-r")
        .arg(repo.path())
        .args(["show", "whatwhat"])
        .assert()
        .failure()
        .code(4)
        .stdout(predicate::str::contains("whatwhat"));
}

#[test]
fn test_no_repository() {
    let temp_dir = TempDir::new().unwrap();

    templatekit()
        .arg("-r")
        .arg(temp_dir.path())
        .arg("list")
        .assert()
        .failure()
        .code(3);
}

#[test]
fn test_repository_from_env() {
    let repo = sample_repo();

    templatekit()
        .env("TEMPLATEKIT_REPO", repo.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("copyright"));
}
