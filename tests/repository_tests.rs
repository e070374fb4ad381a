//! Repository discovery and enumeration tests against a real directory tree

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use templatekit::error::TemplateError;
use templatekit::repository::Repository;
use templatekit::system::RealSystem;
use templatekit::template::{Template, TemplateKind};

fn write_template(root: &Path, kind: TemplateKind, name: &str, config: Option<&str>) -> PathBuf {
    let dir = root.join(kind.collection_dir()).join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("cookiecutter.json"),
        r#"{"copyright_holder": "Jane Doe", "license": ["MIT", "GPLv3", "Apache-2.0"]}"#,
    )
    .unwrap();
    if let Some(config) = config {
        fs::write(dir.join("templatekit.yaml"), config).unwrap();
    }
    if kind == TemplateKind::File {
        fs::write(dir.join(format!("{name}.jinja")), "{{ cookiecutter.copyright_holder }}\n").unwrap();
    }
    dir
}

/// Repository with two project templates and three file templates, one of them broken
fn sample_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();

    write_template(&root, TemplateKind::Project, "fastapi_app", Some("group: Apps\n"));
    write_template(&root, TemplateKind::Project, "example_project", Some("{}\n"));
    write_template(&root, TemplateKind::File, "license", Some("name: License\n"));
    write_template(&root, TemplateKind::File, "copyright", Some("name: COPYRIGHT file\n"));
    // Missing templatekit.yaml
    write_template(&root, TemplateKind::File, "broken", None);
    // Stray files in a collection are ignored
    fs::write(root.join("file_templates").join("README.md"), "# File templates\n").unwrap();

    (temp_dir, root)
}

#[test]
fn test_discover_at_root() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();

    let repo = Repository::discover(&system, &root).unwrap();
    assert_eq!(repo.root(), root);
    assert!(repo.file_templates_dir().is_dir());
    assert!(repo.project_templates_dir().is_dir());
}

#[test]
fn test_discover_from_subdirectory() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();

    let start = root.join("file_templates").join("copyright");
    let repo = Repository::discover(&system, &start).unwrap();
    assert_eq!(repo.root(), root);
}

#[test]
fn test_discover_without_repository() {
    let temp_dir = TempDir::new().unwrap();
    let start = temp_dir.path().join("somewhere");
    fs::create_dir_all(&start).unwrap();
    let system = RealSystem::new();

    let err = Repository::discover(&system, &start).unwrap_err();
    match err {
        TemplateError::Discovery { start_dir } => assert_eq!(start_dir, start),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_new_requires_layout() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();

    assert!(Repository::new(&system, &root).is_ok());
    assert!(matches!(
        Repository::new(&system, &root.join("file_templates")),
        Err(TemplateError::Discovery { .. })
    ));
}

#[test]
fn test_iter_file_templates_skips_malformed() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();
    let repo = Repository::new(&system, &root).unwrap();

    let names: Vec<String> = repo
        .iter_file_templates()
        .unwrap()
        .map(|template| template.name().to_owned())
        .collect();
    assert_eq!(names, vec!["copyright", "license"]);
}

#[test]
fn test_iter_project_templates_sorted() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();
    let repo = Repository::new(&system, &root).unwrap();

    let names: Vec<String> = repo
        .iter_project_templates()
        .unwrap()
        .map(|template| template.name().to_owned())
        .collect();
    assert_eq!(names, vec!["example_project", "fastapi_app"]);
}

#[test]
fn test_iter_templates_projects_first() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();
    let repo = Repository::new(&system, &root).unwrap();

    let kinds: Vec<TemplateKind> = repo.iter_templates().unwrap().map(|t| t.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            TemplateKind::Project,
            TemplateKind::Project,
            TemplateKind::File,
            TemplateKind::File
        ]
    );
    assert_eq!(
        repo.names().unwrap(),
        vec!["example_project", "fastapi_app", "copyright", "license"]
    );
}

#[test]
fn test_get_by_name() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();
    let repo = Repository::new(&system, &root).unwrap();

    let copyright = repo.get("copyright").unwrap();
    assert!(matches!(copyright, Template::File(_)));
    assert_eq!(copyright.config().name(), Some("COPYRIGHT file"));

    let project = repo.get("fastapi_app").unwrap();
    assert_eq!(project.kind(), TemplateKind::Project);
    assert_eq!(project.config().group(), Some("Apps"));

    assert!(matches!(
        repo.get("whatwhat"),
        Err(TemplateError::NotFound { .. })
    ));
    // Malformed templates cannot be looked up either
    assert!(repo.get("broken").is_err());
}

#[test]
fn test_contains() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();
    let repo = Repository::new(&system, &root).unwrap();

    assert!(repo.contains("copyright").unwrap());
    assert!(repo.contains("example_project").unwrap());
    assert!(!repo.contains("whatwhat").unwrap());
}

#[test]
fn test_scan_reports_failures() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();
    let repo = Repository::new(&system, &root).unwrap();

    let scan = repo.scan(TemplateKind::File).unwrap();
    assert_eq!(scan.templates.len(), 2);
    assert_eq!(scan.failures.len(), 1);
    assert!(!scan.is_clean());

    let failure = &scan.failures[0];
    assert!(failure.path.ends_with("broken"));
    assert!(matches!(failure.error, TemplateError::Structural { .. }));

    assert!(repo.scan(TemplateKind::Project).unwrap().is_clean());
    assert_eq!(repo.scan_all().unwrap().templates.len(), 4);
}

#[test]
fn test_schema_invalid_template_is_skipped() {
    let (_temp_dir, root) = sample_repo();
    write_template(
        &root,
        TemplateKind::File,
        "aaa_invalid",
        Some("dialog_fields:\n  - key: license\n    component: radio\n"),
    );
    let system = RealSystem::new();
    let repo = Repository::new(&system, &root).unwrap();

    assert_eq!(repo.iter_file_templates().unwrap().count(), 2);

    let scan = repo.scan(TemplateKind::File).unwrap();
    assert!(scan
        .failures
        .iter()
        .any(|failure| matches!(failure.error, TemplateError::SchemaValidation { .. })));
}

#[test]
fn test_enumeration_reads_disk_every_time() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();
    let repo = Repository::new(&system, &root).unwrap();
    assert!(!repo.contains("zebra").unwrap());

    write_template(&root, TemplateKind::File, "zebra", Some("{}\n"));
    assert!(repo.contains("zebra").unwrap());
}

#[test]
fn test_describe() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();
    let repo = Repository::new(&system, &root).unwrap();

    let description = repo.describe().unwrap();
    assert!(description.contains("Project templates: example_project, fastapi_app"));
    assert!(description.contains("File templates: copyright, license"));
}

#[test]
fn test_file_template_source_path() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();
    let repo = Repository::new(&system, &root).unwrap();

    let template = repo.get("license").unwrap();
    let source = template.as_file().unwrap().source_path().unwrap();
    assert_eq!(source, root.join("file_templates/license/license.jinja"));
}

/// `file_templates/license` is a symlink to a directory outside the repository
#[cfg(unix)]
fn repo_with_linked_template() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("repo");

    write_template(&root, TemplateKind::File, "copyright", Some("{}\n"));
    fs::create_dir_all(root.join("project_templates")).unwrap();

    let shared = temp_dir.path().join("shared").join("license-v2");
    fs::create_dir_all(&shared).unwrap();
    fs::write(shared.join("cookiecutter.json"), r#"{"license": ["MIT", "GPLv3"]}"#).unwrap();
    fs::write(shared.join("templatekit.yaml"), "name: License\n").unwrap();
    fs::write(shared.join("LICENSE.jinja"), "{{ cookiecutter.license }}\n").unwrap();
    std::os::unix::fs::symlink(&shared, root.join("file_templates").join("license")).unwrap();

    (temp_dir, root)
}

#[cfg(unix)]
#[test]
fn test_linked_template_keeps_its_link_name() {
    let (_temp_dir, root) = repo_with_linked_template();
    let system = RealSystem::new();
    let repo = Repository::new(&system, &root).unwrap();

    assert_eq!(repo.names().unwrap(), vec!["copyright", "license"]);

    let license = repo.get("license").unwrap();
    assert_eq!(license.name(), "license");
    assert_eq!(license.path(), root.join("file_templates").join("license"));
    assert_eq!(license.config().name(), Some("License"));
    assert_eq!(
        license.as_file().unwrap().source_path().unwrap(),
        root.join("file_templates/license/LICENSE.jinja")
    );
}

#[cfg(unix)]
#[test]
fn test_discover_from_inside_linked_template() {
    let (_temp_dir, root) = repo_with_linked_template();
    let system = RealSystem::new();

    let start = root.join("file_templates").join("license");
    let repo = Repository::discover(&system, &start).unwrap();
    assert_eq!(repo.root(), root);
}

#[test]
fn test_discover_resolves_dot_segments_lexically() {
    let (_temp_dir, root) = sample_repo();
    let system = RealSystem::new();

    let start = root.join("file_templates").join("..").join("project_templates").join(".");
    let repo = Repository::discover(&system, &start).unwrap();
    assert_eq!(repo.root(), root);
}
