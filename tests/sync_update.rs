//! Tests for the update command's planning and apply steps.
//!
//! Runs the sync engine against an in-memory provider and a temp directory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use specgen::{
    apply_updates, CodeProvider, FetchError, FileSet, GeneratedFile, GenerationRequest,
    GeneratorTarget, Project, ProjectConfig, SyncEvent, SyncOptions, SyncStatus, Syncer,
    TargetError, VersionPolicy, DEFAULT_CONFIG_FILE, LATEST_VERSION,
};

/// Serves canned responses keyed by generator and records every request.
#[derive(Default)]
struct FakeProvider {
    responses: HashMap<String, Result<FileSet, FetchError>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeProvider {
    fn with(mut self, generator: &str, response: Result<FileSet, FetchError>) -> Self {
        self.responses.insert(generator.to_string(), response);
        self
    }

    fn with_files(self, generator: &str, files: &[(&str, &str)]) -> Self {
        let files = files
            .iter()
            .map(|(name, content)| GeneratedFile::new(*name, *content))
            .collect();
        let set = FileSet::new(generator, files).expect("at least one file");
        self.with(generator, Ok(set))
    }

    fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeProvider for FakeProvider {
    async fn fetch(&self, request: &GenerationRequest) -> Result<FileSet, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .get(&request.generator)
            .cloned()
            .unwrap_or(Err(FetchError::NotFound))
    }
}

fn project(targets: Vec<GeneratorTarget>) -> Project {
    Project {
        organization: "acme".to_string(),
        application: "widgets".to_string(),
        version: "1.0.0".to_string(),
        targets,
    }
}

fn syncer(provider: FakeProvider) -> Syncer<FakeProvider> {
    Syncer::new(provider, SyncOptions::default())
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_new_file_is_changed_and_written() {
    let dir = tempfile::tempdir().unwrap();
    let models = dir.path().join("models");
    let provider = FakeProvider::default().with_files("go_models", &[("types.go", "package models")]);
    let syncer = syncer(provider);

    let projects = vec![project(vec![GeneratorTarget::new("go_models", &models)])];
    let plan = syncer.plan_updates(&projects, |_| {}).await;

    assert_eq!(plan.statuses.len(), 1);
    assert_eq!(plan.statuses[0].status, SyncStatus::Changed);
    assert_eq!(plan.statuses[0].path, models.join("types.go"));
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.updates[0].path, models.join("types.go"));
    assert_eq!(plan.updates[0].content, "package models");
    assert_eq!(plan.updates[0].generator, "go_models");

    let report = apply_updates(&plan.updates, |_, _| {});
    assert!(report.is_success());
    assert_eq!(read(&models.join("types.go")), "package models");
}

#[tokio::test]
async fn test_configured_project_writes_models() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(DEFAULT_CONFIG_FILE);
    std::fs::write(
        &config_path,
        "projects:\n  - organization: acme\n    application: widgets\n    version: 1.0.0\n    targets:\n      - generator: go_models\n        path: ./models\n",
    )
    .unwrap();
    let config = ProjectConfig::load(&config_path).unwrap();
    let provider = FakeProvider::default().with_files("go_models", &[("types.go", "package models")]);
    let syncer = syncer(provider);

    let plan = syncer.plan_updates(&config.projects, |_| {}).await;

    let expected = dir.path().join("models").join("types.go");
    assert_eq!(plan.statuses.len(), 1);
    assert_eq!(plan.statuses[0].status, SyncStatus::Changed);
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.updates[0].path, expected);
    assert_eq!(plan.updates[0].content, "package models");

    let request = &syncer.provider().requests()[0];
    assert_eq!(
        (
            request.organization.as_str(),
            request.application.as_str(),
            request.version.as_str(),
            request.generator.as_str()
        ),
        ("acme", "widgets", "1.0.0", "go_models")
    );

    apply_updates(&plan.updates, |_, _| {});
    assert_eq!(read(&expected), "package models");
}

#[tokio::test]
async fn test_whitespace_only_difference_is_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("types.go");
    std::fs::write(&target, "\npackage models\n\n").unwrap();
    let provider = FakeProvider::default().with_files("go_models", &[("types.go", "package models")]);

    let projects = vec![project(vec![GeneratorTarget::new("go_models", &target)])];
    let plan = syncer(provider).plan_updates(&projects, |_| {}).await;

    assert_eq!(plan.statuses[0].status, SyncStatus::Unchanged);
    assert_eq!(plan.statuses[0].path, target);
    assert!(plan.updates.is_empty());
}

#[tokio::test]
async fn test_changed_content_keeps_untrimmed_text() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("types.go");
    std::fs::write(&target, "package old\n").unwrap();
    let provider =
        FakeProvider::default().with_files("go_models", &[("types.go", "  package models\n\n")]);

    let projects = vec![project(vec![GeneratorTarget::new("go_models", &target)])];
    let plan = syncer(provider).plan_updates(&projects, |_| {}).await;

    assert_eq!(plan.count(SyncStatus::Changed), 1);
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.updates[0].content, "  package models\n\n");
}

#[tokio::test]
async fn test_directory_target_stages_each_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("target");
    let provider = FakeProvider::default().with_files("text", &[("a.txt", "X"), ("b.txt", "Y")]);

    let projects = vec![project(vec![GeneratorTarget::new("text", &target)])];
    let plan = syncer(provider).plan_updates(&projects, |_| {}).await;

    let staged: Vec<_> = plan
        .updates
        .iter()
        .map(|u| (u.path.clone(), u.content.as_str()))
        .collect();
    assert_eq!(
        staged,
        vec![(target.join("a.txt"), "X"), (target.join("b.txt"), "Y")]
    );
}

#[tokio::test]
async fn test_not_found_does_not_stop_later_targets() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::default()
        .with("missing", Err(FetchError::NotFound))
        .with_files("go_models", &[("types.go", "package models")]);

    let projects = vec![project(vec![
        GeneratorTarget::new("missing", dir.path().join("missing")),
        GeneratorTarget::new("go_models", dir.path().join("models")),
    ])];
    let plan = syncer(provider).plan_updates(&projects, |_| {}).await;

    assert_eq!(plan.statuses.len(), 2);
    assert_eq!(plan.statuses[0].status, SyncStatus::NotFound);
    assert_eq!(plan.statuses[0].path, dir.path().join("missing"));
    assert_eq!(plan.statuses[1].status, SyncStatus::Changed);
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.updates[0].generator, "go_models");
    assert!(plan.is_complete());
}

#[tokio::test]
async fn test_service_failure_skips_only_that_target() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::default()
        .with(
            "broken",
            Err(FetchError::Conflict(vec!["spec is invalid".to_string()])),
        )
        .with(
            "flaky",
            Err(FetchError::ServerError {
                status_code: Some(500),
                message: "boom".to_string(),
            }),
        )
        .with_files("go_models", &[("types.go", "package models")]);

    let projects = vec![project(vec![
        GeneratorTarget::new("broken", dir.path().join("broken")),
        GeneratorTarget::new("flaky", dir.path().join("flaky")),
        GeneratorTarget::new("go_models", dir.path().join("models")),
    ])];
    let plan = syncer(provider).plan_updates(&projects, |_| {}).await;

    assert!(!plan.is_complete());
    assert_eq!(plan.failures.len(), 2);
    assert_eq!(plan.failures[0].generator, "broken");
    assert!(matches!(
        &plan.failures[0].error,
        TargetError::Fetch(FetchError::Conflict(messages)) if messages == &["spec is invalid"]
    ));
    assert_eq!(plan.failures[1].generator, "flaky");
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.statuses.len(), 1);
}

#[tokio::test]
async fn test_events_stream_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::default()
        .with("missing", Err(FetchError::NotFound))
        .with(
            "flaky",
            Err(FetchError::ServerError {
                status_code: None,
                message: "connection reset".to_string(),
            }),
        )
        .with_files("go_models", &[("types.go", "package models")]);

    let projects = vec![project(vec![
        GeneratorTarget::new("missing", dir.path().join("missing")),
        GeneratorTarget::new("flaky", dir.path().join("flaky")),
        GeneratorTarget::new("go_models", dir.path().join("models")),
    ])];

    let mut events = Vec::new();
    syncer(provider)
        .plan_updates(&projects, |event| {
            events.push(match event {
                SyncEvent::Status(record) => format!("{} {}", record.generator, record.status),
                SyncEvent::Failed(failure) => format!("{} failed", failure.generator),
            })
        })
        .await;

    assert_eq!(
        events,
        vec!["missing not found", "flaky failed", "go_models changed"]
    );
}

#[tokio::test]
async fn test_unreadable_target_is_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    // An existing directory named like a file: directory mode, and the
    // staged path inside it is itself a directory.
    let target = dir.path().join("out");
    std::fs::create_dir_all(target.join("types.go")).unwrap();
    let provider = FakeProvider::default().with_files("go_models", &[("types.go", "package models")]);

    let projects = vec![project(vec![GeneratorTarget::new("go_models", &target)])];
    let plan = syncer(provider).plan_updates(&projects, |_| {}).await;

    assert_eq!(plan.failures.len(), 1);
    assert!(matches!(plan.failures[0].error, TargetError::Read { .. }));
    assert!(plan.updates.is_empty());
}

#[tokio::test]
async fn test_version_policy_controls_requested_version() {
    let dir = tempfile::tempdir().unwrap();
    let projects = vec![project(vec![GeneratorTarget::new(
        "go_models",
        dir.path().join("models"),
    )])];

    let configured = syncer(FakeProvider::default());
    configured.plan_updates(&projects, |_| {}).await;
    assert_eq!(configured.provider().requests()[0].version, "1.0.0");

    let latest = Syncer::new(
        FakeProvider::default(),
        SyncOptions {
            version_policy: VersionPolicy::Latest,
        },
    );
    latest.plan_updates(&projects, |_| {}).await;
    let requests = latest.provider().requests();
    assert_eq!(requests[0].version, LATEST_VERSION);
    assert_eq!(requests[0].organization, "acme");
    assert_eq!(requests[0].application, "widgets");
    assert_eq!(requests[0].generator, "go_models");
}

#[tokio::test]
async fn test_requests_follow_configuration_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut second = project(vec![GeneratorTarget::new("ts_client", dir.path().join("ts"))]);
    second.application = "gadgets".to_string();
    let projects = vec![
        project(vec![
            GeneratorTarget::new("go_models", dir.path().join("go")),
            GeneratorTarget::new("docs", dir.path().join("docs")),
        ]),
        second,
    ];

    let syncer = syncer(FakeProvider::default());
    syncer.plan_updates(&projects, |_| {}).await;

    let order: Vec<_> = syncer
        .provider()
        .requests()
        .into_iter()
        .map(|r| format!("{}:{}", r.application, r.generator))
        .collect();
    assert_eq!(
        order,
        vec!["widgets:go_models", "widgets:docs", "gadgets:ts_client"]
    );
}

#[tokio::test]
async fn test_apply_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("models");
    let provider = FakeProvider::default().with_files("go_models", &[("types.go", "package models")]);
    let syncer = syncer(provider);
    let projects = vec![project(vec![GeneratorTarget::new("go_models", &target)])];

    let plan = syncer.plan_updates(&projects, |_| {}).await;
    let first = apply_updates(&plan.updates, |_, _| {});
    let second = apply_updates(&plan.updates, |_, _| {});

    assert_eq!(first.written, second.written);
    assert!(second.is_success());
    assert_eq!(read(&target.join("types.go")), "package models");

    // A fresh plan now sees nothing to do.
    let replan = syncer.plan_updates(&projects, |_| {}).await;
    assert!(replan.updates.is_empty());
    assert_eq!(replan.statuses[0].status, SyncStatus::Unchanged);
}

#[tokio::test]
async fn test_escaping_file_names_are_never_staged() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("models");
    let outside = dir.path().join("escaped.go");
    let provider = FakeProvider::default()
        .with_files(
            "sneaky",
            &[("types.go", "package models"), ("../escaped.go", "package evil")],
        )
        .with_files("absolute", &[("/tmp/specgen-absolute.go", "package evil")])
        .with_files("go_models", &[("types.go", "package models")]);

    let projects = vec![project(vec![
        GeneratorTarget::new("sneaky", &target),
        GeneratorTarget::new("absolute", &target),
        GeneratorTarget::new("go_models", &target),
    ])];
    let plan = syncer(provider).plan_updates(&projects, |_| {}).await;

    assert!(plan.updates.iter().all(|u| u.path.starts_with(&target)));
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.updates[0].generator, "go_models");

    assert_eq!(plan.failures.len(), 2);
    assert!(matches!(
        &plan.failures[0].error,
        TargetError::UnsafeName(e) if e.name == "../escaped.go"
    ));
    assert_eq!(plan.failures[1].generator, "absolute");

    let report = apply_updates(&plan.updates, |_, _| {});
    assert!(report.is_success());
    assert!(!outside.exists());
}

#[tokio::test]
async fn test_duplicate_targets_are_evaluated_independently() {
    let dir = tempfile::tempdir().unwrap();
    let shared = dir.path().join("shared.txt");
    let provider = FakeProvider::default()
        .with_files("first", &[("out.txt", "one")])
        .with_files("second", &[("out.txt", "two")]);

    let projects = vec![project(vec![
        GeneratorTarget::new("first", &shared),
        GeneratorTarget::new("second", &shared),
    ])];
    let plan = syncer(provider).plan_updates(&projects, |_| {}).await;

    assert_eq!(plan.statuses.len(), 2);
    assert!(plan
        .statuses
        .iter()
        .all(|r| r.path == shared && r.status == SyncStatus::Changed));

    let staged: Vec<_> = plan
        .updates
        .iter()
        .map(|u| (u.generator.as_str(), u.path.clone(), u.content.as_str()))
        .collect();
    assert_eq!(
        staged,
        vec![
            ("first", shared.clone(), "one"),
            ("second", shared.clone(), "two"),
        ]
    );

    let report = apply_updates(&plan.updates, |_, _| {});
    assert_eq!(report.written.len(), 2);
    assert_eq!(read(&shared), "two");
}
