//! specgen CLI binary.
//!
//! A command-line interface for the specgen code-generation service.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use specgen::cli::{Cli, Command, Entity};
use specgen::{
    apply_updates, staged_paths, ApiVersion, Application, ApplicationListQuery, ApplicationRef,
    ClientConfig, FileSet, GenerationRequest, Get, List, Organization, Page, PrettyPrint,
    ProjectConfig, SpecUpload, SpecgenClient, SpecgenError, SyncEvent, SyncOptions, Syncer,
    UpdateItem, Upload, VersionListQuery, VersionPolicy, DEFAULT_CONFIG_FILE,
};
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            if matches!(e, SpecgenError::ConfigMissing(_)) {
                eprintln!("Hint: Set SPECGEN_API_KEY environment variable");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn connect(api_url: Option<&str>) -> specgen::Result<SpecgenClient> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = api_url {
        config = config.with_api_url(url);
    }
    SpecgenClient::from_config(&config)
}

async fn run(cli: Cli) -> specgen::Result<ExitCode> {
    let api_url = cli.api_url.as_deref();

    match cli.command {
        Command::List {
            entity,
            organization,
            application,
            page,
            count,
        } => {
            let client = connect(api_url)?;
            handle_list(&client, entity, organization, application, page, count, cli.json).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Generate {
            organization,
            application,
            generator,
            version,
            output,
        } => {
            let client = connect(api_url)?;
            let request = GenerationRequest::new(organization, application, version, generator);
            handle_generate(&client, request, output.as_deref(), cli.json).await
        }
        Command::Upload {
            organization,
            application,
            file,
            version,
        } => {
            let client = connect(api_url)?;
            let parent = ApplicationRef::new(organization, application);
            handle_upload(&client, parent, &file, version, cli.json).await
        }
        Command::Update {
            path,
            latest,
            dry_run,
        } => handle_update(api_url, &path, latest, dry_run, cli.json).await,
    }
}

async fn handle_list(
    client: &SpecgenClient,
    entity: Entity,
    organization: Option<String>,
    application: Option<String>,
    page: Option<u32>,
    count: Option<u32>,
    json: bool,
) -> specgen::Result<()> {
    let page = page.unwrap_or(1);
    let count = count.unwrap_or(20);

    match entity {
        Entity::Organization => {
            let orgs = Organization::list_page(client, &Default::default(), page, count).await?;
            output_page(&orgs, json, |o| OrganizationRow::from(o))?;
        }
        Entity::Application => {
            let organization = require(organization, "--organization", "applications")?;
            let query = ApplicationListQuery::new(organization);
            let apps = Application::list_page(client, &query, page, count).await?;
            output_page(&apps, json, |a| ApplicationRow::from(a))?;
        }
        Entity::Version => {
            let organization = require(organization, "--organization", "versions")?;
            let application = require(application, "--application", "versions")?;
            let query = VersionListQuery::new(organization, application);
            let versions = ApiVersion::list_page(client, &query, page, count).await?;
            output_page(&versions, json, |v| VersionRow::from(v))?;
        }
    }
    Ok(())
}

fn require(value: Option<String>, flag: &str, entity: &str) -> specgen::Result<String> {
    value.ok_or_else(|| {
        SpecgenError::InvalidArgument(format!("{flag} required for listing {entity}"))
    })
}

async fn handle_generate(
    client: &SpecgenClient,
    request: GenerationRequest,
    output: Option<&Path>,
    json: bool,
) -> specgen::Result<ExitCode> {
    let file_set = FileSet::get(client, request).await?;

    let Some(target) = output else {
        if json {
            println!("{}", serde_json::to_string_pretty(&file_set)?);
        } else {
            println!("{}", file_set.pretty_print());
        }
        return Ok(ExitCode::SUCCESS);
    };

    let staged = staged_paths(target, &file_set).map_err(|e| SpecgenError::ApiError {
        message: e.to_string(),
        status_code: None,
    })?;
    let updates: Vec<UpdateItem> = staged
        .into_iter()
        .map(|(path, file)| UpdateItem {
            path,
            content: file.content.clone(),
            generator: file_set.generator().to_string(),
        })
        .collect();

    let report = apply_updates(&updates, print_write);
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn handle_upload(
    client: &SpecgenClient,
    parent: ApplicationRef,
    file: &Path,
    version: Option<String>,
    json: bool,
) -> specgen::Result<ExitCode> {
    let upload = SpecUpload::from_path(file, version)?;

    match ApiVersion::upload(client, parent, upload).await {
        Ok(created) => {
            output_single(&created, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(SpecgenError::Conflict { messages }) => {
            eprintln!("Upload of {} was rejected:", file.display());
            for message in messages {
                eprintln!("  - {message}");
            }
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e),
    }
}

async fn handle_update(
    api_url: Option<&str>,
    path: &Path,
    latest: bool,
    dry_run: bool,
    json: bool,
) -> specgen::Result<ExitCode> {
    let config = match ProjectConfig::load(path) {
        Ok(config) => config,
        Err(SpecgenError::ProjectConfigNotFound(missing)) => {
            eprintln!("Error: no project configuration at {}", missing.display());
            eprintln!("Hint: create {DEFAULT_CONFIG_FILE} or pass --path <config>");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e),
    };

    let client = connect(api_url)?;
    let options = SyncOptions {
        version_policy: if latest {
            VersionPolicy::Latest
        } else {
            VersionPolicy::Configured
        },
    };
    let syncer = Syncer::new(client, options);

    let plan = syncer
        .plan_updates(&config.projects, |event| {
            if json {
                return;
            }
            match event {
                SyncEvent::Status(record) => println!(
                    "{} {}: {}",
                    record.generator,
                    record.path.display(),
                    record.status
                ),
                SyncEvent::Failed(failure) => eprintln!(
                    "{} {}: failed: {}",
                    failure.generator,
                    failure.path.display(),
                    failure.error
                ),
            }
        })
        .await;

    let report = if dry_run {
        if !json {
            println!("{} file(s) would be updated", plan.updates.len());
        }
        None
    } else if json {
        Some(apply_updates(&plan.updates, |_, _| {}))
    } else {
        Some(apply_updates(&plan.updates, print_write))
    };
    let written = report.as_ref().map(|r| r.written.as_slice()).unwrap_or_default();

    if json {
        let summary = UpdateSummary {
            statuses: &plan.statuses,
            written,
            failures: plan
                .failures
                .iter()
                .map(|f| FailureRow {
                    generator: &f.generator,
                    path: &f.path,
                    error: f.error.to_string(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if !plan.failures.is_empty() {
        eprintln!("\n{} target(s) could not be synced:", plan.failures.len());
        for failure in &plan.failures {
            eprintln!(
                "  - {}/{}@{} {}: {}",
                failure.organization,
                failure.application,
                failure.version,
                failure.generator,
                failure.error
            );
        }
    }

    let ok = plan.is_complete() && report.map_or(true, |r| r.is_success());
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_write(item: &UpdateItem, result: Result<(), &std::io::Error>) {
    match result {
        Ok(()) => println!("{} => {}", item.generator, item.path.display()),
        Err(e) => eprintln!("{} => {}: write failed: {e}", item.generator, item.path.display()),
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> specgen::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, json: bool, to_row: F) -> specgen::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
    } else {
        let rows: Vec<R> = page.items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        if let (Some(total), Some(total_pages)) = (page.total, page.total_pages()) {
            println!("\nPage {}/{} ({} total items)", page.page, total_pages, total);
        } else if page.has_more {
            println!("\nPage {} (more available)", page.page);
        } else {
            println!("\nPage {} (end)", page.page);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct UpdateSummary<'a> {
    statuses: &'a [specgen::StatusRecord],
    written: &'a [PathBuf],
    failures: Vec<FailureRow<'a>>,
}

#[derive(Serialize)]
struct FailureRow<'a> {
    generator: &'a str,
    path: &'a Path,
    error: String,
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct OrganizationRow {
    key: String,
    name: String,
}

impl From<&Organization> for OrganizationRow {
    fn from(o: &Organization) -> Self {
        Self {
            key: o.key.clone(),
            name: o.name.clone(),
        }
    }
}

#[derive(Tabled)]
struct ApplicationRow {
    key: String,
    name: String,
    latest: String,
}

impl From<&Application> for ApplicationRow {
    fn from(a: &Application) -> Self {
        Self {
            key: a.key.clone(),
            name: a.name.clone(),
            latest: a.latest_version.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct VersionRow {
    version: String,
    format: String,
    published: String,
    latest: String,
}

impl From<&ApiVersion> for VersionRow {
    fn from(v: &ApiVersion) -> Self {
        Self {
            version: v.version.clone(),
            format: v.format.clone().unwrap_or_default(),
            published: v
                .created_at
                .map(|c| c.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            latest: if v.latest { "*".to_string() } else { String::new() },
        }
    }
}
