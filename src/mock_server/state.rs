//! Mock server state management.
//!
//! Provides the in-memory data store for the mock service.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{ApiVersion, Application, GeneratedFile, Organization, LATEST_VERSION};

type AppKey = (String, String);
type GeneratorKey = (String, String, String, String);

/// Shared state for the mock server.
///
/// Wrapped in `Arc<RwLock<_>>` for concurrent access. Ordered maps keep
/// listings stable across requests.
#[derive(Debug, Default)]
pub struct MockState {
    /// Organizations indexed by key.
    pub organizations: BTreeMap<String, Organization>,

    /// Applications indexed by (organization, application).
    pub applications: BTreeMap<AppKey, Application>,

    /// Published versions per application, oldest first.
    pub versions: BTreeMap<AppKey, Vec<ApiVersion>>,

    /// Generator output indexed by (organization, application, version, generator).
    pub generated: HashMap<GeneratorKey, Vec<GeneratedFile>>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    pub fn with_organization(mut self, organization: Organization) -> Self {
        self.organizations
            .insert(organization.key.clone(), organization);
        self
    }

    pub fn with_application(mut self, application: Application) -> Self {
        let key = (application.organization.clone(), application.key.clone());
        self.applications.insert(key, application);
        self
    }

    /// Publish a version; the newest version pushed becomes `latest`.
    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.push_version(version);
        self
    }

    /// Register generator output for one version.
    pub fn with_generated(
        mut self,
        organization: &str,
        application: &str,
        version: &str,
        generator: &str,
        files: Vec<GeneratedFile>,
    ) -> Self {
        self.generated.insert(
            (
                organization.to_string(),
                application.to_string(),
                version.to_string(),
                generator.to_string(),
            ),
            files,
        );
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    pub fn list_organizations(&self) -> Vec<&Organization> {
        self.organizations.values().collect()
    }

    pub fn has_organization(&self, organization: &str) -> bool {
        self.organizations.contains_key(organization)
    }

    pub fn list_applications(&self, organization: &str) -> Vec<&Application> {
        self.applications
            .values()
            .filter(|a| a.organization == organization)
            .collect()
    }

    pub fn has_application(&self, organization: &str, application: &str) -> bool {
        self.applications
            .contains_key(&(organization.to_string(), application.to_string()))
    }

    /// Versions of an application, oldest first.
    pub fn list_versions(&self, organization: &str, application: &str) -> Vec<&ApiVersion> {
        self.versions
            .get(&(organization.to_string(), application.to_string()))
            .map(|versions| versions.iter().collect())
            .unwrap_or_default()
    }

    /// Resolve a requested version, mapping `latest` to the newest published one.
    pub fn resolve_version(
        &self,
        organization: &str,
        application: &str,
        version: &str,
    ) -> Option<String> {
        let versions = self.list_versions(organization, application);
        if version == LATEST_VERSION {
            return versions
                .iter()
                .find(|v| v.latest)
                .or_else(|| versions.last())
                .map(|v| v.version.clone());
        }
        versions
            .iter()
            .find(|v| v.version == version)
            .map(|v| v.version.clone())
    }

    /// Generator output for a version (`latest` is resolved first).
    pub fn generated_files(
        &self,
        organization: &str,
        application: &str,
        version: &str,
        generator: &str,
    ) -> Option<&Vec<GeneratedFile>> {
        let version = self.resolve_version(organization, application, version)?;
        self.generated.get(&(
            organization.to_string(),
            application.to_string(),
            version,
            generator.to_string(),
        ))
    }

    /// Publish an uploaded spec, returning the validation messages on rejection.
    pub fn publish(
        &mut self,
        organization: &str,
        application: &str,
        version: Option<String>,
        content: &str,
    ) -> Result<ApiVersion, Vec<String>> {
        let mut errors = Vec::new();
        if content.trim().is_empty() {
            errors.push("specification file is empty".to_string());
        }

        let existing = self.list_versions(organization, application);
        let version = version.unwrap_or_else(|| format!("{}.0.0", existing.len() + 1));
        if existing.iter().any(|v| v.version == version) {
            errors.push(format!("version {version} already exists"));
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let published = ApiVersion {
            version,
            organization: organization.to_string(),
            application: application.to_string(),
            format: None,
            latest: true,
            created_at: Some(Utc::now()),
        };
        self.push_version(published.clone());
        Ok(published)
    }

    fn push_version(&mut self, version: ApiVersion) {
        let key = (version.organization.clone(), version.application.clone());
        let versions = self.versions.entry(key).or_default();
        for v in versions.iter_mut() {
            v.latest = false;
        }
        let mut version = version;
        version.latest = true;
        versions.push(version);
    }
}
