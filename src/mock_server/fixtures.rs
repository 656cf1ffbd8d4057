//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use crate::{ApiVersion, Application, GeneratedFile, Organization};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Catalog Fixtures
    // =========================================================================

    pub fn organization(key: &str, name: &str) -> Organization {
        Organization {
            key: key.to_string(),
            name: name.to_string(),
            description: None,
            created_at: None,
        }
    }

    pub fn application(organization: &str, key: &str, name: &str) -> Application {
        Application {
            key: key.to_string(),
            name: name.to_string(),
            organization: organization.to_string(),
            description: None,
            latest_version: None,
            created_at: None,
        }
    }

    /// A published OpenAPI version. `latest` is managed by [`super::MockState`].
    pub fn version(organization: &str, application: &str, version: &str) -> ApiVersion {
        ApiVersion {
            version: version.to_string(),
            organization: organization.to_string(),
            application: application.to_string(),
            format: Some("openapi-3.0".to_string()),
            latest: false,
            created_at: None,
        }
    }

    // =========================================================================
    // Generated Code Fixtures
    // =========================================================================

    /// Go model output for a version.
    pub fn go_models(version: &str) -> Vec<GeneratedFile> {
        vec![GeneratedFile::new(
            "types.go",
            format!("package models\n\n// Generated from widgets {version}\ntype Widget struct {{\n\tID string\n}}\n"),
        )]
    }

    /// TypeScript client output: several files.
    pub fn ts_client(version: &str) -> Vec<GeneratedFile> {
        vec![
            GeneratedFile::new(
                "index.ts",
                "export * from './models';\nexport * from './client';\n",
            ),
            GeneratedFile::new(
                "models.ts",
                format!("// widgets {version}\nexport interface Widget {{ id: string }}\n"),
            ),
            GeneratedFile::new(
                "client.ts",
                "export class WidgetsClient {}\n",
            ),
        ]
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario with related entities.
pub struct DefaultScenario {
    pub organizations: Vec<Organization>,
    pub applications: Vec<Application>,
    /// Published oldest first; the last one per application is `latest`.
    pub versions: Vec<ApiVersion>,
    pub generated: Vec<((String, String, String, String), Vec<GeneratedFile>)>,
}

impl DefaultScenario {
    fn new() -> Self {
        let organizations = vec![
            Fixtures::organization("acme", "Acme Corp"),
            Fixtures::organization("globex", "Globex"),
        ];

        let mut widgets = Fixtures::application("acme", "widgets", "Widgets API");
        widgets.latest_version = Some("1.1.0".to_string());
        let applications = vec![
            widgets,
            Fixtures::application("acme", "gadgets", "Gadgets API"),
        ];

        let versions = vec![
            Fixtures::version("acme", "widgets", "1.0.0"),
            Fixtures::version("acme", "widgets", "1.1.0"),
        ];

        let key = |version: &str, generator: &str| {
            (
                "acme".to_string(),
                "widgets".to_string(),
                version.to_string(),
                generator.to_string(),
            )
        };
        let generated = vec![
            (key("1.0.0", "go_models"), Fixtures::go_models("1.0.0")),
            (key("1.1.0", "go_models"), Fixtures::go_models("1.1.0")),
            (key("1.1.0", "ts_client"), Fixtures::ts_client("1.1.0")),
        ];

        Self {
            organizations,
            applications,
            versions,
            generated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_models_mentions_version() {
        let files = Fixtures::go_models("2.0.0");
        assert_eq!(files.len(), 1);
        assert!(files[0].content.contains("widgets 2.0.0"));
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();
        assert_eq!(scenario.organizations.len(), 2);
        assert!(scenario
            .applications
            .iter()
            .all(|a| a.organization == "acme"));
        assert_eq!(scenario.versions.len(), 2);
        assert_eq!(scenario.generated.len(), 3);
    }
}
