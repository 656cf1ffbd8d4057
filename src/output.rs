//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{ApiVersion, Application, FileSet, Organization};

/// Trait for human-readable key-value output.
///
/// Implemented by model types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

impl PrettyPrint for Organization {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Organization: {}", self.key));
        lines.push(format!("Name:           {}", self.name));

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Application {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Application: {}/{}", self.organization, self.key));
        lines.push(format!("Name:           {}", self.name));

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        if let Some(ref latest) = self.latest_version {
            lines.push(format!("Latest:         {}", latest));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for ApiVersion {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!(
            "Version: {}/{}@{}",
            self.organization, self.application, self.version
        ));

        if let Some(ref format) = self.format {
            lines.push(format!("Format:         {}", format));
        }

        if let Some(ref created) = self.created_at {
            lines.push(format!("Published:      {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        if self.latest {
            lines.push("Latest:         yes".to_string());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for FileSet {
    /// Every file's content under a `==> name <==` banner.
    fn pretty_print(&self) -> String {
        if let [only] = self.files() {
            return only.content.clone();
        }

        self.files()
            .iter()
            .map(|file| format!("==> {} <==\n{}", file.name, file.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
