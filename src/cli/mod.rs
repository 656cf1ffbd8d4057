//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the specgen binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::models::LATEST_VERSION;

/// specgen command-line interface.
#[derive(Parser, Debug)]
#[command(name = "specgen", about = "API specification and code generation CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log request and sync details to stderr.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Base URL of the service.
    #[arg(long, global = true, env = "SPECGEN_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List organizations, applications or versions.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Organization key (required for applications and versions).
        #[arg(long, short = 'o')]
        organization: Option<String>,

        /// Application key (required for versions).
        #[arg(long, short = 'a')]
        application: Option<String>,

        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        count: Option<u32>,
    },

    /// Fetch the code a generator produces for an application version.
    Generate {
        organization: String,
        application: String,
        generator: String,

        /// Version to generate from.
        #[arg(long, default_value = LATEST_VERSION)]
        version: String,

        /// File or directory to write the output to (prints to stdout when absent).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Upload a specification file as a new version.
    Upload {
        organization: String,
        application: String,

        /// Path to the specification file.
        file: PathBuf,

        /// Version to publish under (assigned by the service when absent).
        #[arg(long)]
        version: Option<String>,
    },

    /// Sync generated code for every project in a configuration file.
    Update {
        /// Path to the project configuration.
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Request the latest version instead of the configured one.
        #[arg(long)]
        latest: bool,

        /// Report what would change without writing files.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Entity types that can be listed.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// An organization.
    #[value(alias = "organizations", alias = "orgs")]
    Organization,
    /// An application within an organization.
    #[value(alias = "applications", alias = "apps")]
    Application,
    /// A published version of an application.
    #[value(alias = "versions")]
    Version,
}
