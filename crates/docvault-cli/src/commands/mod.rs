//! CLI command definitions and dispatch.

pub mod acl;
pub mod config;
pub mod migrate;
pub mod resolve;
pub mod resource;

use clap::{Args, Parser, Subcommand};

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_database::Stores;
use docvault_entity::permission::{ResourceKind, ResourceRef};
use docvault_service::Services;

use crate::output::OutputFormat;

/// DocVault — access-control administration
#[derive(Debug, Parser)]
#[command(name = "docvault", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Resolve a user's effective permission on a resource
    Resolve(resolve::ResolveArgs),
    /// Check a user against a required access level
    Authorize(resolve::AuthorizeArgs),
    /// Grant (or with --update, replace) an access entry
    Grant(acl::GrantArgs),
    /// Revoke an access entry
    Revoke(acl::RevokeArgs),
    /// List the access entries held directly on a resource
    Entries(acl::EntriesArgs),
    /// Create or show folders
    Folder(resource::FolderArgs),
    /// Create or show documents
    Document(resource::DocumentArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Resolve(args) => resolve::execute_resolve(args, &config, self.format).await,
            Commands::Authorize(args) => {
                resolve::execute_authorize(args, &config, self.format).await
            }
            Commands::Grant(args) => acl::execute_grant(args, &config, self.format).await,
            Commands::Revoke(args) => acl::execute_revoke(args, &config).await,
            Commands::Entries(args) => acl::execute_entries(args, &config, self.format).await,
            Commands::Folder(args) => resource::execute_folder(args, &config, self.format).await,
            Commands::Document(args) => {
                resource::execute_document(args, &config, self.format).await
            }
            Commands::Config(args) => config::execute(args, &config, self.format),
        }
    }
}

/// Exactly one of `--folder` / `--document`.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct TargetArgs {
    /// Target folder id
    #[arg(long)]
    pub folder: Option<i64>,
    /// Target document id
    #[arg(long)]
    pub document: Option<i64>,
}

impl TargetArgs {
    /// The selected resource.
    pub fn resource(&self) -> AppResult<ResourceRef> {
        match (self.folder, self.document) {
            (Some(id), None) => Ok(ResourceRef::new(ResourceKind::Folder, id)),
            (None, Some(id)) => Ok(ResourceRef::new(ResourceKind::Document, id)),
            _ => Err(AppError::validation(
                "Exactly one of --folder or --document is required",
            )),
        }
    }
}

/// Helper: wire the services over the configured stores
pub async fn build_services(config: &AppConfig) -> AppResult<Services> {
    let stores = Stores::from_config(config).await?;
    Ok(Services::new(&stores, &config.access))
}
