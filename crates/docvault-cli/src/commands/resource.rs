//! Folder and document commands.

use clap::{Args, Subcommand};

use docvault_core::config::AppConfig;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId, OrganizationId, UserId};
use docvault_service::RequestContext;
use docvault_service::resource::{CreateDocumentRequest, CreateFolderRequest};

use crate::output::{self, OutputFormat, ResourceRow};

/// Acting identity shared by every resource command.
#[derive(Debug, Args)]
pub struct IdentityArgs {
    /// User performing the operation
    #[arg(long)]
    pub actor: UserId,
    /// Organization the operation runs in
    #[arg(long)]
    pub org: OrganizationId,
}

impl IdentityArgs {
    fn context(&self) -> AppResult<RequestContext> {
        RequestContext::from_identity(self.actor, self.org)
    }
}

/// Arguments for the folder command
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a folder (a root folder makes the actor its ADMIN)
    Create {
        #[command(flatten)]
        identity: IdentityArgs,
        /// Folder name
        #[arg(long)]
        name: String,
        /// Parent folder; omit for a root folder
        #[arg(long)]
        parent: Option<FolderId>,
    },
    /// Show a folder the actor can read
    Show {
        #[command(flatten)]
        identity: IdentityArgs,
        /// Folder id
        id: FolderId,
    },
}

/// Arguments for the document command
#[derive(Debug, Args)]
pub struct DocumentArgs {
    /// Document subcommand
    #[command(subcommand)]
    pub command: DocumentCommand,
}

/// Document subcommands
#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// Create a document in a folder the actor can write
    Create {
        #[command(flatten)]
        identity: IdentityArgs,
        /// Document name
        #[arg(long)]
        name: String,
        /// Containing folder
        #[arg(long)]
        folder: FolderId,
    },
    /// Show a document the actor can read
    Show {
        #[command(flatten)]
        identity: IdentityArgs,
        /// Document id
        id: DocumentId,
    },
}

/// Execute folder commands
pub async fn execute_folder(
    args: &FolderArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let services = super::build_services(config).await?;

    let folder = match &args.command {
        FolderCommand::Create {
            identity,
            name,
            parent,
        } => {
            let request = CreateFolderRequest {
                parent_id: *parent,
                name: name.clone(),
            };
            services
                .resources
                .create_folder(&identity.context()?, request)
                .await?
        }
        FolderCommand::Show { identity, id } => {
            services
                .resources
                .get_folder(&identity.context()?, *id)
                .await?
        }
    };

    output::print_list(&[ResourceRow::from(&folder)], format);
    Ok(())
}

/// Execute document commands
pub async fn execute_document(
    args: &DocumentArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let services = super::build_services(config).await?;

    let document = match &args.command {
        DocumentCommand::Create {
            identity,
            name,
            folder,
        } => {
            let request = CreateDocumentRequest {
                folder_id: *folder,
                name: name.clone(),
            };
            services
                .resources
                .create_document(&identity.context()?, request)
                .await?
        }
        DocumentCommand::Show { identity, id } => {
            services
                .resources
                .get_document(&identity.context()?, *id)
                .await?
        }
    };

    output::print_list(&[ResourceRow::from(&document)], format);
    Ok(())
}
