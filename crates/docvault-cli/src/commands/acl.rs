//! Access-entry management commands.

use clap::Args;

use docvault_core::config::AppConfig;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId, OrganizationId, UserId};
use docvault_entity::permission::{AccessLevel, DocumentGrant, FolderGrant, ResourceRef};
use docvault_service::RequestContext;

use crate::output::{self, AceRow, OutputFormat};

use super::TargetArgs;

/// Arguments for `grant`
#[derive(Debug, Args)]
pub struct GrantArgs {
    /// User performing the change (must hold ADMIN on the target)
    #[arg(long)]
    pub actor: UserId,
    /// Organization the change is made in
    #[arg(long)]
    pub org: OrganizationId,
    /// Grantee
    #[arg(long)]
    pub user: UserId,
    /// Level to grant (READ, WRITE, ADMIN)
    #[arg(long)]
    pub level: AccessLevel,
    /// Propagate to descendants (folders only)
    #[arg(long)]
    pub recursive: bool,
    /// Replace an existing entry instead of creating one
    #[arg(long)]
    pub update: bool,
    /// Target resource
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for `revoke`
#[derive(Debug, Args)]
pub struct RevokeArgs {
    /// User performing the change (must hold ADMIN on the target)
    #[arg(long)]
    pub actor: UserId,
    /// Organization the change is made in
    #[arg(long)]
    pub org: OrganizationId,
    /// User whose entry is removed
    #[arg(long)]
    pub user: UserId,
    /// Target resource
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for `entries`
#[derive(Debug, Args)]
pub struct EntriesArgs {
    /// User listing the entries (must hold ADMIN on the target)
    #[arg(long)]
    pub actor: UserId,
    /// Organization to list in
    #[arg(long)]
    pub org: OrganizationId,
    /// Target resource
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute `grant`
pub async fn execute_grant(
    args: &GrantArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let ctx = RequestContext::from_identity(args.actor, args.org)?;
    let services = super::build_services(config).await?;
    let permissions = &services.permissions;

    let row = match args.target.resource()? {
        ResourceRef::Folder(folder_id) => {
            let grant = FolderGrant {
                organization_id: None,
                folder_id,
                user_id: args.user,
                access_level: args.level,
                recursive: args.recursive,
            };
            let ace = if args.update {
                permissions.update_folder(&ctx, grant).await?
            } else {
                permissions.grant_folder(&ctx, grant).await?
            };
            AceRow::from(&ace)
        }
        ResourceRef::Document(document_id) => {
            if args.recursive {
                output::print_warning("--recursive has no effect on documents");
            }
            let grant = DocumentGrant {
                organization_id: None,
                document_id,
                user_id: args.user,
                access_level: args.level,
            };
            let ace = if args.update {
                permissions.update_document(&ctx, grant).await?
            } else {
                permissions.grant_document(&ctx, grant).await?
            };
            AceRow::from(&ace)
        }
    };

    output::print_list(&[row], format);
    Ok(())
}

/// Execute `revoke`
pub async fn execute_revoke(args: &RevokeArgs, config: &AppConfig) -> AppResult<()> {
    let ctx = RequestContext::from_identity(args.actor, args.org)?;
    let services = super::build_services(config).await?;

    let resource = args.target.resource()?;
    match resource {
        ResourceRef::Folder(folder_id) => {
            services
                .permissions
                .revoke_folder(&ctx, folder_id, args.user)
                .await?
        }
        ResourceRef::Document(document_id) => {
            services
                .permissions
                .revoke_document(&ctx, document_id, args.user)
                .await?
        }
    }

    output::print_success(&format!("Revoked access of user {} on {resource}", args.user));
    Ok(())
}

/// Execute `entries`
pub async fn execute_entries(
    args: &EntriesArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let ctx = RequestContext::from_identity(args.actor, args.org)?;
    let services = super::build_services(config).await?;

    let rows: Vec<AceRow> = match args.target.resource()? {
        ResourceRef::Folder(folder_id) => list_folder(&services, &ctx, folder_id).await?,
        ResourceRef::Document(document_id) => list_document(&services, &ctx, document_id).await?,
    };

    output::print_list(&rows, format);
    Ok(())
}

async fn list_folder(
    services: &docvault_service::Services,
    ctx: &RequestContext,
    folder_id: FolderId,
) -> AppResult<Vec<AceRow>> {
    let aces = services.permissions.list_folder_entries(ctx, folder_id).await?;
    Ok(aces.iter().map(AceRow::from).collect())
}

async fn list_document(
    services: &docvault_service::Services,
    ctx: &RequestContext,
    document_id: DocumentId,
) -> AppResult<Vec<AceRow>> {
    let aces = services
        .permissions
        .list_document_entries(ctx, document_id)
        .await?;
    Ok(aces.iter().map(AceRow::from).collect())
}
