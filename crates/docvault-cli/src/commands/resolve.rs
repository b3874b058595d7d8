//! Permission resolution and authorization checks.

use clap::Args;

use docvault_auth::Decision;
use docvault_core::config::AppConfig;
use docvault_core::result::AppResult;
use docvault_core::types::{OrganizationId, UserId};
use docvault_entity::permission::AccessLevel;

use crate::output::{self, OutputFormat, PermissionRow};

use super::TargetArgs;

/// Arguments for `resolve`
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// User whose permission is resolved
    #[arg(long)]
    pub user: UserId,
    /// Organization the lookup is scoped to
    #[arg(long)]
    pub org: OrganizationId,
    /// Resource to resolve
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for `authorize`
#[derive(Debug, Args)]
pub struct AuthorizeArgs {
    /// User being checked
    #[arg(long)]
    pub user: UserId,
    /// Organization the check is scoped to
    #[arg(long)]
    pub org: OrganizationId,
    /// Required level (READ, WRITE, ADMIN)
    #[arg(long)]
    pub level: AccessLevel,
    /// Resource to check
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute `resolve`
pub async fn execute_resolve(
    args: &ResolveArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let resource = args.target.resource()?;
    let services = super::build_services(config).await?;

    let permission = services
        .guard
        .resolver()
        .resolve(args.user, resource, args.org)
        .await?;

    output::print_list(&[PermissionRow::new(resource, permission.as_ref())], format);
    Ok(())
}

/// Execute `authorize`
pub async fn execute_authorize(
    args: &AuthorizeArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let resource = args.target.resource()?;
    let services = super::build_services(config).await?;

    let decision = services
        .guard
        .authorize(args.user, resource, args.level, args.org)
        .await?;

    match format {
        OutputFormat::Json => output::print_item(&decision, format),
        OutputFormat::Table => match &decision {
            Decision::Allowed(permission) => {
                output::print_success(&format!("Allowed: {}", permission.describe()));
            }
            Decision::Denied(reason) => {
                output::print_warning(&format!("Denied: {reason}"));
            }
        },
    }
    Ok(())
}
