//! Schema management commands.

use clap::{Args, Subcommand};

use docvault_core::config::{AppConfig, DatabaseProvider};
use docvault_core::result::AppResult;
use docvault_database::{connection, schema};

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Apply all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> AppResult<()> {
    if config.database.provider == DatabaseProvider::Memory {
        output::print_warning("The memory provider has no schema; nothing to migrate.");
        return Ok(());
    }

    match &args.command {
        MigrateCommand::Run => {
            let pool = connection::connect(&config.database).await?;
            let versions = schema::apply(&pool).await?;
            output::print_success(&format!(
                "Schema is current ({} migration(s) known).",
                versions.len()
            ));
        }
    }

    Ok(())
}
