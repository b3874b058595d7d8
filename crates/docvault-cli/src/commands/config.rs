//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use docvault_core::config::AppConfig;
use docvault_core::result::AppResult;
use docvault_database::connection::mask_password;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (database password masked)
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.database.url = mask_password(&shown.database.url);

            match format {
                OutputFormat::Json => output::print_item(&shown, format),
                OutputFormat::Table => {
                    let timeout = shown
                        .access
                        .resolve_timeout()
                        .map(|d| format!("{}ms", d.as_millis()))
                        .unwrap_or_else(|| "disabled".to_string());
                    println!("Database");
                    output::print_kv("provider", &format!("{:?}", shown.database.provider));
                    output::print_kv("url", &shown.database.url);
                    output::print_kv(
                        "connections",
                        &format!(
                            "{}..{}",
                            shown.database.min_connections, shown.database.max_connections
                        ),
                    );
                    println!("Logging");
                    output::print_kv("level", &shown.logging.level);
                    output::print_kv("format", &shown.logging.format);
                    println!("Access");
                    output::print_kv(
                        "max_ancestor_depth",
                        &shown.access.max_ancestor_depth.to_string(),
                    );
                    output::print_kv("resolve_timeout", &timeout);
                }
            }
        }
    }

    Ok(())
}
