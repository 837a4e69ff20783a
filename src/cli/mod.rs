//! CLI module providing command-line interface functionality
//!
//! This module handles argument parsing and routing to the push and
//! configuration handlers.

pub mod commands;
pub mod context;
pub mod handlers;

use anyhow::Result;
use clap::Parser;

pub use commands::{Cli, Commands, ConfigAction};
pub use context::{CliContext, Overrides};
pub use handlers::CommandHandler;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Parse command line arguments and execute the requested command
    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        let overrides = Overrides {
            server: cli.server,
            devices: cli.devices,
            insecure: cli.insecure,
        };
        let context = CliContext::new(cli.config_file, cli.project, cli.verbose, cli.dry_run, overrides)?;

        context.init_logging()?;

        CommandHandler::new(context).handle_command(cli.command)
    }
}
