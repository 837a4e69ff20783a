//! Command handlers for all CLI operations
//!
//! Routes parsed commands to the push and configuration handlers.

mod config;
mod push;

use super::{CliContext, Commands};
use anyhow::Result;

pub use config::ConfigHandler;
pub use push::{PushHandler, PushJob};

/// Coordinates all command handling operations with dependency injection via CliContext
pub struct CommandHandler {
    context: CliContext,
}

impl CommandHandler {
    /// Create a new command handler instance with the provided context
    pub fn new(context: CliContext) -> Self {
        Self { context }
    }

    /// Route commands to their appropriate handlers
    pub fn handle_command(&self, command: Commands) -> Result<()> {
        let defaults = self.context.config_manager.config().defaults.to_options();
        let push = PushHandler::new(&self.context);

        match command {
            Commands::Send {
                content,
                url,
                sound,
                group,
                level,
                icon,
                no_archive,
                auto_copy,
                params,
            } => {
                let mut options = defaults;
                options.url = url.or(options.url);
                options.sound = sound.or(options.sound);
                options.group = group.or(options.group);
                options.level = level.or(options.level);
                options.icon = icon.or(options.icon);
                if no_archive {
                    options.archive = "0".to_string();
                }
                if auto_copy {
                    options.auto_copy = "1".to_string();
                }
                push.handle(PushJob::advanced(content.title, content.message, options).with_extra(&params)?)
            }
            Commands::Copy { content } => {
                push.handle(PushJob::advanced(content.title, content.message, defaults.with_auto_copy("1")))
            }
            Commands::Url { url, title, message } => {
                push.handle(PushJob::link(&url, title, message, defaults))
            }
            Commands::Critical { content } => {
                push.handle(PushJob::advanced(content.title, content.message, defaults.with_level("critical")))
            }
            Commands::Call { content } => {
                push.handle(PushJob::call(content.title, content.message))
            }
            Commands::Silence { content } => {
                push.handle(PushJob::advanced(content.title, content.message, defaults.with_sound("silence")))
            }
            Commands::Config { action } => ConfigHandler::new(&self.context).handle(action),
        }
    }
}
