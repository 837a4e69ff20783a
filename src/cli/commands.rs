//! Command definitions and structures for the CLI
//!
//! Clap-based argument definitions: the global connection flags and one
//! subcommand per kind of push.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "bark-push")]
#[command(about = "Send push notifications through a Bark relay server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Explicit configuration file
    #[arg(long = "config", global = true, env = "BARK_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Project path for project-level configuration
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Relay server base URL (overrides configuration)
    #[arg(long, global = true, env = "BARK_SERVER")]
    pub server: Option<String>,

    /// Device key to notify; repeat for several devices (overrides configuration)
    #[arg(short, long = "device", global = true, env = "BARK_DEVICE_KEY", value_delimiter = ',')]
    pub devices: Vec<String>,

    /// Print the request instead of sending it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Skip TLS certificate and host name verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Send a notification
    Send {
        #[command(flatten)]
        content: Content,

        /// Link opened when the notification is tapped
        #[arg(long)]
        url: Option<String>,

        /// Notification sound
        #[arg(long)]
        sound: Option<String>,

        /// Group notifications under this name
        #[arg(long)]
        group: Option<String>,

        /// Interruption level (active, timeSensitive, passive, critical)
        #[arg(long)]
        level: Option<String>,

        /// Icon URL
        #[arg(long)]
        icon: Option<String>,

        /// Do not keep the notification in the device history
        #[arg(long)]
        no_archive: bool,

        /// Copy the message to the clipboard on arrival
        #[arg(long)]
        auto_copy: bool,

        /// Extra parameter as key=value; repeatable
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Send a notification that is copied to the clipboard
    Copy {
        #[command(flatten)]
        content: Content,
    },

    /// Send a link
    Url {
        /// Link to open; `https://` is added when no scheme is given
        url: String,

        /// Title (defaults to a generic link title)
        #[arg(short, long)]
        title: Option<String>,

        /// Message (defaults to the link itself)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Send a critical alert
    Critical {
        #[command(flatten)]
        content: Content,
    },

    /// Send a notification that rings like a phone call (configured defaults are not applied)
    Call {
        #[command(flatten)]
        content: Content,
    },

    /// Send a notification without sound
    Silence {
        #[command(flatten)]
        content: Content,
    },

    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Title and message shared by every push command
#[derive(Args, Debug, Clone)]
pub struct Content {
    /// Notification title
    pub title: String,

    /// Notification message
    pub message: String,
}

/// Configuration management actions
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Initialize global configuration (default is project-level)
        #[arg(short, long)]
        global: bool,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set configuration value
    Set {
        /// Configuration key (e.g., server.url)
        key: String,
        /// Value to set
        value: String,
    },

    /// Remember a device key
    AddDevice {
        key: String,
    },

    /// Forget all device keys
    ClearDevices,
}
