//! CLI Context for dependency injection and shared state
//!
//! Centralizes configuration loading, logging setup and client
//! construction so handlers only deal with their own command.

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Context, Result};
use tracing::debug;
use bark_push::client::{BarkClient, HttpTransport};
use bark_push::config::ConfigManager;

/// Connection overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub devices: Vec<String>,
    pub insecure: bool,
}

/// CLI execution context containing shared dependencies and configuration
#[derive(Clone)]
pub struct CliContext {
    pub project_path: Option<PathBuf>,
    pub verbose: bool,
    pub dry_run: bool,
    pub overrides: Overrides,
    pub config_manager: Arc<ConfigManager>,
}

impl CliContext {
    /// Create a new CLI context, loading configuration from the first location that applies
    pub fn new(
        config_path: Option<PathBuf>,
        project_path: Option<PathBuf>,
        verbose: bool,
        dry_run: bool,
        overrides: Overrides,
    ) -> Result<Self> {
        let resolved_project_path = Self::resolve_project_path(project_path);
        let config_manager = match config_path {
            Some(path) => ConfigManager::from_path(path)?,
            None => ConfigManager::new(resolved_project_path.clone())?,
        };

        Ok(Self {
            project_path: resolved_project_path,
            verbose,
            dry_run,
            overrides,
            config_manager: Arc::new(config_manager),
        })
    }

    /// Auto-detect project path by looking for .bark-push/config.toml
    fn resolve_project_path(project_path: Option<PathBuf>) -> Option<PathBuf> {
        if let Some(path) = project_path {
            return Some(path);
        }

        if let Ok(current_dir) = std::env::current_dir() {
            let config_path = current_dir.join(".bark-push").join("config.toml");
            if config_path.exists() {
                return Some(current_dir);
            }
        }

        None
    }

    /// Initialize logging subsystem based on verbosity and configuration
    ///
    /// Logs go to stderr; stdout is reserved for command output.
    pub fn init_logging(&self) -> Result<()> {
        let log_level: &str = if self.verbose {
            "debug"
        } else {
            &self.config_manager.config().logging.level
        };

        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(log_level.parse().unwrap_or_else(|_| {
                        tracing::Level::INFO.into()
                    })),
            )
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

        if self.verbose {
            debug!("Verbose logging enabled");
        }

        Ok(())
    }

    /// Device keys from the command line, or from configuration when none were given
    pub fn device_keys(&self) -> Vec<String> {
        if self.overrides.devices.is_empty() {
            self.config_manager.config().server.device_keys.clone()
        } else {
            self.overrides.devices.clone()
        }
    }

    pub fn server_url(&self) -> String {
        self.overrides
            .server
            .clone()
            .unwrap_or_else(|| self.config_manager.config().server.url.clone())
    }

    /// Build a client from configuration and command-line overrides
    pub fn build_client(&self) -> Result<BarkClient<HttpTransport>> {
        let server = &self.config_manager.config().server;
        let mut client = BarkClient::with_server(self.device_keys(), self.server_url())
            .context("Failed to create push client")?;

        client
            .apply_options(&server.transport_options())
            .context("Failed to apply transport settings from configuration")?;
        if self.overrides.insecure {
            client.disable_ssl_verification()?;
        }

        debug!(
            server = client.server_url(),
            devices = client.device_keys().len(),
            "Push client ready"
        );
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context_in(temp_dir: &TempDir, overrides: Overrides) -> CliContext {
        CliContext::new(
            Some(temp_dir.path().join("config.toml")),
            None,
            false,
            false,
            overrides,
        )
        .unwrap()
    }

    #[test]
    fn test_context_creation() {
        let temp_dir = TempDir::new().unwrap();
        let context = context_in(&temp_dir, Overrides::default());

        assert!(!context.verbose);
        assert!(temp_dir.path().join("config.toml").exists());
        assert_eq!(context.server_url(), "https://api.day.app/");
        assert!(context.device_keys().is_empty());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("config.toml"),
            "[server]\nurl = \"https://bark.example.com/\"\ndevice_keys = [\"from-config\"]\n",
        )
        .unwrap();

        let context = context_in(&temp_dir, Overrides::default());
        assert_eq!(context.device_keys(), vec!["from-config"]);
        assert_eq!(context.server_url(), "https://bark.example.com/");

        let context = context_in(
            &temp_dir,
            Overrides {
                server: Some("http://localhost:8080".to_string()),
                devices: vec!["cli-key".to_string()],
                insecure: false,
            },
        );
        assert_eq!(context.device_keys(), vec!["cli-key"]);
        assert_eq!(context.server_url(), "http://localhost:8080");
    }

    #[test]
    fn test_build_client() {
        let temp_dir = TempDir::new().unwrap();
        let context = context_in(
            &temp_dir,
            Overrides {
                devices: vec!["a".to_string(), "b".to_string()],
                insecure: true,
                ..Default::default()
            },
        );

        let client = context.build_client().unwrap();
        assert_eq!(client.device_keys(), vec!["a", "b"]);
        assert!(!client.transport().unwrap().settings().verify_peer);
    }
}
