//! Configuration management handler
//!
//! Handles showing, initializing and editing the configuration file.

use super::super::{CliContext, ConfigAction};
use anyhow::{Context, Result};
use bark_push::config::ConfigManager;
use std::path::PathBuf;

/// Handler for configuration operations
pub struct ConfigHandler<'a> {
    context: &'a CliContext,
}

impl<'a> ConfigHandler<'a> {
    /// Create new configuration handler
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub fn handle(&self, action: ConfigAction) -> Result<()> {
        match action {
            ConfigAction::Show => self.handle_show(),
            ConfigAction::Init { global, force } => self.handle_init(global, force),
            ConfigAction::Set { key, value } => {
                self.edit(|manager| Ok(manager.set_value(&key, &value)?))?;
                println!("Set {key} = {value}");
                Ok(())
            }
            ConfigAction::AddDevice { key } => {
                let key = key.trim().to_string();
                anyhow::ensure!(!key.is_empty(), "Device key cannot be empty");
                self.edit(|manager| {
                    let keys = &mut manager.config_mut().server.device_keys;
                    if !keys.contains(&key) {
                        keys.push(key.clone());
                    }
                    Ok(())
                })?;
                println!("Added device key {key}");
                Ok(())
            }
            ConfigAction::ClearDevices => {
                self.edit(|manager| {
                    manager.config_mut().server.device_keys.clear();
                    Ok(())
                })?;
                println!("Cleared device keys");
                Ok(())
            }
        }
    }

    fn handle_show(&self) -> Result<()> {
        let manager = &self.context.config_manager;
        let content = toml::to_string_pretty(manager.config())
            .context("Failed to serialize configuration")?;
        println!("# {}", manager.config_path().display());
        println!("{content}");
        Ok(())
    }

    fn handle_init(&self, global: bool, force: bool) -> Result<()> {
        let path = if global {
            None
        } else {
            Some(self.context.project_path.clone().unwrap_or_else(|| PathBuf::from(".")))
        };
        let config_path = ConfigManager::get_config_path(path)?;

        if config_path.exists() && !force {
            println!("Configuration already initialized at: {}", config_path.display());
            println!("Use --force to overwrite");
            return Ok(());
        }

        if force && config_path.exists() {
            std::fs::remove_file(&config_path)
                .with_context(|| format!("Failed to remove {}", config_path.display()))?;
        }
        ConfigManager::from_path(&config_path)?;
        println!("Configuration initialized successfully at: {}", config_path.display());
        Ok(())
    }

    /// Reload the active config file, apply a change and save it
    fn edit<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut ConfigManager) -> Result<()>,
    {
        let path = self.context.config_manager.config_path().to_path_buf();
        let mut manager = ConfigManager::from_path(&path)?;
        change(&mut manager)?;
        manager.save()?;
        Ok(())
    }
}
