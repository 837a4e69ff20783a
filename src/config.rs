use crate::client::TransportOption;
use crate::errors::{AppError, AppResult};
use crate::payload::{PushOptions, DEFAULT_SERVER_URL};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
///
/// Contains the relay connection settings, the push defaults applied by the
/// CLI, and logging options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub defaults: PushDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Relay connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,
    #[serde(default)]
    pub device_keys: Vec<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_true")]
    pub verify_tls: bool,
    pub user_agent: Option<String>,
}

/// Push fields merged into every notification sent from the CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushDefaults {
    pub sound: Option<String>,
    pub group: Option<String>,
    pub icon: Option<String>,
    pub level: Option<String>,
    #[serde(default = "default_true")]
    pub archive: bool,
    #[serde(default)]
    pub auto_copy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            device_keys: Vec::new(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            verify_tls: true,
            user_agent: None,
        }
    }
}

impl Default for PushDefaults {
    fn default() -> Self {
        Self {
            sound: None,
            group: None,
            icon: None,
            level: None,
            archive: true,
            auto_copy: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Transport options that differ from the client baseline
    pub fn transport_options(&self) -> Vec<TransportOption> {
        let mut options = Vec::new();
        if self.connect_timeout_secs != default_connect_timeout_secs() {
            options.push(TransportOption::ConnectTimeout(Duration::from_secs(self.connect_timeout_secs)));
        }
        if self.timeout_secs != default_timeout_secs() {
            options.push(TransportOption::Timeout(Duration::from_secs(self.timeout_secs)));
        }
        if !self.verify_tls {
            options.extend(TransportOption::insecure());
        }
        if let Some(agent) = &self.user_agent {
            options.push(TransportOption::UserAgent(agent.clone()));
        }
        options
    }
}

impl PushDefaults {
    /// Starting point for CLI pushes
    pub fn to_options(&self) -> PushOptions {
        PushOptions {
            url: None,
            sound: self.sound.clone(),
            group: self.group.clone(),
            level: self.level.clone(),
            icon: self.icon.clone(),
            archive: flag(self.archive),
            auto_copy: flag(self.auto_copy),
        }
    }
}

fn flag(value: bool) -> String {
    let text = if value { "1" } else { "0" };
    text.to_string()
}

/// Configuration manager for the bark-push client
///
/// # Configuration Hierarchy
///
/// 1. **Explicit**: the path given with `--config`
/// 2. **Project-level**: `.bark-push/config.toml` in the project root
/// 3. **Global**: `~/.bark-push/config.toml` in the user home directory
///
/// An explicit file that is missing is created with default values. A
/// missing global file is not: defaults are used in memory until `save`.
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Load the project config if it exists, the global one otherwise
    pub fn new(project_path: Option<PathBuf>) -> AppResult<Self> {
        if let Some(ref path) = project_path {
            let project_config_path = Self::get_config_path(Some(path.clone()))?;
            if project_config_path.exists() {
                return Self::from_path(project_config_path);
            }
        }
        Self::open(Self::get_config_path(None)?)
    }

    /// Load the config at `config_path`, or defaults when it does not exist yet
    ///
    /// Nothing is written until [`save`](Self::save).
    pub fn open(config_path: impl Into<PathBuf>) -> AppResult<Self> {
        let config_path = config_path.into();
        let config = if config_path.exists() {
            Self::load(&config_path)?
        } else {
            Config::default()
        };
        Ok(ConfigManager {
            config_path,
            config,
        })
    }

    /// Load (or create) the config at an explicit location
    pub fn from_path(config_path: impl Into<PathBuf>) -> AppResult<Self> {
        let config_path = config_path.into();
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::io_with_source(parent, "create config directory", e))?;
        }
        let config = Self::load_or_create(&config_path)?;
        Ok(ConfigManager {
            config_path,
            config,
        })
    }

    pub fn get_config_path(project_path: Option<PathBuf>) -> AppResult<PathBuf> {
        let base_path = if let Some(path) = project_path {
            path.join(".bark-push")
        } else {
            let base_dirs = BaseDirs::new().ok_or_else(|| AppError::config("Failed to get base directories"))?;
            base_dirs.home_dir().join(".bark-push")
        };

        Ok(base_path.join("config.toml"))
    }

    fn load(path: &Path) -> AppResult<Config> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::io_with_source(path, "read config file", e))?;
        let config: Config = toml::from_str(&content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn load_or_create(path: &Path) -> AppResult<Config> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Config::default();
            let content = toml::to_string_pretty(&config)?;
            fs::write(path, content)
                .map_err(|e| AppError::io_with_source(path, "write default config", e))?;
            Ok(config)
        }
    }

    /// Check that the server URL parses and uses http(s)
    pub fn validate(config: &Config) -> AppResult<()> {
        let url = url::Url::parse(&config.server.url).map_err(|e| AppError::InvalidConfigValue {
            key: "server.url".to_string(),
            value: config.server.url.clone(),
            source: Some(Box::new(e)),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AppError::invalid_config_value("server.url", &config.server.url));
        }
        Ok(())
    }

    /// Saves the current configuration to disk
    pub fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::io_with_source(parent, "create config directory", e))?;
        }
        let content = toml::to_string_pretty(&self.config)?;
        fs::write(&self.config_path, content)
            .map_err(|e| AppError::io_with_source(&self.config_path, "write config file", e))?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Set a single value addressed by its dotted key
    pub fn set_value(&mut self, key: &str, value: &str) -> AppResult<()> {
        let parse_u64 = |value: &str| {
            value
                .parse::<u64>()
                .map_err(|_| AppError::invalid_config_value(key, value))
        };
        let parse_bool = |value: &str| {
            value
                .parse::<bool>()
                .map_err(|_| AppError::invalid_config_value(key, value))
        };
        let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());

        let config = &mut self.config;
        match key {
            "server.url" => {
                let mut candidate = config.clone();
                candidate.server.url = value.to_string();
                Self::validate(&candidate)?;
                config.server.url = candidate.server.url;
            }
            "server.connect_timeout_secs" => config.server.connect_timeout_secs = parse_u64(value)?,
            "server.timeout_secs" => config.server.timeout_secs = parse_u64(value)?,
            "server.verify_tls" => config.server.verify_tls = parse_bool(value)?,
            "server.user_agent" => config.server.user_agent = optional(value),
            "defaults.sound" => config.defaults.sound = optional(value),
            "defaults.group" => config.defaults.group = optional(value),
            "defaults.icon" => config.defaults.icon = optional(value),
            "defaults.level" => config.defaults.level = optional(value),
            "defaults.archive" => config.defaults.archive = parse_bool(value)?,
            "defaults.auto_copy" => config.defaults.auto_copy = parse_bool(value)?,
            "logging.level" => config.logging.level = value.to_string(),
            _ => {
                return Err(AppError::invalid_argument(
                    key,
                    format!("unknown configuration key, valid keys are: {}", VALID_CONFIG_KEYS.join(", ")),
                ))
            }
        }
        Ok(())
    }
}

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "server.url",
    "server.connect_timeout_secs",
    "server.timeout_secs",
    "server.verify_tls",
    "server.user_agent",
    "defaults.sound",
    "defaults.group",
    "defaults.icon",
    "defaults.level",
    "defaults.archive",
    "defaults.auto_copy",
    "logging.level",
];
