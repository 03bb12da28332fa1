//! Server configuration loading from file and environment variables.

use barista_misspell::GeneratorConfig;
use barista_voice::DeviceConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Text-generation provider settings.
    #[serde(default)]
    pub llm: GeneratorConfig,

    /// Speech device settings.
    #[serde(default)]
    pub device: DeviceConfig,

    /// Announcement queue settings.
    #[serde(default)]
    pub announcer: AnnouncerConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "barista_voice=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Announcement queue configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncerConfig {
    /// Announcements waiting beyond this many are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_queue_capacity() -> usize {
    32
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies overrides from the process environment.
///
/// Environment variable overrides:
/// - `BARISTA_HOST`, `BARISTA_PORT` override `server.*`
/// - `BARISTA_LOG_LEVEL`, `BARISTA_LOG_JSON` override `logging.*`
/// - `ANTHROPIC_API_KEY`, `BARISTA_LLM_BASE_URL`, `BARISTA_LLM_MODEL`
///   override `llm.*`
/// - `BARISTA_DEVICE_HOST`, `BARISTA_DEVICE_SIGNALING_ADDRESS`,
///   `BARISTA_DEVICE_API_KEY_ID`, `BARISTA_DEVICE_API_KEY`,
///   `BARISTA_DEVICE_SPEECH_RESOURCE` override `device.*`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(host) = lookup("BARISTA_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = lookup("BARISTA_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(level) = lookup("BARISTA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("BARISTA_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    if let Some(key) = lookup("ANTHROPIC_API_KEY") {
        config.llm.api_key = key;
    }
    if let Some(url) = lookup("BARISTA_LLM_BASE_URL") {
        config.llm.base_url = url;
    }
    if let Some(model) = lookup("BARISTA_LLM_MODEL") {
        config.llm.model = model;
    }

    if let Some(host) = lookup("BARISTA_DEVICE_HOST") {
        config.device.host = host;
    }
    if let Some(address) = lookup("BARISTA_DEVICE_SIGNALING_ADDRESS") {
        config.device.signaling_address = address;
    }
    if let Some(key_id) = lookup("BARISTA_DEVICE_API_KEY_ID") {
        config.device.api_key_id = key_id;
    }
    if let Some(key) = lookup("BARISTA_DEVICE_API_KEY") {
        config.device.api_key = key;
    }
    if let Some(resource) = lookup("BARISTA_DEVICE_SPEECH_RESOURCE") {
        config.device.speech_resource = resource;
    }
}
