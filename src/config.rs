//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! The loaded [`Config`] is passed explicitly to whatever needs it; nothing
//! here keeps process-wide state.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::analysis::Thresholds;
use crate::nightscout::NightscoutConfig;

/// Environment variable holding the Nightscout site URL
pub const ENV_NIGHTSCOUT_URL: &str = "NIGHTSCOUT_URL";

/// Environment variable holding the plain-text API secret
pub const ENV_API_SECRET: &str = "API_SECRET";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub nightscout: NightscoutSettings,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Nightscout connection settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NightscoutSettings {
    /// Site URL; required before any client can be built
    pub url: Option<String>,

    /// Plain-text API secret (hashed before sending)
    pub api_secret: Option<String>,

    /// Request timeout; the HTTP transport default applies when unset
    pub request_timeout_secs: Option<u64>,
}

/// How the MCP server talks to its client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    #[default]
    Stdio,
    /// HTTP server with a `/mcp` endpoint
    Http,
}

/// MCP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub transport: Transport,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8085
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for the HTTP transport
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber
    ///
    /// Logs always go to stderr: on the stdio transport stdout carries
    /// protocol frames only. `RUST_LOG` wins over the configured level.
    pub fn init(&self) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("nightscout_advisor={}", self.level).into());

        let registry = tracing_subscriber::registry().with(filter);

        if self.format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, the default locations, or the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Self::load_default(),
        }
    }

    /// Load from default locations or environment
    ///
    /// The first existing file wins; a file that exists but cannot be read
    /// or parsed is an error rather than being skipped.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("nightscout-advisor").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        Self::load_first_existing(config_paths.iter().flatten())
    }

    fn load_first_existing<'a>(
        paths: impl IntoIterator<Item = &'a PathBuf>,
    ) -> Result<Self, ConfigError> {
        for path in paths {
            if path.exists() {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                return Ok(config);
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Ok(Self::from_env())
    }

    /// Build the Nightscout client configuration
    ///
    /// Fails when no site URL has been configured.
    pub fn nightscout_config(&self) -> Result<NightscoutConfig, ConfigError> {
        let base_url = self
            .nightscout
            .url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingUrl)?;

        Ok(NightscoutConfig {
            base_url,
            api_secret: self.nightscout.api_secret.clone(),
            request_timeout_secs: self.nightscout.request_timeout_secs,
        })
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Nightscout overrides
        if let Some(url) = lookup(ENV_NIGHTSCOUT_URL) {
            self.nightscout.url = Some(url);
        }
        if let Some(secret) = lookup(ENV_API_SECRET) {
            self.nightscout.api_secret = Some(secret).filter(|s| !s.is_empty());
        }

        // Server overrides
        if let Some(host) = lookup("NIGHTSCOUT_ADVISOR_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("NIGHTSCOUT_ADVISOR_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Logging overrides
        if let Some(level) = lookup("NIGHTSCOUT_ADVISOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("NIGHTSCOUT_ADVISOR_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("NIGHTSCOUT_URL is not set and no [nightscout] url is configured")]
    MissingUrl,
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Nightscout Advisor Configuration
#
# Environment variables override these settings:
# - NIGHTSCOUT_URL
# - API_SECRET
# - NIGHTSCOUT_ADVISOR_HOST
# - NIGHTSCOUT_ADVISOR_PORT
# - NIGHTSCOUT_ADVISOR_LOG_LEVEL
# - NIGHTSCOUT_ADVISOR_LOG_FORMAT

[nightscout]
# Nightscout site URL (required)
url = "https://your-site.example.com"

# API secret in plain text; only its SHA-1 digest is sent
# api_secret = ""

# Request timeout in seconds (HTTP client default when unset)
# request_timeout_secs = 30

[thresholds]
# Illustrative cut-offs, not clinical guidance
range_low = 70.0
range_high = 180.0
high_average = 160.0
low_average = 100.0
time_in_range_target = 70.0
high_iob = 1.0

[server]
# Transport: stdio (for MCP clients) or http
transport = "stdio"

# HTTP transport bind address
host = "127.0.0.1"
port = 8085

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
