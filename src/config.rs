//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `INNOTRUE_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::calendar::ics::DEFAULT_PRODUCT_ID;
use crate::calendar::IcsOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Calendar export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_product_id")]
    pub product_id: String,

    /// Log a warning when an event names an unknown zone or pattern
    #[serde(default = "default_warn_on_fallback")]
    pub warn_on_fallback: bool,
}

fn default_product_id() -> String {
    DEFAULT_PRODUCT_ID.to_string()
}

fn default_warn_on_fallback() -> bool {
    true
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            product_id: default_product_id(),
            warn_on_fallback: default_warn_on_fallback(),
        }
    }
}

impl CalendarConfig {
    /// Generator options for these settings
    pub fn ics_options(&self) -> IcsOptions {
        IcsOptions {
            product_id: self.product_id.clone(),
            warn_on_fallback: self.warn_on_fallback,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// JSON file holding saved role preferences
    #[serde(default = "default_preferences_path")]
    pub preferences_path: String,
}

fn default_preferences_path() -> String {
    dirs::data_local_dir()
        .map(|p| {
            p.join("innotrue")
                .join("role_preferences.json")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./innotrue_data/role_preferences.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preferences_path: default_preferences_path(),
        }
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
    /// `RUST_LOG` takes precedence over the configured level.
    pub fn init(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "innotrue_hub={},tower_http=debug",
                self.level
            ))
        });

        let registry = tracing_subscriber::registry().with(filter);
        let result = if self.format == "json" {
            registry.with(tracing_subscriber::fmt::layer().json()).try_init()
        } else {
            registry.with(tracing_subscriber::fmt::layer()).try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialised: {}", e);
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

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("innotrue").join("config.toml")),
            Some(PathBuf::from("/etc/innotrue/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = var("INNOTRUE_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("INNOTRUE_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Calendar overrides
        if let Some(product_id) = var("INNOTRUE_PRODUCT_ID") {
            self.calendar.product_id = product_id;
        }

        // Session overrides
        if let Some(path) = var("INNOTRUE_PREFERENCES_PATH") {
            self.session.preferences_path = path;
        }

        // Logging overrides
        if let Some(level) = var("INNOTRUE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("INNOTRUE_LOG_FORMAT") {
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
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# InnoTrue Hub Configuration
#
# Environment variables override these settings:
# - INNOTRUE_API_HOST
# - INNOTRUE_API_PORT
# - INNOTRUE_PRODUCT_ID
# - INNOTRUE_PREFERENCES_PATH
# - INNOTRUE_LOG_LEVEL
# - INNOTRUE_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins
cors_origins = ["http://localhost:5173", "http://127.0.0.1:5173"]

# Request timeout in seconds
request_timeout_secs = 30

[calendar]
# PRODID written into exported calendar files
product_id = "-//InnoTrue Hub//Calendar Export//EN"

# Warn in the logs when an event names an unknown timezone or
# recurrence pattern (the export still succeeds, in UTC / non-repeating)
warn_on_fallback = true

[session]
# JSON file storing each user's last chosen role
preferences_path = "~/.local/share/innotrue/role_preferences.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
