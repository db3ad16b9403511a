//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::calendar::{IcsGenerator, IcsOptions};
use crate::session::{MemoryPreferenceStore, RolePreferenceStore};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Calendar file generator
    pub generator: Arc<IcsGenerator>,
    /// Saved role preferences
    pub preferences: Arc<dyn RolePreferenceStore>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create AppState with an in-memory preference store
    pub fn new(options: IcsOptions, config: ApiConfig) -> Self {
        Self::with_store(options, config, Arc::new(MemoryPreferenceStore::new()))
    }

    /// Create AppState with a custom preference store
    pub fn with_store(
        options: IcsOptions,
        config: ApiConfig,
        preferences: Arc<dyn RolePreferenceStore>,
    ) -> Self {
        Self {
            generator: Arc::new(IcsGenerator::new(options)),
            preferences,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Allowed CORS origins (empty = permissive)
    pub cors_origins: Vec<String>,
    /// Enable calendar export endpoint
    pub enable_export: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            request_timeout_ms: 30_000,
            max_body_size: 1024 * 1024, // 1MB
            cors_origins: Vec::new(),
            enable_export: true,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<&crate::config::ApiConfig> for ApiConfig {
    fn from(config: &crate::config::ApiConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            request_timeout_ms: config.request_timeout_secs.saturating_mul(1000),
            cors_origins: config.cors_origins.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_config() {
        let file_config = crate::config::ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
            cors_origins: vec!["https://hub.example.com".to_string()],
            request_timeout_secs: 5,
        };

        let config = ApiConfig::from(&file_config);
        assert_eq!(config.addr(), "127.0.0.1:9000");
        assert_eq!(config.request_timeout_ms, 5_000);
        assert_eq!(config.cors_origins, vec!["https://hub.example.com"]);
        assert!(config.enable_export);
    }
}
